use corvid_engine::uci::Engine;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    Engine::new().run_stdin_loop();
}
