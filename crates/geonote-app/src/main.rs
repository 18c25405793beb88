//! Main application entry point (native).

fn main() {
    env_logger::init();
    log::info!("Starting Geonote");

    if let Err(e) = pollster::block_on(geonote_app::App::run()) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
