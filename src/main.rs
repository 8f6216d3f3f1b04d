mod config;
mod device;
mod display;
mod dump;
mod flags;
mod framebuffer;
mod input;
mod orientation;
mod session;
mod viewer;

use std::time::Duration;

use clap::Parser;

use config::{Cli, Command, Config};
use device::DeviceProfile;
use display::{HeadlessDisplay, HeadlessPresenter};
use session::DryRunSession;
use viewer::{Shutdown, Viewer};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let device = DeviceProfile::current();

    if let Some(Command::Dump { device: which }) = &cli.command {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
        let config = Config::load(&cli, device);
        let Some(path) = dump::device_path(which, &config) else {
            eprintln!("Usage: vnc-pad dump <keys|touch>");
            eprintln!("  Streams and prints raw input events for debugging.");
            std::process::exit(1);
        };
        return dump::run_dump(path);
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load(&cli, device);
    if let Err(e) = config.validate() {
        eprintln!("{}", e);
        eprintln!("Usage: vnc-pad [OPTIONS] <HOST:PORT>");
        std::process::exit(1);
    }

    log::info!(
        "vnc-pad starting (device={}, server={}, keys={}, touch={}, orientation={}, filter={})",
        device.name,
        config.address,
        config.key_device,
        config.touch_device,
        config.orientation,
        config.filter
    );

    let session = DryRunSession::new(&config.address, device.surface_width, device.surface_height);
    let mut viewer = Viewer::new(
        session,
        HeadlessPresenter::default(),
        device.surface_width,
        device.surface_height,
    )
    .with_password(config.password.clone())
    .with_wait_timeout(Duration::from_millis(config.wait_timeout_ms));

    viewer.start(&config.render_params(device))?;
    viewer.spawn_display(Box::new(HeadlessDisplay))?;
    viewer.spawn_input(config.input_settings(device))?;

    match viewer.run() {
        Shutdown::Requested => Ok(()),
        Shutdown::Session(e) => {
            log::error!("Session ended: {}", e);
            Err(e)
        }
    }
}
