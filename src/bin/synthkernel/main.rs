//! synthkernel - plays a short scripted tour of the kernel on the default
//! output device.
//!
//! Run with: cargo run --bin synthkernel

mod app;
mod tour;

use app::Demo;
use simple_logger::SimpleLogger;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()?;

    Demo::new().steps(tour::steps()).run()
}
