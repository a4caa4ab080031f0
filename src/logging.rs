use anyhow::Result;
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use log::{debug, info, LevelFilter};
use std::io;

use crate::config::Config;

pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn setup_logging(verbosity: u8, log_file: Option<&str>) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);

    let mut base_config = fern::Dispatch::new().level(level_for(verbosity));

    // File logs carry the full date, the console only the time of day.
    let file_config = fern::Dispatch::new().format(|out, message, record| {
        out.finish(format_args!(
            "{}[{}][{}] {}",
            Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
            record.target(),
            record.level(),
            message
        ))
    });

    let console_config = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                Local::now().format("[%H:%M:%S]"),
                record.target(),
                colors.color(record.level()),
                message
            ))
        })
        .chain(io::stderr());

    base_config = base_config.chain(console_config);

    if let Some(log_file) = log_file {
        base_config = base_config.chain(file_config.chain(fern::log_file(log_file)?));
    }

    base_config.apply()?;

    debug!("Logging system initialized");
    Ok(())
}

pub fn log_app_start(version: &str) {
    info!("Starting scan assembly v{}", version);
}

pub fn log_app_config(config: &Config) {
    let device = &config.device;
    info!("Application configured with:");
    info!("  Device:");
    info!("    Source: {:?}", device.source);
    info!("    Mode: {:?}", device.mode);
    info!("    Depth: {}", device.depth);
    info!("    Resolution: {}x{}", device.width, device.height);
    if device.three_pass {
        info!("    Three-pass order: {}", device.three_pass_order);
    }
    info!("    Pixels lost per line: {}", device.ppl_loss);
    if device.hand_scanner {
        info!("    Line count unreported (hand scanner)");
    }
    info!("  Acquisition:");
    info!("    Strategy: {:?}", config.acquisition.strategy);
}
