use scan_assembly::{
    cli::CliArgs,
    config::Config,
    logging,
    report::PageSummary,
    AppError, Image, Scanner, Strategy,
};

use anyhow::{Context, Result};
use log::{error, info};

fn print_page(page: usize, image: &Image) -> std::result::Result<(), AppError> {
    let summary = PageSummary::new(page, image);
    println!("{}", summary.to_json()?);
    Ok(())
}

fn main() -> Result<()> {
    // Parse command-line arguments
    let cli_args = CliArgs::parse_args();

    // Setup logging
    logging::setup_logging(cli_args.debug as u8, cli_args.log_file.as_deref())?;
    logging::log_app_start(scan_assembly::VERSION);

    // Load configuration
    let config = Config::load(&cli_args)?;
    logging::log_app_config(&config);

    let connection = scan_assembly::open_simulated(&config.device)
        .context("Failed to open simulated scanner")?;
    let mut scanner = Scanner::new(connection);

    let outcome = match config.acquisition.strategy {
        Strategy::Single => scanner
            .read_image()
            .map_err(AppError::from)
            .and_then(|image| print_page(1, &image)),
        Strategy::All => scanner
            .read_available_images()
            .map_err(AppError::from)
            .and_then(|images| {
                images
                    .iter()
                    .enumerate()
                    .try_for_each(|(i, image)| print_page(i + 1, image))
            }),
        Strategy::Continuous => {
            let mut page = 0;
            scanner.continuous_read(|image| {
                page += 1;
                print_page(page, &image)
            })
        }
    };

    if let Err(e) = &outcome {
        error!("Acquisition failed: {}", e);
    }
    outcome?;

    scanner.into_inner().close();
    info!("Acquisition finished, application shutting down");

    Ok(())
}
