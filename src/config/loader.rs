use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::acquisition::Strategy;
use crate::cli::CliArgs;
use crate::device::DeviceConfig;
use crate::error::AppError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub device: DeviceConfig,
    pub acquisition: AcquisitionConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    pub strategy: Strategy,
}

impl Config {
    pub fn load(cli_args: &CliArgs) -> Result<Self> {
        let mut config = match cli_args.config.as_deref() {
            Some(path) => {
                info!("Loading configuration from {}", path);
                let config_str = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {}", path))?;
                Self::from_toml(&config_str)
                    .with_context(|| format!("Failed to parse config file: {}", path))?
            }
            None => {
                info!("No configuration file given, using defaults");
                Self::default()
            }
        };

        // Override config with CLI arguments
        config.override_with_cli_args(cli_args);

        config.validate()?;

        Ok(config)
    }

    pub fn from_toml(config_str: &str) -> Result<Self> {
        Ok(toml::from_str(config_str)?)
    }

    fn override_with_cli_args(&mut self, args: &CliArgs) {
        let device = &mut self.device;
        if let Some(mode) = args.mode {
            device.mode = mode;
        }
        if let Some(depth) = args.depth {
            device.depth = depth;
        }
        if let Some(width) = args.width {
            device.width = width;
        }
        if let Some(height) = args.height {
            device.height = height;
        }
        if let Some(order) = &args.three_pass {
            device.three_pass = true;
            device.three_pass_order = order.clone();
        }
        if let Some(ppl_loss) = args.ppl_loss {
            device.ppl_loss = ppl_loss;
        }
        if args.hand_scanner {
            device.hand_scanner = true;
        }
        if let Some(source) = args.source {
            device.source = source;
        }
        if let Some(pages) = args.pages {
            device.feeder_pages = pages;
        }

        if let Some(strategy) = args.strategy {
            self.acquisition.strategy = strategy;
        }
    }

    fn validate(&self) -> Result<()> {
        self.device
            .validate()
            .map_err(AppError::config)
            .context("Invalid device configuration")?;
        Ok(())
    }
}
