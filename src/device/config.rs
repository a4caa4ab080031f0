use crate::error::ScanError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    Gray,
    Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScanSource {
    Flatbed,
    Feeder,
}

/// Settings of the simulated scanner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub mode: ScanMode,
    pub depth: u8,
    pub width: usize,
    pub height: usize,
    pub three_pass: bool,
    pub three_pass_order: String,
    pub ppl_loss: usize,
    /// Report an unknown line count, as a hand scanner does.
    pub hand_scanner: bool,
    pub source: ScanSource,
    pub feeder_pages: usize,
    #[serde(skip)]
    pub read_status: Option<ScanError>,
    pub read_delay_ms: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            mode: ScanMode::Gray,
            depth: 8,
            width: 157,
            height: 196,
            three_pass: false,
            three_pass_order: String::from("RGB"),
            ppl_loss: 0,
            hand_scanner: false,
            source: ScanSource::Flatbed,
            feeder_pages: 10,
            read_status: None,
            read_delay_ms: 0,
        }
    }
}

impl DeviceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: ScanMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_resolution(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_three_pass(mut self, order: &str) -> Self {
        self.three_pass = true;
        self.three_pass_order = order.to_string();
        self
    }

    pub fn with_ppl_loss(mut self, ppl_loss: usize) -> Self {
        self.ppl_loss = ppl_loss;
        self
    }

    pub fn with_hand_scanner(mut self) -> Self {
        self.hand_scanner = true;
        self
    }

    pub fn with_feeder(mut self, pages: usize) -> Self {
        self.source = ScanSource::Feeder;
        self.feeder_pages = pages;
        self
    }

    pub fn with_read_status(mut self, status: ScanError) -> Self {
        self.read_status = Some(status);
        self
    }

    pub fn with_read_delay_ms(mut self, delay: u64) -> Self {
        self.read_delay_ms = delay;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if !matches!(self.depth, 1 | 8 | 16) {
            return Err(format!("Depth must be 1, 8 or 16, got {}", self.depth));
        }
        if self.width == 0 || self.height == 0 {
            return Err("Width and height must be greater than 0".to_string());
        }
        let mut order: Vec<char> = self.three_pass_order.to_ascii_uppercase().chars().collect();
        order.sort_unstable();
        if order != ['B', 'G', 'R'] {
            return Err(format!(
                "Three-pass order must be a permutation of RGB, got {:?}",
                self.three_pass_order
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DeviceConfig::default();
        assert_eq!(config.mode, ScanMode::Gray);
        assert_eq!(config.depth, 8);
        assert_eq!(config.source, ScanSource::Flatbed);
        assert_eq!(config.feeder_pages, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = DeviceConfig::new()
            .with_mode(ScanMode::Color)
            .with_depth(16)
            .with_resolution(40, 30)
            .with_three_pass("bgr")
            .with_ppl_loss(7)
            .with_hand_scanner()
            .with_feeder(3)
            .with_read_status(ScanError::Jammed)
            .with_read_delay_ms(5);

        assert_eq!(config.mode, ScanMode::Color);
        assert_eq!(config.depth, 16);
        assert_eq!((config.width, config.height), (40, 30));
        assert!(config.three_pass);
        assert_eq!(config.three_pass_order, "bgr");
        assert_eq!(config.ppl_loss, 7);
        assert!(config.hand_scanner);
        assert_eq!(config.source, ScanSource::Feeder);
        assert_eq!(config.feeder_pages, 3);
        assert_eq!(config.read_status, Some(ScanError::Jammed));
        assert_eq!(config.read_delay_ms, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_config() {
        let mut config = DeviceConfig::default();
        config.depth = 4;
        assert!(config.validate().is_err());

        config.depth = 8;
        config.width = 0;
        assert!(config.validate().is_err());

        config.width = 10;
        config.three_pass_order = "RRB".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let config: DeviceConfig = toml::from_str("mode = \"color\"\nthree_pass = true\n").unwrap();
        assert_eq!(config.mode, ScanMode::Color);
        assert!(config.three_pass);
        assert_eq!(config.depth, 8);
    }
}
