use clap::Parser;

use crate::acquisition::Strategy;
use crate::device::{ScanMode, ScanSource};

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// TOML configuration file
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, value_enum)]
    pub mode: Option<ScanMode>,

    /// Bits per sample (1, 8 or 16)
    #[arg(long)]
    pub depth: Option<u8>,

    #[arg(long)]
    pub width: Option<usize>,

    #[arg(long)]
    pub height: Option<usize>,

    /// Channel order for three-pass color scans, e.g. "BGR"
    #[arg(long)]
    pub three_pass: Option<String>,

    /// Unreported pixels of padding at the end of each line
    #[arg(long)]
    pub ppl_loss: Option<usize>,

    /// Leave the line count unreported, like a hand scanner
    #[arg(long)]
    pub hand_scanner: bool,

    #[arg(long, value_enum)]
    pub source: Option<ScanSource>,

    /// Pages loaded in the document feeder
    #[arg(long)]
    pub pages: Option<usize>,

    #[arg(long, value_enum)]
    pub strategy: Option<Strategy>,

    #[arg(long)]
    pub debug: bool,

    #[arg(long)]
    pub log_file: Option<String>,
}

impl CliArgs {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
