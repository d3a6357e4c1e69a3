use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use image::imageops::FilterType;

use crate::convert::{DEFAULT_DESTINATION, DEFAULT_SOURCE};
use crate::sizes::IconSizes;

#[derive(Parser)]
#[command(name = "jpg2ico")]
#[command(about = "Convert an image into a multi-resolution Windows icon")]
#[command(version)]
pub struct Cli {
    /// Increase log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert an image into an .ico file (the default)
    Convert(ConvertArgs),
    /// List the images stored in an .ico file
    Inspect {
        /// Icon file to read
        file: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Image to convert
    #[arg(default_value = DEFAULT_SOURCE)]
    pub source: PathBuf,

    /// Icon file to write
    #[arg(default_value = DEFAULT_DESTINATION)]
    pub destination: PathBuf,

    /// Comma separated square sizes to embed, e.g. 256,48,16
    #[arg(long, default_value_t = IconSizes::default())]
    pub sizes: IconSizes,

    /// Resampling filter used for resizing
    #[arg(long, value_enum, default_value_t = Filter::Lanczos3)]
    pub filter: Filter,

    /// Exit with status 1 unless the conversion succeeded
    #[arg(long)]
    pub strict: bool,
}

impl Default for ConvertArgs {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE),
            destination: PathBuf::from(DEFAULT_DESTINATION),
            sizes: IconSizes::default(),
            filter: Filter::Lanczos3,
            strict: false,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<Filter> for FilterType {
    fn from(filter: Filter) -> Self {
        match filter {
            Filter::Nearest => FilterType::Nearest,
            Filter::Triangle => FilterType::Triangle,
            Filter::CatmullRom => FilterType::CatmullRom,
            Filter::Gaussian => FilterType::Gaussian,
            Filter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}
