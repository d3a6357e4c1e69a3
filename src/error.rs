use std::fmt;
use std::io;
use std::path::PathBuf;

use image::{ImageError, ImageFormat};
use thiserror::Error;

/// A codec feature that was not compiled into this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Decoder(ImageFormat),
    IcoEncoder,
}

impl Capability {
    /// Name of the `image` crate feature that provides this capability.
    pub fn feature(&self) -> String {
        match self {
            // the plain "avif" feature only enables the encoder
            Capability::Decoder(ImageFormat::Avif) => "avif-decoder".to_string(),
            Capability::Decoder(format) => format!("{:?}", format).to_lowercase(),
            Capability::IcoEncoder => "ico".to_string(),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Decoder(format) => write!(f, "{:?} decoding", format),
            Capability::IcoEncoder => write!(f, "ICO encoding"),
        }
    }
}

/// Everything that can go wrong once the source exists and the codec is present.
#[derive(Debug, Error)]
pub enum Failure {
    #[error("failed to read '{}': {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to decode '{}': {source}", .path.display())]
    Decode { path: PathBuf, source: ImageError },
    #[error("failed to encode {size}x{size} icon: {source}")]
    Encode { size: u32, source: ImageError },
    #[error("failed to assemble icon container: {source}")]
    Container { source: ImageError },
    #[error("failed to write '{}': {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("cannot find file '{}'", .0.display())]
    MissingSource(PathBuf),
    #[error("{0} support is not available")]
    MissingCapability(Capability),
    #[error(transparent)]
    Failed(#[from] Failure),
}

impl From<Capability> for ConvertError {
    fn from(capability: Capability) -> Self {
        ConvertError::MissingCapability(capability)
    }
}
