use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use image::GenericImageView;

use crate::codec::{Codec, ImageCodec};
use crate::error::{ConvertError, Failure};
use crate::logger::log_error;
use crate::sizes::IconSizes;

pub const DEFAULT_SOURCE: &str = "submit.jpg";
pub const DEFAULT_DESTINATION: &str = "icon.ico";

/// A finished conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converted {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub sizes: IconSizes,
    pub bytes_written: usize,
}

/// What the operator was told about a conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    MissingSource,
    MissingCapability,
    Failed(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool { matches!(self, Outcome::Succeeded) }
}

impl From<&Result<Converted, ConvertError>> for Outcome {
    fn from(result: &Result<Converted, ConvertError>) -> Self {
        match result {
            Ok(_) => Outcome::Succeeded,
            Err(ConvertError::MissingSource(_)) => Outcome::MissingSource,
            Err(ConvertError::MissingCapability(_)) => Outcome::MissingCapability,
            Err(ConvertError::Failed(failure)) => Outcome::Failed(failure.to_string()),
        }
    }
}

/// Converts raster images into multi-resolution icon files.
#[derive(Debug, Clone, Default)]
pub struct Converter<C = ImageCodec> {
    codec: C,
    sizes: IconSizes,
}

impl<C: Codec> Converter<C> {
    pub fn new(codec: C) -> Self {
        Self { codec, sizes: IconSizes::default() }
    }

    pub fn with_sizes(mut self, sizes: IconSizes) -> Self {
        self.sizes = sizes;
        self
    }

    pub fn sizes(&self) -> &IconSizes { &self.sizes }

    /// Decode `source`, convert it to RGBA and write an icon with one entry per size.
    ///
    /// `destination` is replaced atomically, so on any error it is left as it was.
    pub fn convert(&self, source: &Path, destination: &Path) -> Result<Converted, ConvertError> {
        if !source.exists() {
            return Err(ConvertError::MissingSource(source.to_path_buf()));
        }
        self.codec.check(source)?;

        let image = self.codec.decode(source)?;
        let (width, height) = image.dimensions();
        tracing::info!(
            path = %source.display(),
            width,
            height,
            color = ?image.color(),
            "decoded source image"
        );
        let rgba = image.into_rgba8();

        let bytes = self.codec.encode_icon(&rgba, &self.sizes)?;
        write_atomic(destination, &bytes)?;
        tracing::info!(path = %destination.display(), bytes = bytes.len(), sizes = %self.sizes, "wrote icon");

        Ok(Converted {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            sizes: self.sizes.clone(),
            bytes_written: bytes.len(),
        })
    }

    /// Convert and report the result on stdout. Never fails.
    pub fn run(&self, source: &Path, destination: &Path) -> Outcome {
        report(&self.convert(source, destination))
    }
}

fn write_atomic(destination: &Path, bytes: &[u8]) -> Result<(), Failure> {
    let write_err = |source| Failure::Write { path: destination.to_path_buf(), source };
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = tempfile::Builder::new();
    // Let the umask decide the mode of a new file, like a plain create would.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder.tempfile_in(dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    // An overwritten icon keeps its permissions.
    if let Ok(existing) = fs::metadata(destination) {
        tmp.as_file().set_permissions(existing.permissions()).map_err(write_err)?;
    }
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(destination).map_err(|e| write_err(e.error))?;
    Ok(())
}

/// Operator facing lines describing `result`.
pub fn diagnostics(result: &Result<Converted, ConvertError>) -> Vec<String> {
    match result {
        Ok(done) => vec![format!(
            "Success: converted '{}' to '{}'",
            done.source.display(),
            done.destination.display()
        )],
        Err(e @ ConvertError::MissingSource(path)) => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            vec![
                format!("Error: {}", e),
                format!("Make sure '{}' has been saved to the working directory.", name),
            ]
        }
        Err(e @ ConvertError::MissingCapability(capability)) => vec![
            format!("Error: {}.", e),
            format!("Rebuild with the image crate's \"{}\" feature enabled.", capability.feature()),
        ],
        Err(ConvertError::Failed(failure)) => vec![format!("Conversion failed: {}", failure)],
    }
}

/// Print the diagnostics for `result` and return its outcome.
pub fn report(result: &Result<Converted, ConvertError>) -> Outcome {
    if let Err(e) = result {
        log_error("conversion did not complete", e);
    }
    for line in diagnostics(result) {
        println!("{}", line);
    }
    Outcome::from(result)
}
