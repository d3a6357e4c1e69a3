use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Largest side length an icon directory entry can describe (stored as 0).
pub const MAX_ICON_SIZE: u32 = 256;

/// Windows icon sizes embedded by default, largest first.
pub const DEFAULT_SIZES: [u32; 6] = [256, 128, 64, 48, 32, 16];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizeError {
    #[error("at least one icon size is required")]
    Empty,
    #[error("icon size {0} is out of range (1..=256)")]
    OutOfRange(u32),
    #[error("invalid icon size '{0}'")]
    Invalid(String),
}

/// Ordered set of square side lengths, largest first, without duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSizes(Vec<u32>);

impl IconSizes {
    pub fn new(sizes: impl IntoIterator<Item = u32>) -> Result<Self, SizeError> {
        let mut sizes: Vec<u32> = sizes.into_iter().collect();
        if sizes.is_empty() {
            return Err(SizeError::Empty);
        }
        if let Some(&bad) = sizes.iter().find(|&&s| s == 0 || s > MAX_ICON_SIZE) {
            return Err(SizeError::OutOfRange(bad));
        }
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        sizes.dedup();
        Ok(Self(sizes))
    }

    pub fn as_slice(&self) -> &[u32] { &self.0 }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ { self.0.iter().copied() }
}

impl Default for IconSizes {
    fn default() -> Self {
        Self(DEFAULT_SIZES.to_vec())
    }
}

impl FromStr for IconSizes {
    type Err = SizeError;

    /// Parses a comma separated list such as `256,48,16`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<u32>().map_err(|_| SizeError::Invalid(part.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(parsed)
    }
}

impl fmt::Display for IconSizes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.0.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", joined.join(","))
    }
}
