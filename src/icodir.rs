//! Reader for the ICONDIR structure at the front of an `.ico` file.
//!
//! Layout (all little endian):
//! - header, 6 bytes: reserved (0), type (1 = icon), image count
//! - one 16 byte entry per image: width, height (0 means 256), colour count,
//!   reserved, planes, bits per pixel, payload size, payload offset

use std::fmt;

use thiserror::Error;

const HEADER_LEN: usize = 6;
const ENTRY_LEN: usize = 16;
const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
// signature (8) + chunk length (4) + "IHDR" (4) + width (4) + height (4) + bit depth (1)
const PNG_COLOR_TYPE_OFFSET: usize = 25;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IconDirError {
    #[error("file too short for an icon header ({0} bytes)")]
    Truncated(usize),
    #[error("not an icon file (reserved={reserved}, type={kind})")]
    NotAnIcon { reserved: u16, kind: u16 },
    #[error("icon entry {index} points outside the file")]
    EntryOutOfBounds { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconEntry {
    pub width: u32,
    pub height: u32,
    pub color_count: u8,
    pub planes: u16,
    pub bit_count: u16,
    pub size: u32,
    pub offset: u32,
    png_color_type: Option<u8>,
}

impl IconEntry {
    pub fn is_square(&self) -> bool { self.width == self.height }

    pub fn is_png(&self) -> bool { self.png_color_type.is_some() }

    /// PNG payloads carry alpha for grey+alpha (4) and RGBA (6); BMP payloads at 32 bpp.
    pub fn has_alpha(&self) -> bool {
        match self.png_color_type {
            Some(color_type) => color_type == 4 || color_type == 6,
            None => self.bit_count == 32,
        }
    }
}

impl fmt::Display for IconEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}  {}-bit  {}  {} bytes",
            self.width,
            self.height,
            self.bit_count,
            if self.is_png() { "png" } else { "bmp" },
            self.size
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconDir {
    pub entries: Vec<IconEntry>,
}

impl IconDir {
    pub fn parse(bytes: &[u8]) -> Result<Self, IconDirError> {
        if bytes.len() < HEADER_LEN {
            return Err(IconDirError::Truncated(bytes.len()));
        }
        let reserved = u16_at(bytes, 0);
        let kind = u16_at(bytes, 2);
        if reserved != 0 || kind != 1 {
            return Err(IconDirError::NotAnIcon { reserved, kind });
        }
        let count = u16_at(bytes, 4) as usize;
        if bytes.len() < HEADER_LEN + count * ENTRY_LEN {
            return Err(IconDirError::Truncated(bytes.len()));
        }

        let mut entries = Vec::with_capacity(count);
        for index in 0..count {
            let e = HEADER_LEN + index * ENTRY_LEN;
            let size = u32_at(bytes, e + 8);
            let offset = u32_at(bytes, e + 12);
            let start = offset as usize;
            let payload = start
                .checked_add(size as usize)
                .and_then(|end| bytes.get(start..end))
                .ok_or(IconDirError::EntryOutOfBounds { index })?;

            entries.push(IconEntry {
                width: dimension(bytes[e]),
                height: dimension(bytes[e + 1]),
                color_count: bytes[e + 2],
                planes: u16_at(bytes, e + 4),
                bit_count: u16_at(bytes, e + 6),
                size,
                offset,
                png_color_type: png_color_type(payload),
            });
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

#[inline]
fn dimension(b: u8) -> u32 { if b == 0 { 256 } else { b as u32 } }

#[inline]
fn u16_at(b: &[u8], at: usize) -> u16 { u16::from_le_bytes([b[at], b[at + 1]]) }

#[inline]
fn u32_at(b: &[u8], at: usize) -> u32 { u32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]]) }

fn png_color_type(payload: &[u8]) -> Option<u8> {
    if payload.starts_with(&PNG_SIGNATURE) {
        payload.get(PNG_COLOR_TYPE_OFFSET).copied()
    } else {
        None
    }
}
