//! Private utility module
use byteordered::byteorder::{BigEndian, ByteOrder, LittleEndian};
use byteordered::Endianness;
use std::path::Path;

/// Decode an unsigned 16-bit integer from the first two bytes of `buf`.
///
/// # Panics
///
/// If `buf` has less than two bytes.
pub fn read_u16(buf: &[u8], endianness: Endianness) -> u16 {
    match endianness {
        Endianness::Little => LittleEndian::read_u16(buf),
        Endianness::Big => BigEndian::read_u16(buf),
    }
}

/// Decode an unsigned 32-bit integer from the first four bytes of `buf`.
///
/// # Panics
///
/// If `buf` has less than four bytes.
pub fn read_u32(buf: &[u8], endianness: Endianness) -> u32 {
    match endianness {
        Endianness::Little => LittleEndian::read_u32(buf),
        Endianness::Big => BigEndian::read_u32(buf),
    }
}

/// Decode a sequence of unsigned 16-bit integers.
///
/// # Panics
///
/// If `src.len()` is not exactly `2 * dst.len()`.
pub fn read_u16_into(src: &[u8], dst: &mut [u16], endianness: Endianness) {
    match endianness {
        Endianness::Little => LittleEndian::read_u16_into(src, dst),
        Endianness::Big => BigEndian::read_u16_into(src, dst),
    }
}

/// Check whether the file name of `path` ends with the given extension,
/// ignoring ASCII case. The extension is given without the leading dot.
pub fn has_extension<P>(path: P, extension: &str) -> bool
where
    P: AsRef<Path>,
{
    path.as_ref()
        .file_name()
        .map(|name| {
            let name = name.to_string_lossy().to_ascii_lowercase();
            let suffix = format!(".{}", extension.to_ascii_lowercase());
            name.len() > suffix.len() && name.ends_with(&suffix)
        })
        .unwrap_or(false)
}

/// Remove the trailing whitespace and null padding of a textual value.
pub fn trim_padding(text: &str) -> &str {
    text.trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
}

/// Decode a textual value, replacing invalid characters, and trim it.
pub fn decode_text(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    trim_padding(&text).trim_start().to_string()
}

/// Lowercase hexadecimal dump of the given bytes, without separators.
pub fn hex_dump(raw: &[u8]) -> String {
    raw.iter().map(|b| format!("{:02x}", b)).collect()
}
