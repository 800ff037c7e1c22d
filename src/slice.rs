//! Interpretation of the elements that describe a slice: its dimensions,
//! its pixel spacing, and its pixel data.

use crate::diagnostics::Diagnostics;
use crate::element::Element;
use crate::error::{DicomError, Result};
use crate::typedef::{BITS_ALLOCATED, COLUMNS, PIXEL_SPACING, ROWS};
use crate::util::{decode_text, read_u16, read_u16_into};
use byteordered::Endianness;
use std::ops::Deref;

/// Size in bytes of each pixel sample. Samples are always read as
/// unsigned 16-bit integers.
pub const SAMPLE_SIZE: usize = 2;

/// The structural attributes of a slice, filled in as the respective
/// elements are found. When an element appears more than once, the last
/// occurrence wins.
#[derive(Debug, Default, PartialEq, Clone, Copy)]
pub struct SliceMetadata {
    /// Number of rows of the image.
    pub rows: Option<u16>,
    /// Number of columns of the image.
    pub columns: Option<u16>,
    /// Physical distance between pixel centers, as (row spacing, column spacing).
    pub pixel_spacing: Option<(f64, f64)>,
    /// Number of bits allocated for each sample, as declared by the file.
    /// Informative only.
    pub bits_allocated: Option<u16>,
}

impl SliceMetadata {
    /// Update the metadata with the given element. Elements other than
    /// rows, columns, pixel spacing and bits allocated are ignored, and so
    /// are malformed values of those, with a diagnostic.
    pub fn observe(
        &mut self,
        element: &Element,
        endianness: Endianness,
        diagnostics: &mut Diagnostics,
    ) {
        match element.tag {
            ROWS => self.rows = read_us(element, endianness, diagnostics).or(self.rows),
            COLUMNS => self.columns = read_us(element, endianness, diagnostics).or(self.columns),
            BITS_ALLOCATED => {
                if let Some(bits) = read_us(element, endianness, diagnostics) {
                    if bits as usize != SAMPLE_SIZE * 8 {
                        diagnostics.warning(format!(
                            "{} bits allocated per sample, samples will still be read as 16-bit",
                            bits
                        ));
                    }
                    self.bits_allocated = Some(bits);
                }
            }
            PIXEL_SPACING => match parse_pixel_spacing(&element.value) {
                Some(spacing) => self.pixel_spacing = Some(spacing),
                None => diagnostics.warning(format!(
                    "could not parse pixel spacing {:?}",
                    decode_text(&element.value)
                )),
            },
            _ => {}
        }
    }

    /// Retrieve the image dimensions as (rows, columns).
    ///
    /// # Errors
    ///
    /// - `DicomError::MissingDimensions` if either of them is unset or zero.
    pub fn dimensions(&self) -> Result<(u16, u16)> {
        match (self.rows, self.columns) {
            (Some(rows), Some(columns)) if rows > 0 && columns > 0 => Ok((rows, columns)),
            _ => Err(DicomError::MissingDimensions),
        }
    }

    /// The number of samples that the pixel data must hold, if the
    /// dimensions are known.
    pub fn number_of_samples(&self) -> Option<usize> {
        let (rows, columns) = self.dimensions().ok()?;
        usize::from(rows).checked_mul(usize::from(columns))
    }
}

fn read_us(element: &Element, endianness: Endianness, diagnostics: &mut Diagnostics) -> Option<u16> {
    if element.len() < 2 {
        diagnostics.warning(format!(
            "element {} has {} bytes, expected an unsigned short",
            element.tag,
            element.len()
        ));
        return None;
    }
    Some(read_u16(&element.value, endianness))
}

/// Parse a pixel spacing value: two decimal numbers separated by a backslash.
fn parse_pixel_spacing(raw: &[u8]) -> Option<(f64, f64)> {
    let text = decode_text(raw);
    let mut parts = text.split('\\').map(|p| p.trim().parse::<f64>());
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(row)), Some(Ok(column)), None) => Some((row, column)),
        _ => None,
    }
}

/// The samples of a slice, in the order in which they are stored.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct PixelBuffer(Vec<u16>);

impl PixelBuffer {
    /// Obtain the samples as a slice.
    pub fn as_slice(&self) -> &[u16] {
        &self.0
    }

    /// Take the samples, discarding the buffer.
    pub fn into_vec(self) -> Vec<u16> {
        self.0
    }
}

impl Deref for PixelBuffer {
    type Target = [u16];

    fn deref(&self) -> &[u16] {
        &self.0
    }
}

impl From<Vec<u16>> for PixelBuffer {
    fn from(samples: Vec<u16>) -> Self {
        PixelBuffer(samples)
    }
}

impl IntoIterator for PixelBuffer {
    type Item = u16;
    type IntoIter = ::std::vec::IntoIter<u16>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Decode the samples of a pixel data element.
///
/// # Errors
///
/// - `DicomError::MissingDimensions` if rows or columns are not known.
/// - `DicomError::PixelDataLengthMismatch` if the value does not hold
///   exactly `rows * columns` 16-bit samples, or if that many samples
///   cannot be addressed on this platform.
pub fn extract_pixel_data(
    element: &Element,
    metadata: &SliceMetadata,
    endianness: Endianness,
) -> Result<PixelBuffer> {
    let (rows, columns) = metadata.dimensions()?;
    let expected = usize::from(rows)
        .checked_mul(usize::from(columns))
        .and_then(|n| n.checked_mul(SAMPLE_SIZE))
        .ok_or(DicomError::PixelDataLengthMismatch(usize::MAX, element.len()))?;
    let nsamples = expected / SAMPLE_SIZE;
    if element.len() != expected {
        return Err(DicomError::PixelDataLengthMismatch(expected, element.len()));
    }
    let mut samples = vec![0u16; nsamples];
    read_u16_into(&element.value, &mut samples, endianness);
    Ok(PixelBuffer(samples))
}
