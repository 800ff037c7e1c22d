//! Decoding of data elements, one record at a time.
//!
//! An `ElementReader` walks over the data elements of a byte cursor in a
//! given `DecodeMode`. Running out of data, or meeting a record that cannot
//! be trusted, ends the iteration rather than failing: the reason is kept
//! in `ElementReader::end_reason` so that callers can report it.

use crate::cursor::ByteCursor;
use crate::error::DicomError;
use crate::transfer_syntax::{DecodeMode, VrMode};
use crate::typedef::{Tag, ValueRepresentation};
use crate::util::{read_u16, read_u32};
use std::fmt;
use std::io::{Read, Seek, SeekFrom};
use tracing::debug;

/// Default ceiling for the value length of a single element, in bytes.
pub const DEFAULT_MAX_ELEMENT_LENGTH: u32 = 10_000_000;

/// A decoded data element.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Element {
    /// The element's identifier.
    pub tag: Tag,
    /// The element's value representation.
    pub vr: ValueRepresentation,
    /// The raw value bytes, exactly as found in the stream.
    pub value: Vec<u8>,
}

impl Element {
    /// Create a new element.
    pub fn new<T: Into<Tag>>(tag: T, vr: ValueRepresentation, value: Vec<u8>) -> Self {
        Element {
            tag: tag.into(),
            vr,
            value,
        }
    }

    /// The length of the value in bytes.
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Whether the value is empty.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// The reason for an element reader to stop.
#[derive(Debug)]
pub enum EndReason {
    /// The stream ended right at an element boundary.
    EndOfStream,
    /// The stream ended in the middle of an element.
    Truncated {
        /// Offset at which the incomplete element started.
        offset: u64,
    },
    /// An element declared a length above the ceiling,
    /// and its value was not read.
    SuspiciousLength {
        /// The element's identifier.
        tag: Tag,
        /// The declared length.
        length: u32,
    },
    /// In strict mode, an element had no valid VR code.
    UnrecognizedVr {
        /// The element's identifier.
        tag: Tag,
        /// The bytes found in place of the VR.
        bytes: [u8; 2],
    },
    /// The underlying source failed.
    Io(std::io::Error),
}

impl EndReason {
    /// Whether the stream ended cleanly, at an element boundary.
    pub fn is_clean(&self) -> bool {
        matches!(self, EndReason::EndOfStream)
    }

    /// Turn the reason into the corresponding error, if the stream did not
    /// end cleanly.
    pub fn into_result(self) -> Result<(), DicomError> {
        match self {
            EndReason::EndOfStream => Ok(()),
            EndReason::Truncated { .. } => Err(DicomError::Truncated),
            EndReason::SuspiciousLength { tag, length } => {
                Err(DicomError::SuspiciousLength(tag, length))
            }
            EndReason::UnrecognizedVr { .. } => Err(DicomError::InvalidFormat),
            EndReason::Io(e) => Err(DicomError::Io(e)),
        }
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EndReason::EndOfStream => f.write_str("end of stream"),
            EndReason::Truncated { offset } => {
                write!(f, "element at offset {} is truncated", offset)
            }
            EndReason::SuspiciousLength { tag, length } => {
                write!(f, "suspicious value length of element {}: {}", tag, length)
            }
            EndReason::UnrecognizedVr { tag, bytes } => write!(
                f,
                "element {} has invalid VR bytes {:02X} {:02X}",
                tag, bytes[0], bytes[1]
            ),
            EndReason::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

/// Iterator of data elements over a byte cursor.
#[derive(Debug)]
pub struct ElementReader<'c, R> {
    cursor: &'c mut ByteCursor<R>,
    mode: DecodeMode,
    max_length: u32,
    strict_vr: bool,
    end: Option<EndReason>,
}

impl<'c, R> ElementReader<'c, R>
where
    R: Read + Seek,
{
    /// Create a reader of elements starting at the current position of
    /// the cursor, using the default length ceiling and VR recovery.
    pub fn new(cursor: &'c mut ByteCursor<R>, mode: DecodeMode) -> Self {
        ElementReader {
            cursor,
            mode,
            max_length: DEFAULT_MAX_ELEMENT_LENGTH,
            strict_vr: false,
            end: None,
        }
    }

    /// Set the maximum value length accepted for an element.
    pub fn max_length(mut self, max_length: u32) -> Self {
        self.max_length = max_length;
        self
    }

    /// Whether to stop on explicit VR records with a non-alphabetic VR,
    /// instead of reading them as if the VR was absent.
    pub fn strict_vr(mut self, strict_vr: bool) -> Self {
        self.strict_vr = strict_vr;
        self
    }

    /// Make the reader yield no elements, as if the stream had already
    /// ended.
    pub fn stopped(mut self) -> Self {
        self.end = Some(EndReason::EndOfStream);
        self
    }

    /// The decoding mode of this reader.
    pub fn mode(&self) -> DecodeMode {
        self.mode
    }

    /// Why the reader stopped, if it already did.
    pub fn end_reason(&self) -> Option<&EndReason> {
        self.end.as_ref()
    }

    /// Consume the reader, reporting whether it stopped cleanly.
    /// A reader that has not stopped yet is considered to be fine.
    pub fn finish(self) -> Result<(), DicomError> {
        self.end.map_or(Ok(()), EndReason::into_result)
    }

    /// Retrieve the identifier of the next element without consuming it.
    /// Returns `None` if less than 4 bytes are left.
    pub fn peek_tag(&mut self) -> Option<Tag> {
        if self.end.is_some() {
            return None;
        }
        let start = self.cursor.position();
        let peeked = self.cursor.read_array::<4>();
        if self.cursor.seek(SeekFrom::Start(start)).is_err() {
            return None;
        }
        peeked.ok().map(|buf| self.decode_tag(&buf))
    }

    /// Decode the next element.
    ///
    /// Returns `Ok(None)` when the stream ends at an element boundary, and
    /// an error for any other reason to stop. The iterator implementation
    /// turns the latter into the end of iteration.
    fn read_element(&mut self) -> Result<Option<Element>, EndReason> {
        let start = self.cursor.position();
        let truncated = move |e: DicomError| match e {
            DicomError::Truncated => EndReason::Truncated { offset: start },
            DicomError::Io(e) => EndReason::Io(e),
            e => EndReason::Io(std::io::Error::new(std::io::ErrorKind::Other, e)),
        };

        let mut buf = [0u8; 4];
        match self.cursor.read_up_to(&mut buf).map_err(truncated)? {
            0 => return Ok(None),
            4 => {}
            _ => return Err(EndReason::Truncated { offset: start }),
        }
        let tag = self.decode_tag(&buf);
        let endianness = self.mode.endianness;

        let (vr, length) = match self.mode.vr_mode {
            VrMode::Explicit => {
                let vr_bytes: [u8; 2] = self.cursor.read_array().map_err(truncated)?;
                match ValueRepresentation::from_bytes(vr_bytes) {
                    Some(vr) if vr.has_long_length() => {
                        self.cursor.skip(2).map_err(truncated)?;
                        let len: [u8; 4] = self.cursor.read_array().map_err(truncated)?;
                        (vr, read_u32(&len, endianness))
                    }
                    Some(vr) => {
                        let len: [u8; 2] = self.cursor.read_array().map_err(truncated)?;
                        (vr, u32::from(read_u16(&len, endianness)))
                    }
                    None if self.strict_vr => {
                        return Err(EndReason::UnrecognizedVr {
                            tag,
                            bytes: vr_bytes,
                        });
                    }
                    None => {
                        // no VR in place, read it as an implicit VR length field
                        let _ = self
                            .cursor
                            .seek(SeekFrom::Current(-2))
                            .map_err(truncated)?;
                        let len: [u8; 4] = self.cursor.read_array().map_err(truncated)?;
                        (ValueRepresentation::Unknown, read_u32(&len, endianness))
                    }
                }
            }
            VrMode::Implicit => {
                let len: [u8; 4] = self.cursor.read_array().map_err(truncated)?;
                (ValueRepresentation::Unknown, read_u32(&len, endianness))
            }
        };

        if length > self.max_length {
            return Err(EndReason::SuspiciousLength { tag, length });
        }

        let value = self
            .cursor
            .read_exact(length as usize)
            .map_err(truncated)?;

        debug!("Read element {} VR: {} Length: {}", tag, vr, length);
        Ok(Some(Element { tag, vr, value }))
    }

    fn decode_tag(&self, buf: &[u8; 4]) -> Tag {
        let endianness = self.mode.endianness;
        Tag(read_u16(&buf[0..2], endianness), read_u16(&buf[2..4], endianness))
    }
}

impl<'c, R> Iterator for ElementReader<'c, R>
where
    R: Read + Seek,
{
    type Item = Element;

    fn next(&mut self) -> Option<Element> {
        if self.end.is_some() {
            return None;
        }
        match self.read_element() {
            Ok(Some(element)) => Some(element),
            Ok(None) => {
                self.end = Some(EndReason::EndOfStream);
                None
            }
            Err(reason) => {
                self.end = Some(reason);
                None
            }
        }
    }
}
