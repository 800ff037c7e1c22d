//! This module contains the identifier and value representation types
//! used when decoding data elements, along with the few attribute tags
//! that carry meaning to this crate.

use std::fmt;

/// A data element identifier, made of a group and an element number.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy)]
pub struct Tag(pub u16, pub u16);

impl Tag {
    /// The group number of this tag.
    pub fn group(self) -> u16 {
        self.0
    }

    /// The element number of this tag.
    pub fn element(self) -> u16 {
        self.1
    }
}

impl From<(u16, u16)> for Tag {
    fn from((group, element): (u16, u16)) -> Self {
        Tag(group, element)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:04X},{:04X})", self.0, self.1)
    }
}

/// The group of the file meta information, always encoded in
/// explicit VR little endian.
pub const META_GROUP: u16 = 0x0002;

/// File Meta Information Group Length
pub const META_GROUP_LENGTH: Tag = Tag(0x0002, 0x0000);
/// Media Storage SOP Class UID
pub const MEDIA_STORAGE_SOP_CLASS_UID: Tag = Tag(0x0002, 0x0002);
/// Media Storage SOP Instance UID
pub const MEDIA_STORAGE_SOP_INSTANCE_UID: Tag = Tag(0x0002, 0x0003);
/// Transfer Syntax UID
pub const TRANSFER_SYNTAX_UID: Tag = Tag(0x0002, 0x0010);
/// Implementation Class UID
pub const IMPLEMENTATION_CLASS_UID: Tag = Tag(0x0002, 0x0012);
/// Implementation Version Name
pub const IMPLEMENTATION_VERSION_NAME: Tag = Tag(0x0002, 0x0013);

/// Rows
pub const ROWS: Tag = Tag(0x0028, 0x0010);
/// Columns
pub const COLUMNS: Tag = Tag(0x0028, 0x0011);
/// Pixel Spacing
pub const PIXEL_SPACING: Tag = Tag(0x0028, 0x0030);
/// Bits Allocated
pub const BITS_ALLOCATED: Tag = Tag(0x0028, 0x0100);
/// Pixel Data
pub const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);

/// Value representations whose header has two reserved bytes
/// followed by a 4-byte length in explicit VR encoding.
const LONG_LENGTH_CODES: [&[u8; 2]; 6] = [b"OB", b"OW", b"OF", b"SQ", b"UT", b"UN"];

/// Value representations decoded as text for presentation.
const TEXT_CODES: [&[u8; 2]; 15] = [
    b"CS", b"SH", b"LO", b"ST", b"LT", b"UT", b"PN", b"AE", b"AS", b"DA", b"DS", b"DT", b"IS",
    b"TM", b"UI",
];

/// The value representation of a decoded element: either the two-letter
/// code found in the stream, or unknown when the stream does not encode
/// one (implicit VR, or a recovered record in explicit VR).
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ValueRepresentation {
    /// A two-letter code, as read from the stream.
    Code([u8; 2]),
    /// No code is available for the element.
    Unknown,
}

impl ValueRepresentation {
    /// Interpret the two given bytes as a value representation code.
    /// Returns `None` if either byte is not an ASCII letter.
    pub fn from_bytes(bytes: [u8; 2]) -> Option<Self> {
        if bytes.iter().all(u8::is_ascii_alphabetic) {
            Some(ValueRepresentation::Code(bytes))
        } else {
            None
        }
    }

    /// The textual form of the code, or `"??"` if unknown.
    pub fn as_str(&self) -> &str {
        match self {
            ValueRepresentation::Code(code) => std::str::from_utf8(code).unwrap_or("??"),
            ValueRepresentation::Unknown => "??",
        }
    }

    /// Whether this value representation is encoded with two reserved
    /// bytes and a 4-byte length field in explicit VR mode.
    pub fn has_long_length(&self) -> bool {
        match self {
            ValueRepresentation::Code(code) => LONG_LENGTH_CODES.contains(&code),
            ValueRepresentation::Unknown => false,
        }
    }

    /// Whether the value is textual.
    pub fn is_text(&self) -> bool {
        match self {
            ValueRepresentation::Code(code) => TEXT_CODES.contains(&code),
            ValueRepresentation::Unknown => false,
        }
    }
}

impl fmt::Display for ValueRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
