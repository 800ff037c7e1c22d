//! Transfer syntax negotiation.
//!
//! The transfer syntax UID, held by the file meta group, decides the byte
//! order and the value representation mode of the rest of the file. The
//! file meta group itself is always in explicit VR little endian.

use crate::cursor::ByteCursor;
use crate::diagnostics::Diagnostics;
use crate::element::ElementReader;
use crate::error::DicomError;
use crate::header::FileMetaHeader;
use crate::typedef::{META_GROUP, TRANSFER_SYNTAX_UID};
use crate::util::trim_padding;
use byteordered::Endianness;
use std::fmt;
use std::io::{Read, Seek};

/// Implicit VR Little Endian
pub const IMPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2";
/// Explicit VR Little Endian
pub const EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1";
/// Explicit VR Big Endian
pub const EXPLICIT_VR_BIG_ENDIAN: &str = "1.2.840.10008.1.2.2";
/// Deflated Explicit VR Little Endian
pub const DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1.99";
/// JPEG Baseline (Process 1)
pub const JPEG_BASELINE: &str = "1.2.840.10008.1.2.4.50";
/// JPEG Lossless, Non-Hierarchical, First-Order Prediction
pub const JPEG_LOSSLESS_SV1: &str = "1.2.840.10008.1.2.4.70";
/// RLE Lossless
pub const RLE_LOSSLESS: &str = "1.2.840.10008.1.2.5";

/// UID prefix of the JPEG family (JPEG, JPEG-LS, JPEG 2000, ...).
const JPEG_FAMILY_PREFIX: &str = "1.2.840.10008.1.2.4.";

/// How value representations are conveyed in the data set.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum VrMode {
    /// Each element carries its VR code.
    Explicit,
    /// Elements carry no VR code.
    Implicit,
}

/// The byte order and VR mode of a data set.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct DecodeMode {
    /// Byte order of every multi-byte number.
    pub endianness: Endianness,
    /// Whether elements carry VR codes.
    pub vr_mode: VrMode,
}

impl DecodeMode {
    /// Explicit VR Little Endian, the encoding of the file meta group.
    pub const EXPLICIT_LE: DecodeMode = DecodeMode {
        endianness: Endianness::Little,
        vr_mode: VrMode::Explicit,
    };
    /// Implicit VR Little Endian.
    pub const IMPLICIT_LE: DecodeMode = DecodeMode {
        endianness: Endianness::Little,
        vr_mode: VrMode::Implicit,
    };
    /// Explicit VR Big Endian.
    pub const EXPLICIT_BE: DecodeMode = DecodeMode {
        endianness: Endianness::Big,
        vr_mode: VrMode::Explicit,
    };
}

impl Default for DecodeMode {
    fn default() -> Self {
        DecodeMode::EXPLICIT_LE
    }
}

/// A transfer syntax, as identified by its UID.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum TransferSyntax {
    /// Implicit VR Little Endian
    ImplicitVrLittleEndian,
    /// Explicit VR Little Endian
    ExplicitVrLittleEndian,
    /// Explicit VR Big Endian
    ExplicitVrBigEndian,
    /// Explicit VR Little Endian, with the data set compressed with deflate
    DeflatedExplicitVrLittleEndian,
    /// A syntax with compressed (encapsulated) pixel data.
    Encapsulated(String),
    /// A syntax not known to this crate.
    Unknown(String),
}

impl TransferSyntax {
    /// Identify a transfer syntax from its UID. Trailing padding is ignored.
    pub fn from_uid(uid: &str) -> Self {
        match trim_padding(uid) {
            IMPLICIT_VR_LITTLE_ENDIAN => TransferSyntax::ImplicitVrLittleEndian,
            EXPLICIT_VR_LITTLE_ENDIAN => TransferSyntax::ExplicitVrLittleEndian,
            EXPLICIT_VR_BIG_ENDIAN => TransferSyntax::ExplicitVrBigEndian,
            DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN => TransferSyntax::DeflatedExplicitVrLittleEndian,
            uid if uid == RLE_LOSSLESS || is_jpeg_family(uid) => {
                TransferSyntax::Encapsulated(uid.to_string())
            }
            uid => TransferSyntax::Unknown(uid.to_string()),
        }
    }

    /// The UID of this transfer syntax.
    pub fn uid(&self) -> &str {
        match self {
            TransferSyntax::ImplicitVrLittleEndian => IMPLICIT_VR_LITTLE_ENDIAN,
            TransferSyntax::ExplicitVrLittleEndian => EXPLICIT_VR_LITTLE_ENDIAN,
            TransferSyntax::ExplicitVrBigEndian => EXPLICIT_VR_BIG_ENDIAN,
            TransferSyntax::DeflatedExplicitVrLittleEndian => DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN,
            TransferSyntax::Encapsulated(uid) | TransferSyntax::Unknown(uid) => uid,
        }
    }

    /// The decoding mode of data sets in this transfer syntax. Syntaxes
    /// other than the three native ones retain explicit VR little endian.
    pub fn decode_mode(&self) -> DecodeMode {
        match self {
            TransferSyntax::ImplicitVrLittleEndian => DecodeMode::IMPLICIT_LE,
            TransferSyntax::ExplicitVrBigEndian => DecodeMode::EXPLICIT_BE,
            _ => DecodeMode::EXPLICIT_LE,
        }
    }

    /// Whether the pixel data can be read as plain samples.
    pub fn pixel_data_decodable(&self) -> bool {
        !matches!(self, TransferSyntax::Encapsulated(_))
    }

    /// Whether the data set after the file meta group is deflated.
    pub fn is_deflated(&self) -> bool {
        matches!(self, TransferSyntax::DeflatedExplicitVrLittleEndian)
    }
}

impl Default for TransferSyntax {
    fn default() -> Self {
        TransferSyntax::ExplicitVrLittleEndian
    }
}

impl fmt::Display for TransferSyntax {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.uid())
    }
}

fn is_jpeg_family(uid: &str) -> bool {
    uid.strip_prefix(JPEG_FAMILY_PREFIX)
        .map(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or(false)
}

/// The outcome of reading the file meta group.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct Negotiation {
    /// The transfer syntax of the data set.
    pub syntax: TransferSyntax,
    /// The decoding mode of the data set.
    pub mode: DecodeMode,
    /// Everything else learned from the file meta group.
    pub meta: FileMetaHeader,
    /// Whether the file meta group could not be read to its end. The
    /// position of the cursor is then unreliable, and the data set must
    /// not be scanned.
    pub ended_early: bool,
}

/// Read the file meta group from the current position of the cursor and
/// establish how the rest of the file is to be decoded.
///
/// The cursor is expected to be at the first file meta element, which is
/// where `validate_preamble` leaves it. Elements are read in explicit VR
/// little endian for as long as they belong to group 0x0002; the cursor is
/// left at the first element of any other group.
///
/// A missing transfer syntax falls back to explicit VR little endian, and
/// so does an unrecognized one. Neither is an error: both are reported to
/// `diagnostics`. A meta group element without a valid VR code, with a
/// suspicious length, or cut short ends the negotiation with
/// `Negotiation::ended_early` set.
pub fn negotiate<R>(
    cursor: &mut ByteCursor<R>,
    max_length: u32,
    diagnostics: &mut Diagnostics,
) -> Negotiation
where
    R: Read + Seek,
{
    let mut meta = FileMetaHeader::default();
    let mut reader = ElementReader::new(cursor, DecodeMode::EXPLICIT_LE)
        .max_length(max_length)
        .strict_vr(true);
    while let Some(tag) = reader.peek_tag() {
        if tag.group() != META_GROUP {
            break;
        }
        match reader.next() {
            Some(element) => meta.observe(element.tag, &element.value),
            None => break,
        }
    }
    let ended_early = match reader.end_reason() {
        Some(reason) if !reason.is_clean() => {
            diagnostics.warning(format!(
                "file meta group ended early, data set will not be read: {}",
                reason
            ));
            true
        }
        _ => false,
    };

    let syntax = match &meta.transfer_syntax {
        Some(uid) => TransferSyntax::from_uid(uid),
        None => {
            diagnostics.warning(format!(
                "no transfer syntax element {} found, assuming {}",
                TRANSFER_SYNTAX_UID, EXPLICIT_VR_LITTLE_ENDIAN
            ));
            TransferSyntax::default()
        }
    };

    match &syntax {
        TransferSyntax::Encapsulated(uid) => diagnostics.info(format!(
            "transfer syntax {} has compressed pixel data, samples will not be decoded",
            uid
        )),
        TransferSyntax::Unknown(uid) => diagnostics.warning(format!(
            "{}, assuming {}",
            DicomError::UnrecognizedEncoding(uid.clone()),
            EXPLICIT_VR_LITTLE_ENDIAN
        )),
        syntax => diagnostics.info(format!("transfer syntax {}", syntax)),
    }

    Negotiation {
        mode: syntax.decode_mode(),
        syntax,
        meta,
        ended_early,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use std::io::Cursor;

    /// Encode an explicit VR little endian element with a short length.
    fn element(group: u16, element: u16, vr: &[u8; 2], value: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend(&group.to_le_bytes());
        out.extend(&element.to_le_bytes());
        out.extend(vr);
        out.extend(&(value.len() as u16).to_le_bytes());
        out.extend(value);
        out
    }

    fn negotiate_bytes(data: Vec<u8>) -> (Negotiation, Diagnostics, u64) {
        let mut cursor = ByteCursor::new(Cursor::new(data));
        let mut diags = Diagnostics::new();
        let n = negotiate(&mut cursor, 10_000_000, &mut diags);
        (n, diags, cursor.position())
    }

    #[test]
    fn syntax_table() {
        assert_eq!(
            TransferSyntax::from_uid("1.2.840.10008.1.2").decode_mode(),
            DecodeMode {
                endianness: Endianness::Little,
                vr_mode: VrMode::Implicit,
            }
        );
        assert_eq!(
            TransferSyntax::from_uid("1.2.840.10008.1.2.1\0").decode_mode(),
            DecodeMode {
                endianness: Endianness::Little,
                vr_mode: VrMode::Explicit,
            }
        );
        assert_eq!(
            TransferSyntax::from_uid("1.2.840.10008.1.2.2 ").decode_mode(),
            DecodeMode {
                endianness: Endianness::Big,
                vr_mode: VrMode::Explicit,
            }
        );

        let jpeg = TransferSyntax::from_uid(JPEG_LOSSLESS_SV1);
        assert_eq!(jpeg, TransferSyntax::Encapsulated(JPEG_LOSSLESS_SV1.to_string()));
        assert_eq!(jpeg.decode_mode(), DecodeMode::EXPLICIT_LE);
        assert!(!jpeg.pixel_data_decodable());
        assert!(!TransferSyntax::from_uid(JPEG_BASELINE).pixel_data_decodable());
        assert!(!TransferSyntax::from_uid("1.2.840.10008.1.2.4.91").pixel_data_decodable());
        assert!(!TransferSyntax::from_uid(RLE_LOSSLESS).pixel_data_decodable());

        let unknown = TransferSyntax::from_uid("1.2.3.4");
        assert_eq!(unknown, TransferSyntax::Unknown("1.2.3.4".to_string()));
        assert_eq!(unknown.decode_mode(), DecodeMode::EXPLICIT_LE);
        assert!(unknown.pixel_data_decodable());

        assert!(TransferSyntax::from_uid(DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN).is_deflated());
        assert!(TransferSyntax::from_uid("1.2.840.10008.1.2.4.").pixel_data_decodable());
    }

    #[test]
    fn negotiates_big_endian_and_stops_at_meta_group_end() {
        let mut data = element(0x0002, 0x0002, b"UI", b"1.2.840.10008.5.1.4.1.1.2\0");
        data.extend(element(0x0002, 0x0010, b"UI", b"1.2.840.10008.1.2.2\0"));
        data.extend(element(0x0002, 0x0013, b"SH", b"STACK "));
        let meta_end = data.len() as u64;
        // (0008,0060) in big endian
        data.extend(&[0x00, 0x08, 0x00, 0x60, b'C', b'S', 0x00, 0x02, b'C', b'T']);

        let (n, diags, position) = negotiate_bytes(data);
        assert_eq!(n.syntax, TransferSyntax::ExplicitVrBigEndian);
        assert_eq!(n.mode, DecodeMode::EXPLICIT_BE);
        assert_eq!(
            n.meta.media_storage_sop_class_uid.as_deref(),
            Some("1.2.840.10008.5.1.4.1.1.2")
        );
        assert_eq!(n.meta.implementation_version_name.as_deref(), Some("STACK"));
        assert_eq!(position, meta_end);
        assert!(!diags.has_severity(Severity::Warning));
    }

    #[test]
    fn missing_syntax_defaults_to_explicit_le() {
        let data = element(0x0002, 0x0002, b"UI", b"1.2.840.10008.5.1.4.1.1.2\0");
        let (n, diags, _) = negotiate_bytes(data);
        assert_eq!(n.syntax, TransferSyntax::ExplicitVrLittleEndian);
        assert_eq!(n.mode, DecodeMode::default());
        assert_eq!(n.meta.transfer_syntax, None);
        assert!(diags.has_severity(Severity::Warning));

        let (n, _, _) = negotiate_bytes(vec![]);
        assert_eq!(n.mode, DecodeMode::EXPLICIT_LE);
    }

    #[test]
    fn unknown_syntax_is_not_fatal() {
        let data = element(0x0002, 0x0010, b"UI", b"1.2.3.4.5\0");
        let (n, diags, _) = negotiate_bytes(data);
        assert_eq!(n.syntax, TransferSyntax::Unknown("1.2.3.4.5".to_string()));
        assert_eq!(n.mode, DecodeMode::EXPLICIT_LE);
        assert!(diags
            .messages()
            .any(|(s, m)| s == Severity::Warning && m.contains("1.2.3.4.5")));
    }

    #[test]
    fn implicit_data_set_after_explicit_meta() {
        let mut data = element(0x0002, 0x0010, b"UI", b"1.2.840.10008.1.2\0");
        let meta_end = data.len() as u64;
        // (0028,0010) implicit VR little endian, value 64
        data.extend(&[0x28, 0x00, 0x10, 0x00, 0x02, 0x00, 0x00, 0x00, 0x40, 0x00]);
        let (n, _, position) = negotiate_bytes(data);
        assert_eq!(n.mode, DecodeMode::IMPLICIT_LE);
        assert_eq!(position, meta_end);
        assert!(!n.ended_early);
    }

    #[test]
    fn meta_group_with_suspicious_length_ends_early() {
        let mut data = element(0x0002, 0x0010, b"UI", b"1.2.840.10008.1.2.1\0");
        // (0002,0001) OB declaring 20,000,000 bytes
        data.extend(&[0x02, 0x00, 0x01, 0x00, b'O', b'B', 0x00, 0x00]);
        data.extend(&20_000_000u32.to_le_bytes());
        let (n, diags, _) = negotiate_bytes(data);
        assert!(n.ended_early);
        assert_eq!(n.syntax, TransferSyntax::ExplicitVrLittleEndian);
        assert!(diags.has_severity(Severity::Warning));
    }

    #[test]
    fn meta_group_without_vr_ends_early() {
        let mut data = element(0x0002, 0x0010, b"UI", b"1.2.840.10008.1.2.1\0");
        // (0002,0012) with a 4-byte length in place of the VR
        data.extend(&[0x02, 0x00, 0x12, 0x00, 0x02, 0x00, 0x00, 0x00, 0x31, 0x00]);
        let (n, _, _) = negotiate_bytes(data);
        assert!(n.ended_early);
        assert_eq!(n.meta.implementation_class_uid, None);
    }
}
