//! This module covers the fixed part of a DICOM file, namely the preamble
//! and the `DICM` marker, as well as the `FileMetaHeader` struct holding the
//! file meta information found right after them.

use crate::cursor::ByteCursor;
use crate::error::{DicomError, Result};
use crate::typedef::*;
use crate::util::decode_text;
use std::io::{Read, Seek, SeekFrom};

/// Length of the preamble preceding the magic code.
pub const PREAMBLE_LENGTH: u64 = 128;
/// Magic code of DICOM files, found right after the preamble.
pub const MAGIC_CODE: &[u8; 4] = b"DICM";
/// Offset of the first data element of a DICOM file.
pub const ELEMENT_STREAM_OFFSET: u64 = PREAMBLE_LENGTH + 4;

/// Skip the preamble and check for the `DICM` magic code.
///
/// On success, the cursor is left at the first file meta element.
///
/// # Errors
///
/// - `DicomError::InvalidFormat` if the magic code does not match, or the
///   file ends before it.
pub fn validate_preamble<R>(cursor: &mut ByteCursor<R>) -> Result<()>
where
    R: Read + Seek,
{
    let _ = cursor.seek(SeekFrom::Start(0))?;
    match cursor.skip(PREAMBLE_LENGTH) {
        Err(DicomError::Truncated) => return Err(DicomError::InvalidFormat),
        other => other?,
    }
    let magic: [u8; 4] = match cursor.read_array() {
        Err(DicomError::Truncated) => return Err(DicomError::InvalidFormat),
        other => other?,
    };
    if &magic != MAGIC_CODE {
        return Err(DicomError::InvalidFormat);
    }
    Ok(())
}

/// The file meta information of a DICOM file (group 0x0002).
/// Fields are only filled when the respective element was found.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct FileMetaHeader {
    /// File Meta Information Group Length
    pub group_length: Option<u32>,
    /// Media Storage SOP Class UID
    pub media_storage_sop_class_uid: Option<String>,
    /// Media Storage SOP Instance UID
    pub media_storage_sop_instance_uid: Option<String>,
    /// Transfer Syntax UID, without padding
    pub transfer_syntax: Option<String>,
    /// Implementation Class UID
    pub implementation_class_uid: Option<String>,
    /// Implementation Version Name
    pub implementation_version_name: Option<String>,
}

impl FileMetaHeader {
    /// Record the value of a file meta element. Elements
    /// outside of the known set are ignored.
    pub fn observe(&mut self, tag: Tag, value: &[u8]) {
        match tag {
            META_GROUP_LENGTH => {
                if value.len() == 4 {
                    // the meta group is always little endian
                    self.group_length = Some(u32::from_le_bytes([
                        value[0], value[1], value[2], value[3],
                    ]));
                }
            }
            MEDIA_STORAGE_SOP_CLASS_UID => {
                self.media_storage_sop_class_uid = Some(decode_text(value))
            }
            MEDIA_STORAGE_SOP_INSTANCE_UID => {
                self.media_storage_sop_instance_uid = Some(decode_text(value))
            }
            TRANSFER_SYNTAX_UID => self.transfer_syntax = Some(decode_text(value)),
            IMPLEMENTATION_CLASS_UID => self.implementation_class_uid = Some(decode_text(value)),
            IMPLEMENTATION_VERSION_NAME => {
                self.implementation_version_name = Some(decode_text(value))
            }
            _ => {}
        }
    }
}
