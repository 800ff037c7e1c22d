//! Synthesis of DICOM slice files for testing.
#![allow(dead_code)]

use flate2::write::DeflateEncoder;
use flate2::Compression;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const IMPLICIT_LE: &str = "1.2.840.10008.1.2";
pub const EXPLICIT_LE: &str = "1.2.840.10008.1.2.1";
pub const EXPLICIT_BE: &str = "1.2.840.10008.1.2.2";
pub const DEFLATED_LE: &str = "1.2.840.10008.1.2.1.99";
pub const JPEG_BASELINE: &str = "1.2.840.10008.1.2.4.50";

/// CT Image Storage
const SOP_CLASS_UID: &str = "1.2.840.10008.5.1.4.1.1.2";

/// The encoding of a synthesized data set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Encoding {
    ExplicitLittle,
    ExplicitBig,
    ImplicitLittle,
}

impl Encoding {
    /// The encoding of the data set under the given transfer syntax.
    /// Deflated and encapsulated syntaxes are explicit VR little endian.
    pub fn of(transfer_syntax: &str) -> Self {
        match transfer_syntax {
            IMPLICIT_LE => Encoding::ImplicitLittle,
            EXPLICIT_BE => Encoding::ExplicitBig,
            _ => Encoding::ExplicitLittle,
        }
    }

    pub fn u16_bytes(self, v: u16) -> [u8; 2] {
        match self {
            Encoding::ExplicitBig => v.to_be_bytes(),
            _ => v.to_le_bytes(),
        }
    }

    pub fn u32_bytes(self, v: u32) -> [u8; 4] {
        match self {
            Encoding::ExplicitBig => v.to_be_bytes(),
            _ => v.to_le_bytes(),
        }
    }
}

/// Encode a single data element.
pub fn element(encoding: Encoding, tag: (u16, u16), vr: &[u8; 2], value: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&encoding.u16_bytes(tag.0));
    out.extend_from_slice(&encoding.u16_bytes(tag.1));
    match encoding {
        Encoding::ImplicitLittle => {
            out.extend_from_slice(&encoding.u32_bytes(value.len() as u32));
        }
        _ => {
            out.extend_from_slice(vr);
            if matches!(vr, b"OB" | b"OW" | b"OF" | b"SQ" | b"UT" | b"UN") {
                out.extend_from_slice(&[0, 0]);
                out.extend_from_slice(&encoding.u32_bytes(value.len() as u32));
            } else {
                out.extend_from_slice(&encoding.u16_bytes(value.len() as u16));
            }
        }
    }
    out.extend_from_slice(value);
    out
}

/// Text padded to an even length.
pub fn padded(text: &str, pad: u8) -> Vec<u8> {
    let mut out = text.as_bytes().to_vec();
    if out.len() % 2 == 1 {
        out.push(pad);
    }
    out
}

/// Preamble, magic code and file meta group with the given transfer syntax.
pub fn file_meta(transfer_syntax: &str) -> Vec<u8> {
    let le = Encoding::ExplicitLittle;
    let mut group = element(le, (0x0002, 0x0002), b"UI", &padded(SOP_CLASS_UID, 0));
    group.extend(element(le, (0x0002, 0x0010), b"UI", &padded(transfer_syntax, 0)));
    group.extend(element(le, (0x0002, 0x0013), b"SH", &padded("DICOM_STACK", b' ')));

    let mut out = vec![0u8; 128];
    out.extend_from_slice(b"DICM");
    out.extend(element(
        le,
        (0x0002, 0x0000),
        b"UL",
        &(group.len() as u32).to_le_bytes(),
    ));
    out.extend(group);
    out
}

/// A data set with the elements of a slice, in the given encoding.
pub fn slice_data_set(
    encoding: Encoding,
    rows: u16,
    columns: u16,
    spacing: &str,
    samples: &[u16],
) -> Vec<u8> {
    let mut out = element(encoding, (0x0008, 0x0060), b"CS", b"CT");
    out.extend(element(encoding, (0x0028, 0x0010), b"US", &encoding.u16_bytes(rows)));
    out.extend(element(encoding, (0x0028, 0x0011), b"US", &encoding.u16_bytes(columns)));
    out.extend(element(encoding, (0x0028, 0x0030), b"DS", &padded(spacing, b' ')));
    out.extend(element(encoding, (0x0028, 0x0100), b"US", &encoding.u16_bytes(16)));
    out.extend(element(encoding, (0x7FE0, 0x0010), b"OW", &sample_bytes(encoding, samples)));
    out
}

pub fn sample_bytes(encoding: Encoding, samples: &[u16]) -> Vec<u8> {
    samples
        .iter()
        .flat_map(|s| encoding.u16_bytes(*s).to_vec())
        .collect()
}

/// A complete slice file with a pixel spacing of 0.5 by 0.75.
pub fn slice_file(transfer_syntax: &str, rows: u16, columns: u16, samples: &[u16]) -> Vec<u8> {
    let mut out = file_meta(transfer_syntax);
    let data_set = slice_data_set(
        Encoding::of(transfer_syntax),
        rows,
        columns,
        "0.5\\0.75",
        samples,
    );
    if transfer_syntax == DEFLATED_LE {
        out.extend(deflate(&data_set));
    } else {
        out.extend(data_set);
    }
    out
}

/// Compress the given bytes with raw deflate.
pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// A sequence of `n` increasing samples, starting at `start`.
pub fn ramp(n: usize, start: u16) -> Vec<u16> {
    (0..n).map(|i| start.wrapping_add(i as u16)).collect()
}

/// Write a file under `dir`, creating intermediate directories.
pub fn write_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, data).unwrap();
    path
}
