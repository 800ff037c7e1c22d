//! Reader of DICOM slice series into volumes of 16-bit samples.
//!
//! Each slice file is decoded in two passes: the first collects the image
//! dimensions and pixel spacing, the second decodes the pixel data. Slices
//! are stacked in the order of a sorted, depth-first directory traversal.
//! Files that cannot be decoded are skipped and reported, never fatal.
//!
//! # Example
//!
//! ```no_run
//! use dicom_stack::{assemble, ReaderOptions};
//! # use dicom_stack::Result;
//!
//! # fn run() -> Result<()> {
//! let volume = assemble("series/")?;
//! println!("{} slices, shape {:?}", volume.len(), volume.dim());
//!
//! // or, to keep the diagnostics
//! let report = ReaderOptions::new().parallel(false).read_directory("series/")?;
//! for diagnostic in &report.diagnostics {
//!     eprintln!("{}", diagnostic);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! With the `ndarray_volumes` feature (on by default), a volume can be
//! copied into an `ndarray::Array3<u16>` with `Volume::to_ndarray`.
#![deny(missing_debug_implementations)]
#![warn(missing_docs, unused_extern_crates, trivial_casts, unused_results)]

pub mod cursor;
pub mod diagnostics;
pub mod element;
pub mod error;
pub mod header;
pub mod object;
pub mod reader;
pub mod slice;
pub mod transfer_syntax;
pub mod typedef;
pub mod value;
pub mod volume;
mod util;

pub use crate::diagnostics::{Diagnostic, Diagnostics, Severity};
pub use crate::element::{Element, ElementReader};
pub use crate::error::{DicomError, Result};
pub use crate::object::{dump_file, DicomFile};
pub use crate::reader::{assemble, ReaderOptions, VolumeReport};
pub use crate::slice::{PixelBuffer, SliceMetadata};
pub use crate::transfer_syntax::{DecodeMode, TransferSyntax};
pub use crate::typedef::{Tag, ValueRepresentation};
pub use crate::volume::{Slice, Volume};
pub use byteordered::Endianness;
