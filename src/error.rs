//! Types for error handling go here.

use crate::typedef::Tag;
use quick_error::quick_error;
use std::io::Error as IOError;
use std::path::PathBuf;

quick_error! {
    /// Error type for all error variants originated by this crate.
    #[derive(Debug)]
    pub enum DicomError {
        /// The file does not carry the `DICM` marker after its preamble.
        InvalidFormat {
            display("Invalid DICOM file")
        }
        /// The byte stream ended in the middle of a record.
        Truncated {
            display("Unexpected end of stream")
        }
        /// An element declared a value length above the configured ceiling.
        SuspiciousLength(tag: Tag, length: u32) {
            display("Suspicious value length {} in element {}", length, tag)
        }
        /// A deflated data set inflates to more bytes than allowed.
        InflatedLengthExceeded(limit: u64) {
            display("Inflated data set exceeds the limit of {} bytes", limit)
        }
        /// Pixel data was requested before rows and columns were known.
        MissingDimensions {
            display("Image dimensions (rows, columns) are missing")
        }
        /// The pixel data element does not hold `rows * columns` 16-bit samples.
        PixelDataLengthMismatch(expected: usize, found: usize) {
            display("Pixel data has {} bytes, but {} were expected", found, expected)
        }
        /// The file was fully scanned without finding a pixel data element.
        NoPixelData {
            display("No pixel data element found")
        }
        /// The pixel data is encoded with a compressed transfer syntax.
        CompressedPixelData(uid: String) {
            display("Pixel data in transfer syntax {} is compressed and cannot be decoded", uid)
        }
        /// The transfer syntax is not in the known table.
        UnrecognizedEncoding(uid: String) {
            display("Unrecognized transfer syntax {}", uid)
        }
        /// The slices of a volume do not share the same image dimensions.
        InconsistentDimensions {
            display("Slices have inconsistent image dimensions")
        }
        /// No slices are available.
        NoVolumeData {
            display("No volume data available")
        }
        /// The series directory could not be accessed.
        DirectoryAccess(path: PathBuf, err: IOError) {
            display("Could not access directory {}: {}", path.display(), err)
            source(err)
        }
        /// I/O Error
        Io(err: IOError) {
            from()
            source(err)
        }
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, DicomError>;
