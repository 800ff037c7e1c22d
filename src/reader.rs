//! Assembly of a volume from a directory of slice files.
//!
//! The directory is traversed depth-first. In each directory, files come
//! before sub-directories, and both are sorted by name. Every file with
//! the expected extension is decoded in two passes (first its metadata,
//! then its pixel data) and appended to the volume in traversal order.
//! A file that cannot be decoded is skipped with a diagnostic. Only a
//! failure to access the directory itself fails the whole read.

use crate::diagnostics::Diagnostics;
use crate::element::DEFAULT_MAX_ELEMENT_LENGTH;
use crate::error::{DicomError, Result};
use crate::object::{read_pixel_data, read_slice_metadata};
use crate::util::has_extension;
use crate::volume::{Slice, Volume};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::{DirEntry, WalkDir};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// The default file name extension of slice files.
pub const DEFAULT_EXTENSION: &str = "dcm";

/// Unless set otherwise, a deflated data set may inflate to at most this
/// many times the maximum element length.
pub const DEFAULT_INFLATION_FACTOR: u64 = 16;

/// Options for reading slice files and assembling volumes.
///
/// # Example
///
/// ```no_run
/// use dicom_stack::ReaderOptions;
/// # use dicom_stack::Result;
///
/// # fn run() -> Result<()> {
/// let report = ReaderOptions::new()
///     .extension("DCM")
///     .max_element_length(1 << 20)
///     .read_directory("series/")?;
/// println!("{} slices", report.volume.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ReaderOptions {
    extension: String,
    max_element_length: u32,
    max_inflated_length: Option<u64>,
    strict_vr: bool,
    parallel: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        ReaderOptions {
            extension: DEFAULT_EXTENSION.to_string(),
            max_element_length: DEFAULT_MAX_ELEMENT_LENGTH,
            max_inflated_length: None,
            strict_vr: false,
            parallel: cfg!(feature = "rayon"),
        }
    }
}

impl ReaderOptions {
    /// Create the default options.
    pub fn new() -> Self {
        ReaderOptions::default()
    }

    /// Set the file name extension of slice files, without the leading
    /// dot. Matching ignores ASCII case.
    pub fn extension<S: Into<String>>(mut self, extension: S) -> Self {
        self.extension = extension.into();
        self
    }

    /// Set the maximum value length accepted for a single element. An
    /// element declaring a longer value ends the scan of its file.
    pub fn max_element_length(mut self, max_element_length: u32) -> Self {
        self.max_element_length = max_element_length;
        self
    }

    /// Set the maximum size of a deflated data set once inflated. A file
    /// whose data set inflates beyond it is not read. Defaults to
    /// `DEFAULT_INFLATION_FACTOR` times the maximum element length.
    pub fn max_inflated_length(mut self, max_inflated_length: u64) -> Self {
        self.max_inflated_length = Some(max_inflated_length);
        self
    }

    /// Whether an explicit VR record with a non-alphabetic VR ends the scan
    /// of its file. When disabled (the default), such a record is read as
    /// if its VR was absent.
    pub fn strict_vr(mut self, strict_vr: bool) -> Self {
        self.strict_vr = strict_vr;
        self
    }

    /// Whether to decode files in parallel. Has no effect unless the
    /// `rayon` feature is enabled. The order of the slices in the volume
    /// is the same either way.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The file name extension of slice files.
    pub fn get_extension(&self) -> &str {
        &self.extension
    }

    /// The maximum value length accepted for a single element.
    pub fn get_max_element_length(&self) -> u32 {
        self.max_element_length
    }

    /// The maximum size of a deflated data set once inflated.
    pub fn get_max_inflated_length(&self) -> u64 {
        self.max_inflated_length
            .unwrap_or(u64::from(self.max_element_length) * DEFAULT_INFLATION_FACTOR)
    }

    /// Whether non-alphabetic VRs end the scan.
    pub fn get_strict_vr(&self) -> bool {
        self.strict_vr
    }

    /// Whether files are decoded in parallel.
    pub fn get_parallel(&self) -> bool {
        self.parallel && cfg!(feature = "rayon")
    }

    /// Decode a single slice file, with one pass for its metadata and
    /// another for its pixel data.
    pub fn read_file<P>(&self, path: P, diagnostics: &mut Diagnostics) -> Result<Slice>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let metadata = read_slice_metadata(path, self, diagnostics)?;
        let pixels = read_pixel_data(path, &metadata, self, diagnostics)?;
        Ok(Slice::new(path, metadata, pixels))
    }

    /// Read all slice files under the given directory into a volume.
    ///
    /// # Errors
    ///
    /// - `DicomError::DirectoryAccess` if `root` does not exist, is not a
    ///   directory, or cannot be read. Problems with individual files are
    ///   never returned here: they are listed in the report.
    pub fn read_directory<P>(&self, root: P) -> Result<VolumeReport>
    where
        P: AsRef<Path>,
    {
        let root = root.as_ref();
        check_directory(root)?;

        let mut diagnostics = Diagnostics::new();
        let files = self.list_files(root, &mut diagnostics);
        let outcomes = self.read_files(&files);

        let mut volume = Volume::new();
        let mut skipped = Vec::new();
        for (path, (outcome, file_diagnostics)) in files.into_iter().zip(outcomes) {
            diagnostics.append(file_diagnostics);
            match outcome {
                Ok(slice) => volume.push(slice),
                Err(e) => {
                    let mut file_diagnostics = Diagnostics::for_file(&path);
                    file_diagnostics.error(format!("skipping file: {}", e));
                    diagnostics.append(file_diagnostics);
                    skipped.push((path, e));
                }
            }
        }

        info!(
            "Read {} slices from {}, skipped {} files",
            volume.len(),
            root.display(),
            skipped.len()
        );
        Ok(VolumeReport {
            volume,
            diagnostics,
            skipped,
        })
    }

    /// List the slice files under `root`, in traversal order.
    fn list_files(&self, root: &Path, diagnostics: &mut Diagnostics) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).sort_by(files_first) {
            match entry {
                Ok(entry) => {
                    if !entry.file_type().is_dir() && has_extension(entry.path(), &self.extension) {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => diagnostics.warning(format!("could not traverse directory: {}", e)),
            }
        }
        files
    }

    fn read_files(&self, files: &[PathBuf]) -> Vec<(Result<Slice>, Diagnostics)> {
        #[cfg(feature = "rayon")]
        {
            if self.parallel {
                return files.par_iter().map(|path| self.read_one(path)).collect();
            }
        }
        files.iter().map(|path| self.read_one(path)).collect()
    }

    fn read_one(&self, path: &Path) -> (Result<Slice>, Diagnostics) {
        let mut diagnostics = Diagnostics::for_file(path);
        let outcome = self.read_file(path, &mut diagnostics);
        (outcome, diagnostics)
    }
}

/// Sibling order of the traversal: files before directories, then by name.
fn files_first(a: &DirEntry, b: &DirEntry) -> ::std::cmp::Ordering {
    let a_dir = a.file_type().is_dir();
    let b_dir = b.file_type().is_dir();
    a_dir
        .cmp(&b_dir)
        .then_with(|| a.file_name().cmp(b.file_name()))
}

fn check_directory(root: &Path) -> Result<()> {
    let access = |err| DicomError::DirectoryAccess(root.to_path_buf(), err);
    let metadata = fs::metadata(root).map_err(access)?;
    if !metadata.is_dir() {
        return Err(access(io::Error::new(
            io::ErrorKind::Other,
            "not a directory",
        )));
    }
    fs::read_dir(root).map(drop).map_err(access)
}

/// The outcome of reading a directory of slice files.
#[derive(Debug)]
pub struct VolumeReport {
    /// The assembled volume.
    pub volume: Volume,
    /// Everything worth reporting, in traversal order.
    pub diagnostics: Diagnostics,
    /// The files that could not be decoded, and why.
    pub skipped: Vec<(PathBuf, DicomError)>,
}

/// Read all `.dcm` files under the given directory into a volume, with the
/// default options.
///
/// # Errors
///
/// - `DicomError::DirectoryAccess` if the directory cannot be accessed.
pub fn assemble<P>(root: P) -> Result<Volume>
where
    P: AsRef<Path>,
{
    ReaderOptions::new()
        .read_directory(root)
        .map(|report| report.volume)
}
