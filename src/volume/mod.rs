//! This module defines the volume assembled from a series of slice files.
//!
//! A `Volume` is an ordered, append-only stack of slices. Slices are
//! expected to share the same image dimensions, but this is not enforced
//! when appending them: `Volume::dim` only reports a shape when they do.
//! An integration with `ndarray` is available with the `ndarray_volumes`
//! feature.

#[cfg(feature = "ndarray_volumes")]
pub mod ndarray;

use crate::slice::{PixelBuffer, SliceMetadata};
use std::path::{Path, PathBuf};

/// A single decoded slice of a volume.
#[derive(Debug, PartialEq, Clone)]
pub struct Slice {
    path: PathBuf,
    metadata: SliceMetadata,
    pixels: PixelBuffer,
}

impl Slice {
    /// Create a slice from its parts.
    pub fn new<P: Into<PathBuf>>(path: P, metadata: SliceMetadata, pixels: PixelBuffer) -> Self {
        Slice {
            path: path.into(),
            metadata,
            pixels,
        }
    }

    /// The file that this slice was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The slice's structural attributes.
    pub fn metadata(&self) -> &SliceMetadata {
        &self.metadata
    }

    /// The slice's samples.
    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    /// Take the samples, discarding the rest.
    pub fn into_pixels(self) -> PixelBuffer {
        self.pixels
    }
}

/// An ordered stack of slices.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct Volume {
    slices: Vec<Slice>,
}

impl Volume {
    /// Create an empty volume.
    pub fn new() -> Self {
        Volume::default()
    }

    /// Append a slice to the end of the volume.
    pub fn push(&mut self, slice: Slice) {
        self.slices.push(slice);
    }

    /// The number of slices.
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// Whether the volume has no slices.
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Get the slice at the given position.
    pub fn get(&self, index: usize) -> Option<&Slice> {
        self.slices.get(index)
    }

    /// All slices, in order.
    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    /// Iterate over the pixel buffers of all slices, in order.
    pub fn pixel_buffers(&self) -> impl Iterator<Item = &PixelBuffer> {
        self.slices.iter().map(Slice::pixels)
    }

    /// Take the pixel buffers of all slices, in order.
    pub fn into_pixel_buffers(self) -> Vec<PixelBuffer> {
        self.slices.into_iter().map(Slice::into_pixels).collect()
    }

    /// The shape of the volume as `[slices, rows, columns]`, if the volume
    /// is not empty and all slices have the same rows and columns.
    pub fn dim(&self) -> Option<[usize; 3]> {
        let mut dims = self.slices.iter().map(|s| s.metadata.dimensions().ok());
        let first = dims.next()??;
        if dims.all(|d| d == Some(first)) {
            Some([self.slices.len(), first.0 as usize, first.1 as usize])
        } else {
            None
        }
    }
}

impl IntoIterator for Volume {
    type Item = Slice;
    type IntoIter = ::std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.slices.into_iter()
    }
}

impl<'a> IntoIterator for &'a Volume {
    type Item = &'a Slice;
    type IntoIter = ::std::slice::Iter<'a, Slice>;

    fn into_iter(self) -> Self::IntoIter {
        self.slices.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{Slice, Volume};
    use crate::slice::{PixelBuffer, SliceMetadata};

    fn slice(name: &str, rows: u16, columns: u16) -> Slice {
        let metadata = SliceMetadata {
            rows: Some(rows),
            columns: Some(columns),
            ..Default::default()
        };
        let n = rows as usize * columns as usize;
        Slice::new(name, metadata, PixelBuffer::from(vec![7; n]))
    }

    #[test]
    fn append_in_order() {
        let mut volume = Volume::new();
        assert!(volume.is_empty());
        assert_eq!(volume.dim(), None);

        volume.push(slice("a.dcm", 2, 3));
        volume.push(slice("b.dcm", 2, 3));
        assert_eq!(volume.len(), 2);
        assert_eq!(volume.dim(), Some([2, 2, 3]));
        assert_eq!(volume.get(1).unwrap().path().to_str(), Some("b.dcm"));
        assert!(volume.pixel_buffers().all(|p| p.len() == 6));

        let names: Vec<_> = (&volume)
            .into_iter()
            .map(|s| s.path().display().to_string())
            .collect();
        assert_eq!(names, vec!["a.dcm", "b.dcm"]);
        assert_eq!(volume.into_pixel_buffers().len(), 2);
    }

    #[test]
    fn mixed_dimensions_have_no_shape() {
        let mut volume = Volume::new();
        volume.push(slice("a.dcm", 2, 3));
        volume.push(slice("b.dcm", 3, 2));
        assert_eq!(volume.len(), 2);
        assert_eq!(volume.dim(), None);
    }
}
