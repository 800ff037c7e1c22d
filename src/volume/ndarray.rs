//! Interfaces and implementations specific to integration with `ndarray`.
use super::Volume;
use crate::error::{DicomError, Result};
use ndarray::{Array, Array3};

impl Volume {
    /// Copy the samples of all slices into a 3-dimensional array of shape
    /// `[slices, rows, columns]`.
    ///
    /// # Errors
    ///
    /// - `DicomError::NoVolumeData` if the volume is empty.
    /// - `DicomError::InconsistentDimensions` if the slices do not share
    ///   the same rows and columns.
    pub fn to_ndarray(&self) -> Result<Array3<u16>> {
        if self.is_empty() {
            return Err(DicomError::NoVolumeData);
        }
        let [depth, rows, columns] = self.dim().ok_or(DicomError::InconsistentDimensions)?;
        let mut data = Vec::with_capacity(depth * rows * columns);
        for pixels in self.pixel_buffers() {
            data.extend_from_slice(pixels.as_slice());
        }
        Array::from_shape_vec((depth, rows, columns), data)
            .map_err(|_| DicomError::InconsistentDimensions)
    }
}
