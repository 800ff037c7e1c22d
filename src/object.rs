//! Module for decoding single DICOM files.
//!
//! A `DicomFile` is a file whose preamble was validated and whose transfer
//! syntax was negotiated, ready for its data set to be scanned. Each scan
//! pass over a slice file opens its own `DicomFile`, so that passes never
//! share cursors or decoding state.

use crate::cursor::ByteCursor;
use crate::diagnostics::Diagnostics;
use crate::element::ElementReader;
use crate::error::{DicomError, Result};
use crate::header::{validate_preamble, FileMetaHeader, ELEMENT_STREAM_OFFSET};
use crate::reader::ReaderOptions;
use crate::slice::{extract_pixel_data, PixelBuffer, SliceMetadata};
use crate::transfer_syntax::{negotiate, DecodeMode, Negotiation, TransferSyntax};
use crate::typedef::{Tag, ValueRepresentation, PIXEL_DATA};
use crate::value::DisplayValue;
use flate2::read::DeflateDecoder;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

/// Size of the file meta group length element in explicit VR little endian.
const GROUP_LENGTH_ELEMENT_SIZE: u64 = 12;

/// The byte source of a data set: either the file itself, or the
/// inflated contents of a deflated data set.
#[derive(Debug)]
pub enum DataSetSource<R> {
    /// The original source.
    Raw(R),
    /// The data set after decompression.
    Inflated(Cursor<Vec<u8>>),
}

impl<R: Read> Read for DataSetSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            DataSetSource::Raw(r) => r.read(buf),
            DataSetSource::Inflated(r) => r.read(buf),
        }
    }
}

impl<R: Seek> Seek for DataSetSource<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            DataSetSource::Raw(r) => r.seek(pos),
            DataSetSource::Inflated(r) => r.seek(pos),
        }
    }
}

/// One entry of a file dump.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DumpEntry {
    /// The element's identifier.
    pub tag: Tag,
    /// The element's value representation.
    pub vr: ValueRepresentation,
    /// The element's value in readable form.
    pub value: DisplayValue,
}

/// A DICOM file positioned at the start of its data set.
#[derive(Debug)]
pub struct DicomFile<R> {
    cursor: ByteCursor<DataSetSource<R>>,
    negotiation: Negotiation,
    max_length: u32,
    strict_vr: bool,
}

impl DicomFile<BufReader<File>> {
    /// Open a DICOM file from the file system.
    ///
    /// # Errors
    ///
    /// - `DicomError::InvalidFormat` if the file lacks the `DICM` marker.
    /// - `DicomError::InflatedLengthExceeded` if a deflated data set is
    ///   larger than `ReaderOptions::max_inflated_length` once inflated.
    /// - `DicomError::Io` if the file cannot be read.
    pub fn open<P>(path: P, options: &ReaderOptions, diagnostics: &mut Diagnostics) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let file = BufReader::new(File::open(path)?);
        DicomFile::from_reader(file, options, diagnostics)
    }
}

impl<R> DicomFile<R>
where
    R: Read + Seek,
{
    /// Read a DICOM file from a byte source positioned at its first byte.
    /// The preamble is validated and the file meta group is read.
    pub fn from_reader(
        source: R,
        options: &ReaderOptions,
        diagnostics: &mut Diagnostics,
    ) -> Result<Self> {
        let mut cursor = ByteCursor::new(DataSetSource::Raw(source));
        validate_preamble(&mut cursor)?;
        let negotiation = negotiate(&mut cursor, options.get_max_element_length(), diagnostics);

        if negotiation.syntax.is_deflated() && !negotiation.ended_early {
            if let Some(group_length) = negotiation.meta.group_length {
                let _ = cursor.seek(SeekFrom::Start(
                    ELEMENT_STREAM_OFFSET + GROUP_LENGTH_ELEMENT_SIZE + u64::from(group_length),
                ))?;
            }
            let compressed = cursor.read_to_end()?;
            let limit = options.get_max_inflated_length();
            let mut inflated = Vec::new();
            let _ = DeflateDecoder::new(&compressed[..])
                .take(limit.saturating_add(1))
                .read_to_end(&mut inflated)?;
            if inflated.len() as u64 > limit {
                return Err(DicomError::InflatedLengthExceeded(limit));
            }
            diagnostics.info(format!(
                "inflated data set from {} to {} bytes",
                compressed.len(),
                inflated.len()
            ));
            cursor = ByteCursor::new(DataSetSource::Inflated(Cursor::new(inflated)));
        }

        Ok(DicomFile {
            cursor,
            negotiation,
            max_length: options.get_max_element_length(),
            strict_vr: options.get_strict_vr(),
        })
    }

    /// The transfer syntax of the data set.
    pub fn syntax(&self) -> &TransferSyntax {
        &self.negotiation.syntax
    }

    /// The decoding mode of the data set.
    pub fn mode(&self) -> DecodeMode {
        self.negotiation.mode
    }

    /// The file meta information.
    pub fn meta(&self) -> &FileMetaHeader {
        &self.negotiation.meta
    }

    /// Obtain an iterator over the elements of the data set, from the
    /// current position onwards. If the file meta group could not be read
    /// to its end, the iterator is empty.
    pub fn elements(&mut self) -> ElementReader<'_, DataSetSource<R>> {
        let reader = ElementReader::new(&mut self.cursor, self.negotiation.mode)
            .max_length(self.max_length)
            .strict_vr(self.strict_vr);
        if self.negotiation.ended_early {
            reader.stopped()
        } else {
            reader
        }
    }

    /// Scan the whole data set for the slice's structural attributes.
    pub fn read_metadata(&mut self, diagnostics: &mut Diagnostics) -> SliceMetadata {
        let endianness = self.mode().endianness;
        let mut metadata = SliceMetadata::default();
        let mut elements = self.elements();
        for element in &mut elements {
            metadata.observe(&element, endianness, diagnostics);
        }
        report_end(elements, diagnostics);
        metadata
    }

    /// Scan the data set for the pixel data element, and decode its
    /// samples using the given dimensions. The scan stops at the first
    /// pixel data element.
    ///
    /// # Errors
    ///
    /// - `DicomError::CompressedPixelData` if the transfer syntax is not
    ///   one with native pixel data.
    /// - `DicomError::NoPixelData` if the scan ends without pixel data.
    /// - `DicomError::MissingDimensions` or
    ///   `DicomError::PixelDataLengthMismatch` if the samples do not agree
    ///   with `metadata`.
    pub fn read_pixel_data(
        &mut self,
        metadata: &SliceMetadata,
        diagnostics: &mut Diagnostics,
    ) -> Result<PixelBuffer> {
        if !self.syntax().pixel_data_decodable() {
            return Err(DicomError::CompressedPixelData(self.syntax().uid().to_string()));
        }
        let endianness = self.mode().endianness;
        let mut elements = self.elements();
        let found = elements.find(|e| e.tag == PIXEL_DATA);
        match found {
            Some(element) => extract_pixel_data(&element, metadata, endianness),
            None => {
                report_end(elements, diagnostics);
                Err(DicomError::NoPixelData)
            }
        }
    }

    /// Decode every remaining element of the data set into a readable
    /// form. Pixel data is left out.
    pub fn dump(&mut self, diagnostics: &mut Diagnostics) -> Vec<DumpEntry> {
        let endianness = self.mode().endianness;
        let mut elements = self.elements();
        let entries: Vec<DumpEntry> = (&mut elements)
            .filter(|e| e.tag != PIXEL_DATA)
            .map(|e| DumpEntry {
                tag: e.tag,
                vr: e.vr,
                value: DisplayValue::interpret(&e, endianness),
            })
            .collect();
        report_end(elements, diagnostics);
        entries
    }
}

fn report_end<R>(elements: ElementReader<'_, R>, diagnostics: &mut Diagnostics)
where
    R: Read + Seek,
{
    if let Err(e) = elements.finish() {
        diagnostics.warning(format!("scan stopped early: {}", e));
    }
}

/// First pass over a slice file: collect its rows, columns and pixel spacing.
pub fn read_slice_metadata<P>(
    path: P,
    options: &ReaderOptions,
    diagnostics: &mut Diagnostics,
) -> Result<SliceMetadata>
where
    P: AsRef<Path>,
{
    let mut file = DicomFile::open(path, options, diagnostics)?;
    Ok(file.read_metadata(diagnostics))
}

/// Second pass over a slice file: decode its pixel data, with the
/// dimensions found by the first pass.
pub fn read_pixel_data<P>(
    path: P,
    metadata: &SliceMetadata,
    options: &ReaderOptions,
    diagnostics: &mut Diagnostics,
) -> Result<PixelBuffer>
where
    P: AsRef<Path>,
{
    let mut file = DicomFile::open(path, options, diagnostics)?;
    file.read_pixel_data(metadata, diagnostics)
}

/// Decode all elements of a file for presentation.
pub fn dump_file<P>(
    path: P,
    options: &ReaderOptions,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<DumpEntry>>
where
    P: AsRef<Path>,
{
    let mut file = DicomFile::open(path, options, diagnostics)?;
    Ok(file.dump(diagnostics))
}
