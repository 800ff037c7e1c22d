#![no_main]
use dicom_stack::{Diagnostics, DicomFile, ReaderOptions};
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    let options = ReaderOptions::new().max_element_length(1 << 20);
    let mut diags = Diagnostics::new();
    if let Ok(mut file) = DicomFile::from_reader(Cursor::new(data), &options, &mut diags) {
        let metadata = file.read_metadata(&mut diags);
        if let Ok(mut file) = DicomFile::from_reader(Cursor::new(data), &options, &mut diags) {
            let _ = file.read_pixel_data(&metadata, &mut diags);
        }
    }
});
