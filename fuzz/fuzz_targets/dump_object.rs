#![no_main]
use dicom_stack::{Diagnostics, DicomFile, ReaderOptions};
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    let options = ReaderOptions::new().strict_vr(true);
    let mut diags = Diagnostics::new();
    if let Ok(mut file) = DicomFile::from_reader(Cursor::new(data), &options, &mut diags) {
        for entry in file.dump(&mut diags) {
            let _ = entry.value.to_string();
        }
    }
});
