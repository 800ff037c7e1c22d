#![no_main]
use dicom_stack::cursor::ByteCursor;
use dicom_stack::{DecodeMode, ElementReader};
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    for mode in &[DecodeMode::EXPLICIT_LE, DecodeMode::IMPLICIT_LE, DecodeMode::EXPLICIT_BE] {
        let mut cursor = ByteCursor::new(Cursor::new(data));
        let mut reader = ElementReader::new(&mut cursor, *mode).max_length(1 << 16);
        for _element in &mut reader {}
        let _ = reader.finish();
    }
});
