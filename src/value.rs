//! Generic interpretation of element values, for presentation purposes.

use crate::element::Element;
use crate::util::{decode_text, hex_dump, read_u16, read_u32};
use byteordered::Endianness;
use std::fmt;

/// A human readable form of an element's value.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum DisplayValue {
    /// Textual value, trimmed.
    Text(String),
    /// Unsigned short (US).
    U16(u16),
    /// Unsigned long (UL).
    U32(u32),
    /// Any other value, as a lowercase hexadecimal dump.
    Hex(String),
}

impl DisplayValue {
    /// Interpret the value of an element according to its VR.
    ///
    /// Text VRs are decoded as text, `US` and `UL` as numbers in the given
    /// byte order, and anything else (including unknown VRs, or numbers of
    /// the wrong size) as a hexadecimal dump.
    pub fn interpret(element: &Element, endianness: Endianness) -> Self {
        let value = &element.value[..];
        if element.vr.is_text() {
            return DisplayValue::Text(decode_text(value));
        }
        match (element.vr.as_str(), value.len()) {
            ("US", 2) => DisplayValue::U16(read_u16(value, endianness)),
            ("UL", 4) => DisplayValue::U32(read_u32(value, endianness)),
            _ => DisplayValue::Hex(hex_dump(value)),
        }
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DisplayValue::Text(text) => f.write_str(text),
            DisplayValue::U16(v) => write!(f, "{}", v),
            DisplayValue::U32(v) => write!(f, "{}", v),
            DisplayValue::Hex(hex) => f.write_str(hex),
        }
    }
}
