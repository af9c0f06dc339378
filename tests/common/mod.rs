//! In-memory MAT5 encoder used to build test streams.
#![allow(dead_code)]

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use mat5_reader::Endian;

pub const MI_INT8: u32 = 1;
pub const MI_UINT8: u32 = 2;
pub const MI_INT16: u32 = 3;
pub const MI_UINT16: u32 = 4;
pub const MI_INT32: u32 = 5;
pub const MI_UINT32: u32 = 6;
pub const MI_SINGLE: u32 = 7;
pub const MI_DOUBLE: u32 = 9;
pub const MI_INT64: u32 = 12;
pub const MI_UINT64: u32 = 13;
pub const MI_MATRIX: u32 = 14;
pub const MI_COMPRESSED: u32 = 15;
pub const MI_UTF8: u32 = 16;
pub const MI_UTF16: u32 = 17;
pub const MI_UTF32: u32 = 18;

pub const CLASS_CELL: u8 = 1;
pub const CLASS_STRUCT: u8 = 2;
pub const CLASS_OBJECT: u8 = 3;
pub const CLASS_CHAR: u8 = 4;
pub const CLASS_SPARSE: u8 = 5;
pub const CLASS_DOUBLE: u8 = 6;
pub const CLASS_SINGLE: u8 = 7;
pub const CLASS_INT8: u8 = 8;
pub const CLASS_UINT8: u8 = 9;
pub const CLASS_INT16: u8 = 10;
pub const CLASS_UINT16: u8 = 11;
pub const CLASS_INT32: u8 = 12;
pub const CLASS_UINT32: u8 = 13;
pub const CLASS_INT64: u8 = 14;
pub const CLASS_UINT64: u8 = 15;
pub const CLASS_FUNCTION: u8 = 16;

pub fn word(value: u32, endian: Endian) -> [u8; 4] {
    match endian {
        Endian::Little => value.to_le_bytes(),
        Endian::Big => value.to_be_bytes(),
    }
}

pub fn tag(type_code: u32, byte_count: u32, endian: Endian) -> Vec<u8> {
    let mut out = word(type_code, endian).to_vec();
    out.extend_from_slice(&word(byte_count, endian));
    out
}

/// A full-format element, padded to 8 bytes.
pub fn element(type_code: u32, payload: &[u8], endian: Endian) -> Vec<u8> {
    let mut out = tag(type_code, payload.len() as u32, endian);
    out.extend_from_slice(payload);
    out.resize(out.len() + (8 - payload.len() % 8) % 8, 0);
    out
}

/// A small data element carrying up to four payload bytes inline.
pub fn small_element(type_code: u32, payload: &[u8], endian: Endian) -> Vec<u8> {
    assert!(payload.len() <= 4);
    let first = ((payload.len() as u32) << 16) | type_code;
    let mut out = word(first, endian).to_vec();
    let mut inline = [0u8; 4];
    inline[..payload.len()].copy_from_slice(payload);
    out.extend_from_slice(&inline);
    out
}

/// Small data element when the payload fits, full format otherwise.
pub fn auto_element(type_code: u32, payload: &[u8], endian: Endian) -> Vec<u8> {
    if !payload.is_empty() && payload.len() <= 4 {
        small_element(type_code, payload, endian)
    } else {
        element(type_code, payload, endian)
    }
}

pub fn f64s(values: &[f64], endian: Endian) -> Vec<u8> {
    values
        .iter()
        .flat_map(|v| match endian {
            Endian::Little => v.to_le_bytes(),
            Endian::Big => v.to_be_bytes(),
        })
        .collect()
}

pub fn f32s(values: &[f32], endian: Endian) -> Vec<u8> {
    values
        .iter()
        .flat_map(|v| match endian {
            Endian::Little => v.to_le_bytes(),
            Endian::Big => v.to_be_bytes(),
        })
        .collect()
}

pub fn i32s(values: &[i32], endian: Endian) -> Vec<u8> {
    values
        .iter()
        .flat_map(|v| match endian {
            Endian::Little => v.to_le_bytes(),
            Endian::Big => v.to_be_bytes(),
        })
        .collect()
}

pub fn u32s(values: &[u32], endian: Endian) -> Vec<u8> {
    values
        .iter()
        .flat_map(|v| match endian {
            Endian::Little => v.to_le_bytes(),
            Endian::Big => v.to_be_bytes(),
        })
        .collect()
}

pub fn i64s(values: &[i64], endian: Endian) -> Vec<u8> {
    values
        .iter()
        .flat_map(|v| match endian {
            Endian::Little => v.to_le_bytes(),
            Endian::Big => v.to_be_bytes(),
        })
        .collect()
}

pub fn u64s(values: &[u64], endian: Endian) -> Vec<u8> {
    values
        .iter()
        .flat_map(|v| match endian {
            Endian::Little => v.to_le_bytes(),
            Endian::Big => v.to_be_bytes(),
        })
        .collect()
}

pub fn i16s(values: &[i16], endian: Endian) -> Vec<u8> {
    values
        .iter()
        .flat_map(|v| match endian {
            Endian::Little => v.to_le_bytes(),
            Endian::Big => v.to_be_bytes(),
        })
        .collect()
}

pub fn u16s(values: &[u16], endian: Endian) -> Vec<u8> {
    values
        .iter()
        .flat_map(|v| match endian {
            Endian::Little => v.to_le_bytes(),
            Endian::Big => v.to_be_bytes(),
        })
        .collect()
}

/// Builds one `miMATRIX` element.
pub struct MatrixBuilder {
    endian: Endian,
    class: u8,
    flag_bits: u32,
    nzmax: u32,
    dims: Vec<i32>,
    name: Vec<u8>,
    body: Vec<u8>,
}

impl MatrixBuilder {
    pub fn new(class: u8, dims: &[i32], endian: Endian) -> Self {
        Self {
            endian,
            class,
            flag_bits: 0,
            nzmax: 0,
            dims: dims.to_vec(),
            name: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.as_bytes().to_vec();
        self
    }

    pub fn logical(mut self) -> Self {
        self.flag_bits |= 1 << 9;
        self
    }

    pub fn global(mut self) -> Self {
        self.flag_bits |= 1 << 10;
        self
    }

    pub fn complex(mut self) -> Self {
        self.flag_bits |= 1 << 11;
        self
    }

    pub fn nzmax(mut self, nzmax: u32) -> Self {
        self.nzmax = nzmax;
        self
    }

    /// Append a sub-element, small when it fits.
    pub fn element(mut self, type_code: u32, payload: &[u8]) -> Self {
        self.body.extend(auto_element(type_code, payload, self.endian));
        self
    }

    /// Append pre-encoded bytes, such as a nested matrix.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(bytes);
        self
    }

    pub fn doubles(self, values: &[f64]) -> Self {
        let payload = f64s(values, self.endian);
        self.element(MI_DOUBLE, &payload)
    }

    pub fn build(self) -> Vec<u8> {
        let endian = self.endian;
        let mut content = tag(MI_UINT32, 8, endian);
        content.extend_from_slice(&word(self.class as u32 | self.flag_bits, endian));
        content.extend_from_slice(&word(self.nzmax, endian));
        content.extend(element(MI_INT32, &i32s(&self.dims, endian), endian));
        content.extend(auto_element(MI_INT8, &self.name, endian));
        content.extend(self.body);

        let mut out = tag(MI_MATRIX, content.len() as u32, endian);
        out.extend(content);
        out
    }
}

/// A zero-length matrix, the `[]` shortcut.
pub fn empty_matrix(endian: Endian) -> Vec<u8> {
    tag(MI_MATRIX, 0, endian)
}

/// Field name length and names elements for a struct body.
pub fn field_names(names: &[&str], slot: usize, endian: Endian) -> Vec<u8> {
    let mut out = small_element(MI_INT32, &i32s(&[slot as i32], endian), endian);
    let mut raw = Vec::new();
    for name in names {
        let mut padded = name.as_bytes().to_vec();
        padded.resize(slot, 0);
        raw.extend(padded);
    }
    out.extend(element(MI_INT8, &raw, endian));
    out
}

pub fn double_matrix(name: &str, dims: &[i32], values: &[f64], endian: Endian) -> Vec<u8> {
    MatrixBuilder::new(CLASS_DOUBLE, dims, endian)
        .name(name)
        .doubles(values)
        .build()
}

pub fn char_matrix(name: &str, text: &str, endian: Endian) -> Vec<u8> {
    let units: Vec<u16> = text.encode_utf16().collect();
    MatrixBuilder::new(CLASS_CHAR, &[1, units.len() as i32], endian)
        .name(name)
        .element(MI_UINT16, &u16s(&units, endian))
        .build()
}

pub fn file_header(endian: Endian) -> Vec<u8> {
    let mut out = vec![b' '; 128];
    let text = b"MATLAB 5.0 MAT-file, Platform: test";
    out[..text.len()].copy_from_slice(text);
    out[116..124].fill(0);
    match endian {
        Endian::Little => {
            out[124..126].copy_from_slice(&0x0100u16.to_le_bytes());
            out[126..128].copy_from_slice(b"IM");
        }
        Endian::Big => {
            out[124..126].copy_from_slice(&0x0100u16.to_be_bytes());
            out[126..128].copy_from_slice(b"MI");
        }
    }
    out
}

/// Wrap a matrix element in an `miCOMPRESSED` element.
pub fn compressed(matrix: &[u8], endian: Endian) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(matrix).unwrap();
    let data = encoder.finish().unwrap();
    let mut out = tag(MI_COMPRESSED, data.len() as u32, endian);
    out.extend(data);
    out
}

pub fn mat_file(variables: &[Vec<u8>], endian: Endian) -> Vec<u8> {
    let mut out = file_header(endian);
    for variable in variables {
        out.extend_from_slice(variable);
    }
    out
}
