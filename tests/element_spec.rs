mod common;

use common::*;
use mat5_reader::mat5::format::element::{ElementReader, decode_scalars};
use mat5_reader::mat5::types::array::ElementData;
use mat5_reader::mat5::types::tables::TypeTables;
use mat5_reader::mat5::utils::{byteswap_u32, padding_for};
use mat5_reader::{Endian, MatError, Ownership};
use proptest::prelude::*;
use std::io::Cursor;

const ENDIANS: [Endian; 2] = [Endian::Little, Endian::Big];

#[test]
fn small_elements_up_to_four_bytes_decode_inline() {
    for endian in ENDIANS {
        for n in 0..=4u8 {
            let payload: Vec<u8> = (1..=n).collect();
            let mut bytes = small_element(MI_UINT8, &payload, endian);
            bytes.extend(small_element(MI_UINT8, &[9], endian));

            let mut reader = ElementReader::new(Cursor::new(bytes), endian);
            let element = reader.read_element(Ownership::Borrowed).unwrap();
            assert_eq!(element.type_code, MI_UINT8);
            assert_eq!(&element.data[..], &payload[..], "{} byte payload, {}", n, endian);
            assert_eq!(reader.get_ref().position(), 8);

            let sentinel = reader.read_element(Ownership::Owned).unwrap();
            assert_eq!(&sentinel.data[..], &[9]);
        }
    }
}

#[test]
fn small_element_of_five_bytes_is_a_format_error() {
    for endian in ENDIANS {
        let bytes = [word((5 << 16) | MI_UINT8, endian), [0; 4]].concat();
        let mut reader = ElementReader::new(Cursor::new(bytes), endian);
        let err = reader.read_element(Ownership::Owned).unwrap_err();
        assert!(
            matches!(err, MatError::InvalidFormat(ref msg) if msg.contains("SDE byte count exceeds 4")),
            "unexpected error: {}",
            err
        );
    }
}

#[test]
fn padding_keeps_consecutive_elements_aligned() {
    for endian in ENDIANS {
        for sizes in [[3usize, 5], [5, 3]] {
            let mut bytes = Vec::new();
            for &n in &sizes {
                bytes.extend(element(MI_UINT8, &vec![0xAB; n], endian));
            }
            let third = element(MI_INT8, b"end", endian);
            let third_start = bytes.len() as u64;
            bytes.extend(&third);

            let mut reader = ElementReader::new(Cursor::new(bytes), endian);
            for &n in &sizes {
                let element = reader.read_element(Ownership::Borrowed).unwrap();
                assert_eq!(element.data.len(), n);
            }
            assert_eq!(reader.get_ref().position(), third_start);
            assert_eq!(reader.read_int8_string("sentinel").unwrap(), b"end");
        }
    }
}

#[test]
fn read_element_into_fills_caller_memory() {
    let endian = Endian::Big;
    let mut bytes = element(MI_INT32, &i32s(&[7, -1, 3], endian), endian);
    bytes.extend(element(MI_INT32, &i32s(&[1, 2, 3], endian), endian));
    let mut reader = ElementReader::new(Cursor::new(bytes), endian);

    let mut dest = [0u8; 16];
    let tag = reader.read_element_into(&mut dest).unwrap();
    assert_eq!((tag.type_code, tag.byte_count), (MI_INT32, 12));
    assert_eq!(&dest[..4], &[0, 0, 0, 7]);

    let mut small = [0u8; 8];
    assert!(matches!(
        reader.read_element_into(&mut small),
        Err(MatError::InvalidFormat(_))
    ));
}

#[test]
fn int32_values_are_decoded_in_file_order() {
    for endian in ENDIANS {
        let bytes = element(MI_INT32, &i32s(&[2, 3, 4], endian), endian);
        let mut reader = ElementReader::new(Cursor::new(bytes), endian);
        let mut dims = [0i32; 32];
        let count = reader.read_int32s_into(&mut dims, "dimensions").unwrap();
        assert_eq!(&dims[..count], &[2, 3, 4]);
    }
}

#[test]
fn int32_helper_checks_type_before_size() {
    let endian = Endian::Little;
    let bytes = element(MI_DOUBLE, &f64s(&[1.0; 40], endian), endian);
    let mut reader = ElementReader::new(Cursor::new(bytes), endian);
    let mut dims = [0i32; 32];
    match reader.read_int32s_into(&mut dims, "dimensions") {
        Err(MatError::TypeMismatch { context, expected, found }) => {
            assert_eq!(context, "dimensions");
            assert_eq!((expected, found), (MI_INT32, MI_DOUBLE));
        }
        other => panic!("expected type mismatch, got {:?}", other),
    }
}

#[test]
fn int32_element_must_hold_whole_values() {
    for endian in ENDIANS {
        let bytes = element(MI_INT32, &[0, 0, 0, 2, 0, 3], endian);
        let mut reader = ElementReader::new(Cursor::new(bytes), endian);
        let mut dims = [0i32; 32];
        assert!(matches!(
            reader.read_int32s_into(&mut dims, "dimensions"),
            Err(MatError::InvalidFormat(ref msg)) if msg.contains("whole number")
        ));
    }
}

#[test]
fn name_element_must_be_int8() {
    let endian = Endian::Little;
    let bytes = element(MI_UINT8, b"name", endian);
    let mut reader = ElementReader::new(Cursor::new(bytes), endian);
    match reader.read_int8_string("array name") {
        Err(MatError::TypeMismatch { context, expected, found }) => {
            assert_eq!(context, "array name");
            assert_eq!((expected, found), (MI_INT8, MI_UINT8));
        }
        other => panic!("expected type mismatch, got {:?}", other),
    }
}

#[test]
fn numeric_element_uses_type_table() {
    for endian in ENDIANS {
        let tables = TypeTables::new(endian, None);
        let bytes = element(MI_INT16, &i16s(&[-2, 300], endian), endian);
        let mut reader = ElementReader::new(Cursor::new(bytes), endian);
        assert_eq!(
            reader.read_numeric_element(&tables).unwrap(),
            ElementData::Int16(vec![-2, 300])
        );
    }
}

#[test]
fn wrong_declared_order_gives_wrong_values_without_panicking() {
    let tables = TypeTables::new(Endian::Little, None);
    let scalar = tables.scalar(MI_INT32).unwrap();
    let bytes = i32s(&[1, 256], Endian::Little);
    assert_eq!(
        decode_scalars(&bytes, scalar, Endian::Little),
        ElementData::Int32(vec![1, 256])
    );
    assert_eq!(
        decode_scalars(&bytes, scalar, Endian::Big),
        ElementData::Int32(vec![0x0100_0000, 0x0001_0000])
    );
}

proptest! {
    #[test]
    fn byteswap_is_an_involution(x in any::<u32>()) {
        prop_assert_eq!(byteswap_u32(byteswap_u32(x)), x);
    }

    #[test]
    fn padded_length_is_aligned(n in 0usize..100_000) {
        let pad = padding_for(n);
        prop_assert!(pad < 8);
        prop_assert_eq!((n + pad) % 8, 0);
    }

    #[test]
    fn any_payload_leaves_the_stream_aligned(len in 0usize..64, big in any::<bool>()) {
        let endian = if big { Endian::Big } else { Endian::Little };
        let mut bytes = element(MI_UINT8, &vec![0x5A; len], endian);
        bytes.extend(element(MI_INT8, b"x", endian));
        let mut reader = ElementReader::new(Cursor::new(bytes), endian);
        let payload_len = reader.read_element(Ownership::Owned).unwrap().data.len();
        prop_assert_eq!(payload_len, len);
        prop_assert_eq!(reader.read_int8_string("next").unwrap(), b"x".to_vec());
    }
}
