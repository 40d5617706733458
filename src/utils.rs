use crate::error::Error;
use std::str;

/// A function that takes a hexadecimal representation of bytes
/// back into a stream of bytes.
///
/// The `0x` prefix is optional. Odd length input is rejected since a
/// dangling nibble can't be mapped to a byte unambiguously.
pub fn hex_str_to_bytes(s: &str) -> Result<Vec<u8>, Error> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    if s.len() % 2 != 0 {
        return Err(Error::InvalidValue(format!(
            "Odd number of hex digits in \"{s}\""
        )));
    }
    // from_str_radix would also take a sign
    if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::InvalidValue(format!("Invalid hex digits in \"{s}\"")));
    }
    s.as_bytes()
        .chunks(2)
        .map(|ch| {
            let pair = str::from_utf8(ch).map_err(|e| Error::InvalidValue(e.to_string()))?;
            u8::from_str_radix(pair, 16).map_err(|e| Error::InvalidValue(e.to_string()))
        })
        .collect()
}

pub fn bytes_to_hex_str(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:0>2x?}"))
        .fold(String::new(), |acc, x| acc + &x)
}

// Hex string with 0x prepended, the form every wire value uses
pub fn bytes_to_data(s: &[u8]) -> String {
    let mut val = "0x".to_string();
    val.push_str(&bytes_to_hex_str(s));
    val
}

/// True for `0x` prefixed strings made of an even number of hex digits.
pub fn is_hex_data(s: &str) -> bool {
    match s.strip_prefix("0x") {
        Some(digits) => digits.len() % 2 == 0 && digits.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}

#[test]
fn decode_bytes() {
    assert_eq!(
        hex_str_to_bytes("deadbeef").expect("Unable to decode"),
        [222, 173, 190, 239]
    );
}

#[test]
fn decode_odd_amount_of_bytes() {
    assert!(hex_str_to_bytes("f").is_err());
}

#[test]
fn decode_signed_pairs() {
    assert!(hex_str_to_bytes("+1+f").is_err());
    assert!(hex_str_to_bytes("0x-1").is_err());
}

#[test]
fn bytes_raises_parse_error() {
    let e = hex_str_to_bytes("Lorem ipsum!").unwrap_err();
    match e {
        Error::InvalidValue(_) => {}
        _ => panic!(),
    }
}

#[test]
fn parse_prefixed_empty() {
    assert_eq!(hex_str_to_bytes("0x").unwrap(), Vec::<u8>::new());
}

#[test]
fn parse_prefixed_non_empty() {
    assert_eq!(
        hex_str_to_bytes("0xdeadbeef").unwrap(),
        vec![0xde, 0xad, 0xbe, 0xef]
    );
}

#[test]
fn encode_bytes() {
    assert_eq!(bytes_to_hex_str(&[0xf]), "0f".to_owned());
    assert_eq!(bytes_to_hex_str(&[0xff]), "ff".to_owned());
    assert_eq!(
        bytes_to_hex_str(&[0xde, 0xad, 0xbe, 0xef]),
        "deadbeef".to_owned()
    );
    assert_eq!(bytes_to_data(b"james"), "0x6a616d6573");
}

#[test]
fn hex_data_shape() {
    assert!(is_hex_data("0x"));
    assert!(is_hex_data("0xdeadBEEF"));
    assert!(!is_hex_data("deadbeef"));
    assert!(!is_hex_data("0xabc"));
    assert!(!is_hex_data("0xzz"));
}
