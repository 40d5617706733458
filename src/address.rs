use crate::error::Error;
use crate::utils::{bytes_to_hex_str, hex_str_to_bytes};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

/// Representation of an Ethereum address, as accepted by the `address`
/// parameter type.
#[derive(PartialEq, Debug, Clone, Copy, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address([u8; 20]);

impl Address {
    /// Get raw bytes of the address.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Parses a `0x` prefixed address, rejecting mixed case input whose
    /// EIP-55 checksum doesn't hold. All lowercase or all uppercase input
    /// carries no checksum and is accepted as is.
    pub fn parse_and_validate(s: &str) -> Result<Address, Error> {
        let digits = s
            .strip_prefix("0x")
            .ok_or_else(|| Error::InvalidValue("Must be a valid address".into()))?;
        let address: Address = digits.parse()?;
        let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
        let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
        if has_lower && has_upper && address.to_checksum()[2..] != *digits {
            return Err(Error::InvalidValue("Must be a valid address".into()));
        }
        Ok(address)
    }

    /// EIP-55 mixed case rendering, `0x` prefixed.
    pub fn to_checksum(&self) -> String {
        let lower = bytes_to_hex_str(&self.0);
        let hash = Keccak256::digest(lower.as_bytes());
        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = (hash[i / 2] >> if i % 2 == 0 { 4 } else { 0 }) & 0x0f;
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl From<[u8; 20]> for Address {
    fn from(val: [u8; 20]) -> Address {
        Address(val)
    }
}

impl FromStr for Address {
    type Err = Error;

    /// Parses a string into an address without checking its checksum.
    ///
    /// # Supported formats
    ///
    /// * `0x` prefixed address
    /// * Raw bytes of an address represented by a bytes as an hexadecimal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        if s.len() != 40 {
            return Err(Error::InvalidValue("Must be a valid address".into()));
        }
        let bytes = hex_str_to_bytes(s)
            .map_err(|_| Error::InvalidValue("Must be a valid address".into()))?;
        let mut data = [0u8; 20];
        data.copy_from_slice(&bytes);
        Ok(Address(data))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_checksum())
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if f.alternate() {
            write!(f, "0x")?;
        }
        write!(f, "{}", bytes_to_hex_str(&self.0))
    }
}

#[test]
#[should_panic]
fn decode_invalid_length() {
    "123".parse::<Address>().unwrap();
}

#[test]
#[should_panic]
fn decode_invalid_character() {
    "\u{012345}123456789012345678901234567890123456"
        .parse::<Address>()
        .unwrap();
}

#[test]
fn reject_signed_hex_pairs() {
    let bogus = format!("0x{}", "+1".repeat(20));
    assert!(bogus.parse::<Address>().is_err());
    assert!(Address::parse_and_validate(&bogus).is_err());
}

#[test]
fn decode() {
    let address: Address = "1234567890123456789012345678901234567890"
        .parse::<Address>()
        .unwrap();

    assert_eq!(
        address,
        Address::from([
            0x12, 0x34, 0x56, 0x78, 0x90, 0x12, 0x34, 0x56, 0x78, 0x90, 0x12, 0x34, 0x56, 0x78,
            0x90, 0x12, 0x34, 0x56, 0x78, 0x90
        ])
    );
}

#[test]
fn checksum_roundtrip() {
    // Test vectors from EIP-55
    for checksummed in [
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
        "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
    ] {
        let address = Address::parse_and_validate(checksummed).unwrap();
        assert_eq!(address.to_string(), checksummed);
    }
}

#[test]
fn reject_bad_checksum() {
    assert!(Address::parse_and_validate("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD").is_err());
    assert!(Address::parse_and_validate("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").is_ok());
    assert!(Address::parse_and_validate("0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED").is_ok());
    assert!(Address::parse_and_validate("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").is_err());
}

#[test]
fn to_hex() {
    let address: Address = "1234567890123456789ABCDEF678901234567890"
        .parse::<Address>()
        .unwrap();

    assert_eq!(
        format!("{address:x}"),
        "1234567890123456789abcdef678901234567890",
    );
    assert_eq!(
        format!("{address:#x}"),
        "0x1234567890123456789abcdef678901234567890",
    );
}
