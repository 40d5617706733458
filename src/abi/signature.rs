//! Canonical signatures and the keccak-256 derived wire identifiers.
//!
//! A signature is the `name(type,type,...)` string of a function or event,
//! built from the canonical ABI type names of its parameters. Transports tag
//! event records with the full 32 byte hash of it, and function calls with
//! the first 4 bytes.

use crate::utils::bytes_to_data;
use sha3::{Digest, Keccak256};

/// Formats the canonical signature `name(t1,t2,...)`.
pub fn format_signature<I, S>(name: &str, types: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut signature = String::with_capacity(name.len() + 32);
    signature.push_str(name);
    signature.push('(');
    for (i, ty) in types.into_iter().enumerate() {
        if i > 0 {
            signature.push(',');
        }
        signature.push_str(ty.as_ref());
    }
    signature.push(')');
    signature
}

/// Given a signature it derives the full keccak-256 digest, which is what
/// event records carry as their first topic.
pub fn derive_signature(signature: &str) -> [u8; 32] {
    let digest = Keccak256::digest(signature.as_bytes());
    let mut result: [u8; 32] = Default::default();
    result.copy_from_slice(&digest);
    result
}

/// Given a signature it derives a Method ID
pub fn derive_method_id(signature: &str) -> [u8; 4] {
    let digest = derive_signature(signature);
    let mut result: [u8; 4] = Default::default();
    result.copy_from_slice(&digest[0..4]);
    result
}

/// `0x` prefixed lowercase hex of [`derive_signature`].
pub fn signature_hash(signature: &str) -> String {
    bytes_to_data(&derive_signature(signature))
}

/// Compares a hash received from a transport against a known signature,
/// ignoring the case of the hex digits and an optional `0x` prefix.
pub fn hash_matches(hash: &str, signature: &str) -> bool {
    let expected = signature_hash(signature);
    let hash = hash.strip_prefix("0x").unwrap_or(hash);
    expected[2..].eq_ignore_ascii_case(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::bytes_to_hex_str;

    #[test]
    fn derive_baz() {
        assert_eq!(
            bytes_to_hex_str(&derive_method_id("baz(uint32,bool)")),
            "cdcd77c0"
        );
    }

    #[test]
    fn derive_bar() {
        assert_eq!(
            bytes_to_hex_str(&derive_method_id("bar(bytes3[2])")),
            "fce353f6"
        );
    }

    #[test]
    fn derive_sam() {
        assert_eq!(
            bytes_to_hex_str(&derive_method_id("sam(bytes,bool,uint256[])")),
            "a5643bf2"
        );
    }

    #[test]
    fn derive_transfer_topic() {
        assert_eq!(
            signature_hash("Transfer(address,address,uint256)"),
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }

    #[test]
    fn format_signatures() {
        assert_eq!(format_signature("noArgs", Vec::<String>::new()), "noArgs()");
        assert_eq!(
            format_signature("overloaded", ["uint256", "bool"]),
            "overloaded(uint256,bool)"
        );
    }

    #[test]
    fn match_hash_any_case() {
        let sig = "Transfer(address,address,uint256)";
        assert!(hash_matches(
            "0xDDF252AD1BE2C89B69C2B068FC378DAA952BA7F163C4A11628F55A4DF523B3EF",
            sig
        ));
        assert!(hash_matches(
            "ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef",
            sig
        ));
        assert!(!hash_matches("0xdeadbeef", sig));
    }
}
