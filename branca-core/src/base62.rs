//! Base-62 encoding.
//!
//! Bytes are read as one big-endian unsigned integer and rewritten in the
//! alphabet `0-9A-Za-z`. Positional conversion loses leading zero bytes, so
//! each one is carried separately as a leading `'0'` symbol.

use crate::BrancaError;

/// The alphabet, in digit value order.
pub const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

const BASE: u32 = 62;
const INVALID: u8 = 0xff;

const DECODE_MAP: [u8; 256] = {
    let mut map = [INVALID; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        map[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    map
};

/// Encode `bytes` as base-62 text.
pub fn encode(bytes: &[u8]) -> String {
    let zeros = leading(bytes, 0);
    let digits = to_digits(&bytes[zeros..]);

    let mut out = String::with_capacity(zeros + digits.len());
    out.extend(core::iter::repeat_n(ALPHABET[0] as char, zeros));
    out.extend(digits.iter().rev().map(|&d| ALPHABET[d as usize] as char));
    out
}

/// Decode base-62 text, restoring one zero byte per leading `'0'`.
pub fn decode(src: &str) -> Result<Vec<u8>, BrancaError> {
    let src = src.as_bytes();
    // reject before the quadratic conversion
    if src.iter().any(|&c| DECODE_MAP[c as usize] == INVALID) {
        return Err(BrancaError::InvalidToken);
    }
    let zeros = leading(src, ALPHABET[0]);

    // little-endian base-256 accumulator
    let mut bytes: Vec<u8> = Vec::with_capacity(src.len());
    for &c in &src[zeros..] {
        let mut carry = u32::from(DECODE_MAP[c as usize]);
        for byte in &mut bytes {
            carry += u32::from(*byte) * BASE;
            *byte = (carry & 0xff) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            bytes.push((carry & 0xff) as u8);
            carry >>= 8;
        }
    }

    bytes.resize(bytes.len() + zeros, 0);
    bytes.reverse();
    Ok(bytes)
}

fn leading(s: &[u8], zero: u8) -> usize {
    s.iter().take_while(|&&b| b == zero).count()
}

/// Base-62 digits of a big-endian integer, least significant first.
fn to_digits(bytes: &[u8]) -> Vec<u8> {
    // log(256) / log(62) ~= 1.3436
    let mut digits: Vec<u8> = Vec::with_capacity(bytes.len() * 138 / 100 + 1);
    for &byte in bytes {
        let mut carry = u32::from(byte);
        for digit in &mut digits {
            carry += u32::from(*digit) << 8;
            *digit = (carry % BASE) as u8;
            carry /= BASE;
        }
        while carry > 0 {
            digits.push((carry % BASE) as u8);
            carry /= BASE;
        }
    }
    digits
}
