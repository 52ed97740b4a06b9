//! String encryption used by the STRE chunk.
//!
//! Each byte `i` of a string (terminator included) is XORed with
//! `offset * 157135 + i / 2`, truncated to a byte, where `offset` is the
//! string's position relative to the chunk content.

use super::format::STR_ENCRYPTION_CONSTANT;

#[inline]
fn key_byte(offset: u32, i: usize) -> u8 {
    let key = (offset as i32).wrapping_mul(STR_ENCRYPTION_CONSTANT);
    key.wrapping_add((i / 2) as i32) as u8
}

/// Encrypt `text` plus its NUL terminator as stored at `offset`.
pub fn encrypt_string(text: &[u8], offset: u32) -> Vec<u8> {
    text.iter()
        .chain(std::iter::once(&0u8))
        .enumerate()
        .map(|(i, &b)| b ^ key_byte(offset, i))
        .collect()
}

/// Decrypt bytes stored at `offset`. Stops after the decoded terminator.
///
/// The returned bytes exclude the terminator. Returns `None` when no
/// terminator decodes before the input runs out.
pub fn decrypt_string(bytes: &[u8], offset: u32) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    for (i, &b) in bytes.iter().enumerate() {
        let plain = b ^ key_byte(offset, i);
        if plain == 0 {
            return Some(out);
        }
        out.push(plain);
    }
    None
}
