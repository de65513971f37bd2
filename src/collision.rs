//! Collision probing.
//!
//! Builds keys that hash to a chosen value, e.g. to place a second key in
//! the same chain as an existing one. The search extends a fixed prefix one
//! alphanumeric byte at a time, testing each candidate before descending,
//! so shorter keys are preferred along each branch.
//!
//! Appending the same bytes to two colliding keys keeps them colliding
//! under the rolling hashes, so a collision found for `"key"` also holds
//! for `"key\0"` and the found key with a NUL appended.

use crate::hash::{HashAlgorithm, HashValue};

/// Bytes a search may append.
pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Depth-first search for a key of at most `max_len` bytes that starts
/// with `prefix` and hashes to `target` under `algorithm`.
///
/// The prefix alone is never returned; the search cost grows as
/// `ALPHABET.len()` to the power of `max_len - prefix.len()`.
pub fn find_collision(
    algorithm: HashAlgorithm,
    target: HashValue,
    prefix: &[u8],
    max_len: usize,
) -> Option<Vec<u8>> {
    let mut candidate = Vec::with_capacity(max_len.max(prefix.len()));
    candidate.extend_from_slice(prefix);
    descend(algorithm, target, &mut candidate, max_len).then_some(candidate)
}

fn descend(algorithm: HashAlgorithm, target: HashValue, candidate: &mut Vec<u8>, max_len: usize) -> bool {
    if candidate.len() >= max_len {
        return false;
    }
    for &b in ALPHABET {
        candidate.push(b);
        if algorithm.hash(candidate) == target || descend(algorithm, target, candidate, max_len) {
            return true;
        }
        candidate.pop();
    }
    false
}
