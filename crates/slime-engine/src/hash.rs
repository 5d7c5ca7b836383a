//! State hashing for determinism checks.
//!
//! Uses FNV-1a over the exact bit patterns of every `f32`, so two states
//! hash equal only if they are bit-identical. Not cryptographically secure.

use slime_core::Agent;
use slime_field::TrailField;

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

#[inline]
fn fnv1a_byte(hash: u64, byte: u8) -> u64 {
    (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
}

#[inline]
fn fnv1a_u32(mut hash: u64, v: u32) -> u64 {
    for &b in &v.to_le_bytes() {
        hash = fnv1a_byte(hash, b);
    }
    hash
}

#[inline]
fn fnv1a_u64(mut hash: u64, v: u64) -> u64 {
    for &b in &v.to_le_bytes() {
        hash = fnv1a_byte(hash, b);
    }
    hash
}

/// Hash of every agent's position and heading, in store order.
///
/// The agent count is folded in first, so a prefix of a population never
/// collides with the whole.
pub fn agents_hash(agents: &[Agent]) -> u64 {
    let mut hash = fnv1a_u64(FNV_OFFSET, agents.len() as u64);
    for a in agents {
        hash = fnv1a_u32(hash, a.position.0.to_bits());
        hash = fnv1a_u32(hash, a.position.1.to_bits());
        hash = fnv1a_u32(hash, a.heading.to_bits());
    }
    hash
}

/// Hash of the field's dimensions and raw buffer.
pub fn field_hash(field: &TrailField) -> u64 {
    let mut hash = fnv1a_u64(FNV_OFFSET, field.width() as u64);
    hash = fnv1a_u64(hash, field.height() as u64);
    for &v in field.raw() {
        hash = fnv1a_u32(hash, v.to_bits());
    }
    hash
}
