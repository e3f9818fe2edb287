/// Deterministic string hashing — 32-bit FNV-1a folded into [0, 1).
///
/// The whole selection pipeline rides on this being a pure function:
/// identical seed strings must map to identical values across process
/// restarts and across the other implementations of this engine, which
/// rules out the standard library's randomized hashers.

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a over the string's Unicode scalar values.
///
/// Matches the byte-wise reference for all ASCII input, which covers
/// every seed the engine builds (ids, level tags, ISO dates, `|`).
pub fn fnv1a_32(input: &str) -> u32 {
    let mut acc = FNV_OFFSET_BASIS;
    for c in input.chars() {
        acc ^= c as u32;
        acc = acc.wrapping_mul(FNV_PRIME);
    }
    acc
}

/// Map a string to a uniform value in [0, 1).
pub fn unit_interval(input: &str) -> f64 {
    f64::from(fnv1a_32(input)) / 4_294_967_296.0
}
