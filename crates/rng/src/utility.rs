//! Seed mixing utilities.

/// A simple implementation of the [SplitMix64] algorithm.
///
/// This is the single mixing function every derived value in the preview
/// pipeline goes through, so it must stay bit-for-bit stable across releases.
///
/// [SplitMix64]: http://prng.di.unimi.it/splitmix64.c
#[inline]
pub fn splitmix64(st: u64) -> u64 {
    let mut t = st.wrapping_add(0x9e3779b97f4a7c15);
    t = (t ^ (t >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    t = (t ^ (t >> 27)).wrapping_mul(0x94d049bb133111eb);
    t ^ (t >> 31)
}

/// Deterministically combines two seed inputs into one.
///
/// Used to derive a job seed from `(world seed, location id)` and a per-step
/// seed from `(job seed, step ordinal)`. The function is not commutative on
/// purpose: `combine(a, b)` and `combine(b, a)` produce unrelated streams.
#[inline]
pub fn combine(a: u64, b: u64) -> u64 {
    splitmix64(a ^ splitmix64(b))
}

/// Folds a 64-bit seed into a well-mixed 32-bit one.
#[inline]
pub fn fold_u64(x: u64) -> u32 {
    let x = splitmix64(x);
    (x ^ (x >> 32)) as u32
}

/// Converts a `u32` value into a `f32` value in the range `[0.0, 1.0)`.
#[inline]
pub fn f32_from_u32_01(x: u32) -> f32 {
    (x & 0xFFFFFF) as f32 * (1.0 / 0x100_0000 as f32)
}

/// Converts a `u32` value into a `f32` value in the range `(-1.0, 1.0)`.
#[inline]
pub fn f32_from_u32_11(x: u32) -> f32 {
    // `f32_from_u32_01` does not use the most significant bit of `x`, meaning
    // we can use it for the sign.
    if x & 0x8000_0000 != 0 {
        -f32_from_u32_01(x)
    } else {
        f32_from_u32_01(x)
    }
}
