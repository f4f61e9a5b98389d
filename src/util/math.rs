//! Math type re-exports and small numeric helpers shared by the editor.

pub use glam::{EulerRot, Mat4, Quat, Vec3, Vec4};

/// Sum of absolute components.
#[inline]
pub fn abs_sum(v: Vec3) -> f32 {
    v.x.abs() + v.y.abs() + v.z.abs()
}

/// Exact (zero tolerance) vector equality via the absolute-difference sum.
///
/// NaN components never compare equal, so a NaN pose always reads as moved.
#[inline]
pub fn exactly_equal(a: Vec3, b: Vec3) -> bool {
    abs_sum(a - b) == 0.0
}

/// PCG output permutation of a 32-bit state.
#[inline]
pub fn pcg_hash(input: u32) -> u32 {
    let state = input.wrapping_mul(747_796_405).wrapping_add(2_891_336_453);
    let word = ((state >> ((state >> 28).wrapping_add(4))) ^ state).wrapping_mul(277_803_737);
    (word >> 22) ^ word
}

/// Map a hash to a float in `[0, 1)` using its top 24 bits.
#[inline]
pub fn unit_float(hash: u32) -> f32 {
    (hash >> 8) as f32 * (1.0 / 16_777_216.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_equal() {
        let a = Vec3::new(-1.0, 4.0, 10.0);
        assert!(exactly_equal(a, a));
        assert!(!exactly_equal(a, a + Vec3::new(0.0, f32::EPSILON * 8.0, 0.0)));
        assert!(!exactly_equal(a, Vec3::new(f32::NAN, 4.0, 10.0)));
    }

    #[test]
    fn test_unit_float_range() {
        for i in 0..1000u32 {
            let f = unit_float(pcg_hash(i));
            assert!((0.0..1.0).contains(&f));
        }
        assert_eq!(unit_float(u32::MAX), 16_777_215.0 / 16_777_216.0);
    }

    #[test]
    fn test_pcg_hash_spreads() {
        assert_ne!(pcg_hash(0), pcg_hash(1));
        assert_ne!(pcg_hash(1), pcg_hash(2));
    }
}
