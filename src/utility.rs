//! Small math and randomness helpers shared across the simulation.

use glam::Vec2;
use rand::Rng;

/// Convert radians to degrees
pub fn to_degree(radian: f32) -> f32 {
    radian.to_degrees()
}

/// Convert degrees to radians
pub fn to_radian(degree: f32) -> f32 {
    degree.to_radians()
}

/// Uniform integer in `[0, exclusive_max)`. Returns 0 for an empty range.
pub fn random_int(rng: &mut impl Rng, exclusive_max: i32) -> i32 {
    if exclusive_max <= 0 {
        return 0;
    }
    rng.gen_range(0..exclusive_max)
}

/// Euclidean length of a vector
pub fn length(vector: Vec2) -> f32 {
    vector.length()
}

/// Normalized copy of `vector`. The zero vector has no direction.
pub fn unit_vector(vector: Vec2) -> Vec2 {
    debug_assert!(vector != Vec2::ZERO, "unit_vector of the zero vector");
    vector / length(vector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_angle_conversion_roundtrip() {
        assert!((to_radian(180.0) - std::f32::consts::PI).abs() < 1e-6);
        assert!((to_degree(std::f32::consts::FRAC_PI_2) - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_random_int_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let value = random_int(&mut rng, 5);
            assert!((0..5).contains(&value));
        }
    }

    #[test]
    fn test_random_int_empty_range() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(random_int(&mut rng, 0), 0);
        assert_eq!(random_int(&mut rng, -3), 0);
    }

    #[test]
    fn test_unit_vector_has_length_one() {
        let v = unit_vector(Vec2::new(3.0, 4.0));
        assert!((length(v) - 1.0).abs() < 1e-6);
        assert!((v.x - 0.6).abs() < 1e-6);
    }
}
