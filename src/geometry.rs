use fastrand::Rng;

/// Uniform draw in `[min, max)`.
pub fn random(rng: &mut Rng, min: f32, max: f32) -> f32 {
    min + rng.f32() * (max - min)
}

/// Euclidean distance between two points.
pub fn distance(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    let dx = ax - bx;
    let dy = ay - by;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_stays_in_range() {
        let mut rng = Rng::with_seed(7);
        for _ in 0..10_000 {
            let v = random(&mut rng, -20.0, 20.0);
            assert!((-20.0..20.0).contains(&v));
        }
        // Degenerate range collapses to the bound
        assert_eq!(random(&mut rng, 3.0, 3.0), 3.0);
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance(0.0, 0.0, 3.0, 4.0), 5.0);
        assert_eq!(distance(3.0, 4.0, 0.0, 0.0), 5.0);
        assert_eq!(distance(1.5, -2.0, 1.5, -2.0), 0.0);
    }
}
