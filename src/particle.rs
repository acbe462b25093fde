use crate::settings::FieldConfig;
use crate::surface::{Hsla, Point};
use rand::Rng;

/// Every particle and link shares this hue
pub const FIELD_HUE: f32 = 160.0;

/// Surface area (in square pixels) that holds one particle at baseline density
const AREA_PER_PARTICLE: i64 = 10_000;

/// A single simulated point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Point,
    /// Per-tick displacement, only ever changed by reflection
    pub velocity: Point,
    pub radius: f32,
    /// Lightness in percent, 50-70
    pub lightness: f32,
    /// Base alpha, 0.1-0.4
    pub alpha: f32,
}

impl Particle {
    /// Create a particle at a uniformly random position inside the surface
    pub fn random<R: Rng + ?Sized>(rng: &mut R, width: f32, height: f32, speed: f32) -> Self {
        Self {
            position: Point::new(rng.gen::<f32>() * width, rng.gen::<f32>() * height),
            velocity: Point::new(
                (rng.gen::<f32>() - 0.5) * speed,
                (rng.gen::<f32>() - 0.5) * speed,
            ),
            radius: rng.gen::<f32>() * 3.0 + 1.0,
            lightness: 50.0 + rng.gen::<f32>() * 20.0,
            alpha: 0.1 + rng.gen::<f32>() * 0.3,
        }
    }

    pub fn color(&self) -> Hsla {
        Hsla::new(FIELD_HUE, self.lightness, self.alpha)
    }
}

/// Number of particles for a surface of the given size
pub fn target_count(width: i32, height: i32, density: f32) -> usize {
    if width <= 0 || height <= 0 || density <= 0.0 || !density.is_finite() {
        return 0;
    }
    let baseline = (width as i64 * height as i64) / AREA_PER_PARTICLE;
    (baseline as f64 * (density as f64 / 100.0)).floor() as usize
}

/// Build a fresh population for a surface, replacing any previous one
pub fn seed<R: Rng + ?Sized>(
    width: i32,
    height: i32,
    config: &FieldConfig,
    rng: &mut R,
) -> Vec<Particle> {
    let count = target_count(width, height, config.density);
    let (w, h) = (width.max(0) as f32, height.max(0) as f32);
    (0..count)
        .map(|_| Particle::random(rng, w, h, config.speed))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_count_scaling() {
        assert_eq!(target_count(1000, 1000, 100.0), 100);
        assert_eq!(target_count(1000, 1000, 50.0), 50);
        assert_eq!(target_count(800, 600, 100.0), 48);
        // floor(480000 / 10000) = 48, halved = 24
        assert_eq!(target_count(800, 600, 50.0), 24);
    }

    #[test]
    fn test_count_floors_fractional_results() {
        // floor(99 * 99 / 10000) = 0
        assert_eq!(target_count(99, 99, 100.0), 0);
        // 3 * 0.5 = 1.5 -> 1
        assert_eq!(target_count(300, 100, 50.0), 1);
    }

    #[test]
    fn test_zero_and_negative_area() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = FieldConfig::default();
        assert!(seed(0, 0, &config, &mut rng).is_empty());
        assert!(seed(-100, 500, &config, &mut rng).is_empty());
        assert!(seed(500, -100, &config, &mut rng).is_empty());
        assert!(seed(-100, -100, &config, &mut rng).is_empty());
    }

    #[test]
    fn test_particles_within_bounds_and_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = FieldConfig::default();
        let particles = seed(1000, 1000, &config, &mut rng);
        assert_eq!(particles.len(), 100);

        for p in &particles {
            assert!(p.position.x >= 0.0 && p.position.x < 1000.0);
            assert!(p.position.y >= 0.0 && p.position.y < 1000.0);
            assert!(p.velocity.x.abs() <= config.speed / 2.0);
            assert!(p.velocity.y.abs() <= config.speed / 2.0);
            assert!(p.radius >= 1.0 && p.radius < 4.0);
            assert!(p.lightness >= 50.0 && p.lightness < 70.0);
            assert!(p.alpha >= 0.1 && p.alpha < 0.4);
            assert_eq!(p.color().hue, FIELD_HUE);
        }
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = FieldConfig::default();
        let a = seed(640, 480, &config, &mut StdRng::seed_from_u64(3));
        let b = seed(640, 480, &config, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }
}
