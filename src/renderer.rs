use crate::particle::{Particle, FIELD_HUE};
use crate::surface::{DrawContext, Hsla};

/// Lightness of every link stroke, in percent
const LINK_LIGHTNESS: f32 = 70.0;

/// Alpha of a link at zero distance, before global opacity
const LINK_BASE_ALPHA: f32 = 0.2;

const LINK_WIDTH: f32 = 1.0;

/// A line between two particles closer than the link distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
    pub alpha: f32,
}

/// Link alpha for a pair at `distance`, or None when the pair is too far apart
pub fn link_alpha(distance: f32, max_link_distance: f32, global_opacity: f32) -> Option<f32> {
    if distance < max_link_distance {
        Some((1.0 - distance / max_link_distance) * LINK_BASE_ALPHA * global_opacity)
    } else {
        None
    }
}

/// Every unordered pair of distinct particles within the link distance.
///
/// This is the naive all-pairs scan: O(n²) per call.
pub fn links(
    particles: &[Particle],
    max_link_distance: f32,
    global_opacity: f32,
) -> impl Iterator<Item = Link> + '_ {
    (0..particles.len()).flat_map(move |a| {
        // The self-pair would be a zero-length stroke
        (a + 1..particles.len()).filter_map(move |b| {
            let distance = particles[a].position.distance(particles[b].position);
            link_alpha(distance, max_link_distance, global_opacity).map(|alpha| Link {
                a,
                b,
                distance,
                alpha,
            })
        })
    })
}

/// Repaint one frame: clear, draw particle discs, then link nearby pairs.
/// Returns the number of links drawn.
pub fn render<C: DrawContext + ?Sized>(
    ctx: &mut C,
    width: f32,
    height: f32,
    particles: &[Particle],
    max_link_distance: f32,
    global_opacity: f32,
) -> usize {
    ctx.clear_rect(0.0, 0.0, width, height);

    for particle in particles {
        ctx.fill_circle(particle.position, particle.radius, particle.color());
    }

    let mut drawn = 0;
    for link in links(particles, max_link_distance, global_opacity) {
        ctx.stroke_line(
            particles[link.a].position,
            particles[link.b].position,
            LINK_WIDTH,
            Hsla::new(FIELD_HUE, LINK_LIGHTNESS, link.alpha),
        );
        drawn += 1;
    }
    drawn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::testing::{DrawOp, RecordingContext};
    use crate::surface::Point;

    fn particle_at(x: f32, y: f32) -> Particle {
        Particle {
            position: Point::new(x, y),
            velocity: Point::new(0.1, 0.1),
            radius: 2.0,
            lightness: 55.0,
            alpha: 0.3,
        }
    }

    #[test]
    fn test_link_alpha_decays_linearly() {
        assert_eq!(link_alpha(0.0, 150.0, 1.0), Some(0.2));
        let half = link_alpha(75.0, 150.0, 1.0).unwrap();
        assert!((half - 0.1).abs() < 1e-6);
        let scaled = link_alpha(75.0, 150.0, 0.5).unwrap();
        assert!((scaled - 0.05).abs() < 1e-6);
        assert_eq!(link_alpha(150.0, 150.0, 1.0), None);
        assert_eq!(link_alpha(200.0, 150.0, 1.0), None);
    }

    #[test]
    fn test_zero_link_distance_links_nothing() {
        assert_eq!(link_alpha(0.0, 0.0, 1.0), None);
    }

    #[test]
    fn test_pairwise_symmetry() {
        let a = particle_at(10.0, 10.0);
        let b = particle_at(70.0, 90.0);

        let forward: Vec<Link> = links(&[a, b], 150.0, 0.7).collect();
        let backward: Vec<Link> = links(&[b, a], 150.0, 0.7).collect();

        assert_eq!(forward.len(), 1);
        assert_eq!(backward.len(), 1);
        assert_eq!(forward[0].distance, backward[0].distance);
        assert_eq!(forward[0].alpha, backward[0].alpha);
        assert_eq!(forward[0].distance, 100.0);
    }

    #[test]
    fn test_no_self_links() {
        let particles = vec![particle_at(5.0, 5.0), particle_at(5.0, 5.0), particle_at(400.0, 5.0)];
        let found: Vec<Link> = links(&particles, 150.0, 0.7).collect();

        // Coincident distinct particles still link, but nothing links to itself
        assert_eq!(found.len(), 1);
        assert!(found.iter().all(|link| link.a != link.b));
    }

    #[test]
    fn test_all_pairs_counted_once() {
        let particles: Vec<Particle> = (0..6).map(|i| particle_at(i as f32 * 10.0, 0.0)).collect();
        // All 6 within 150px of each other: 6 * 5 / 2 pairs
        assert_eq!(links(&particles, 150.0, 0.7).count(), 15);
    }

    #[test]
    fn test_render_clears_then_draws_particles_then_links() {
        let particles = vec![particle_at(0.0, 0.0), particle_at(30.0, 40.0)];
        let mut ctx = RecordingContext::default();

        let drawn = render(&mut ctx, 800.0, 600.0, &particles, 150.0, 0.7);

        assert_eq!(drawn, 1);
        assert_eq!(ctx.ops.len(), 4);
        assert_eq!(
            ctx.ops[0],
            DrawOp::Clear {
                width: 800.0,
                height: 600.0
            }
        );
        assert!(matches!(ctx.ops[1], DrawOp::Circle { .. }));
        assert!(matches!(ctx.ops[2], DrawOp::Circle { .. }));

        match &ctx.ops[3] {
            DrawOp::Line {
                from,
                to,
                width,
                color,
            } => {
                assert_eq!(*from, Point::new(0.0, 0.0));
                assert_eq!(*to, Point::new(30.0, 40.0));
                assert_eq!(*width, 1.0);
                assert_eq!(color.hue, 160.0);
                assert_eq!(color.lightness, 70.0);
                // (1 - 50/150) * 0.2 * 0.7
                assert!((color.alpha - 0.0933333).abs() < 1e-5);
            }
            other => panic!("expected a line, got {:?}", other),
        }
    }

    #[test]
    fn test_particle_alpha_not_scaled_by_global_opacity() {
        let particles = vec![particle_at(20.0, 20.0)];
        let mut ctx = RecordingContext::default();
        render(&mut ctx, 100.0, 100.0, &particles, 150.0, 0.1);

        let circle = ctx.circles().next().unwrap();
        match circle {
            DrawOp::Circle { radius, color, .. } => {
                assert_eq!(*radius, 2.0);
                assert_eq!(color.alpha, 0.3);
                assert_eq!(color.lightness, 55.0);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_far_particles_not_linked() {
        let particles = vec![particle_at(0.0, 0.0), particle_at(500.0, 500.0)];
        let mut ctx = RecordingContext::default();
        assert_eq!(render(&mut ctx, 600.0, 600.0, &particles, 150.0, 0.7), 0);
        assert_eq!(ctx.lines().count(), 0);
    }

    #[test]
    fn test_empty_field_still_clears() {
        let mut ctx = RecordingContext::default();
        assert_eq!(render(&mut ctx, 10.0, 10.0, &[], 150.0, 0.7), 0);
        assert_eq!(ctx.ops.len(), 1);
    }
}
