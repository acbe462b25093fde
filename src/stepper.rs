use crate::particle::Particle;

/// Advance every particle one tick, reflecting off the surface edges.
///
/// Reflection flips the velocity sign without clamping the position, so a
/// particle can sit up to one tick's displacement outside the surface before
/// the next tick carries it back.
pub fn advance(particles: &mut [Particle], width: f32, height: f32) {
    for particle in particles.iter_mut() {
        particle.position.x += particle.velocity.x;
        particle.position.y += particle.velocity.y;

        if particle.position.x > width || particle.position.x < 0.0 {
            particle.velocity.x = -particle.velocity.x;
        }
        if particle.position.y > height || particle.position.y < 0.0 {
            particle.velocity.y = -particle.velocity.y;
        }
    }
}
