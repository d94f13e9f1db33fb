//! Per-frame motion integration.
//!
//! Orbiting particles advance their angle and have their position recomputed
//! from it. Free particles integrate velocity explicitly, optionally nudged
//! toward a pointer and wrapped at the surface bounds.

use glam::{Vec2, Vec3};

use crate::particle::{orbit_position, Motion, Particle};

/// Scale applied to ring angular speed so that the small per-particle speeds
/// produce visible motion at 60 Hz.
pub const ORBIT_SPEED_SCALE: f32 = 30.0;

/// Edge behavior for free particles, in the XY plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Boundary {
    /// Particles may leave the surface.
    Open,
    /// Leaving one edge re-enters at the opposite edge.
    Wrap { min: Vec2, max: Vec2 },
}

impl Boundary {
    /// Wrap bounds covering a `width` x `height` surface with its origin top-left.
    pub fn surface(width: f32, height: f32) -> Self {
        Boundary::Wrap {
            min: Vec2::ZERO,
            max: Vec2::new(width, height),
        }
    }

    fn apply(&self, position: &mut Vec3) {
        let Boundary::Wrap { min, max } = *self else {
            return;
        };
        if position.x < min.x {
            position.x = max.x;
        } else if position.x > max.x {
            position.x = min.x;
        }
        if position.y < min.y {
            position.y = max.y;
        } else if position.y > max.y {
            position.y = min.y;
        }
    }
}

/// Pointer attraction applied to particles flagged `attracted`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attractor {
    /// Last known pointer position.
    pub target: Vec2,
    /// Only particles closer than this are affected.
    pub capture_radius: f32,
    /// Acceleration per unit of offset, per second squared.
    pub gain: f32,
    /// Speed cap after attraction, units per second.
    pub max_speed: f32,
}

impl Attractor {
    fn nudge(&self, position: Vec3, velocity: &mut Vec3, dt: f32) {
        let offset = self.target - position.truncate();
        if offset.length_squared() >= self.capture_radius * self.capture_radius {
            return;
        }
        *velocity += (offset * self.gain * dt).extend(0.0);
        let speed = velocity.length();
        if speed > self.max_speed {
            *velocity *= self.max_speed / speed;
        }
    }
}

/// Advance an orbiting particle by `dt` seconds at `time_scale`.
///
/// `angle += direction * speed * dt * time_scale * ORBIT_SPEED_SCALE`, then the
/// position is recomputed from the angle. Free particles are left untouched.
pub fn advance_orbit(particle: &mut Particle, dt: f32, time_scale: f32) {
    if let Motion::Orbit {
        angle,
        speed,
        direction,
        radius,
    } = &mut particle.motion
    {
        *angle += direction.sign() * *speed * dt * time_scale * ORBIT_SPEED_SCALE;
        particle.position = orbit_position(*radius, *angle);
    }
}

/// Advance a free particle by `dt` seconds.
///
/// Attraction (if any, and if the particle opts in) modifies the velocity first,
/// then the position is integrated and finally wrapped. Orbiting particles are
/// left untouched.
pub fn advance_free(
    particle: &mut Particle,
    dt: f32,
    boundary: &Boundary,
    attractor: Option<&Attractor>,
) {
    let attracted = particle.attracted;
    let Motion::Free { velocity } = &mut particle.motion else {
        return;
    };
    if attracted {
        if let Some(attractor) = attractor {
            attractor.nudge(particle.position, velocity, dt);
        }
    }
    particle.position += *velocity * dt;
    boundary.apply(&mut particle.position);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::{Direction, ParticleKind};
    use glam::Vec4;

    fn orbiter(direction: Direction) -> Particle {
        Particle::orbiting(ParticleKind::Matter, 200.0, 0.0, 0.01, direction, 1.5, Vec4::ONE)
    }

    fn angle_of(p: &Particle) -> f32 {
        match p.motion {
            Motion::Orbit { angle, .. } => angle,
            Motion::Free { .. } => panic!("not an orbiter"),
        }
    }

    #[test]
    fn orbit_directions_are_opposite() {
        let mut a = orbiter(Direction::Forward);
        let mut b = orbiter(Direction::Reverse);
        advance_orbit(&mut a, 0.1, 1.0);
        advance_orbit(&mut b, 0.1, 1.0);
        assert!((angle_of(&a) - 0.03).abs() < 1e-6);
        assert!((angle_of(&b) + 0.03).abs() < 1e-6);
    }

    #[test]
    fn orbit_stays_on_ring_for_ragged_frame_times() {
        let mut p = orbiter(Direction::Forward);
        for dt in [0.016, 0.2, 0.0001, 1.7, 0.033, 5.0] {
            advance_orbit(&mut p, dt, 3.0);
            assert!((p.position.length() - 200.0).abs() < 1e-3);
        }
    }

    #[test]
    fn wrap_reenters_at_opposite_edge() {
        let boundary = Boundary::surface(100.0, 50.0);
        let mut p = Particle::free(
            ParticleKind::Matter,
            Vec3::new(99.0, 10.0, 0.0),
            Vec3::new(60.0, 0.0, 0.0),
            1.0,
            Vec4::ONE,
        );
        advance_free(&mut p, 0.1, &boundary, None);
        assert_eq!(p.position.x, 0.0);

        p.motion = Motion::Free {
            velocity: Vec3::new(0.0, -300.0, 0.0),
        };
        advance_free(&mut p, 0.1, &boundary, None);
        assert_eq!(p.position.y, 50.0);
    }

    #[test]
    fn open_boundary_does_not_wrap() {
        let mut p = Particle::free(
            ParticleKind::Matter,
            Vec3::new(99.0, 10.0, 0.0),
            Vec3::new(60.0, 0.0, 0.0),
            1.0,
            Vec4::ONE,
        );
        advance_free(&mut p, 0.1, &Boundary::Open, None);
        assert!((p.position.x - 105.0).abs() < 1e-4);
    }

    #[test]
    fn attraction_pulls_and_caps_speed() {
        let attractor = Attractor {
            target: Vec2::new(100.0, 0.0),
            capture_radius: 200.0,
            gain: 1000.0,
            max_speed: 120.0,
        };
        let mut p = Particle::free(ParticleKind::Energy, Vec3::ZERO, Vec3::ZERO, 1.0, Vec4::ONE)
            .with_attraction(true);
        advance_free(&mut p, 0.1, &Boundary::Open, Some(&attractor));
        let v = p.velocity();
        assert!(v.x > 0.0);
        assert!(v.length() <= 120.0 + 1e-3);
    }

    #[test]
    fn attraction_ignores_far_or_unflagged_particles() {
        let attractor = Attractor {
            target: Vec2::new(500.0, 0.0),
            capture_radius: 200.0,
            gain: 1.0,
            max_speed: 120.0,
        };
        let mut far = Particle::free(ParticleKind::Energy, Vec3::ZERO, Vec3::ZERO, 1.0, Vec4::ONE)
            .with_attraction(true);
        advance_free(&mut far, 0.1, &Boundary::Open, Some(&attractor));
        assert_eq!(far.velocity(), Vec3::ZERO);

        let near = Attractor {
            target: Vec2::new(10.0, 0.0),
            ..attractor
        };
        let mut unflagged =
            Particle::free(ParticleKind::Matter, Vec3::ZERO, Vec3::ZERO, 1.0, Vec4::ONE);
        advance_free(&mut unflagged, 0.1, &Boundary::Open, Some(&near));
        assert_eq!(unflagged.velocity(), Vec3::ZERO);
    }
}
