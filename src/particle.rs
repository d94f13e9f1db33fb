//! Particle records shared by every scene.
//!
//! A [`Particle`] is either constrained to a circular path ([`Motion::Orbit`])
//! or moves freely with a velocity ([`Motion::Free`]). Orbiting particles never
//! store an independent position: it is recomputed from the accumulated angle,
//! so they cannot drift off their ring.

use glam::{Vec3, Vec4};

/// Category of a particle.
///
/// Drives color, collision eligibility and decay: only matter/antimatter pairs
/// annihilate, and only energy particles age and expire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    Matter,
    Antimatter,
    Energy,
}

impl ParticleKind {
    /// Whether a particle of this kind annihilates on contact with `other`.
    pub fn annihilates_with(self, other: ParticleKind) -> bool {
        matches!(
            (self, other),
            (ParticleKind::Matter, ParticleKind::Antimatter)
                | (ParticleKind::Antimatter, ParticleKind::Matter)
        )
    }

    /// Whether particles of this kind carry a finite lifetime.
    pub fn is_transient(self) -> bool {
        match self {
            ParticleKind::Matter | ParticleKind::Antimatter => false,
            ParticleKind::Energy => true,
        }
    }

    /// Default display color for the kind.
    pub fn default_color(self) -> Vec4 {
        match self {
            ParticleKind::Matter => hex_color(0x1a2b47, 1.0),
            ParticleKind::Antimatter => hex_color(0x722f37, 1.0),
            ParticleKind::Energy => hex_color(0xf9d423, 1.0),
        }
    }
}

/// Convert a `0xRRGGBB` literal into a linear RGBA vector.
pub fn hex_color(rgb: u32, alpha: f32) -> Vec4 {
    let r = ((rgb >> 16) & 0xff) as f32 / 255.0;
    let g = ((rgb >> 8) & 0xff) as f32 / 255.0;
    let b = (rgb & 0xff) as f32 / 255.0;
    Vec4::new(r, g, b, alpha)
}

/// Travel direction along a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Increasing angle.
    Forward,
    /// Decreasing angle.
    Reverse,
}

impl Direction {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Reverse => -1.0,
        }
    }
}

/// How a particle moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Confined to a circle of `radius` around the origin in the XZ plane.
    Orbit {
        angle: f32,
        speed: f32,
        direction: Direction,
        radius: f32,
    },
    /// Unconstrained, integrated from `velocity` (units per second).
    Free { velocity: Vec3 },
}

/// Remaining and maximum lifetime of a transient particle, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifetime {
    pub remaining: f32,
    pub max: f32,
}

impl Lifetime {
    pub fn new(remaining: f32, max: f32) -> Self {
        Self { remaining, max }
    }

    /// Remaining lifetime as a fraction of the maximum, clamped to `[0, 1]`.
    pub fn ratio(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (self.remaining / self.max).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }

    #[inline]
    pub fn tick(&mut self, dt: f32) {
        self.remaining -= dt;
    }
}

/// A single simulated particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub motion: Motion,
    pub kind: ParticleKind,
    /// Draw radius.
    pub size: f32,
    pub color: Vec4,
    /// Hidden particles are neither integrated, tested for collisions nor drawn.
    pub visible: bool,
    /// `Some` only for transient particles.
    pub life: Option<Lifetime>,
    /// Responds to pointer attraction.
    pub attracted: bool,
}

impl Particle {
    /// A particle riding a ring of `radius` at `angle`.
    pub fn orbiting(
        kind: ParticleKind,
        radius: f32,
        angle: f32,
        speed: f32,
        direction: Direction,
        size: f32,
        color: Vec4,
    ) -> Self {
        Self {
            position: orbit_position(radius, angle),
            motion: Motion::Orbit {
                angle,
                speed,
                direction,
                radius,
            },
            kind,
            size,
            color,
            visible: true,
            life: None,
            attracted: false,
        }
    }

    /// A free particle at `position` moving with `velocity`.
    pub fn free(kind: ParticleKind, position: Vec3, velocity: Vec3, size: f32, color: Vec4) -> Self {
        Self {
            position,
            motion: Motion::Free { velocity },
            kind,
            size,
            color,
            visible: true,
            life: None,
            attracted: false,
        }
    }

    pub fn with_life(mut self, life: Lifetime) -> Self {
        self.life = Some(life);
        self
    }

    pub fn with_attraction(mut self, attracted: bool) -> Self {
        self.attracted = attracted;
        self
    }

    /// True once a transient particle has run out of lifetime.
    pub fn is_expired(&self) -> bool {
        self.life.is_some_and(|l| l.is_expired())
    }

    /// Display opacity: linear in remaining lifetime for transient particles.
    pub fn opacity(&self) -> f32 {
        self.life.map_or(1.0, |l| l.ratio())
    }

    /// Current velocity of a free particle; orbiting particles report zero.
    pub fn velocity(&self) -> Vec3 {
        match self.motion {
            Motion::Free { velocity } => velocity,
            Motion::Orbit { .. } => Vec3::ZERO,
        }
    }

    /// Move an orbiting particle to `angle` on its ring. No-op for free particles.
    pub fn place_on_ring(&mut self, new_angle: f32) {
        if let Motion::Orbit { angle, radius, .. } = &mut self.motion {
            *angle = new_angle;
            self.position = orbit_position(*radius, new_angle);
        }
    }
}

/// Point on a ring of `radius` centered at the origin, in the XZ plane.
#[inline]
pub fn orbit_position(radius: f32, angle: f32) -> Vec3 {
    Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbiting_particle_starts_on_ring() {
        let p = Particle::orbiting(
            ParticleKind::Matter,
            200.0,
            1.3,
            0.01,
            Direction::Forward,
            1.5,
            Vec4::ONE,
        );
        assert!((p.position.length() - 200.0).abs() < 1e-3);
        assert_eq!(p.position.y, 0.0);
    }

    #[test]
    fn only_matter_antimatter_pairs_annihilate() {
        use ParticleKind::*;
        assert!(Matter.annihilates_with(Antimatter));
        assert!(Antimatter.annihilates_with(Matter));
        assert!(!Matter.annihilates_with(Matter));
        assert!(!Energy.annihilates_with(Antimatter));
    }

    #[test]
    fn lifetime_ratio_and_expiry() {
        let mut life = Lifetime::new(2.0, 4.0);
        assert_eq!(life.ratio(), 0.5);
        life.tick(2.0);
        assert!(life.is_expired());
        assert_eq!(life.ratio(), 0.0);
    }

    #[test]
    fn place_on_ring_ignores_free_particles() {
        let mut p = Particle::free(ParticleKind::Energy, Vec3::X, Vec3::Y, 1.0, Vec4::ONE);
        p.place_on_ring(2.0);
        assert_eq!(p.position, Vec3::X);
    }

    #[test]
    fn hex_color_unpacks_channels() {
        let c = hex_color(0xff8000, 0.5);
        assert_eq!(c.x, 1.0);
        assert!((c.y - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.z, 0.0);
        assert_eq!(c.w, 0.5);
    }
}
