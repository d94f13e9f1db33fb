//! The authoritative list of live particles for one scene.
//!
//! All mutation happens from inside a scene's frame step; nothing outside the
//! owning scene holds a reference across frames.

use std::ops::Range;

use glam::{Vec3, Vec4};
use rand::Rng;
use std::f32::consts::TAU;

use crate::particle::{Direction, Lifetime, Particle, ParticleKind};

/// Description of one beam of ring-constrained particles.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamSpec {
    pub kind: ParticleKind,
    pub count: usize,
    pub radius: f32,
    pub direction: Direction,
    /// Angular speed before jitter.
    pub base_speed: f32,
    /// Each particle gets `base_speed + U[0, speed_jitter)`.
    pub speed_jitter: f32,
    pub size: f32,
    pub color: Vec4,
}

/// How burst angles are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstPattern {
    /// Angles evenly partition the full circle.
    Even,
    /// Each angle drawn uniformly at random.
    Random,
}

/// Parameters for a radial burst of energy particles in the XY plane.
#[derive(Debug, Clone, PartialEq)]
pub struct BurstSpec {
    pub count: usize,
    pub pattern: BurstPattern,
    /// Outward speed range, units per second.
    pub speed: Range<f32>,
    pub size: Range<f32>,
    /// Initial remaining lifetime range, seconds.
    pub life: Range<f32>,
    /// Maximum lifetime used for fading. `None` uses each particle's initial lifetime.
    pub max_life: Option<f32>,
    pub color: Vec4,
}

/// Fixed start state of one particle in a two-body setup.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedSpec {
    pub kind: ParticleKind,
    pub position: Vec3,
    /// Units per second.
    pub velocity: Vec3,
    pub size: f32,
    pub color: Vec4,
}

/// Sample `range`, tolerating empty or inverted ranges by returning the start.
pub(crate) fn sample<R: Rng>(rng: &mut R, range: &Range<f32>) -> f32 {
    if range.end > range.start {
        rng.gen_range(range.clone())
    } else {
        range.start
    }
}

#[derive(Debug, Default, Clone)]
pub struct ParticleStore {
    particles: Vec<Particle>,
}

impl ParticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Particle> {
        self.particles.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Particle> {
        self.particles.get_mut(index)
    }

    /// Append one particle, returning its index.
    pub fn push(&mut self, particle: Particle) -> usize {
        self.particles.push(particle);
        self.particles.len() - 1
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// First particle of `kind`, with its index.
    pub fn find_kind(&self, kind: ParticleKind) -> Option<(usize, &Particle)> {
        self.particles.iter().enumerate().find(|(_, p)| p.kind == kind)
    }

    /// Seed a beam of particles evenly spaced around its ring.
    ///
    /// Returns the index range of the new particles.
    pub fn seed<R: Rng>(&mut self, beam: &BeamSpec, rng: &mut R) -> Range<usize> {
        let start = self.particles.len();
        let jitter = 0.0..beam.speed_jitter;
        for i in 0..beam.count {
            let angle = (i as f32 / beam.count as f32) * TAU;
            let speed = beam.base_speed + sample(rng, &jitter);
            self.particles.push(Particle::orbiting(
                beam.kind,
                beam.radius,
                angle,
                speed,
                beam.direction,
                beam.size,
                beam.color,
            ));
        }
        start..self.particles.len()
    }

    /// Place the two seed particles of a two-body run at their fixed start
    /// coordinates. No randomness is involved, so reseeding is reproducible.
    pub fn seed_pair(&mut self, pair: [&SeedSpec; 2]) -> Range<usize> {
        let start = self.particles.len();
        for seed in pair {
            self.particles.push(Particle::free(
                seed.kind,
                seed.position,
                seed.velocity,
                seed.size,
                seed.color,
            ));
        }
        start..self.particles.len()
    }

    /// Spawn `spec.count` energy particles at `origin` flying radially outward.
    ///
    /// Returns the index range of the new particles.
    pub fn spawn_energy_burst<R: Rng>(
        &mut self,
        origin: Vec3,
        spec: &BurstSpec,
        rng: &mut R,
    ) -> Range<usize> {
        let start = self.particles.len();
        for i in 0..spec.count {
            let angle = match spec.pattern {
                BurstPattern::Even => (i as f32 / spec.count as f32) * TAU,
                BurstPattern::Random => rng.gen_range(0.0..TAU),
            };
            let speed = sample(rng, &spec.speed);
            let size = sample(rng, &spec.size);
            let remaining = sample(rng, &spec.life);
            let max = spec.max_life.unwrap_or(remaining);
            let velocity = Vec3::new(angle.cos(), angle.sin(), 0.0) * speed;
            self.particles.push(
                Particle::free(ParticleKind::Energy, origin, velocity, size, spec.color)
                    .with_life(Lifetime::new(remaining, max)),
            );
        }
        start..self.particles.len()
    }

    /// Decrement the lifetime of every transient particle by `dt`.
    pub fn age(&mut self, dt: f32) {
        for life in self.particles.iter_mut().filter_map(|p| p.life.as_mut()) {
            life.tick(dt);
        }
    }

    /// Remove particles whose lifetime has run out. Returns how many were removed.
    pub fn prune(&mut self) -> usize {
        let before = self.particles.len();
        self.particles.retain(|p| !p.is_expired());
        before - self.particles.len()
    }

    /// Keep only the particles matching `keep`. Returns how many were removed.
    pub fn retain<F: FnMut(&Particle) -> bool>(&mut self, keep: F) -> usize {
        let before = self.particles.len();
        self.particles.retain(keep);
        before - self.particles.len()
    }
}
