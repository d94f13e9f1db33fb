//! Transient collision effects and released-energy accounting.

use glam::Vec3;

use crate::species::MEV_TO_JOULES;

/// An expanding, fading burst spawned at a collision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEffect {
    pub position: Vec3,
    pub remaining: f32,
    pub max_lifetime: f32,
    pub base_size: f32,
}

impl CollisionEffect {
    pub fn new(position: Vec3, lifetime: f32, base_size: f32) -> Self {
        Self {
            position,
            remaining: lifetime,
            max_lifetime: lifetime,
            base_size,
        }
    }

    /// Remaining lifetime as a fraction of the maximum.
    pub fn ratio(&self) -> f32 {
        if self.max_lifetime <= 0.0 {
            return 0.0;
        }
        (self.remaining / self.max_lifetime).clamp(0.0, 1.0)
    }

    /// Linear in remaining lifetime: 1.0 at spawn, 0.0 at expiry.
    pub fn opacity(&self) -> f32 {
        self.ratio()
    }

    /// Grows from 1 to `1 + growth` as lifetime depletes.
    pub fn scale(&self, growth: f32) -> f32 {
        1.0 + growth * (1.0 - self.ratio())
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }
}

/// The active collision effects of a scene.
#[derive(Debug, Clone)]
pub struct EffectSet {
    effects: Vec<CollisionEffect>,
    growth: f32,
}

impl EffectSet {
    /// `growth` is the extra size multiple reached at the end of an effect's life.
    pub fn new(growth: f32) -> Self {
        Self {
            effects: Vec::new(),
            growth,
        }
    }

    pub fn spawn(&mut self, position: Vec3, lifetime: f32, base_size: f32) {
        self.effects
            .push(CollisionEffect::new(position, lifetime, base_size));
    }

    /// Decay every effect by `dt` and drop the expired ones.
    ///
    /// Returns the number of effects removed.
    pub fn update(&mut self, dt: f32) -> usize {
        let before = self.effects.len();
        for effect in &mut self.effects {
            effect.remaining -= dt;
        }
        self.effects.retain(|e| !e.is_expired());
        before - self.effects.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CollisionEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Current draw size of `effect`.
    pub fn size_of(&self, effect: &CollisionEffect) -> f32 {
        effect.base_size * effect.scale(self.growth)
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}

/// Cumulative counters shown to the user.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct EnergyLedger {
    energy_mev: f64,
    particles: u64,
    collisions: u64,
}

impl EnergyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one collision releasing `energy_mev` and spawning `spawned` particles.
    pub fn record(&mut self, energy_mev: f64, spawned: u64) {
        self.energy_mev += energy_mev;
        self.particles += spawned;
        self.collisions += 1;
    }

    pub fn energy_mev(&self) -> f64 {
        self.energy_mev
    }

    pub fn energy_joules(&self) -> f64 {
        self.energy_mev * MEV_TO_JOULES
    }

    pub fn particles(&self) -> u64 {
        self.particles
    }

    pub fn collisions(&self) -> u64 {
        self.collisions
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
