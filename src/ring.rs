//! Counter-rotating beams in a circular accelerator.
//!
//! Two beams of particles travel the same ring in opposite directions. When a
//! matter and an antimatter particle pass within the merge distance of each
//! other inside a detection chamber they annihilate: an expanding flash is
//! spawned at their midpoint, heat is deposited on the map (if it is shown),
//! and both particles are hidden. After the respawn delay each one reappears
//! at a random angle on the ring.

use std::f32::consts::TAU;

use glam::{Vec3, Vec4};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::collision::{detect_ring_collisions, Chamber, CollisionEvent};
use crate::config::RingConfig;
use crate::draw::{DrawList, Projection};
use crate::driver::{Control, Scene};
use crate::effects::{EffectSet, EnergyLedger};
use crate::heatmap::HeatAccumulator;
use crate::integrator::advance_orbit;
use crate::particle::{hex_color, orbit_position, Direction, ParticleKind};
use crate::species::Species;
use crate::store::{sample, BeamSpec, ParticleStore};
use crate::tasks::DeferredQueue;
use crate::time::FrameStep;

const EFFECT_COLOR: u32 = 0xffdd00;
const BEAM_OPACITY: f32 = 0.8;
const HEATMAP_OPACITY: f32 = 0.7;
const OUTLINE_SEGMENTS: usize = 128;

/// Index of the matter beam in [`AcceleratorRing::beams`].
pub const MATTER_BEAM: usize = 0;
/// Index of the antimatter beam in [`AcceleratorRing::beams`].
pub const ANTIMATTER_BEAM: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Respawn {
    beam: usize,
    index: usize,
    /// Run the task was scheduled in; stale after a reset.
    generation: u64,
}

pub struct AcceleratorRing {
    config: RingConfig,
    beams: [ParticleStore; 2],
    chambers: Vec<Chamber>,
    effects: EffectSet,
    heat: HeatAccumulator,
    heat_visible: bool,
    respawns: DeferredQueue<Respawn>,
    ledger: EnergyLedger,
    species: Species,
    rng: StdRng,
    /// Unscaled seconds of running time since the last reset.
    clock: f64,
    generation: u64,
}

impl AcceleratorRing {
    pub fn new(config: RingConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Reproducible ring for tests and benchmarks.
    pub fn with_seed(config: RingConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: RingConfig, rng: StdRng) -> Self {
        let chambers = config
            .chamber_angles
            .iter()
            .map(|&angle| Chamber {
                center: orbit_position(config.radius, angle),
                radius: config.chamber_radius,
            })
            .collect();
        let mut ring = Self {
            beams: [ParticleStore::new(), ParticleStore::new()],
            chambers,
            effects: EffectSet::new(config.effect_growth),
            heat: HeatAccumulator::new(config.heatmap.resolution, config.heatmap.extent),
            heat_visible: config.heatmap.visible,
            respawns: DeferredQueue::new(),
            ledger: EnergyLedger::new(),
            species: config.species,
            rng,
            clock: 0.0,
            generation: 0,
            config,
        };
        ring.populate();
        log::info!(
            "Accelerator ring: {} particles per beam, {} chambers",
            ring.config.particles_per_beam,
            ring.chambers.len()
        );
        ring
    }

    fn beam_spec(&self, beam: usize) -> BeamSpec {
        let (kind, direction) = match beam {
            MATTER_BEAM => (ParticleKind::Matter, Direction::Forward),
            _ => (ParticleKind::Antimatter, Direction::Reverse),
        };
        BeamSpec {
            kind,
            count: self.config.particles_per_beam,
            radius: self.config.radius,
            direction,
            base_speed: self.config.base_speed,
            speed_jitter: self.config.speed_jitter,
            size: self.config.particle_size,
            color: hex_color(self.config.beam_colors[beam], BEAM_OPACITY),
        }
    }

    fn populate(&mut self) {
        for beam in [MATTER_BEAM, ANTIMATTER_BEAM] {
            let spec = self.beam_spec(beam);
            self.beams[beam].clear();
            self.beams[beam].seed(&spec, &mut self.rng);
        }
        self.heat.clear();
        for chamber in &self.chambers {
            self.heat.deposit(
                chamber.center,
                self.config.heatmap.initial_intensity,
                self.config.heatmap.influence_radius,
            );
        }
    }

    pub fn config(&self) -> &RingConfig {
        &self.config
    }

    pub fn beams(&self) -> &[ParticleStore; 2] {
        &self.beams
    }

    pub fn chambers(&self) -> &[Chamber] {
        &self.chambers
    }

    pub fn effects(&self) -> &EffectSet {
        &self.effects
    }

    pub fn heat(&self) -> &HeatAccumulator {
        &self.heat
    }

    pub fn heat_visible(&self) -> bool {
        self.heat_visible
    }

    /// Show or hide the heat map. Heat is only deposited while it is shown.
    pub fn set_heatmap_visible(&mut self, visible: bool) {
        self.heat_visible = visible;
    }

    pub fn species(&self) -> Species {
        self.species
    }

    /// Switch the annihilating species. Restarts the run so the energy
    /// counter only ever reflects one species.
    ///
    /// Only the energy released per collision follows the species; beam
    /// colors and particle size stay as configured in [`RingConfig`], since
    /// the ring draws beams, not individual species.
    pub fn select_species(&mut self, species: Species) {
        self.species = species;
        self.reset();
    }

    pub fn ledger(&self) -> &EnergyLedger {
        &self.ledger
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Particles currently hidden and waiting to reappear.
    pub fn pending_respawns(&self) -> usize {
        self.respawns.len()
    }

    fn run_respawns(&mut self) {
        for task in self.respawns.drain_due(self.clock) {
            if task.generation != self.generation {
                continue;
            }
            let angle = self.rng.gen_range(0.0..TAU);
            let Some(particle) = self
                .beams
                .get_mut(task.beam)
                .and_then(|b| b.get_mut(task.index))
            else {
                continue;
            };
            particle.place_on_ring(angle);
            particle.visible = true;
        }
    }

    fn annihilate(&mut self, event: &CollisionEvent) {
        let lifetime = sample(&mut self.rng, &self.config.effect_lifetime.range());
        self.effects
            .spawn(event.position, lifetime, self.config.effect_size);
        self.ledger
            .record(self.species.annihilation_energy_mev(), 0);
        if self.heat_visible {
            self.heat.deposit(
                event.position,
                self.config.heatmap.intensity,
                self.config.heatmap.influence_radius,
            );
        }

        let due = self.clock + f64::from(self.config.respawn_delay);
        for (beam, index) in [(MATTER_BEAM, event.first), (ANTIMATTER_BEAM, event.second)] {
            if let Some(p) = self.beams[beam].get_mut(index) {
                p.visible = false;
            }
            self.respawns.schedule(
                due,
                Respawn {
                    beam,
                    index,
                    generation: self.generation,
                },
            );
        }
        log::debug!(
            "Collision in chamber {:?} at ({:.1}, {:.1})",
            event.chamber,
            event.position.x,
            event.position.z
        );
    }

    fn draw_circle(out: &mut DrawList, center: Vec3, radius: f32, color: Vec4) {
        for i in 0..OUTLINE_SEGMENTS {
            let a0 = i as f32 / OUTLINE_SEGMENTS as f32 * TAU;
            let a1 = (i + 1) as f32 / OUTLINE_SEGMENTS as f32 * TAU;
            out.link(
                center + orbit_position(radius, a0),
                center + orbit_position(radius, a1),
                color,
            );
        }
    }
}

impl Scene for AcceleratorRing {
    fn name(&self) -> &'static str {
        "accelerator ring"
    }

    fn step(&mut self, step: &FrameStep) {
        self.clock += f64::from(step.raw);
        self.run_respawns();

        for beam in &mut self.beams {
            for p in beam.iter_mut().filter(|p| p.visible) {
                advance_orbit(p, step.raw, step.time_scale);
            }
        }

        let events = detect_ring_collisions(
            self.beams[MATTER_BEAM].as_slice(),
            self.beams[ANTIMATTER_BEAM].as_slice(),
            &self.chambers,
            self.config.merge_distance,
        );
        for event in &events {
            self.annihilate(event);
        }

        self.effects.update(step.scaled);
    }

    fn draw(&self, out: &mut DrawList) {
        out.projection = Projection::Orbit;

        let tube = Vec4::new(0.3, 0.4, 0.6, 0.35);
        for r in [
            self.config.radius - self.config.tube_radius,
            self.config.radius + self.config.tube_radius,
        ] {
            Self::draw_circle(out, Vec3::ZERO, r, tube);
        }
        let chamber_color = Vec4::new(0.5, 0.5, 0.6, 0.5);
        for chamber in &self.chambers {
            Self::draw_circle(out, chamber.center, chamber.radius, chamber_color);
        }

        if self.heat_visible {
            let size = self.heat.spacing() * 0.4;
            for (center, heat) in self.heat.samples().filter(|(_, h)| *h > 0.0) {
                let rgb = HeatAccumulator::color(heat);
                out.sprite(
                    Vec3::new(center.x, -1.0, center.y),
                    size,
                    rgb.extend(HEATMAP_OPACITY),
                );
            }
        }

        for p in self.beams.iter().flat_map(|b| b.iter()).filter(|p| p.visible) {
            out.sprite(p.position, p.size, p.color);
        }

        let flash = hex_color(EFFECT_COLOR, 1.0);
        for effect in self.effects.iter() {
            out.sprite(
                effect.position,
                self.effects.size_of(effect),
                flash.truncate().extend(effect.opacity()),
            );
        }
    }

    fn draws_while_paused(&self) -> bool {
        true
    }

    fn reset(&mut self) {
        self.generation += 1;
        self.respawns.clear();
        self.effects.clear();
        self.ledger.reset();
        self.clock = 0.0;
        self.populate();
    }

    fn apply(&mut self, control: Control) -> bool {
        match control {
            Control::SetHeatmap(visible) => self.set_heatmap_visible(visible),
            Control::ToggleHeatmap => self.set_heatmap_visible(!self.heat_visible),
            Control::SelectSpecies(species) => self.select_species(species),
            Control::Pointer(_) => return false,
        }
        true
    }

    fn ledger(&self) -> Option<&EnergyLedger> {
        Some(&self.ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> RingConfig {
        RingConfig {
            particles_per_beam: 4,
            ..RingConfig::default()
        }
    }

    #[test]
    fn beams_start_full_and_visible() {
        let ring = AcceleratorRing::with_seed(small(), 1);
        for beam in ring.beams() {
            assert_eq!(beam.len(), 4);
            assert!(beam.iter().all(|p| p.visible));
        }
        assert_eq!(ring.beams()[MATTER_BEAM].as_slice()[0].kind, ParticleKind::Matter);
        assert_eq!(
            ring.beams()[ANTIMATTER_BEAM].as_slice()[0].kind,
            ParticleKind::Antimatter
        );
    }

    #[test]
    fn chambers_sit_on_the_ring() {
        let ring = AcceleratorRing::with_seed(small(), 1);
        assert_eq!(ring.chambers().len(), 4);
        for chamber in ring.chambers() {
            assert!((chamber.center.length() - 200.0).abs() < 1e-3);
        }
    }

    #[test]
    fn initial_heat_is_seeded_at_chambers() {
        let ring = AcceleratorRing::with_seed(small(), 1);
        assert!(ring.heat().total() > 0.0);
    }

    #[test]
    fn heatmap_draws_only_when_visible() {
        let mut ring = AcceleratorRing::with_seed(small(), 1);
        let mut hidden = DrawList::new();
        ring.draw(&mut hidden);

        assert!(ring.apply(Control::ToggleHeatmap));
        let mut shown = DrawList::new();
        ring.draw(&mut shown);
        assert!(shown.sprites.len() > hidden.sprites.len());
    }

    #[test]
    fn species_change_keeps_beam_look() {
        let mut ring = AcceleratorRing::with_seed(small(), 1);
        let look = |ring: &AcceleratorRing| -> Vec<(f32, Vec4)> {
            ring.beams()
                .iter()
                .flat_map(|b| b.iter().map(|p| (p.size, p.color)))
                .collect()
        };
        let before = look(&ring);

        ring.select_species(Species::Proton);
        assert_eq!(ring.species(), Species::Proton);
        assert_eq!(look(&ring), before);
        assert!(before.iter().all(|(size, _)| *size == ring.config().particle_size));
    }

    #[test]
    fn pointer_is_ignored() {
        let mut ring = AcceleratorRing::with_seed(small(), 1);
        assert!(!ring.apply(Control::Pointer(None)));
    }
}
