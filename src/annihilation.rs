//! Two-body annihilation on a flat canvas.
//!
//! A particle and its antiparticle start on either side of the canvas and
//! drift toward each other. On contact both vanish and a burst of energy
//! particles flies out from the meeting point. There is exactly one
//! collision per run; afterwards only the burst keeps moving until it has
//! faded out.

use glam::{Vec3, Vec4};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::collision::{CollisionEvent, PairDetector};
use crate::config::AnnihilationConfig;
use crate::draw::{DrawList, Projection};
use crate::driver::{Control, Scene};
use crate::effects::{EffectSet, EnergyLedger};
use crate::integrator::{advance_free, Boundary};
use crate::particle::ParticleKind;
use crate::species::Species;
use crate::store::{BurstPattern, BurstSpec, ParticleStore, SeedSpec};
use crate::time::FrameStep;

const FLASH_GROWTH: f32 = 0.5;
const FLASH_OPACITY: f32 = 0.7;
const ARROW_HEAD: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Seeds placed at their start coordinates, nothing has moved yet.
    Ready,
    /// Seeds are moving toward each other.
    Approaching,
    /// The seeds are gone; only the energy burst remains.
    Annihilated,
}

pub struct Annihilation {
    config: AnnihilationConfig,
    species: Species,
    width: f32,
    height: f32,
    particles: ParticleStore,
    detector: PairDetector,
    effects: EffectSet,
    ledger: EnergyLedger,
    phase: Phase,
    rng: StdRng,
}

impl Annihilation {
    pub fn new(config: AnnihilationConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_seed(config: AnnihilationConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: AnnihilationConfig, rng: StdRng) -> Self {
        let mut scene = Self {
            species: config.species,
            width: config.width,
            height: config.height,
            particles: ParticleStore::new(),
            detector: PairDetector::new(),
            effects: EffectSet::new(FLASH_GROWTH),
            ledger: EnergyLedger::new(),
            phase: Phase::Ready,
            rng,
            config,
        };
        scene.reset();
        scene
    }

    /// Start state of the matter and antimatter seeds for the current canvas.
    pub fn seeds(&self) -> [SeedSpec; 2] {
        let y = self.height * 0.5;
        let size = self.species.size();
        let speed = self.config.approach_speed;
        [
            SeedSpec {
                kind: ParticleKind::Matter,
                position: Vec3::new(self.width * 0.25, y, 0.0),
                velocity: Vec3::new(speed, 0.0, 0.0),
                size,
                color: self.species.color(),
            },
            SeedSpec {
                kind: ParticleKind::Antimatter,
                position: Vec3::new(self.width * 0.75, y, 0.0),
                velocity: Vec3::new(-speed, 0.0, 0.0),
                size,
                color: self.species.anti_color(),
            },
        ]
    }

    fn burst(&self) -> BurstSpec {
        BurstSpec {
            count: self.config.burst_count,
            pattern: BurstPattern::Random,
            speed: self.config.burst_speed.range(),
            size: self.config.burst_size.range(),
            life: self.config.burst_life.range(),
            max_life: Some(self.config.burst_max_life),
            color: ParticleKind::Energy.default_color(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn particles(&self) -> &ParticleStore {
        &self.particles
    }

    pub fn effects(&self) -> &EffectSet {
        &self.effects
    }

    pub fn ledger(&self) -> &EnergyLedger {
        &self.ledger
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Switch species; the run starts over.
    pub fn select_species(&mut self, species: Species) {
        self.species = species;
        self.reset();
    }

    fn annihilate(&mut self, event: CollisionEvent) {
        self.particles.retain(|p| p.kind.is_transient());
        let burst = self.burst();
        let spawned = self
            .particles
            .spawn_energy_burst(event.position, &burst, &mut self.rng);
        self.ledger
            .record(self.species.annihilation_energy_mev(), spawned.len() as u64);
        self.effects.spawn(
            event.position,
            self.config.flash_lifetime,
            self.config.flash_size,
        );
        self.phase = Phase::Annihilated;
        log::info!(
            "{} annihilated with {}: {:.3} MeV, {} energy particles",
            self.species.name(),
            self.species.anti_name(),
            self.species.annihilation_energy_mev(),
            spawned.len()
        );
    }

    fn draw_guide(&self, out: &mut DrawList) {
        let y = self.height * 0.5;
        let color = ParticleKind::Energy.default_color();
        let left = Vec3::new(self.width * 0.30, y, 0.0);
        let right = Vec3::new(self.width * 0.70, y, 0.0);
        out.link(left, right, color);
        for (tip, back) in [(left, self.width * 0.35), (right, self.width * 0.65)] {
            out.link(Vec3::new(back, y - ARROW_HEAD, 0.0), tip, color);
            out.link(Vec3::new(back, y + ARROW_HEAD, 0.0), tip, color);
        }
    }
}

impl Scene for Annihilation {
    fn name(&self) -> &'static str {
        "annihilation"
    }

    fn step(&mut self, step: &FrameStep) {
        if self.phase == Phase::Ready {
            self.phase = Phase::Approaching;
        }
        let dt = step.scaled;

        for p in self.particles.iter_mut() {
            advance_free(p, dt, &Boundary::Open, None);
        }
        self.particles.age(dt);
        self.particles.prune();

        if self.phase == Phase::Approaching {
            let event = match (
                self.particles.find_kind(ParticleKind::Matter),
                self.particles.find_kind(ParticleKind::Antimatter),
            ) {
                (Some(matter), Some(anti)) => self.detector.check(matter, anti),
                _ => None,
            };
            if let Some(event) = event {
                self.annihilate(event);
            }
        }

        self.effects.update(dt);
    }

    fn draw(&self, out: &mut DrawList) {
        out.projection = Projection::Screen {
            width: self.width,
            height: self.height,
        };
        if self.phase == Phase::Ready {
            self.draw_guide(out);
        }

        let energy = ParticleKind::Energy.default_color();
        for effect in self.effects.iter() {
            out.sprite(
                effect.position,
                self.effects.size_of(effect),
                energy.truncate().extend(FLASH_OPACITY * effect.opacity()),
            );
        }
        for p in self.particles.iter() {
            let color = Vec4::new(p.color.x, p.color.y, p.color.z, p.color.w * p.opacity());
            out.sprite(p.position, p.size, color);
        }
    }

    fn stops_on_reset(&self) -> bool {
        true
    }

    /// Back to the two seeds at their start coordinates with zeroed counters.
    fn reset(&mut self) {
        self.particles.clear();
        let [matter, anti] = self.seeds();
        self.particles.seed_pair([&matter, &anti]);
        self.detector.reset();
        self.effects.clear();
        self.ledger.reset();
        self.phase = Phase::Ready;
    }

    fn resize(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.width = width;
        self.height = height;
        if self.phase == Phase::Ready {
            self.reset();
        }
    }

    fn apply(&mut self, control: Control) -> bool {
        match control {
            Control::SelectSpecies(species) => {
                self.select_species(species);
                true
            }
            _ => false,
        }
    }

    fn ledger(&self) -> Option<&EnergyLedger> {
        Some(&self.ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_scene_shows_seeds_and_guide() {
        let scene = Annihilation::with_seed(AnnihilationConfig::default(), 1);
        let mut out = DrawList::new();
        scene.draw(&mut out);
        assert_eq!(out.sprites.len(), 2);
        assert_eq!(out.links.len(), 5);
        assert_eq!(out.sprites[0].position, Vec3::new(200.0, 200.0, 0.0));
        assert_eq!(out.sprites[1].position, Vec3::new(600.0, 200.0, 0.0));
    }

    #[test]
    fn guide_disappears_once_moving() {
        let mut scene = Annihilation::with_seed(AnnihilationConfig::default(), 1);
        scene.step(&FrameStep::new(1.0 / 60.0, 1.0));
        assert_eq!(scene.phase(), Phase::Approaching);
        let mut out = DrawList::new();
        scene.draw(&mut out);
        assert!(out.links.is_empty());
    }

    #[test]
    fn resize_recenters_ready_seeds() {
        let mut scene = Annihilation::with_seed(AnnihilationConfig::default(), 1);
        scene.resize(1000.0, 400.0);
        let xs: Vec<f32> = scene.particles().iter().map(|p| p.position.x).collect();
        assert_eq!(xs, vec![250.0, 750.0]);
    }

    #[test]
    fn species_selection_resets() {
        let mut scene = Annihilation::with_seed(AnnihilationConfig::default(), 1);
        scene.step(&FrameStep::new(0.5, 1.0));
        assert!(scene.apply(Control::SelectSpecies(Species::Proton)));
        assert_eq!(scene.phase(), Phase::Ready);
        assert!(scene.particles().iter().all(|p| p.size == 30.0));
    }

    #[test]
    fn heatmap_controls_are_ignored() {
        let mut scene = Annihilation::with_seed(AnnihilationConfig::default(), 1);
        assert!(!scene.apply(Control::ToggleHeatmap));
    }
}
