//! Ambient background particles.
//!
//! A loose cloud of matter, antimatter and energy particles drifting across
//! the surface and wrapping at its edges. Energy particles are drawn toward
//! the pointer, and nearby particles are joined by faint links that fade
//! with distance.

use glam::{Vec2, Vec3, Vec4};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::FieldConfig;
use crate::draw::{DrawList, Link, Projection};
use crate::driver::{Control, Scene};
use crate::integrator::{advance_free, Attractor, Boundary};
use crate::particle::{Particle, ParticleKind};
use crate::store::ParticleStore;
use crate::time::FrameStep;

pub struct ParticleField {
    config: FieldConfig,
    width: f32,
    height: f32,
    particles: ParticleStore,
    pointer: Option<Vec2>,
    rng: StdRng,
}

impl ParticleField {
    pub fn new(config: FieldConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_seed(config: FieldConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: FieldConfig, rng: StdRng) -> Self {
        let mut field = Self {
            width: config.width,
            height: config.height,
            particles: ParticleStore::new(),
            pointer: None,
            rng,
            config,
        };
        field.populate();
        field
    }

    fn populate(&mut self) {
        self.particles.clear();
        for _ in 0..self.config.count {
            let particle = self.spawn_one();
            self.particles.push(particle);
        }
        log::debug!("Seeded {} ambient particles", self.particles.len());
    }

    fn spawn_one(&mut self) -> Particle {
        let cfg = &self.config;
        let roll: f32 = self.rng.gen();
        let kind = if roll < cfg.matter_share {
            ParticleKind::Matter
        } else if roll < cfg.matter_share + cfg.antimatter_share {
            ParticleKind::Antimatter
        } else {
            ParticleKind::Energy
        };
        let size_span = match kind {
            ParticleKind::Energy => cfg.base_size * 1.5,
            _ => cfg.base_size,
        };
        let position = Vec3::new(
            self.rng.gen::<f32>() * self.width,
            self.rng.gen::<f32>() * self.height,
            0.0,
        );
        let velocity = Vec3::new(
            (self.rng.gen::<f32>() - 0.5) * cfg.speed,
            (self.rng.gen::<f32>() - 0.5) * cfg.speed,
            0.0,
        );
        let size = 1.0 + self.rng.gen::<f32>() * size_span;
        Particle::free(kind, position, velocity, size, kind.default_color())
            .with_attraction(kind == ParticleKind::Energy)
    }

    pub fn particles(&self) -> &ParticleStore {
        &self.particles
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Last known pointer position in surface pixels.
    pub fn set_pointer(&mut self, pointer: Option<Vec2>) {
        self.pointer = pointer;
    }

    fn attractor(&self) -> Option<Attractor> {
        self.pointer.map(|target| Attractor {
            target,
            capture_radius: self.config.attraction_radius,
            gain: self.config.attraction_gain,
            max_speed: self.config.max_speed,
        })
    }

    /// Links between particles closer than the link distance.
    ///
    /// Only same-kind pairs and pairs involving an energy particle are
    /// linked; opacity falls off linearly to zero at the link distance.
    pub fn links(&self) -> Vec<Link> {
        let max = self.config.link_distance;
        let energy = ParticleKind::Energy.default_color();
        let all = self.particles.as_slice();
        let mut links = Vec::new();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                let involves_energy =
                    a.kind == ParticleKind::Energy || b.kind == ParticleKind::Energy;
                if a.kind != b.kind && !involves_energy {
                    continue;
                }
                let d = a.position.distance(b.position);
                if d >= max {
                    continue;
                }
                let base = if involves_energy { energy } else { a.color };
                links.push(Link {
                    from: a.position,
                    to: b.position,
                    color: Vec4::new(base.x, base.y, base.z, 1.0 - d / max),
                });
            }
        }
        links
    }
}

impl Scene for ParticleField {
    fn name(&self) -> &'static str {
        "particle field"
    }

    fn step(&mut self, step: &FrameStep) {
        let boundary = Boundary::surface(self.width, self.height);
        let attractor = self.attractor();
        for p in self.particles.iter_mut() {
            advance_free(p, step.scaled, &boundary, attractor.as_ref());
        }
    }

    fn draw(&self, out: &mut DrawList) {
        out.projection = Projection::Screen {
            width: self.width,
            height: self.height,
        };
        out.links.extend(self.links());
        for p in self.particles.iter() {
            out.sprite(p.position, p.size, p.color);
        }
    }

    fn reset(&mut self) {
        self.populate();
    }

    fn resize(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.width = width;
        self.height = height;
    }

    fn apply(&mut self, control: Control) -> bool {
        match control {
            Control::Pointer(pointer) => {
                self.set_pointer(pointer);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(count: usize) -> ParticleField {
        ParticleField::with_seed(
            FieldConfig {
                count,
                width: 400.0,
                height: 300.0,
                ..FieldConfig::default()
            },
            11,
        )
    }

    #[test]
    fn particles_start_inside_surface() {
        let f = field(200);
        assert_eq!(f.particles().len(), 200);
        for p in f.particles().iter() {
            assert!((0.0..=400.0).contains(&p.position.x));
            assert!((0.0..=300.0).contains(&p.position.y));
            assert_eq!(p.attracted, p.kind == ParticleKind::Energy);
        }
    }

    #[test]
    fn particles_stay_inside_surface_while_wrapping() {
        let mut f = field(100);
        for _ in 0..600 {
            f.step(&FrameStep::new(1.0 / 60.0, 3.0));
        }
        for p in f.particles().iter() {
            assert!((0.0..=400.0).contains(&p.position.x));
            assert!((0.0..=300.0).contains(&p.position.y));
        }
    }

    #[test]
    fn pointer_pulls_energy_particles_only() {
        let mut f = field(0);
        f.particles.push(
            Particle::free(ParticleKind::Energy, Vec3::new(100.0, 100.0, 0.0), Vec3::ZERO, 2.0, Vec4::ONE)
                .with_attraction(true),
        );
        f.particles.push(Particle::free(
            ParticleKind::Matter,
            Vec3::new(100.0, 100.0, 0.0),
            Vec3::ZERO,
            2.0,
            Vec4::ONE,
        ));
        assert!(f.apply(Control::Pointer(Some(Vec2::new(200.0, 100.0)))));
        f.step(&FrameStep::new(0.1, 1.0));
        let ps = f.particles().as_slice();
        assert!(ps[0].velocity().x > 0.0);
        assert_eq!(ps[1].velocity(), Vec3::ZERO);
    }

    #[test]
    fn links_follow_kind_rules_and_fade() {
        let mut f = field(0);
        let at = |kind: ParticleKind, x: f32| {
            Particle::free(kind, Vec3::new(x, 0.0, 0.0), Vec3::ZERO, 1.0, kind.default_color())
        };
        f.particles.push(at(ParticleKind::Matter, 0.0));
        f.particles.push(at(ParticleKind::Antimatter, 10.0));
        f.particles.push(at(ParticleKind::Matter, 50.0));
        f.particles.push(at(ParticleKind::Energy, 500.0));

        let links = f.links();
        // Matter pair 0-2 only: the antimatter is unlinked to matter and the
        // energy particle is out of range.
        assert_eq!(links.len(), 1);
        assert!((links[0].color.w - 0.5).abs() < 1e-6);
    }

    #[test]
    fn resize_moves_wrap_bounds() {
        let mut f = field(30);
        f.resize(100.0, 100.0);
        for _ in 0..300 {
            f.step(&FrameStep::new(1.0 / 30.0, 1.0));
        }
        for p in f.particles().iter() {
            assert!(p.position.x <= 100.0 && p.position.y <= 100.0);
        }
    }
}
