//! Proximity-based collision detection.
//!
//! Tests run on post-integration positions of the current frame only; particles
//! whose paths cross between two frames without ever being within range are
//! not detected.

use glam::Vec3;

use crate::particle::Particle;

/// A detected collision between two particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// Midpoint of the two particles.
    pub position: Vec3,
    /// Index of the first participant in its store.
    pub first: usize,
    /// Index of the second participant in its store.
    pub second: usize,
    /// Chamber that accepted the collision, for chamber-gated detection.
    pub chamber: Option<usize>,
}

/// A circular detection zone on the ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chamber {
    pub center: Vec3,
    pub radius: f32,
}

impl Chamber {
    pub fn contains(&self, point: Vec3) -> bool {
        within(point, self.center, self.radius)
    }
}

/// `true` when `a` and `b` are closer than `threshold`.
///
/// Compares squared distances, so coincident points count as within any
/// positive threshold.
#[inline]
pub fn within(a: Vec3, b: Vec3, threshold: f32) -> bool {
    a.distance_squared(b) < threshold * threshold
}

/// Midpoint of two positions; independent of argument order.
#[inline]
pub fn midpoint(a: Vec3, b: Vec3) -> Vec3 {
    (a + b) * 0.5
}

/// Chamber-gated pairwise scan between two opposing beams.
///
/// For every visible pair `(a, b)` closer than `merge_distance`, the pair's
/// midpoint is tested against `chambers` in order and the first chamber that
/// contains it accepts the collision. A particle takes part in at most one
/// collision per scan; the first qualifying pair in `(a, b)` iteration order
/// wins.
pub fn detect_ring_collisions(
    beam_a: &[Particle],
    beam_b: &[Particle],
    chambers: &[Chamber],
    merge_distance: f32,
) -> Vec<CollisionEvent> {
    let mut events = Vec::new();
    let mut taken_b = vec![false; beam_b.len()];

    for (i, a) in beam_a.iter().enumerate() {
        if !a.visible {
            continue;
        }
        for (j, b) in beam_b.iter().enumerate() {
            if taken_b[j] || !b.visible {
                continue;
            }
            if !within(a.position, b.position, merge_distance) {
                continue;
            }
            let center = midpoint(a.position, b.position);
            let Some(chamber) = chambers.iter().position(|c| c.contains(center)) else {
                continue;
            };
            events.push(CollisionEvent {
                position: center,
                first: i,
                second: j,
                chamber: Some(chamber),
            });
            taken_b[j] = true;
            break;
        }
    }

    events
}

/// One-shot detector for a single matter/antimatter pair.
///
/// Fires at most once per run: after the first contact it stays latched until
/// [`PairDetector::reset`].
#[derive(Debug, Default, Clone)]
pub struct PairDetector {
    collided: bool,
}

impl PairDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_collided(&self) -> bool {
        self.collided
    }

    pub fn reset(&mut self) {
        self.collided = false;
    }

    /// Test two particles at store indices `first`/`second` for contact
    /// (distance below the sum of their radii).
    pub fn check(
        &mut self,
        (first, a): (usize, &Particle),
        (second, b): (usize, &Particle),
    ) -> Option<CollisionEvent> {
        if self.collided {
            return None;
        }
        if !within(a.position, b.position, a.size + b.size) {
            return None;
        }
        self.collided = true;
        Some(CollisionEvent {
            position: midpoint(a.position, b.position),
            first,
            second,
            chamber: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::{Direction, ParticleKind};
    use glam::Vec4;

    fn at(angle: f32, direction: Direction) -> Particle {
        Particle::orbiting(ParticleKind::Matter, 200.0, angle, 0.01, direction, 1.5, Vec4::ONE)
    }

    fn chambers() -> Vec<Chamber> {
        vec![
            Chamber {
                center: Vec3::new(200.0, 0.0, 0.0),
                radius: 30.0,
            },
            Chamber {
                center: Vec3::new(-200.0, 0.0, 0.0),
                radius: 30.0,
            },
        ]
    }

    #[test]
    fn close_pair_inside_chamber_collides_at_midpoint() {
        let a = [at(0.005, Direction::Forward)];
        let b = [at(-0.005, Direction::Reverse)];
        let events = detect_ring_collisions(&a, &b, &chambers(), 5.0);
        assert_eq!(events.len(), 1);
        let e = events[0];
        assert_eq!((e.first, e.second, e.chamber), (0, 0, Some(0)));
        assert!(e.position.z.abs() < 1e-4);
    }

    #[test]
    fn close_pair_outside_chambers_is_ignored() {
        let a = [at(1.5, Direction::Forward)];
        let b = [at(1.51, Direction::Reverse)];
        assert!(detect_ring_collisions(&a, &b, &chambers(), 5.0).is_empty());
    }

    #[test]
    fn hidden_particles_never_collide() {
        let a = [at(0.0, Direction::Forward)];
        let mut b = [at(0.0, Direction::Reverse)];
        b[0].visible = false;
        assert!(detect_ring_collisions(&a, &b, &chambers(), 5.0).is_empty());
    }

    #[test]
    fn each_particle_collides_at_most_once_per_scan() {
        let a = [at(0.0, Direction::Forward), at(0.001, Direction::Forward)];
        let b = [at(0.0, Direction::Reverse)];
        let events = detect_ring_collisions(&a, &b, &chambers(), 5.0);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].first, 0);
    }

    #[test]
    fn coincident_particles_collide() {
        let a = Particle::free(ParticleKind::Matter, Vec3::ONE, Vec3::ZERO, 1.0, Vec4::ONE);
        let b = Particle::free(ParticleKind::Antimatter, Vec3::ONE, Vec3::ZERO, 1.0, Vec4::ONE);
        let mut detector = PairDetector::new();
        let event = detector.check((0, &a), (1, &b)).expect("coincident pair collides");
        assert_eq!(event.position, Vec3::ONE);
    }

    #[test]
    fn pair_detector_fires_once() {
        let a = Particle::free(ParticleKind::Matter, Vec3::ZERO, Vec3::ZERO, 20.0, Vec4::ONE);
        let b = Particle::free(ParticleKind::Antimatter, Vec3::X * 30.0, Vec3::ZERO, 20.0, Vec4::ONE);
        let mut detector = PairDetector::new();
        assert!(detector.check((0, &a), (1, &b)).is_some());
        assert!(detector.has_collided());
        assert!(detector.check((0, &a), (1, &b)).is_none());
        detector.reset();
        assert!(detector.check((0, &a), (1, &b)).is_some());
    }

    #[test]
    fn swapped_pair_collides_at_same_point() {
        let a = Particle::free(ParticleKind::Matter, Vec3::new(3.0, 7.0, 0.0), Vec3::ZERO, 20.0, Vec4::ONE);
        let b = Particle::free(ParticleKind::Antimatter, Vec3::new(31.5, 2.25, 0.0), Vec3::ZERO, 20.0, Vec4::ONE);
        let forward = PairDetector::new().check((0, &a), (1, &b)).expect("overlap");
        let swapped = PairDetector::new().check((1, &b), (0, &a)).expect("overlap");
        assert_eq!(forward.position, swapped.position);

        let ring_a = [at(0.004, Direction::Forward)];
        let ring_b = [at(-0.006, Direction::Reverse)];
        let ab = detect_ring_collisions(&ring_a, &ring_b, &chambers(), 5.0);
        let ba = detect_ring_collisions(&ring_b, &ring_a, &chambers(), 5.0);
        assert_eq!(ab[0].position, ba[0].position);
    }

    #[test]
    fn pair_detector_requires_overlap() {
        let a = Particle::free(ParticleKind::Matter, Vec3::ZERO, Vec3::ZERO, 20.0, Vec4::ONE);
        let b = Particle::free(ParticleKind::Antimatter, Vec3::X * 40.0, Vec3::ZERO, 20.0, Vec4::ONE);
        let mut detector = PairDetector::new();
        assert!(detector.check((0, &a), (1, &b)).is_none());
        assert!(!detector.has_collided());
    }
}
