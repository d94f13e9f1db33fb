//! Accumulated collision heat over the ring's footprint.
//!
//! A square grid of `resolution x resolution` sample points spans `extent`
//! world units in X and Z, centered on the origin. Heat only grows; each
//! deposit adds a linear falloff around the collision point.

use glam::{Vec2, Vec3};

/// Heat at which every color channel is saturated.
pub const MAX_HEAT: f32 = 10.0;

#[derive(Debug, Clone)]
pub struct HeatAccumulator {
    resolution: usize,
    extent: f32,
    cells: Vec<f32>,
}

impl HeatAccumulator {
    /// Create an empty grid. `resolution` is clamped to at least 2 samples per side.
    pub fn new(resolution: usize, extent: f32) -> Self {
        let resolution = resolution.max(2);
        Self {
            resolution,
            extent,
            cells: vec![0.0; resolution * resolution],
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Distance between neighbouring samples.
    pub fn spacing(&self) -> f32 {
        self.extent / (self.resolution - 1) as f32
    }

    /// World-space (x, z) position of sample `(ix, iz)`.
    pub fn cell_center(&self, ix: usize, iz: usize) -> Vec2 {
        let half = self.extent * 0.5;
        let step = self.spacing();
        Vec2::new(-half + ix as f32 * step, -half + iz as f32 * step)
    }

    pub fn heat(&self, ix: usize, iz: usize) -> f32 {
        self.cells
            .get(iz * self.resolution + ix)
            .copied()
            .unwrap_or(0.0)
    }

    /// Add heat around `position`: every sample closer than `radius` gains
    /// `(1 - d / radius) * intensity`, clamped at [`MAX_HEAT`].
    pub fn deposit(&mut self, position: Vec3, intensity: f32, radius: f32) {
        if radius <= 0.0 {
            return;
        }
        let origin = Vec2::new(position.x, position.z);
        for iz in 0..self.resolution {
            for ix in 0..self.resolution {
                let d = self.cell_center(ix, iz).distance(origin);
                if d >= radius {
                    continue;
                }
                let cell = &mut self.cells[iz * self.resolution + ix];
                *cell = (*cell + (1.0 - d / radius) * intensity).min(MAX_HEAT);
            }
        }
    }

    /// Display color for a heat value.
    pub fn color(heat: f32) -> Vec3 {
        Vec3::new(
            (heat * 0.5).min(1.0),
            (heat * 0.3).min(1.0),
            (heat * 0.1).min(1.0),
        )
    }

    /// Sum of all cell values.
    pub fn total(&self) -> f32 {
        self.cells.iter().sum()
    }

    /// Every sample as `(center, heat)`.
    pub fn samples(&self) -> impl Iterator<Item = (Vec2, f32)> + '_ {
        (0..self.resolution).flat_map(move |iz| {
            (0..self.resolution).map(move |ix| (self.cell_center(ix, iz), self.heat(ix, iz)))
        })
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_spans_extent_centered_on_origin() {
        let heat = HeatAccumulator::new(40, 400.0);
        assert_eq!(heat.cell_center(0, 0), Vec2::new(-200.0, -200.0));
        let far = heat.cell_center(39, 39);
        assert!((far - Vec2::new(200.0, 200.0)).length() < 1e-3);
    }

    #[test]
    fn deposit_only_affects_influence_radius() {
        let mut heat = HeatAccumulator::new(40, 400.0);
        heat.deposit(Vec3::new(200.0, 0.0, 0.0), 1.0, 50.0);
        // Sample at (200, 0) region is hot, the opposite side is untouched.
        assert!(heat.heat(39, 19) > 0.0 || heat.heat(39, 20) > 0.0);
        assert_eq!(heat.heat(0, 19), 0.0);
        assert!(heat.total() > 0.0);
    }

    #[test]
    fn heat_never_decreases_and_clamps() {
        let mut heat = HeatAccumulator::new(3, 2.0);
        let mut last = 0.0;
        for _ in 0..100 {
            heat.deposit(Vec3::ZERO, 1.0, 10.0);
            let h = heat.heat(1, 1);
            assert!(h >= last);
            last = h;
        }
        assert_eq!(last, MAX_HEAT);
    }

    #[test]
    fn color_channels_saturate_at_different_rates() {
        assert_eq!(HeatAccumulator::color(0.0), Vec3::ZERO);
        let c = HeatAccumulator::color(2.0);
        assert_eq!(c.x, 1.0);
        assert!((c.y - 0.6).abs() < 1e-6);
        assert!((c.z - 0.2).abs() < 1e-6);
        assert_eq!(HeatAccumulator::color(MAX_HEAT), Vec3::ONE);
    }
}
