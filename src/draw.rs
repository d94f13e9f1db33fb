//! Per-frame drawing output.
//!
//! Scenes describe what they want on screen as a [`DrawList`] of round
//! sprites and line segments. The GPU layer turns it into instance and vertex
//! buffers; nothing here touches the GPU, so scenes stay testable headless.

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};

/// A filled, round particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub position: Vec3,
    /// Radius in world units (or pixels for screen-space scenes).
    pub size: f32,
    /// Linear RGBA; alpha carries fade.
    pub color: Vec4,
}

/// A straight line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub from: Vec3,
    pub to: Vec3,
    pub color: Vec4,
}

/// How scene coordinates map to the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// 3D world viewed through the orbit camera.
    Orbit,
    /// 2D pixel coordinates, origin top-left, y down.
    Screen { width: f32, height: f32 },
}

#[derive(Debug, Clone)]
pub struct DrawList {
    pub sprites: Vec<Sprite>,
    pub links: Vec<Link>,
    pub clear_color: Vec4,
    pub projection: Projection,
}

impl Default for DrawList {
    fn default() -> Self {
        Self {
            sprites: Vec::new(),
            links: Vec::new(),
            clear_color: Vec4::new(0.02, 0.02, 0.05, 1.0),
            projection: Projection::Orbit,
        }
    }
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty the list, keeping allocations.
    pub fn clear(&mut self) {
        self.sprites.clear();
        self.links.clear();
    }

    pub fn sprite(&mut self, position: Vec3, size: f32, color: Vec4) {
        self.sprites.push(Sprite {
            position,
            size,
            color,
        });
    }

    pub fn link(&mut self, from: Vec3, to: Vec3, color: Vec4) {
        self.links.push(Link { from, to, color });
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty() && self.links.is_empty()
    }

    /// Sprite data laid out for the instance buffer.
    pub fn sprite_instances(&self) -> Vec<SpriteInstance> {
        self.sprites.iter().map(SpriteInstance::from).collect()
    }

    /// Two vertices per link, laid out for a line-list vertex buffer.
    pub fn line_vertices(&self) -> Vec<LineVertex> {
        self.links
            .iter()
            .flat_map(|l| {
                [
                    LineVertex {
                        position: l.from.to_array(),
                        color: l.color.to_array(),
                    },
                    LineVertex {
                        position: l.to.to_array(),
                        color: l.color.to_array(),
                    },
                ]
            })
            .collect()
    }
}

/// GPU layout of one sprite instance.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SpriteInstance {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 4],
}

impl From<&Sprite> for SpriteInstance {
    fn from(s: &Sprite) -> Self {
        Self {
            position: s.position.to_array(),
            size: s.size,
            color: s.color.to_array(),
        }
    }
}

/// GPU layout of one line vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_match_shader_strides() {
        assert_eq!(std::mem::size_of::<SpriteInstance>(), 32);
        assert_eq!(std::mem::size_of::<LineVertex>(), 28);
    }

    #[test]
    fn links_expand_to_vertex_pairs() {
        let mut list = DrawList::new();
        list.link(Vec3::ZERO, Vec3::X, Vec4::ONE);
        list.link(Vec3::Y, Vec3::Z, Vec4::ONE);
        let verts = list.line_vertices();
        assert_eq!(verts.len(), 4);
        assert_eq!(verts[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(verts[2].position, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn clear_keeps_projection() {
        let mut list = DrawList::new();
        list.projection = Projection::Screen {
            width: 10.0,
            height: 10.0,
        };
        list.sprite(Vec3::ZERO, 1.0, Vec4::ONE);
        list.clear();
        assert!(list.is_empty());
        assert!(matches!(list.projection, Projection::Screen { .. }));
    }
}
