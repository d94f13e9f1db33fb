//! WGSL for sprites and links, plus the uniform block they share.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};

/// Both pipelines live in one module: `vs_sprite`/`fs_sprite` draw
/// instanced round billboards, `vs_line`/`fs_line` draw a line list.
pub const SHADER_SOURCE: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    sprite_scale: vec2<f32>,
    _pad: vec2<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct SpriteOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_sprite(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) center: vec3<f32>,
    @location(1) size: f32,
    @location(2) color: vec4<f32>,
) -> SpriteOutput {
    var quad_vertices = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );
    let quad_pos = quad_vertices[vertex_index];

    var clip_pos = uniforms.view_proj * vec4<f32>(center, 1.0);
    clip_pos.x += quad_pos.x * size * uniforms.sprite_scale.x;
    clip_pos.y += quad_pos.y * size * uniforms.sprite_scale.y;

    var out: SpriteOutput;
    out.clip_position = clip_pos;
    out.color = color;
    out.uv = quad_pos;
    return out;
}

@fragment
fn fs_sprite(in: SpriteOutput) -> @location(0) vec4<f32> {
    let dist = length(in.uv);
    if dist > 1.0 {
        discard;
    }
    let edge = 1.0 - smoothstep(0.7, 1.0, dist);
    return vec4<f32>(in.color.rgb, in.color.a * edge);
}

struct LineOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_line(
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
) -> LineOutput {
    var out: LineOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(position, 1.0);
    out.color = color;
    return out;
}

@fragment
fn fs_line(in: LineOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
    pub sprite_scale: [f32; 2],
    pub _padding: [f32; 2],
}

impl Uniforms {
    pub fn new(view_proj: Mat4, sprite_scale: Vec2) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            sprite_scale: sprite_scale.to_array(),
            _padding: [0.0; 2],
        }
    }
}
