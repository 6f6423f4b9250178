//! WGSL sources for the GPU canvas.
//!
//! All canvas-space shaders share group 0 (`Globals`) so the bind group
//! survives pipeline switches inside the canvas pass.

/// Instanced circles and rectangles. One instance per shape, six vertices
/// per instance.
pub const SHAPE_SHADER: &str = r#"
struct Globals {
    viewport: vec2<f32>,
    _pad: vec2<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

struct ShapeIn {
    @location(0) center: vec2<f32>,
    @location(1) half_size: vec2<f32>,
    @location(2) color: vec4<f32>,
    @location(3) kind: u32,
};

struct VertexOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) local: vec2<f32>,
    @location(1) color: vec4<f32>,
    @location(2) @interpolate(flat) kind: u32,
    @location(3) @interpolate(flat) radius: f32,
};

fn to_clip(pixel: vec2<f32>) -> vec4<f32> {
    let x = pixel.x / globals.viewport.x * 2.0 - 1.0;
    let y = 1.0 - pixel.y / globals.viewport.y * 2.0;
    return vec4<f32>(x, y, 0.0, 1.0);
}

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32, shape: ShapeIn) -> VertexOut {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );

    // Circles get a pixel of padding for the antialiased rim.
    let pad = select(0.0, 1.0, shape.kind == 0u);
    let local = corners[vertex_index] * (shape.half_size + vec2<f32>(pad, pad));

    var out: VertexOut;
    out.clip = to_clip(shape.center + local);
    out.local = local;
    out.color = shape.color;
    out.kind = shape.kind;
    out.radius = shape.half_size.x;
    return out;
}

@fragment
fn fs_main(in: VertexOut) -> @location(0) vec4<f32> {
    var coverage = 1.0;
    if in.kind == 0u {
        coverage = clamp(in.radius + 0.5 - length(in.local), 0.0, 1.0);
    }
    if coverage <= 0.0 {
        discard;
    }
    return vec4<f32>(in.color.rgb, in.color.a * coverage);
}
"#;

/// Line list with one colour per draw, supplied through a dynamic-offset
/// uniform at group 1.
pub const LINE_SHADER: &str = r#"
struct Globals {
    viewport: vec2<f32>,
    _pad: vec2<f32>,
};

struct LineStyle {
    color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

@group(1) @binding(0)
var<uniform> style: LineStyle;

@vertex
fn vs_main(@location(0) position: vec2<f32>) -> @builtin(position) vec4<f32> {
    let x = position.x / globals.viewport.x * 2.0 - 1.0;
    let y = 1.0 - position.y / globals.viewport.y * 2.0;
    return vec4<f32>(x, y, 0.0, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return style.color;
}
"#;

/// Draws the offscreen canvas onto the window as a tilted quad.
pub const BLIT_SHADER: &str = r#"
struct Blit {
    transform: mat4x4<f32>,
};

@group(0) @binding(0)
var canvas: texture_2d<f32>;

@group(0) @binding(1)
var canvas_sampler: sampler;

@group(0) @binding(2)
var<uniform> blit: Blit;

struct VertexOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> VertexOut {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );
    let corner = corners[vertex_index];

    var out: VertexOut;
    out.clip = blit.transform * vec4<f32>(corner, 0.0, 1.0);
    out.uv = vec2<f32>((corner.x + 1.0) * 0.5, (1.0 - corner.y) * 0.5);
    return out;
}

@fragment
fn fs_main(in: VertexOut) -> @location(0) vec4<f32> {
    return textureSample(canvas, canvas_sampler, in.uv);
}
"#;
