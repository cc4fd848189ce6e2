use std::borrow::Cow;

use pattern::MAX_CLICKS;
use wgpu::naga::ShaderStage;

/// Compiles the static full-screen triangle vertex shader.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("fullscreen triangle vertex"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(VERTEX_SHADER_GLSL),
            stage: ShaderStage::Vertex,
            defines: &[],
        },
    })
}

pub(crate) fn compile_fragment_shader(
    device: &wgpu::Device,
    label: &str,
    source: String,
) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(source),
            stage: ShaderStage::Fragment,
            defines: &[],
        },
    })
}

/// The pattern shader with the click capacity baked in.
///
/// The uniform block layout must match `PixelUniforms` in `gpu/uniforms.rs`.
pub(crate) fn base_fragment_source() -> String {
    format!("#version 450\n#define MAX_CLICKS {MAX_CLICKS}\n{BASE_FRAGMENT_BODY}")
}

pub(crate) fn liquid_fragment_source() -> String {
    format!("{POST_HEADER}{LIQUID_FRAGMENT_BODY}")
}

pub(crate) fn noise_fragment_source() -> String {
    format!("{POST_HEADER}{NOISE_FRAGMENT_BODY}")
}

const BASE_FRAGMENT_BODY: &str = r"
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 outColor;

layout(std140, set = 0, binding = 0) uniform PixelParams {
    vec4 color_time;
    vec4 resolution_pixel;
    vec4 pattern;
    vec4 ripple;
    vec4 clicks[MAX_CLICKS];
} ubo;

const int SHAPE_CIRCLE = 1;
const int SHAPE_TRIANGLE = 2;
const int SHAPE_DIAMOND = 3;

const float DAMP_TIME = 1.0;
const float DAMP_RADIUS = 10.0;

float bayer2(vec2 a) {
    a = floor(a);
    return fract(a.x / 2.0 + a.y * a.y * 0.75);
}

float bayer4(vec2 a) {
    return bayer2(0.5 * a) * 0.25 + bayer2(a);
}

float bayer8(vec2 a) {
    return bayer4(0.5 * a) * 0.25 + bayer2(a);
}

float hash11(float n) {
    return fract(sin(n) * 43758.5453);
}

float lattice(vec3 ip, vec3 corner) {
    return hash11(dot(ip + corner, vec3(1.0, 57.0, 113.0)));
}

float vnoise(vec3 p) {
    vec3 ip = floor(p);
    vec3 fp = fract(p);
    vec3 w = fp * fp * fp * (fp * (fp * 6.0 - 15.0) + 10.0);
    float x00 = mix(lattice(ip, vec3(0.0, 0.0, 0.0)), lattice(ip, vec3(1.0, 0.0, 0.0)), w.x);
    float x10 = mix(lattice(ip, vec3(0.0, 1.0, 0.0)), lattice(ip, vec3(1.0, 1.0, 0.0)), w.x);
    float x01 = mix(lattice(ip, vec3(0.0, 0.0, 1.0)), lattice(ip, vec3(1.0, 0.0, 1.0)), w.x);
    float x11 = mix(lattice(ip, vec3(0.0, 1.0, 1.0)), lattice(ip, vec3(1.0, 1.0, 1.0)), w.x);
    float y0 = mix(x00, x10, w.y);
    float y1 = mix(x01, x11, w.y);
    return mix(y0, y1, w.z) * 2.0 - 1.0;
}

float fbm(vec2 uv, float t, float scale) {
    vec3 p = vec3(uv * scale, t);
    float amp = 1.0;
    float freq = 1.0;
    float sum = 1.0;
    for (int i = 0; i < 5; ++i) {
        sum += amp * vnoise(p * freq);
        freq *= 1.25;
        amp *= 1.0;
    }
    return sum * 0.5 + 0.5;
}

float mask_circle(vec2 p, float cov) {
    float r = sqrt(max(cov, 0.0)) * 0.25;
    float d = length(p - 0.5) - r;
    float aa = max(0.5 * fwidth(d), 1e-6);
    return cov * (1.0 - smoothstep(-aa, aa, d * 2.0));
}

float mask_triangle(vec2 p, vec2 id, float cov) {
    if (mod(id.x + id.y, 2.0) > 0.5) {
        p.x = 1.0 - p.x;
    }
    float r = sqrt(max(cov, 0.0));
    float d = p.y - r * (1.0 - p.x);
    float aa = max(fwidth(d), 1e-6);
    return cov * clamp(0.5 - d / aa, 0.0, 1.0);
}

float mask_diamond(vec2 p, float cov) {
    float r = sqrt(max(cov, 0.0)) * 0.564;
    return step(abs(p.x - 0.49) + abs(p.y - 0.49), r);
}

void main() {
    vec2 resolution = ubo.resolution_pixel.xy;
    float pixel_size = ubo.resolution_pixel.z;
    float scale = ubo.resolution_pixel.w;
    float time = ubo.color_time.w;

    // bottom-left origin, matching click positions
    vec2 screen = vec2(gl_FragCoord.x, resolution.y - gl_FragCoord.y);
    vec2 frag = screen - resolution * 0.5;
    float aspect = resolution.x / resolution.y;

    vec2 pixel_id = floor(frag / pixel_size);
    vec2 pixel_uv = fract(frag / pixel_size);

    float cell = 8.0 * pixel_size;
    vec2 uv = floor(frag / cell) * cell / resolution * vec2(aspect, 1.0);

    float feed = fbm(uv, time * 0.05, scale) * 0.5 - 0.65;
    feed += (ubo.pattern.x - 0.5) * 0.3;

    if (ubo.ripple.w > 0.5) {
        for (int i = 0; i < MAX_CLICKS; ++i) {
            vec4 click = ubo.clicks[i];
            if (click.w < 0.5) {
                continue;
            }
            vec2 origin = ((click.xy - resolution * 0.5 - cell * 0.5) / resolution) * vec2(aspect, 1.0);
            float t = max(time - click.z, 0.0);
            float r = distance(uv, origin);
            float offset = (r - ubo.ripple.x * t) / ubo.ripple.y;
            float ring = exp(-offset * offset);
            float atten = exp(-DAMP_TIME * t) * exp(-DAMP_RADIUS * r);
            feed = max(feed, ring * atten * ubo.ripple.z);
        }
    }

    float bw = step(0.5, feed + bayer8(frag / pixel_size) - 0.5);
    float h = fract(sin(dot(pixel_id, vec2(127.1, 311.7))) * 43758.5453);
    float coverage = bw * (1.0 + (h - 0.5) * ubo.pattern.y);

    int shape = int(ubo.pattern.w + 0.5);
    float m = coverage;
    if (shape == SHAPE_CIRCLE) {
        m = mask_circle(pixel_uv, coverage);
    } else if (shape == SHAPE_TRIANGLE) {
        m = mask_triangle(pixel_uv, pixel_id, coverage);
    } else if (shape == SHAPE_DIAMOND) {
        m = mask_diamond(pixel_uv, coverage);
    }

    float edge_fade = ubo.pattern.z;
    if (edge_fade > 0.0) {
        vec2 norm = screen / resolution;
        float edge = min(min(norm.x, norm.y), min(1.0 - norm.x, 1.0 - norm.y));
        m *= smoothstep(0.0, edge_fade, edge);
    }

    outColor = vec4(ubo.color_time.rgb, m);
}
";

/// Shared bindings of the post passes. `params` is (time, strength, wobble
/// frequency, grain amount); the layout must match `PostUniforms`.
const POST_HEADER: &str = r"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 outColor;

layout(std140, set = 0, binding = 0) uniform PostParams {
    vec4 params;
} post;

layout(set = 0, binding = 1) uniform texture2D source_texture;
layout(set = 0, binding = 2) uniform sampler source_sampler;

// v_uv has a bottom-left origin; texture rows start at the top.
vec2 to_texture(vec2 uv) {
    return vec2(uv.x, 1.0 - uv.y);
}
";

const LIQUID_FRAGMENT_BODY: &str = r"
layout(set = 0, binding = 3) uniform texture2D trail_texture;
layout(set = 0, binding = 4) uniform sampler trail_sampler;

void main() {
    vec2 uv = v_uv;
    vec4 tex = texture(sampler2D(trail_texture, trail_sampler), to_texture(uv));
    float vx = tex.r * 2.0 - 1.0;
    float vy = tex.g * 2.0 - 1.0;
    float intensity = tex.b;
    float wave = 0.5 + 0.5 * sin(post.params.x * post.params.z + intensity * 6.2831853);
    uv += vec2(vx, vy) * (post.params.y * intensity * wave);
    outColor = texture(sampler2D(source_texture, source_sampler), to_texture(uv));
}
";

const NOISE_FRAGMENT_BODY: &str = r"
float hash(vec2 p) {
    return fract(sin(dot(p, vec2(127.1, 311.7))) * 43758.5453);
}

void main() {
    vec4 color = texture(sampler2D(source_texture, source_sampler), to_texture(v_uv));
    float n = hash(floor(v_uv * vec2(1920.0, 1080.0)) + floor(post.params.x * 60.0));
    float g = (n - 0.5) * post.params.w;
    outColor = color + vec4(vec3(g), 0.0);
}
";

/// Minimal full-screen triangle vertex shader.
const VERTEX_SHADER_GLSL: &str = r"#version 450
layout(location = 0) out vec2 v_uv;

const vec2 positions[3] = vec2[3](
    vec2(-1.0, -3.0),
    vec2(3.0, 1.0),
    vec2(-1.0, 1.0)
);

void main() {
    uint vertex_index = uint(gl_VertexIndex);
    vec2 pos = positions[vertex_index];
    v_uv = pos * 0.5 + vec2(0.5, 0.5);
    gl_Position = vec4(pos, 0.0, 1.0);
}
";

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::naga::front::glsl::{Frontend, Options};

    fn parse(stage: ShaderStage, source: &str) {
        let mut frontend = Frontend::default();
        if let Err(err) = frontend.parse(&Options::from(stage), source) {
            panic!("shader failed to parse: {err:?}\n{source}");
        }
    }

    #[test]
    fn shaders_parse() {
        parse(ShaderStage::Vertex, VERTEX_SHADER_GLSL);
        parse(ShaderStage::Fragment, &base_fragment_source());
        parse(ShaderStage::Fragment, &liquid_fragment_source());
        parse(ShaderStage::Fragment, &noise_fragment_source());
    }

    #[test]
    fn click_capacity_is_baked_into_the_base_shader() {
        let source = base_fragment_source();
        assert!(source.starts_with("#version 450\n"));
        assert!(source.contains(&format!("#define MAX_CLICKS {MAX_CLICKS}")));
    }
}
