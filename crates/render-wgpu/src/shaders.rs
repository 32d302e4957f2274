/// WGSL for the whole wall pass.
///
/// `vs_panel`/`fs_panel` draw instanced unit boxes; an instance with
/// `params.x > 0.5` skips lighting. `vs_grid`/`fs_grid` draw coloured floor
/// lines. Both share the camera uniform at group 0.
pub const WALL_SHADER: &str = r#"
struct Camera {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;

struct BoxVertex {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct PanelInstance {
    @location(2) m0: vec4<f32>,
    @location(3) m1: vec4<f32>,
    @location(4) m2: vec4<f32>,
    @location(5) m3: vec4<f32>,
    @location(6) color: vec4<f32>,
    @location(7) params: vec4<f32>,
};

struct PanelOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) color: vec4<f32>,
    @location(2) unlit: f32,
};

@vertex
fn vs_panel(v: BoxVertex, inst: PanelInstance) -> PanelOut {
    let model = mat4x4<f32>(inst.m0, inst.m1, inst.m2, inst.m3);
    var out: PanelOut;
    out.clip = camera.view_proj * model * vec4<f32>(v.position, 1.0);
    out.normal = normalize((model * vec4<f32>(v.normal, 0.0)).xyz);
    out.color = inst.color;
    out.unlit = inst.params.x;
    return out;
}

@fragment
fn fs_panel(in: PanelOut) -> @location(0) vec4<f32> {
    if (in.unlit > 0.5) {
        return in.color;
    }
    let key = normalize(vec3<f32>(0.2, 0.6, 1.0));
    let shade = 0.45 + 0.55 * max(dot(in.normal, key), 0.0);
    return vec4<f32>(in.color.rgb * shade, in.color.a);
}

struct GridPoint {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct GridOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_grid(p: GridPoint) -> GridOut {
    var out: GridOut;
    out.clip = camera.view_proj * vec4<f32>(p.position, 1.0);
    out.color = p.color;
    return out;
}

@fragment
fn fs_grid(in: GridOut) -> @location(0) vec4<f32> {
    return in.color;
}
"#;
