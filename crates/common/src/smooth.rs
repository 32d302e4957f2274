//! Frame-rate independent exponential damping.
//!
//! Every animated quantity on the wall moves toward its target with the same
//! law: `next = current + (target - current) * (1 - exp(-dt / tau))`. Splitting
//! an interval into many short frames or a few long ones lands on the same
//! value, the blend factor stays in `[0, 1)` so nothing overshoots, and a value
//! already at its target is left untouched.

use crate::Color;
use glam::{Quat, Vec2, Vec3};

/// Blend factor for one step of `dt` seconds with time constant `tau`.
///
/// `tau <= 0` means "snap", `dt <= 0` means "no motion".
pub fn damp_factor(tau: f32, dt: f32) -> f32 {
    if dt.is_nan() || dt <= 0.0 {
        return 0.0;
    }
    if tau.is_nan() || tau <= 0.0 {
        return 1.0;
    }
    1.0 - (-dt / tau).exp()
}

pub fn damp(current: f32, target: f32, tau: f32, dt: f32) -> f32 {
    current + (target - current) * damp_factor(tau, dt)
}

pub fn damp_vec2(current: Vec2, target: Vec2, tau: f32, dt: f32) -> Vec2 {
    current + (target - current) * damp_factor(tau, dt)
}

pub fn damp_vec3(current: Vec3, target: Vec3, tau: f32, dt: f32) -> Vec3 {
    current + (target - current) * damp_factor(tau, dt)
}

/// Spherical blend toward `target` with the exponential factor.
pub fn damp_quat(current: Quat, target: Quat, tau: f32, dt: f32) -> Quat {
    if current == target {
        return current;
    }
    let k = damp_factor(tau, dt);
    if k <= 0.0 {
        return current;
    }
    if k >= 1.0 {
        return target;
    }
    current.slerp(target, k).normalize()
}

pub fn damp_color(current: Color, target: Color, tau: f32, dt: f32) -> Color {
    Color(damp_vec3(current.0, target.0, tau, dt))
}
