//! 2D vector helpers shared by physics, movement and AI
//!
//! World positions are `nalgebra::Vector2<f32>`; X runs goal to goal, Y runs
//! sideline to sideline.

use nalgebra::Vector2;

pub type Vec2 = Vector2<f32>;

#[inline]
pub fn vec2(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y)
}

#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).norm()
}

/// Unit vector, or zero for degenerate input
#[inline]
pub fn normalize_or_zero(v: Vec2) -> Vec2 {
    let len = v.norm();
    if len > f32::EPSILON && len.is_finite() {
        v / len
    } else {
        Vec2::zeros()
    }
}

/// Direction from `from` toward `to`
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    normalize_or_zero(to - from)
}

/// Clamp a vector's length to `max`
#[inline]
pub fn clamp_length(v: Vec2, max: f32) -> Vec2 {
    let len = v.norm();
    if len > max && len > f32::EPSILON {
        v * (max / len)
    } else {
        v
    }
}

/// Rotate counter-clockwise by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    vec2(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

#[inline]
pub fn lerp(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Shortest distance from `p` to segment `a`-`b`
pub fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq <= f32::EPSILON {
        return distance(p, a);
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    distance(p, a + ab * t)
}

/// Replace NaN/inf components and cap length at 1
pub fn sanitize_stick(v: Vec2) -> Vec2 {
    if !v.x.is_finite() || !v.y.is_finite() {
        return Vec2::zeros();
    }
    clamp_length(v, 1.0)
}
