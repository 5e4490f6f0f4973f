//! Closed-form landing prediction for unguided shells.
//!
//! Shells fly under constant gravity from the muzzle and are assumed to land
//! on flat ground at height zero. Obstacles are ignored.

use glam::Vec3;

/// Predicts where a shell launched from `origin` with `velocity` meets the
/// ground plane `y = 0`.
///
/// Solves `origin.y + velocity.y·t + ½·gravity·t² = 0` for the first
/// positive root and advances the horizontal velocity for that long. When the
/// quadratic has no real solution (non-positive discriminant) or gravity is
/// zero, the launch point itself is returned.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use skirmish::ballistics::landing_point;
/// // Dropped horizontally from 4.905 m at 10 m/s: one second of flight.
/// let land = landing_point(Vec3::new(0.0, 4.905, 0.0), Vec3::new(0.0, 0.0, 10.0), -9.81);
/// assert!((land.z - 10.0).abs() < 1e-3);
/// assert!(land.y.abs() < f32::EPSILON);
/// ```
#[must_use]
pub fn landing_point(origin: Vec3, velocity: Vec3, gravity: f32) -> Vec3 {
    let a = 0.5 * gravity;
    let b = velocity.y;
    let c = origin.y;

    if a == 0.0 {
        return origin;
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant <= 0.0 {
        return origin;
    }

    let root = discriminant.sqrt();
    let first = (-b + root) / (2.0 * a);
    let second = (-b - root) / (2.0 * a);
    let flight_time = if first > 0.0 { first } else { second };

    let mut landing = origin + Vec3::new(velocity.x, 0.0, velocity.z) * flight_time;
    landing.y = 0.0;
    landing
}
