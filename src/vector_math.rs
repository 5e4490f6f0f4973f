//! Flat-plane vector helpers.
//! The arena is top-down: headings, distances and turns ignore the vertical
//! (`y`) axis.
use glam::{Quat, Vec3};

/// Projects a vector onto the ground plane by zeroing its vertical component.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use skirmish::vector_math::flatten;
/// assert_eq!(flatten(Vec3::new(1.0, 5.0, -2.0)), Vec3::new(1.0, 0.0, -2.0));
/// ```
#[must_use]
pub const fn flatten(vector: Vec3) -> Vec3 {
    Vec3::new(vector.x, 0.0, vector.z)
}

/// Ground-plane distance between two points.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use skirmish::vector_math::flat_distance;
/// let d = flat_distance(Vec3::new(0.0, 3.0, 0.0), Vec3::new(3.0, -1.0, 4.0));
/// assert!((d - 5.0).abs() < 1e-6);
/// ```
#[must_use]
pub fn flat_distance(from: Vec3, to: Vec3) -> f32 {
    flatten(to - from).length()
}

/// Unit ground-plane direction of `vector`, or zero for degenerate input.
///
/// Non-finite and zero-length vectors yield [`Vec3::ZERO`] rather than NaN.
#[must_use]
pub fn flat_direction(vector: Vec3) -> Vec3 {
    let flat = flatten(vector);
    if !flat.is_finite() {
        return Vec3::ZERO;
    }
    flat.try_normalize().unwrap_or(Vec3::ZERO)
}

/// Signed rotation about +Y, in radians, that turns `facing` onto `direction`.
///
/// Both vectors are flattened first. Positive values turn counter-clockwise
/// when viewed from above, matching [`Quat::from_rotation_y`].
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use skirmish::vector_math::signed_yaw_between;
/// let angle = signed_yaw_between(Vec3::Z, Vec3::X);
/// assert!((angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
/// ```
#[must_use]
pub fn signed_yaw_between(facing: Vec3, direction: Vec3) -> f32 {
    let from = flatten(facing);
    let to = flatten(direction);
    from.cross(to).y.atan2(from.dot(to))
}

/// Rotates `vector` about the vertical axis by `angle` radians.
#[must_use]
pub fn rotate_about_up(vector: Vec3, angle: f32) -> Vec3 {
    Quat::from_rotation_y(angle) * vector
}
