//! Involute-of-a-circle helpers

use crate::errors::GearError;
use crate::float_types::{Real, tolerance};
use nalgebra::Point2;

/// The involute function `inv(α) = tan(α) - α`.
#[inline]
pub fn involute_function(alpha: Real) -> Real {
    alpha.tan() - alpha
}

/// Roll angle of the involute of a circle of radius `base_radius` at radius `r`.
///
/// `r` must not lie inside the base circle; radii within tolerance of it are
/// treated as lying on it.
pub fn roll_angle(r: Real, base_radius: Real) -> Result<Real, GearError> {
    if r.is_nan() || r <= 0.0 || r < base_radius * (1.0 - tolerance()) {
        return Err(GearError::InvolutePointInsideBase {
            radius: r,
            base_radius,
        });
    }
    let alpha = (base_radius / r).min(1.0).acos();
    Ok(involute_function(alpha))
}

/// Point of the involute at distance `r` from the center, rotated by `start_angle`.
///
/// With `reversed` the roll angle is subtracted instead of added, which yields the
/// mirror-image branch used for the trailing flank of a tooth.
///
/// # Example
/// ```
/// use geargen::gear::involute_point;
///
/// let p = involute_point(9.0, 9.0, 0.0, false).unwrap();
/// assert!((p.x - 9.0).abs() < 1e-12 && p.y.abs() < 1e-12);
/// ```
pub fn involute_point(
    r: Real,
    base_radius: Real,
    start_angle: Real,
    reversed: bool,
) -> Result<Point2<Real>, GearError> {
    let inv_alpha = roll_angle(r, base_radius)?;
    let angle = if reversed {
        start_angle - inv_alpha
    } else {
        start_angle + inv_alpha
    };
    Ok(Point2::new(r * angle.cos(), r * angle.sin()))
}
