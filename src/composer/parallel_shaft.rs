//! Spur, helical and herringbone gears, external and internal.

use super::{GearRequest, SolidComposer, Sweep, invalid};
use crate::errors::ComposeError;
use crate::float_types::Real;
use crate::kernel::GeometryKernel;
use crate::mesh::plane::Plane;
use log::debug;
use nalgebra::{Point3, Vector3};

/// Twist in degrees of a helix of `helix_angle` degrees over `width`, measured at
/// `pitch_radius`.
pub fn helix_twist_degrees(width: Real, helix_angle: Real, pitch_radius: Real) -> Real {
    width * helix_angle.to_radians().tan() / pitch_radius * (180.0 / crate::float_types::PI)
}

/// Transverse module and pressure angle (degrees) of a tooth specified in its normal
/// plane.
pub fn transverse_from_normal(module: Real, pressure_angle: Real, helix_angle: Real) -> (Real, Real) {
    let cos_helix = helix_angle.to_radians().cos();
    let pressure = (pressure_angle.to_radians().tan() / cos_helix).atan();
    (module / cos_helix, pressure.to_degrees())
}

impl<K: GeometryKernel> SolidComposer<K> {
    pub(super) fn parallel_shaft(
        &mut self,
        request: &GearRequest,
        sweep: Sweep,
    ) -> Result<K::Solid, ComposeError> {
        let spec = request.profile_spec();
        let (profile, wire) = self.profile_wire(&spec)?;

        // checked before any solid work so a bad diameter fails fast
        let outer_radius = match request.outer_diameter {
            Some(diameter) if request.gear_type.is_internal() => {
                let tip = profile.geometry().tip_radius;
                if diameter / 2.0 <= tip {
                    return Err(invalid(
                        "outer_diameter",
                        diameter,
                        "must exceed the tip diameter of the internal teeth",
                    ));
                }
                Some(diameter / 2.0)
            },
            _ => None,
        };

        let width = request.width;
        let twist = helix_twist_degrees(width, request.helix_angle, request.pitch_radius());
        let teeth = match sweep {
            Sweep::Straight => self.kernel.extrude_straight(&wire, width)?,
            Sweep::Twisted => {
                debug!("helix {}° twists the teeth by {twist}°", request.helix_angle);
                self.kernel.extrude_twisted(&wire, width, twist)?
            },
            Sweep::Herringbone => {
                let half = self
                    .kernel
                    .extrude_twisted(&wire, width / 2.0, twist / 2.0)?;
                let top = Plane::from_normal(Vector3::z(), width / 2.0);
                self.kernel.mirror_and_union(&half, &top)?
            },
        };

        match outer_radius {
            Some(radius) => {
                let ring = self.kernel.make_cylinder(radius, width, Point3::origin())?;
                Ok(self.kernel.boolean_subtract(&ring, &teeth)?)
            },
            None => Ok(teeth),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn twist_of_a_45_degree_helix() {
        // tan 45° = 1: the pitch circle advances by `width`
        let twist = helix_twist_degrees(10.0, 45.0, 10.0);
        assert_relative_eq!(twist, (1.0 as Real).to_degrees(), epsilon = 1e-9);
    }

    #[test]
    fn normal_to_transverse() {
        let (m, pa) = transverse_from_normal(1.0, 20.0, 0.0);
        assert_relative_eq!(m, 1.0);
        assert_relative_eq!(pa, 20.0, epsilon = 1e-12);

        let (m, pa) = transverse_from_normal(2.0, 20.0, 30.0);
        assert_relative_eq!(m, 2.309_401_076_758_503, epsilon = 1e-9);
        assert_relative_eq!(pa, 22.795_877_258_858, epsilon = 1e-9);
    }
}
