//! Bevel gears: the profile wrapped onto the back-cone sphere.

use super::{GearRequest, SolidComposer, invalid};
use crate::errors::ComposeError;
use crate::float_types::Real;
use crate::gear::GearSpec;
use crate::kernel::GeometryKernel;
use log::debug;
use nalgebra::{Point3, Vector3};

/// Cone dimensions of a bevel gear; lengths in model units, the cone angle in radians.
///
/// The apex of the pitch cone sits at the origin and the gear's axis is +z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BevelGeometry {
    pub pitch_radius: Real,
    /// Half-angle of the pitch cone.
    pub cone_angle: Real,
    /// Apex to pitch circle, along the cone.
    pub cone_distance: Real,
    /// Apex to the pitch circle plane, along the axis.
    pub cone_height: Real,
    pub inner_cone_distance: Real,
    pub inner_cone_height: Real,
    pub bottom_flat_radius: Real,
    pub top_flat_radius: Real,
}

impl BevelGeometry {
    /// Derive the cones of a bevel gear with `teeth` meshing with `counterpart_teeth`
    /// at `shaft_angle` degrees.
    pub fn new(
        pitch_radius: Real,
        teeth: usize,
        counterpart_teeth: usize,
        shaft_angle: Real,
        width: Real,
        flat_part_coeff: Real,
    ) -> Result<Self, ComposeError> {
        let shaft = shaft_angle.to_radians();
        let ratio = counterpart_teeth as Real / teeth as Real;
        let denominator = ratio + shaft.cos();
        if denominator <= 0.0 {
            // the pitch cone would open past a plane: a crown or internal bevel gear
            return Err(invalid(
                "shaft_angle",
                shaft_angle,
                "pitch cone angle must stay below 90 degrees",
            ));
        }
        let cone_angle = (shaft.sin() / denominator).atan();
        let cone_distance = pitch_radius / cone_angle.sin();
        let cone_height = pitch_radius / cone_angle.tan();
        if width >= cone_distance {
            return Err(invalid(
                "width",
                width,
                "must be smaller than the cone distance",
            ));
        }

        let inner_cone_distance = cone_distance - width;
        let bottom_flat_radius = flat_part_coeff * pitch_radius;
        Ok(Self {
            pitch_radius,
            cone_angle,
            cone_distance,
            cone_height,
            inner_cone_distance,
            inner_cone_height: cone_height * inner_cone_distance / cone_distance,
            bottom_flat_radius,
            top_flat_radius: bottom_flat_radius * inner_cone_distance / cone_distance,
        })
    }

    /// Height of the flat cap cylinder added on the inner face.
    pub fn top_flat_height(&self) -> Real {
        self.cone_height - self.inner_cone_height
    }

    /// Base of the cap cylinder, where its radius meets the inner sphere.
    pub fn top_flat_base(&self) -> Point3<Real> {
        let z = (self.inner_cone_distance.powi(2) - self.top_flat_radius.powi(2)).sqrt();
        Point3::new(0.0, 0.0, z)
    }

    /// Base of the cylinder cut from the outer face, where its radius meets the
    /// outer sphere.
    pub fn bottom_flat_base(&self) -> Point3<Real> {
        let z = (self.cone_distance.powi(2) - self.bottom_flat_radius.powi(2)).sqrt();
        Point3::new(0.0, 0.0, z)
    }
}

impl<K: GeometryKernel> SolidComposer<K> {
    pub(super) fn bevel(&mut self, request: &GearRequest) -> Result<K::Solid, ComposeError> {
        let counterpart = request.counterpart_teeth.ok_or(ComposeError::MissingParameter {
            parameter: "counterpart_teeth",
            gear_type: request.gear_type.name(),
        })?;
        let cones = BevelGeometry::new(
            request.pitch_radius(),
            request.teeth,
            counterpart,
            request.shaft_angle,
            request.width,
            request.flat_part_coeff,
        )?;
        debug!(
            "bevel cone angle {:.4}°, distance {:.6}, height {:.6}",
            cones.cone_angle.to_degrees(),
            cones.cone_distance,
            cones.cone_height
        );

        let spec = GearSpec {
            module: request.module,
            teeth: request.teeth,
            pressure_angle: request.pressure_angle,
            root_fillet: request.root_fillet,
            internal: false,
        };
        let (_, wire) = self.profile_wire(&spec)?;

        let lifted = self
            .kernel
            .translate_wire(&wire, Vector3::new(0.0, 0.0, cones.cone_height))?;
        let projected =
            self.kernel
                .project_wire_onto_sphere(&lifted, cones.cone_distance, -Vector3::z())?;
        let face = self
            .kernel
            .make_spherical_face(cones.cone_distance, &projected)?;
        let shell = self.kernel.thicken_face(&face, -request.width)?;

        let cap = self.kernel.make_cylinder(
            cones.top_flat_radius,
            cones.top_flat_height(),
            cones.top_flat_base(),
        )?;
        let capped = self.kernel.boolean_union(&shell, &cap)?;

        let cut = self.kernel.make_cylinder(
            cones.bottom_flat_radius,
            cones.cone_distance,
            cones.bottom_flat_base(),
        )?;
        Ok(self.kernel.boolean_subtract(&capped, &cut)?)
    }
}
