use super::GeometryKernel;
use crate::errors::KernelError;
use crate::float_types::{EPSILON, Real, tolerance};
use crate::gear::ToothProfile;
use crate::mesh::Mesh;
use crate::mesh::plane::Plane;
use crate::sketch::Sketch;
use crate::traits::CSG;
use log::debug;
use nalgebra::{Point3, Vector3};

/// How finely curved geometry is approximated by flat polygons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tessellation {
    /// Largest angle, in degrees, one chord of a flattened arc may subtend.
    pub arc_segment_angle: Real,
    /// Chords per 2D fillet.
    pub fillet_segments: usize,
    /// Slices of a twisted extrusion per degree of twist.
    pub slices_per_twist_degree: Real,
    /// Lower bound on the slices of a twisted extrusion.
    pub min_slices: usize,
    /// A spherical face is cut into `2^sphere_subdivisions` concentric bands.
    pub sphere_subdivisions: u32,
    pub cylinder_segments: usize,
}

impl Default for Tessellation {
    fn default() -> Self {
        Self {
            arc_segment_angle: 2.0,
            fillet_segments: 4,
            slices_per_twist_degree: 0.5,
            min_slices: 8,
            sphere_subdivisions: 3,
            cylinder_segments: 64,
        }
    }
}

impl Tessellation {
    /// Slices used for a twist of `twist_degrees`.
    pub fn twist_slices(&self, twist_degrees: Real) -> usize {
        let by_angle = (twist_degrees.abs() * self.slices_per_twist_degree).ceil();
        (by_angle as usize).max(self.min_slices).max(1)
    }

    pub fn sphere_rings(&self) -> usize {
        1usize << self.sphere_subdivisions.min(8)
    }
}

/// Where a projected wire sits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereBinding {
    pub radius: Real,
    /// Upper (`z > 0`) or lower hemisphere.
    pub upper: bool,
}

/// A planar outline lifted to `elevation`, or its projection onto a sphere.
#[derive(Debug, Clone)]
pub struct CsgWire {
    pub sketch: Sketch<()>,
    pub elevation: Real,
    pub sphere: Option<SphereBinding>,
}

impl CsgWire {
    fn planar(&self, operation: &str) -> Result<&Sketch<()>, KernelError> {
        match self.sphere {
            None => Ok(&self.sketch),
            Some(_) => Err(KernelError::Unsupported(format!(
                "{operation} of a wire projected onto a sphere"
            ))),
        }
    }
}

/// A patch of a sphere whose outline, seen along z, is `footprint`.
#[derive(Debug, Clone)]
pub struct SphericalFace {
    pub footprint: Sketch<()>,
    pub radius: Real,
    pub upper: bool,
}

/// [`GeometryKernel`] on BSP-tree meshes.
///
/// ```
/// use geargen::gear::{GearSpec, build_profile};
/// use geargen::kernel::{CsgKernel, GeometryKernel};
///
/// let profile = build_profile(&GearSpec::new(1.0, 10)).unwrap();
/// let mut kernel = CsgKernel::default();
/// let wire = kernel.wire_from_profile(&profile).unwrap();
/// let solid = kernel.extrude_straight(&wire, 2.0).unwrap();
/// assert!(solid.volume() > 0.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CsgKernel {
    tessellation: Tessellation,
}

impl CsgKernel {
    pub const fn new(tessellation: Tessellation) -> Self {
        Self { tessellation }
    }

    pub const fn tessellation(&self) -> &Tessellation {
        &self.tessellation
    }

    fn non_empty(mesh: Mesh<()>, operation: &'static str) -> Result<Mesh<()>, KernelError> {
        if mesh.is_empty() {
            Err(KernelError::EmptyResult(operation))
        } else {
            Ok(mesh)
        }
    }

    fn lift(mesh: Mesh<()>, elevation: Real) -> Mesh<()> {
        if elevation == 0.0 {
            mesh
        } else {
            mesh.translate(0.0, 0.0, elevation)
        }
    }
}

impl GeometryKernel for CsgKernel {
    type Wire = CsgWire;
    type Face = SphericalFace;
    type Solid = Mesh<()>;

    fn wire_from_profile(&mut self, profile: &ToothProfile) -> Result<CsgWire, KernelError> {
        let sketch = Sketch::from_profile(
            profile,
            self.tessellation.arc_segment_angle.to_radians(),
            None,
        )?;
        debug!(
            "flattened {}-segment profile to {} points",
            profile.segments().len(),
            sketch.ring().len()
        );
        Ok(CsgWire {
            sketch,
            elevation: 0.0,
            sphere: None,
        })
    }

    fn fillet_2d(
        &mut self,
        wire: &CsgWire,
        vertex_indices: &[usize],
        radius: Real,
    ) -> Result<CsgWire, KernelError> {
        let sketch = wire.planar("fillet")?.fillet_corners(
            vertex_indices,
            radius,
            self.tessellation.fillet_segments,
        )?;
        Ok(CsgWire {
            sketch,
            ..wire.clone()
        })
    }

    fn translate_wire(
        &mut self,
        wire: &CsgWire,
        offset: Vector3<Real>,
    ) -> Result<CsgWire, KernelError> {
        let sketch = wire.planar("translation")?.translate(offset.x, offset.y);
        Ok(CsgWire {
            sketch,
            elevation: wire.elevation + offset.z,
            sphere: None,
        })
    }

    fn extrude_straight(&mut self, wire: &CsgWire, height: Real) -> Result<Mesh<()>, KernelError> {
        debug!("extrude {height}");
        let mesh = wire.planar("extrusion")?.extrude(height)?;
        Ok(Self::lift(mesh, wire.elevation))
    }

    fn extrude_twisted(
        &mut self,
        wire: &CsgWire,
        height: Real,
        twist_degrees: Real,
    ) -> Result<Mesh<()>, KernelError> {
        let slices = self.tessellation.twist_slices(twist_degrees);
        debug!("twist-extrude {height} by {twist_degrees}° in {slices} slices");
        let mesh = wire
            .planar("extrusion")?
            .twist_extrude(height, twist_degrees, slices)?;
        Ok(Self::lift(mesh, wire.elevation))
    }

    fn mirror_and_union(&mut self, solid: &Mesh<()>, plane: &Plane) -> Result<Mesh<()>, KernelError> {
        debug!("mirror about n={:?} w={} and union", plane.normal, plane.w);
        Self::non_empty(solid.mirror_union(plane.clone()), "mirror union")
    }

    fn boolean_union(&mut self, a: &Mesh<()>, b: &Mesh<()>) -> Result<Mesh<()>, KernelError> {
        debug!("union of {} and {} polygons", a.polygons.len(), b.polygons.len());
        Self::non_empty(a.union(b), "union")
    }

    fn boolean_subtract(&mut self, a: &Mesh<()>, b: &Mesh<()>) -> Result<Mesh<()>, KernelError> {
        debug!("difference of {} and {} polygons", a.polygons.len(), b.polygons.len());
        Self::non_empty(a.difference(b), "difference")
    }

    fn make_cylinder(
        &mut self,
        radius: Real,
        height: Real,
        base_center: Point3<Real>,
    ) -> Result<Mesh<()>, KernelError> {
        if !(radius.is_finite() && height.is_finite()) || radius <= 0.0 || height <= 0.0 {
            return Err(KernelError::Degenerate(format!(
                "cylinder needs positive radius and height, got {radius} and {height}"
            )));
        }
        debug!("cylinder r={radius} h={height} at {base_center:?}");
        Ok(Mesh::cylinder(
            radius,
            height,
            base_center,
            self.tessellation.cylinder_segments,
            None,
        ))
    }

    fn project_wire_onto_sphere(
        &mut self,
        wire: &CsgWire,
        sphere_radius: Real,
        direction: Vector3<Real>,
    ) -> Result<CsgWire, KernelError> {
        let sketch = wire.planar("projection")?;
        if direction.x.abs() > EPSILON || direction.y.abs() > EPSILON || direction.z == 0.0 {
            return Err(KernelError::Unsupported(format!(
                "projection along {direction:?}, only the z axis is supported"
            )));
        }
        if !sphere_radius.is_finite() || sphere_radius <= 0.0 {
            return Err(KernelError::Degenerate(format!(
                "sphere radius must be > 0, got {sphere_radius}"
            )));
        }
        // Each projection line meets the sphere at ±h, and a point moving along
        // `direction` must not have left both hits behind.
        let down = direction.z < 0.0;
        let elevation = wire.elevation;
        if let Some(p) = sketch.ring().into_iter().find(|p| {
            let h2 = sphere_radius * sphere_radius - p.coords.norm_squared();
            if h2 <= 0.0 {
                return true;
            }
            let h = h2.sqrt();
            if down { elevation < -h } else { elevation > h }
        }) {
            return Err(KernelError::ProjectionMissesSphere {
                x: p.x,
                y: p.y,
                radius: sphere_radius,
            });
        }
        // the hit on the wire's side of the equator is the closer one
        let upper = if elevation == 0.0 { down } else { elevation > 0.0 };
        debug!(
            "projected wire onto the {} hemisphere of radius {sphere_radius}",
            if upper { "upper" } else { "lower" }
        );
        Ok(CsgWire {
            sketch: sketch.clone(),
            elevation: 0.0,
            sphere: Some(SphereBinding {
                radius: sphere_radius,
                upper,
            }),
        })
    }

    fn make_spherical_face(
        &mut self,
        sphere_radius: Real,
        wire: &CsgWire,
    ) -> Result<SphericalFace, KernelError> {
        match wire.sphere {
            Some(binding)
                if (binding.radius - sphere_radius).abs()
                    <= tolerance() * sphere_radius.abs().max(1.0) =>
            {
                Ok(SphericalFace {
                    footprint: wire.sketch.clone(),
                    radius: sphere_radius,
                    upper: binding.upper,
                })
            },
            Some(binding) => Err(KernelError::Degenerate(format!(
                "wire lies on a sphere of radius {}, not {sphere_radius}",
                binding.radius
            ))),
            None => Err(KernelError::Degenerate(
                "face boundary has not been projected onto the sphere".into(),
            )),
        }
    }

    fn thicken_face(
        &mut self,
        face: &SphericalFace,
        thickness: Real,
    ) -> Result<Mesh<()>, KernelError> {
        let offset_radius = face.radius + thickness;
        if !offset_radius.is_finite() || offset_radius <= 0.0 {
            return Err(KernelError::Degenerate(format!(
                "thickening radius {} by {thickness} passes the center",
                face.radius
            )));
        }
        let rings = self.tessellation.sphere_rings();
        debug!("thicken spherical face r={} by {thickness} ({rings} bands)", face.radius);
        let shell = Mesh::spherical_shell(
            &face.footprint,
            face.radius,
            offset_radius,
            rings,
            face.upper,
            None,
        )?;
        Self::non_empty(shell, "thicken")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gear::{GearSpec, build_profile};
    use approx::assert_relative_eq;

    #[test]
    fn twist_slices_respect_minimum() {
        let t = Tessellation::default();
        assert_eq!(t.twist_slices(0.0), 8);
        assert_eq!(t.twist_slices(-40.0), 20);
        assert_eq!(t.sphere_rings(), 8);
    }

    #[test]
    fn translated_wire_extrudes_from_its_elevation() {
        let profile = build_profile(&GearSpec::new(1.0, 10)).unwrap();
        let mut kernel = CsgKernel::default();
        let wire = kernel.wire_from_profile(&profile).unwrap();
        let wire = kernel
            .translate_wire(&wire, Vector3::new(0.0, 0.0, 5.0))
            .unwrap();
        let solid = kernel.extrude_straight(&wire, 2.0).unwrap();
        let bb = solid.bounding_box();
        assert_relative_eq!(bb.mins.z, 5.0, epsilon = 1e-9);
        assert_relative_eq!(bb.maxs.z, 7.0, epsilon = 1e-9);
    }

    #[test]
    fn projected_wire_is_no_longer_planar() {
        let profile = build_profile(&GearSpec::new(1.0, 10)).unwrap();
        let mut kernel = CsgKernel::default();
        let wire = kernel.wire_from_profile(&profile).unwrap();
        let projected = kernel
            .project_wire_onto_sphere(&wire, 20.0, -Vector3::z())
            .unwrap();
        assert!(matches!(
            kernel.extrude_straight(&projected, 1.0),
            Err(KernelError::Unsupported(_))
        ));
        assert!(matches!(
            kernel.make_spherical_face(21.0, &projected),
            Err(KernelError::Degenerate(_))
        ));
        assert!(matches!(
            kernel.project_wire_onto_sphere(&wire, 20.0, Vector3::x()),
            Err(KernelError::Unsupported(_))
        ));
    }

    #[test]
    fn projection_must_head_towards_the_sphere() {
        let profile = build_profile(&GearSpec::new(1.0, 10)).unwrap();
        let mut kernel = CsgKernel::default();
        let wire = kernel.wire_from_profile(&profile).unwrap();
        let above = kernel
            .translate_wire(&wire, Vector3::new(0.0, 0.0, 25.0))
            .unwrap();
        let below = kernel
            .translate_wire(&wire, Vector3::new(0.0, 0.0, -25.0))
            .unwrap();

        let down = kernel
            .project_wire_onto_sphere(&above, 20.0, -Vector3::z())
            .unwrap();
        assert_eq!(
            down.sphere,
            Some(SphereBinding {
                radius: 20.0,
                upper: true
            })
        );
        let up = kernel
            .project_wire_onto_sphere(&below, 20.0, Vector3::z())
            .unwrap();
        assert_eq!(up.sphere.map(|s| s.upper), Some(false));

        for (wire, direction) in [(&above, Vector3::z()), (&below, -Vector3::z())] {
            assert!(matches!(
                kernel.project_wire_onto_sphere(wire, 20.0, direction),
                Err(KernelError::ProjectionMissesSphere { .. })
            ));
        }
    }

    #[test]
    fn wire_inside_the_sphere_takes_the_nearer_hemisphere() {
        let profile = build_profile(&GearSpec::new(1.0, 10)).unwrap();
        let mut kernel = CsgKernel::default();
        let wire = kernel.wire_from_profile(&profile).unwrap();
        let raised = kernel
            .translate_wire(&wire, Vector3::new(0.0, 0.0, 3.0))
            .unwrap();
        for direction in [Vector3::z(), -Vector3::z()] {
            let projected = kernel
                .project_wire_onto_sphere(&raised, 20.0, direction)
                .unwrap();
            assert_eq!(projected.sphere.map(|s| s.upper), Some(true));
        }
    }

    #[test]
    fn small_sphere_misses_the_wire() {
        let profile = build_profile(&GearSpec::new(1.0, 10)).unwrap();
        let mut kernel = CsgKernel::default();
        let wire = kernel.wire_from_profile(&profile).unwrap();
        assert!(matches!(
            kernel.project_wire_onto_sphere(&wire, 5.0, -Vector3::z()),
            Err(KernelError::ProjectionMissesSphere { .. })
        ));
    }
}
