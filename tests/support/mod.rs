//! Test support library
//! Provides helper functions and a recording kernel for tests.
#![allow(dead_code)]

use geargen::{
    errors::KernelError,
    float_types::Real,
    gear::ToothProfile,
    kernel::GeometryKernel,
    mesh::{Mesh, plane::Plane},
};
use nalgebra::{Point2, Point3, Vector3};

/// Returns the approximate bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]`
/// of a mesh.
pub fn bounding_box(mesh: &Mesh<()>) -> [Real; 6] {
    let mut bb = [
        Real::MAX,
        Real::MAX,
        Real::MAX,
        Real::MIN,
        Real::MIN,
        Real::MIN,
    ];
    for poly in &mesh.polygons {
        for v in &poly.vertices {
            let p = v.pos;
            bb[0] = bb[0].min(p.x);
            bb[1] = bb[1].min(p.y);
            bb[2] = bb[2].min(p.z);
            bb[3] = bb[3].max(p.x);
            bb[4] = bb[4].max(p.y);
            bb[5] = bb[5].max(p.z);
        }
    }
    bb
}

/// Largest distance of any mesh vertex from the z axis.
pub fn max_axial_distance(mesh: &Mesh<()>) -> Real {
    mesh.polygons
        .iter()
        .flat_map(|p| p.vertices.iter())
        .map(|v| v.pos.x.hypot(v.pos.y))
        .fold(0.0, Real::max)
}

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

pub fn polar_radius(p: &Point2<Real>) -> Real {
    p.coords.norm()
}

/// Radius of the circle through three points.
pub fn circumradius(a: Point2<Real>, b: Point2<Real>, c: Point2<Real>) -> Real {
    let (ab, bc, ca) = ((b - a).norm(), (c - b).norm(), (a - c).norm());
    let twice_area = (b - a).perp(&(c - a)).abs();
    ab * bc * ca / (2.0 * twice_area)
}

/// One primitive call seen by [`RecordingKernel`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    WireFromProfile {
        module: Real,
        pressure_angle: Real,
        internal: bool,
    },
    Fillet2D {
        vertices: usize,
        radius: Real,
    },
    TranslateWire(Vector3<Real>),
    ExtrudeStraight {
        height: Real,
    },
    ExtrudeTwisted {
        height: Real,
        twist: Real,
    },
    MirrorAndUnion {
        normal: Vector3<Real>,
        offset: Real,
    },
    Union {
        a: String,
        b: String,
    },
    Subtract {
        a: String,
        b: String,
    },
    Cylinder {
        radius: Real,
        height: Real,
        base: Point3<Real>,
    },
    Project {
        radius: Real,
        direction: Vector3<Real>,
    },
    SphericalFace {
        radius: Real,
    },
    Thicken {
        thickness: Real,
    },
}

/// A kernel that builds no geometry: every handle is a name and every call is logged.
///
/// Solids are named after the call that produced them (`extrude#2`, `cylinder#3`,
/// ...), so tests can check which operand went where.
#[derive(Debug, Default)]
pub struct RecordingKernel {
    pub calls: Vec<Call>,
}

impl RecordingKernel {
    fn name(&mut self, call: Call, kind: &str) -> String {
        self.calls.push(call);
        format!("{kind}#{}", self.calls.len() - 1)
    }

    /// Calls with the wire-only ones left out.
    pub fn solid_calls(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|c| {
                !matches!(
                    c,
                    Call::WireFromProfile { .. } | Call::Fillet2D { .. } | Call::TranslateWire(_)
                )
            })
            .collect()
    }
}

impl GeometryKernel for RecordingKernel {
    type Wire = String;
    type Face = String;
    type Solid = String;

    fn wire_from_profile(&mut self, profile: &ToothProfile) -> Result<String, KernelError> {
        let g = profile.geometry();
        Ok(self.name(
            Call::WireFromProfile {
                module: g.module,
                // radians back to degrees, rounded so whole-degree inputs compare equal
                pressure_angle: (g.pressure_angle.to_degrees() * 1e9).round() / 1e9,
                internal: g.internal,
            },
            "wire",
        ))
    }

    fn fillet_2d(
        &mut self,
        _wire: &String,
        vertex_indices: &[usize],
        radius: Real,
    ) -> Result<String, KernelError> {
        Ok(self.name(
            Call::Fillet2D {
                vertices: vertex_indices.len(),
                radius,
            },
            "wire",
        ))
    }

    fn translate_wire(
        &mut self,
        _wire: &String,
        offset: Vector3<Real>,
    ) -> Result<String, KernelError> {
        Ok(self.name(Call::TranslateWire(offset), "wire"))
    }

    fn extrude_straight(&mut self, _wire: &String, height: Real) -> Result<String, KernelError> {
        Ok(self.name(Call::ExtrudeStraight { height }, "extrude"))
    }

    fn extrude_twisted(
        &mut self,
        _wire: &String,
        height: Real,
        twist_degrees: Real,
    ) -> Result<String, KernelError> {
        Ok(self.name(
            Call::ExtrudeTwisted {
                height,
                twist: twist_degrees,
            },
            "extrude",
        ))
    }

    fn mirror_and_union(&mut self, _solid: &String, plane: &Plane) -> Result<String, KernelError> {
        Ok(self.name(
            Call::MirrorAndUnion {
                normal: plane.normal(),
                offset: plane.offset(),
            },
            "mirror",
        ))
    }

    fn boolean_union(&mut self, a: &String, b: &String) -> Result<String, KernelError> {
        Ok(self.name(
            Call::Union {
                a: a.clone(),
                b: b.clone(),
            },
            "union",
        ))
    }

    fn boolean_subtract(&mut self, a: &String, b: &String) -> Result<String, KernelError> {
        Ok(self.name(
            Call::Subtract {
                a: a.clone(),
                b: b.clone(),
            },
            "difference",
        ))
    }

    fn make_cylinder(
        &mut self,
        radius: Real,
        height: Real,
        base_center: Point3<Real>,
    ) -> Result<String, KernelError> {
        Ok(self.name(
            Call::Cylinder {
                radius,
                height,
                base: base_center,
            },
            "cylinder",
        ))
    }

    fn project_wire_onto_sphere(
        &mut self,
        _wire: &String,
        sphere_radius: Real,
        direction: Vector3<Real>,
    ) -> Result<String, KernelError> {
        Ok(self.name(
            Call::Project {
                radius: sphere_radius,
                direction,
            },
            "wire",
        ))
    }

    fn make_spherical_face(
        &mut self,
        sphere_radius: Real,
        _wire: &String,
    ) -> Result<String, KernelError> {
        Ok(self.name(
            Call::SphericalFace {
                radius: sphere_radius,
            },
            "face",
        ))
    }

    fn thicken_face(&mut self, _face: &String, thickness: Real) -> Result<String, KernelError> {
        Ok(self.name(Call::Thicken { thickness }, "shell"))
    }
}
