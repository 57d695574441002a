//! The solid-modeling capability set gear composition is written against.
//!
//! [`GeometryKernel`] names the primitives a gear solid is assembled from; handles
//! for wires, faces and solids are opaque associated types. [`CsgKernel`] implements
//! it on BSP meshes. Every call takes `&mut self` so an implementation may keep
//! per-context state; use one kernel per thread.

use crate::errors::KernelError;
use crate::float_types::Real;
use crate::gear::ToothProfile;
use crate::mesh::plane::Plane;
use nalgebra::{Point3, Vector3};
use std::fmt::Debug;

mod csg;

pub use csg::{CsgKernel, CsgWire, SphereBinding, SphericalFace, Tessellation};

pub trait GeometryKernel {
    /// A closed planar (or sphere-bound) boundary curve.
    type Wire: Clone + Debug;
    /// A bounded surface patch.
    type Face: Debug;
    /// A closed volume.
    type Solid: Debug;

    /// Wire following `profile` in the XY plane.
    fn wire_from_profile(&mut self, profile: &ToothProfile) -> Result<Self::Wire, KernelError>;

    /// Round the listed profile vertices of a planar wire with tangent arcs.
    fn fillet_2d(
        &mut self,
        wire: &Self::Wire,
        vertex_indices: &[usize],
        radius: Real,
    ) -> Result<Self::Wire, KernelError>;

    fn translate_wire(
        &mut self,
        wire: &Self::Wire,
        offset: Vector3<Real>,
    ) -> Result<Self::Wire, KernelError>;

    /// Prism swept along +z.
    fn extrude_straight(
        &mut self,
        wire: &Self::Wire,
        height: Real,
    ) -> Result<Self::Solid, KernelError>;

    /// Sweep along +z while rotating counter-clockwise, `twist_degrees` in total.
    fn extrude_twisted(
        &mut self,
        wire: &Self::Wire,
        height: Real,
        twist_degrees: Real,
    ) -> Result<Self::Solid, KernelError>;

    /// `solid` united with its reflection about `plane`.
    fn mirror_and_union(
        &mut self,
        solid: &Self::Solid,
        plane: &Plane,
    ) -> Result<Self::Solid, KernelError>;

    fn boolean_union(
        &mut self,
        a: &Self::Solid,
        b: &Self::Solid,
    ) -> Result<Self::Solid, KernelError>;

    /// `a` minus `b`.
    fn boolean_subtract(
        &mut self,
        a: &Self::Solid,
        b: &Self::Solid,
    ) -> Result<Self::Solid, KernelError>;

    /// z-aligned cylinder whose bottom cap is centered on `base_center`.
    fn make_cylinder(
        &mut self,
        radius: Real,
        height: Real,
        base_center: Point3<Real>,
    ) -> Result<Self::Solid, KernelError>;

    /// Project `wire` along `direction` onto the origin-centered sphere of
    /// `sphere_radius`, keeping the intersection closest to the wire.
    ///
    /// A point whose line misses the sphere, or that has already passed the whole
    /// sphere when moving along `direction`, fails with
    /// [`KernelError::ProjectionMissesSphere`].
    fn project_wire_onto_sphere(
        &mut self,
        wire: &Self::Wire,
        sphere_radius: Real,
        direction: Vector3<Real>,
    ) -> Result<Self::Wire, KernelError>;

    /// The part of the sphere of `sphere_radius` bounded by a projected `wire`.
    fn make_spherical_face(
        &mut self,
        sphere_radius: Real,
        wire: &Self::Wire,
    ) -> Result<Self::Face, KernelError>;

    /// Offset `face` along its normals by `thickness` and close the gap; negative
    /// thicknesses grow towards the center of curvature.
    fn thicken_face(
        &mut self,
        face: &Self::Face,
        thickness: Real,
    ) -> Result<Self::Solid, KernelError>;
}
