use crate::float_types::parry3d::bounding_volume::Aabb;
use crate::float_types::{EPSILON, Real};
use crate::mesh::plane::Plane;
use nalgebra::{Matrix3, Matrix4, Translation3, Vector3};

/// Boolean operations + transformations
pub trait CSG: Sized + Clone {
    fn union(&self, other: &Self) -> Self;
    fn difference(&self, other: &Self) -> Self;
    fn transform(&self, matrix: &Matrix4<Real>) -> Self;
    fn bounding_box(&self) -> Aabb;
    fn inverse(&self) -> Self;

    /// Returns a new Self translated by vector.
    fn translate_vector(&self, vector: Vector3<Real>) -> Self {
        self.transform(&Translation3::from(vector).to_homogeneous())
    }

    /// Returns a new Self translated by x, y, and z.
    fn translate(&self, x: Real, y: Real, z: Real) -> Self {
        self.translate_vector(Vector3::new(x, y, z))
    }

    /// Reflect (mirror) this shape about `plane`.
    ///
    /// The plane normal need not be unit length; `plane.w` is scaled with it.
    /// Winding is reversed afterwards so faces keep pointing outwards.
    fn mirror(&self, plane: Plane) -> Self {
        let len = plane.normal().norm();
        if len.abs() < EPSILON {
            return self.clone();
        }

        let n = plane.normal() / len;
        let w = plane.offset() / len;

        // Move the plane through the origin, reflect with R = I - 2 n n^T, move back.
        let offset = n * w;
        let t1 = Translation3::from(-offset).to_homogeneous();
        let mut reflect_4 = Matrix4::identity();
        let reflect_3 = Matrix3::identity() - 2.0 * n * n.transpose();
        reflect_4.fixed_view_mut::<3, 3>(0, 0).copy_from(&reflect_3);
        let t2 = Translation3::from(offset).to_homogeneous();

        self.transform(&(t2 * reflect_4 * t1)).inverse()
    }

    /// Union of this shape and its mirror image about `plane`.
    fn mirror_union(&self, plane: Plane) -> Self {
        self.union(&self.mirror(plane))
    }
}
