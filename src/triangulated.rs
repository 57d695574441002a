//! Triangle access shared by the mesh exporters.
use crate::mesh::Mesh;
use crate::mesh::vertex::Vertex;
use std::fmt::Debug;

/// A triangulated 3D surface.
///
/// Anything that can present itself as a bunch of triangles in 3D
/// can use all the triangle-based IO backends.
pub trait Triangulated3D {
    /// Call `f` for each triangle.
    ///
    /// The triangle is `[v0, v1, v2]` with positions and normals, wound
    /// counter-clockwise seen from outside.
    fn visit_triangles<F>(&self, f: F)
    where
        F: FnMut([Vertex; 3]);
}

impl<S: Clone + Send + Sync + Debug> Triangulated3D for Mesh<S> {
    fn visit_triangles<F>(&self, mut f: F)
    where
        F: FnMut([Vertex; 3]),
    {
        for poly in &self.polygons {
            let normal = poly.plane.normal();
            for mut tri in poly.triangulate() {
                // facet normal, not the interpolated vertex normal
                for v in &mut tri {
                    v.normal = normal;
                }
                f(tri);
            }
        }
    }
}
