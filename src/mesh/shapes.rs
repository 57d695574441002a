//! Primitive solids.

use crate::float_types::{Real, TAU};
use crate::mesh::Mesh;
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use nalgebra::{Point3, Vector3};
use std::fmt::Debug;

impl<S: Clone + Send + Sync + Debug> Mesh<S> {
    /// A z-aligned cylinder of `radius` and `height` whose bottom cap is centered on
    /// `base_center`.
    ///
    /// The side is approximated by `segments` flat quads; at least three are used.
    ///
    /// ```
    /// use geargen::mesh::Mesh;
    /// use nalgebra::Point3;
    ///
    /// let c = Mesh::<()>::cylinder(1.0, 2.0, Point3::origin(), 16, None);
    /// assert_eq!(c.polygons.len(), 16 + 2);
    /// ```
    pub fn cylinder(
        radius: Real,
        height: Real,
        base_center: Point3<Real>,
        segments: usize,
        metadata: Option<S>,
    ) -> Mesh<S> {
        let segments = segments.max(3);
        let ring = |z: Real| -> Vec<Point3<Real>> {
            (0..segments)
                .map(|i| {
                    let theta = TAU * i as Real / segments as Real;
                    Point3::new(
                        base_center.x + radius * theta.cos(),
                        base_center.y + radius * theta.sin(),
                        base_center.z + z,
                    )
                })
                .collect()
        };
        let bottom = ring(0.0);
        let top = ring(height);

        let mut polygons = Vec::with_capacity(segments + 2);

        // bottom faces -z, so its loop runs clockwise seen from above
        polygons.push(Polygon::new(
            bottom
                .iter()
                .rev()
                .map(|p| Vertex::new(*p, -Vector3::z()))
                .collect(),
            metadata.clone(),
        ));
        polygons.push(Polygon::new(
            top.iter().map(|p| Vertex::new(*p, Vector3::z())).collect(),
            metadata.clone(),
        ));

        for i in 0..segments {
            let j = (i + 1) % segments;
            let mid = TAU * (i as Real + 0.5) / segments as Real;
            let normal = Vector3::new(mid.cos(), mid.sin(), 0.0);
            polygons.push(Polygon::new(
                vec![
                    Vertex::new(bottom[i], normal),
                    Vertex::new(bottom[j], normal),
                    Vertex::new(top[j], normal),
                    Vertex::new(top[i], normal),
                ],
                metadata.clone(),
            ));
        }

        Mesh::from_polygons(&polygons, metadata)
    }
}
