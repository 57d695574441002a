//! Straight and twisted extrusion of sketches along +z.

use crate::errors::KernelError;
use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::mesh::polygon::Polygon;
use crate::sketch::Sketch;
use nalgebra::{Point2, Point3, Rotation2};
use std::fmt::Debug;

impl<S: Clone + Send + Sync + Debug> Sketch<S> {
    /// Sweep the outline straight up from `z = 0` to `z = height`.
    pub fn extrude(&self, height: Real) -> Result<Mesh<S>, KernelError> {
        self.twist_extrude(height, 0.0, 1)
    }

    /// Sweep the outline up to `z = height` while rotating it counter-clockwise about
    /// the z axis, reaching `twist_degrees` at the top.
    ///
    /// The sweep is cut into `slices` layers whose walls are triangulated; a zero
    /// twist produces flat quad walls regardless of `slices`.
    pub fn twist_extrude(
        &self,
        height: Real,
        twist_degrees: Real,
        slices: usize,
    ) -> Result<Mesh<S>, KernelError> {
        if !height.is_finite() || height <= 0.0 {
            return Err(KernelError::Degenerate(format!(
                "extrusion height must be > 0, got {height}"
            )));
        }
        if !twist_degrees.is_finite() {
            return Err(KernelError::Degenerate(format!(
                "twist must be finite, got {twist_degrees}"
            )));
        }
        let ring = self.ring();
        let n = ring.len();
        if n < 3 {
            return Err(KernelError::Degenerate("outline has fewer than 3 points".into()));
        }

        let straight = twist_degrees == 0.0;
        let slices = if straight { 1 } else { slices.max(1) };
        let twist = twist_degrees.to_radians();

        let layer = |k: usize| -> Vec<Point3<Real>> {
            let t = k as Real / slices as Real;
            let rot = Rotation2::new(twist * t);
            ring.iter()
                .map(|p| {
                    let q = rot * p;
                    Point3::new(q.x, q.y, height * t)
                })
                .collect()
        };

        let caps = self.triangulate();
        let mut polygons = Vec::with_capacity(2 * caps.len() + 2 * n * slices);

        // bottom cap faces -z: reverse each counter-clockwise triangle
        for [a, b, c] in &caps {
            polygons.push(Polygon::from_points(
                &[lift(*a, 0.0), lift(*c, 0.0), lift(*b, 0.0)],
                self.metadata.clone(),
            ));
        }
        let top_rot = Rotation2::new(twist);
        for [a, b, c] in &caps {
            polygons.push(Polygon::from_points(
                &[
                    lift(top_rot * a, height),
                    lift(top_rot * b, height),
                    lift(top_rot * c, height),
                ],
                self.metadata.clone(),
            ));
        }

        let mut lower = layer(0);
        for k in 1..=slices {
            let upper = layer(k);
            for i in 0..n {
                let j = (i + 1) % n;
                if straight {
                    polygons.push(Polygon::from_points(
                        &[lower[i], lower[j], upper[j], upper[i]],
                        self.metadata.clone(),
                    ));
                } else {
                    polygons.push(Polygon::from_points(
                        &[lower[i], lower[j], upper[j]],
                        self.metadata.clone(),
                    ));
                    polygons.push(Polygon::from_points(
                        &[lower[i], upper[j], upper[i]],
                        self.metadata.clone(),
                    ));
                }
            }
            lower = upper;
        }

        Ok(Mesh::from_polygons(&polygons, self.metadata.clone()))
    }
}

fn lift(p: Point2<Real>, z: Real) -> Point3<Real> {
    Point3::new(p.x, p.y, z)
}
