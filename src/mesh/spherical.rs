//! Spherical shells: an outline projected onto a sphere and thickened radially.

use crate::errors::KernelError;
use crate::float_types::{PI, Real, TAU};
use crate::mesh::Mesh;
use crate::mesh::polygon::Polygon;
use crate::sketch::Sketch;
use nalgebra::{Point2, Point3, Vector3};
use std::fmt::Debug;

impl<S: Clone + Send + Sync + Debug> Mesh<S> {
    /// The solid between two concentric spheres bounded by the cone through
    /// `footprint`.
    ///
    /// `footprint` is the outline seen along z; it is lifted onto the sphere of
    /// `sphere_radius` (upper hemisphere when `upper`), and the second surface lies
    /// on the sphere of `offset_radius` along the same rays. The outline must be
    /// star-shaped around the z axis. `rings` concentric copies of the outline
    /// subdivide each spherical surface.
    pub fn spherical_shell(
        footprint: &Sketch<S>,
        sphere_radius: Real,
        offset_radius: Real,
        rings: usize,
        upper: bool,
        metadata: Option<S>,
    ) -> Result<Mesh<S>, KernelError> {
        if !(sphere_radius.is_finite() && offset_radius.is_finite())
            || sphere_radius <= 0.0
            || offset_radius <= 0.0
        {
            return Err(KernelError::Degenerate(format!(
                "shell radii must be > 0, got {sphere_radius} and {offset_radius}"
            )));
        }
        if (sphere_radius - offset_radius).abs() <= Real::EPSILON {
            return Err(KernelError::Degenerate("shell has zero thickness".into()));
        }

        let ring = footprint.ring();
        let n = ring.len();
        if n < 3 {
            return Err(KernelError::Degenerate("outline has fewer than 3 points".into()));
        }
        ensure_star_shaped(&ring)?;

        let direction = |p: Point2<Real>| -> Result<Vector3<Real>, KernelError> {
            let h2 = sphere_radius * sphere_radius - p.coords.norm_squared();
            if h2 <= 0.0 {
                return Err(KernelError::ProjectionMissesSphere {
                    x: p.x,
                    y: p.y,
                    radius: sphere_radius,
                });
            }
            let z = if upper { h2.sqrt() } else { -h2.sqrt() };
            Ok(Vector3::new(p.x, p.y, z) / sphere_radius)
        };

        let rings = rings.max(1);
        // grid[j][i]: ring point i scaled by (j + 1) / rings, as a unit direction
        let mut grid = Vec::with_capacity(rings);
        for j in 1..=rings {
            let s = j as Real / rings as Real;
            grid.push(
                ring.iter()
                    .map(|p| direction(Point2::from(p.coords * s)))
                    .collect::<Result<Vec<_>, _>>()?,
            );
        }
        let apex = direction(Point2::origin())?;

        // counter-clockwise (seen from +z) triangles of the footprint
        let mut patches: Vec<[Vector3<Real>; 3]> = Vec::with_capacity(n * (2 * rings - 1));
        for i in 0..n {
            let k = (i + 1) % n;
            patches.push([apex, grid[0][i], grid[0][k]]);
            for j in 0..rings - 1 {
                let (a, b) = (grid[j][i], grid[j + 1][i]);
                let (c, d) = (grid[j + 1][k], grid[j][k]);
                patches.push([a, b, c]);
                patches.push([a, c, d]);
            }
        }

        let (inner, outer) = if offset_radius > sphere_radius {
            (sphere_radius, offset_radius)
        } else {
            (offset_radius, sphere_radius)
        };
        let at = |d: &Vector3<Real>, r: Real| Point3::from(d * r);

        let mut polygons = Vec::with_capacity(2 * patches.len() + n);
        for [a, b, c] in &patches {
            let (outer_tri, inner_tri) = if upper {
                ([at(a, outer), at(b, outer), at(c, outer)], [at(a, inner), at(c, inner), at(b, inner)])
            } else {
                ([at(a, outer), at(c, outer), at(b, outer)], [at(a, inner), at(b, inner), at(c, inner)])
            };
            polygons.push(Polygon::from_points(&outer_tri, metadata.clone()));
            polygons.push(Polygon::from_points(&inner_tri, metadata.clone()));
        }

        let rim = &grid[rings - 1];
        for i in 0..n {
            let k = (i + 1) % n;
            let wall = [
                at(&rim[i], inner),
                at(&rim[k], inner),
                at(&rim[k], outer),
                at(&rim[i], outer),
            ];
            let wall = if upper {
                wall
            } else {
                [wall[3], wall[2], wall[1], wall[0]]
            };
            polygons.push(Polygon::from_points(&wall, metadata.clone()));
        }

        Ok(Mesh::from_polygons(&polygons, metadata))
    }
}

/// Every ray from the origin must cross the outline once: the polar angle of the
/// points may never step backwards and must wind once around.
fn ensure_star_shaped(ring: &[Point2<Real>]) -> Result<(), KernelError> {
    let n = ring.len();
    let mut total = 0.0;
    for i in 0..n {
        let p = ring[i];
        let q = ring[(i + 1) % n];
        let mut step = q.y.atan2(q.x) - p.y.atan2(p.x);
        if step > PI {
            step -= TAU;
        } else if step <= -PI {
            step += TAU;
        }
        if step < -1e-7 {
            return Err(KernelError::Degenerate(format!(
                "outline is not star-shaped around the axis near ({}, {})",
                p.x, p.y
            )));
        }
        total += step;
    }
    if (total - TAU).abs() > 1e-6 {
        return Err(KernelError::Degenerate(
            "outline does not wind once around the axis".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::CSG;
    use approx::assert_relative_eq;

    fn disc(radius: Real, n: usize) -> Sketch<()> {
        let pts: Vec<[Real; 2]> = (0..n)
            .map(|i| {
                let a = TAU * i as Real / n as Real;
                [radius * a.cos(), radius * a.sin()]
            })
            .collect();
        Sketch::polygon(&pts, None)
    }

    #[test]
    fn shell_volume_approaches_spherical_cap_difference() {
        // cone of half-angle 30° cut out of a shell between radii 9 and 10
        let outer: Real = 10.0;
        let inner: Real = 9.0;
        let half = (30.0 as Real).to_radians();
        let shell =
            Mesh::<()>::spherical_shell(&disc(outer * half.sin(), 128), outer, inner, 16, true, None)
                .unwrap();
        let solid_angle = TAU * (1.0 - half.cos());
        let expected = solid_angle * (outer.powi(3) - inner.powi(3)) / 3.0;
        assert_relative_eq!(shell.volume(), expected, max_relative = 0.02);

        let bb = shell.bounding_box();
        assert_relative_eq!(bb.maxs.z, outer, epsilon = 1e-9);
        assert!(bb.mins.z > 0.0);
    }

    #[test]
    fn lower_hemisphere_is_outward_facing() {
        let shell = Mesh::<()>::spherical_shell(&disc(3.0, 32), 5.0, 6.0, 4, false, None).unwrap();
        assert!(shell.volume() > 0.0);
        assert!(shell.bounding_box().maxs.z < 0.0);
    }

    #[test]
    fn footprint_outside_sphere_is_rejected() {
        assert!(matches!(
            Mesh::<()>::spherical_shell(&disc(6.0, 16), 5.0, 4.0, 2, true, None),
            Err(KernelError::ProjectionMissesSphere { .. })
        ));
    }

    #[test]
    fn off_axis_outline_is_rejected() {
        let off: Sketch<()> =
            Sketch::polygon(&[[1.0, 1.0], [2.0, 1.0], [2.0, 2.0], [1.0, 2.0]], None);
        assert!(matches!(
            Mesh::<()>::spherical_shell(&off, 5.0, 4.0, 2, true, None),
            Err(KernelError::Degenerate(_))
        ));
    }
}
