//! 2D outlines in the XY plane, flattened from tooth profiles.
//!
//! A [`Sketch`] is a single closed polygon without holes, wound counter-clockwise.
//! It remembers where each vertex of the profile it was flattened from ended up,
//! so corners can still be addressed by their profile index after arcs have been
//! replaced by chords.

use crate::errors::KernelError;
use crate::float_types::{EPSILON, Real, TAU};
use crate::gear::{Segment, ToothProfile, arc_center};
use geo::{
    Area, Coord, LineString, Orient, Polygon as GeoPolygon, Translate, TriangulateEarcut,
    orient::Direction,
};
use nalgebra::{Point2, Vector2};
use std::fmt::Debug;

mod fillet;

#[derive(Clone, Debug)]
pub struct Sketch<S: Clone + Send + Sync + Debug> {
    /// Outline; the exterior ring is closed and counter-clockwise.
    pub geometry: GeoPolygon<Real>,

    /// Ring index of each addressable corner.
    corners: Vec<usize>,

    /// Circle the outline follows from corner `k` to corner `k + 1`, if it was an arc.
    arcs: Vec<Option<ArcSpan>>,

    /// Corner `k + 1` follows corner `k` in ring order (false after reorienting).
    forward: bool,

    pub metadata: Option<S>,
}

/// Circle carrying one stretch of a flattened outline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ArcSpan {
    pub center: Point2<Real>,
    pub radius: Real,
}

impl<S: Clone + Send + Sync + Debug> Sketch<S> {
    /// Outline through `points`; every point is an addressable corner.
    ///
    /// Clockwise input is reoriented, which reverses the corner numbering.
    pub fn polygon(points: &[[Real; 2]], metadata: Option<S>) -> Self {
        let ring: Vec<Point2<Real>> = points.iter().map(|&[x, y]| Point2::new(x, y)).collect();
        let corners = (0..ring.len()).collect();
        let arcs = vec![None; ring.len()];
        Self::from_ring(ring, corners, arcs, true, metadata)
    }

    /// `forward` tells whether `corners` are listed in the order `ring` runs.
    fn from_ring(
        ring: Vec<Point2<Real>>,
        mut corners: Vec<usize>,
        arcs: Vec<Option<ArcSpan>>,
        forward: bool,
        metadata: Option<S>,
    ) -> Self {
        let n = ring.len();
        let exterior = LineString::from(
            ring.iter()
                .map(|p| Coord { x: p.x, y: p.y })
                .collect::<Vec<_>>(),
        );
        let polygon = GeoPolygon::new(exterior, vec![]);
        let clockwise = polygon.signed_area() < 0.0;
        let geometry = if clockwise {
            for corner in &mut corners {
                *corner = (n - *corner) % n;
            }
            polygon.orient(Direction::Default)
        } else {
            polygon
        };
        Sketch {
            geometry,
            corners,
            arcs,
            forward: forward != clockwise,
            metadata,
        }
    }

    /// Flatten a closed tooth profile, replacing each arc by chords that subtend at
    /// most `max_arc_step` radians.
    ///
    /// Corner `k` of the sketch is vertex `k` of [`ToothProfile::vertices`].
    pub fn from_profile(
        profile: &ToothProfile,
        max_arc_step: Real,
        metadata: Option<S>,
    ) -> Result<Self, KernelError> {
        if !max_arc_step.is_finite() || max_arc_step <= 0.0 {
            return Err(KernelError::Degenerate(format!(
                "arc step must be > 0, got {max_arc_step}"
            )));
        }

        let start = profile.start();
        let mut ring = vec![start];
        let mut corners = vec![0];
        let segments = profile.segments();
        let mut arcs = Vec::with_capacity(segments.len());

        for (k, segment) in segments.iter().enumerate() {
            let from = ring[ring.len() - 1];
            let mut arc = None;
            match segment {
                Segment::Line { to } => push_point(&mut ring, *to),
                Segment::ArcByRadius { to, signed_radius } => {
                    arc = Some(push_arc(&mut ring, from, *to, *signed_radius, max_arc_step)?);
                },
                Segment::SampledCurve { points } => {
                    for p in points {
                        push_point(&mut ring, *p);
                    }
                },
            }
            arcs.push(arc);
            if k + 1 < segments.len() {
                corners.push(ring.len() - 1);
            }
        }

        // the last segment lands back on the start point
        if ring.len() > 1 && (ring[ring.len() - 1] - start).norm() <= EPSILON {
            ring.pop();
        }
        if ring.len() < 3 {
            return Err(KernelError::Degenerate(format!(
                "profile flattened to {} points",
                ring.len()
            )));
        }

        Ok(Self::from_ring(ring, corners, arcs, true, metadata))
    }

    /// Outline points without the closing duplicate.
    pub fn ring(&self) -> Vec<Point2<Real>> {
        let exterior = self.geometry.exterior();
        let n = exterior.0.len().saturating_sub(1);
        exterior.0[..n]
            .iter()
            .map(|c| Point2::new(c.x, c.y))
            .collect()
    }

    /// Number of addressable corners.
    pub fn corner_count(&self) -> usize {
        self.corners.len()
    }

    /// Ring index of corner `index`.
    pub fn corner(&self, index: usize) -> Option<usize> {
        self.corners.get(index).copied()
    }

    /// Circle of the stretch from corner `index` to the next corner, when that
    /// stretch is a flattened arc.
    pub(crate) fn arc_after(&self, index: usize) -> Option<ArcSpan> {
        self.arcs.get(index).copied().flatten()
    }

    /// Counter-clockwise area of the outline.
    pub fn area(&self) -> Real {
        self.geometry.signed_area()
    }

    /// Shift the outline in its plane.
    pub fn translate(&self, dx: Real, dy: Real) -> Self {
        let shift = Vector2::new(dx, dy);
        Sketch {
            geometry: self.geometry.translate(dx, dy),
            corners: self.corners.clone(),
            arcs: self
                .arcs
                .iter()
                .map(|arc| {
                    arc.map(|a| ArcSpan {
                        center: a.center + shift,
                        ..a
                    })
                })
                .collect(),
            forward: self.forward,
            metadata: self.metadata.clone(),
        }
    }

    /// Ear-clipping triangulation, every triangle counter-clockwise.
    pub fn triangulate(&self) -> Vec<[Point2<Real>; 3]> {
        self.geometry
            .earcut_triangles()
            .into_iter()
            .filter_map(|tri| {
                let [a, b, c] = tri.to_array().map(|p| Point2::new(p.x, p.y));
                let cross = (b - a).perp(&(c - a));
                if cross.abs() <= Real::EPSILON {
                    None
                } else if cross > 0.0 {
                    Some([a, b, c])
                } else {
                    Some([a, c, b])
                }
            })
            .collect()
    }
}

fn push_point(ring: &mut Vec<Point2<Real>>, p: Point2<Real>) {
    if ring.last().is_none_or(|last| (p - last).norm() > EPSILON) {
        ring.push(p);
    }
}

/// Chords of the arc from `from` to `to`; a negative radius sweeps counter-clockwise.
fn push_arc(
    ring: &mut Vec<Point2<Real>>,
    from: Point2<Real>,
    to: Point2<Real>,
    signed_radius: Real,
    max_step: Real,
) -> Result<ArcSpan, KernelError> {
    let center = arc_center(from, to, signed_radius).ok_or_else(|| {
        KernelError::Degenerate(format!(
            "no arc of radius {signed_radius} joins ({}, {}) and ({}, {})",
            from.x, from.y, to.x, to.y
        ))
    })?;
    let radius = (from - center).norm();
    let a0 = (from.y - center.y).atan2(from.x - center.x);
    let a1 = (to.y - center.y).atan2(to.x - center.x);
    let sweep = if signed_radius < 0.0 {
        (a1 - a0).rem_euclid(TAU)
    } else {
        -(a0 - a1).rem_euclid(TAU)
    };

    let steps = (sweep.abs() / max_step).ceil().max(1.0) as usize;
    for k in 1..steps {
        let a = a0 + sweep * k as Real / steps as Real;
        push_point(
            ring,
            Point2::new(center.x + radius * a.cos(), center.y + radius * a.sin()),
        );
    }
    push_point(ring, to);
    Ok(ArcSpan { center, radius })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gear::{GearSpec, build_profile};
    use approx::assert_relative_eq;

    #[test]
    fn clockwise_input_is_reoriented() {
        let cw: Sketch<()> =
            Sketch::polygon(&[[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]], None);
        assert_relative_eq!(cw.area(), 1.0);
        // corner 1 of the input was (0, 1)
        let ring = cw.ring();
        let idx = cw.corner(1).unwrap();
        assert_relative_eq!(ring[idx].x, 0.0);
        assert_relative_eq!(ring[idx].y, 1.0);
    }

    #[test]
    fn flattened_profile_keeps_vertices_as_corners() {
        let profile = build_profile(&GearSpec::new(1.0, 12)).unwrap();
        let sketch: Sketch<()> =
            Sketch::from_profile(&profile, (2.0 as Real).to_radians(), None).unwrap();
        let ring = sketch.ring();
        let vertices = profile.vertices();
        assert_eq!(sketch.corner_count(), vertices.len());
        for (k, v) in vertices.iter().enumerate() {
            let p = ring[sketch.corner(k).unwrap()];
            assert!((p - v).norm() < 1e-9, "corner {k} moved");
        }
        assert!(sketch.area() > 0.0);
    }

    #[test]
    fn arcs_stay_on_their_circle() {
        let profile = build_profile(&GearSpec::new(1.0, 12)).unwrap();
        let sketch: Sketch<()> =
            Sketch::from_profile(&profile, (1.0 as Real).to_radians(), None).unwrap();
        let g = profile.geometry();
        for p in sketch.ring() {
            let r = p.coords.norm();
            assert!(r >= g.root_radius - 1e-9 && r <= g.tip_radius + 1e-9);
        }
    }

    #[test]
    fn triangulation_covers_area() {
        let sq: Sketch<()> =
            Sketch::polygon(&[[0.0, 0.0], [2.0, 0.0], [2.0, 1.0], [1.0, 0.5], [0.0, 1.0]], None);
        let area: Real = sq
            .triangulate()
            .iter()
            .map(|[a, b, c]| 0.5 * (b - a).perp(&(c - a)))
            .sum();
        assert_relative_eq!(area, sq.area(), epsilon = 1e-12);
    }
}
