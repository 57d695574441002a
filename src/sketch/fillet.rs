//! Rounding of selected outline corners.

use super::{ArcSpan, Sketch};
use crate::errors::KernelError;
use crate::float_types::{PI, Real, TAU};
use log::debug;
use nalgebra::{Point2, Vector2};
use std::fmt::Debug;

/// Slack when comparing how much of a stretch the fillets use up.
const FIT_SLACK: Real = 1e-9;

impl<S: Clone + Send + Sync + Debug> Sketch<S> {
    /// Replace each listed corner by a circular arc of `radius` tangent to both
    /// neighbouring stretches, approximated by `segments` chords.
    ///
    /// Stretches flattened from profile arcs are treated as the circles they came
    /// from, so a fillet next to a root arc touches the root circle and not one of
    /// its chords. Straight (180°) corners are left alone.
    ///
    /// The radius is never reduced: when the fillet would run past the end of a
    /// neighbouring stretch, or into the fillet at its other end, the call fails
    /// with [`KernelError::FilletDoesNotFit`].
    ///
    /// Corner numbering is preserved: a filleted corner maps to the first point of
    /// its arc.
    pub fn fillet_corners(
        &self,
        corners: &[usize],
        radius: Real,
        segments: usize,
    ) -> Result<Sketch<S>, KernelError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(KernelError::Degenerate(format!(
                "fillet radius must be > 0, got {radius}"
            )));
        }
        let ring = self.ring();
        let n = ring.len();
        let m = self.corner_count();

        let mut selected = Vec::with_capacity(corners.len());
        for &corner in corners {
            if corner >= m {
                return Err(KernelError::Degenerate(format!(
                    "corner {corner} does not exist, outline has {m}"
                )));
            }
            selected.push(corner);
        }
        selected.sort_unstable();
        selected.dedup();

        let segments = segments.max(1);
        let mut used: Vec<Real> = vec![0.0; m];
        let mut touched = vec![false; m];
        let mut dropped = vec![false; n];
        let mut rounded: Vec<Option<Vec<Point2<Real>>>> = vec![None; n];

        for &k in &selected {
            let c = self.corners[k];
            let corner = ring[c];
            // stretch `s` runs from corner `s` to corner `s + 1`
            let previous = (k + m - 1) % m;
            let (ahead, behind) = if self.forward { (k, previous) } else { (previous, k) };
            let far = |s: usize| if s == k { self.corners[(k + 1) % m] } else { self.corners[s] };

            let back = Side::new(corner, ring[(c + n - 1) % n], ring[far(behind)], self.arc_after(behind));
            let front = Side::new(corner, ring[(c + 1) % n], ring[far(ahead)], self.arc_after(ahead));
            let (Some(back), Some(front)) = (back, front) else {
                continue;
            };

            let u = back.tangent(corner);
            let v = front.tangent(corner);
            let theta = u.dot(&v).clamp(-1.0, 1.0).acos();
            if theta < 1e-6 || PI - theta < 1e-6 {
                continue;
            }
            let bisector = (u + v).normalize();
            let guess = corner + bisector * (radius / (theta / 2.0).sin());

            let no_fit = || KernelError::FilletDoesNotFit { corner: k, radius };
            let (Some(a), Some(b)) = (
                back.offset(corner, bisector, radius),
                front.offset(corner, bisector, radius),
            ) else {
                return Err(no_fit());
            };
            let center = a
                .intersect(&b)
                .into_iter()
                .min_by(|p, q| (p - guess).norm_squared().total_cmp(&(q - guess).norm_squared()))
                .ok_or_else(no_fit)?;

            let (t_in, along_in) = back.touch(corner, center);
            let (t_out, along_out) = front.touch(corner, center);
            for (side, along, stretch, far_index, step) in [
                (&back, along_in, behind, far(behind), n - 1),
                (&front, along_out, ahead, far(ahead), 1),
            ] {
                if along <= 0.0 || along > side.extent() * (1.0 + FIT_SLACK) {
                    return Err(no_fit());
                }
                touched[stretch] = true;
                if side.spans_stretch(ring[(c + step) % n], ring[far_index]) {
                    used[stretch] += along / side.extent();
                }
                let mut idx = (c + step) % n;
                while idx != far_index && side.covers(corner, ring[idx], along) {
                    dropped[idx] = true;
                    idx = (idx + step) % n;
                }
            }

            rounded[c] = Some(fillet_arc(center, t_in, t_out, segments));
        }

        if let Some(stretch) = used.iter().position(|&u| u > 1.0 + FIT_SLACK) {
            return Err(KernelError::FilletDoesNotFit {
                corner: stretch,
                radius,
            });
        }

        let mut out = Vec::with_capacity(n + selected.len() * segments);
        let mut new_index = vec![0usize; n];
        for i in 0..n {
            new_index[i] = out.len();
            if dropped[i] {
                continue;
            }
            match rounded[i].take() {
                Some(arc) => out.extend(arc),
                None => out.push(ring[i]),
            }
        }
        debug!(
            "filleted {} corner(s) with r={radius}, outline grew from {n} to {} points",
            selected.len(),
            out.len()
        );

        let corner_map = self.corners.iter().map(|&idx| new_index[idx]).collect();
        let arcs = (0..m)
            .map(|s| if touched[s] { None } else { self.arc_after(s) })
            .collect();
        Ok(Sketch::from_ring(
            out,
            corner_map,
            arcs,
            self.forward,
            self.metadata.clone(),
        ))
    }
}

/// The stretch of outline running away from a corner.
#[derive(Debug, Clone, Copy)]
enum Side {
    /// Straight run of `length` along the unit `direction`.
    Line {
        direction: Vector2<Real>,
        length: Real,
    },
    /// Run along `circle` for `sweep` radians, counter-clockwise when `turn` is 1
    /// and clockwise when it is -1.
    Arc {
        circle: ArcSpan,
        turn: Real,
        sweep: Real,
    },
}

/// Curve the fillet center must lie on to keep `radius` away from one side.
#[derive(Debug, Clone, Copy)]
enum Offset {
    Line {
        point: Point2<Real>,
        direction: Vector2<Real>,
    },
    Circle {
        center: Point2<Real>,
        radius: Real,
    },
}

impl Side {
    /// Side from `corner` through its ring neighbour `toward`, ending at the corner
    /// `far`. Without a circle the side is the straight edge to `toward`.
    fn new(
        corner: Point2<Real>,
        toward: Point2<Real>,
        far: Point2<Real>,
        circle: Option<ArcSpan>,
    ) -> Option<Side> {
        let step = toward - corner;
        if step.norm() <= Real::EPSILON {
            return None;
        }
        match circle {
            Some(circle) => {
                let turn = if (corner - circle.center).perp(&step) >= 0.0 { 1.0 } else { -1.0 };
                let mut sweep = angle_along(&circle, turn, corner, far);
                if sweep <= Real::EPSILON {
                    sweep = TAU;
                }
                Some(Side::Arc {
                    circle,
                    turn,
                    sweep,
                })
            },
            None => Some(Side::Line {
                direction: step.normalize(),
                length: step.norm(),
            }),
        }
    }

    /// Unit direction leaving the corner.
    fn tangent(&self, corner: Point2<Real>) -> Vector2<Real> {
        match self {
            Side::Line { direction, .. } => *direction,
            Side::Arc { circle, turn, .. } => {
                let radial = (corner - circle.center).normalize();
                Vector2::new(-radial.y, radial.x) * *turn
            },
        }
    }

    /// Length of a line side, or the sweep in radians of an arc side.
    fn extent(&self) -> Real {
        match self {
            Side::Line { length, .. } => *length,
            Side::Arc { sweep, .. } => *sweep,
        }
    }

    /// Whether the side reaches all the way to the next corner, so what a fillet
    /// takes from it counts against the fillet at that corner too.
    fn spans_stretch(&self, toward: Point2<Real>, far: Point2<Real>) -> bool {
        match self {
            Side::Line { .. } => toward == far,
            Side::Arc { .. } => true,
        }
    }

    fn offset(&self, corner: Point2<Real>, bisector: Vector2<Real>, radius: Real) -> Option<Offset> {
        match self {
            Side::Line { direction, .. } => {
                let normal = Vector2::new(-direction.y, direction.x);
                let sign = if normal.dot(&bisector) >= 0.0 { 1.0 } else { -1.0 };
                Some(Offset::Line {
                    point: corner + normal * (sign * radius),
                    direction: *direction,
                })
            },
            Side::Arc { circle, .. } => {
                let outside = (corner - circle.center).dot(&bisector) > 0.0;
                let offset = if outside {
                    circle.radius + radius
                } else {
                    circle.radius - radius
                };
                (offset > 0.0).then_some(Offset::Circle {
                    center: circle.center,
                    radius: offset,
                })
            },
        }
    }

    /// Tangent point of the fillet centered at `center`, and how far along the side
    /// it lies (negative when behind the corner).
    fn touch(&self, corner: Point2<Real>, center: Point2<Real>) -> (Point2<Real>, Real) {
        match self {
            Side::Line { direction, .. } => {
                let along = (center - corner).dot(direction);
                (corner + direction * along, along)
            },
            Side::Arc { circle, turn, .. } => {
                let point = circle.center + (center - circle.center).normalize() * circle.radius;
                let mut along = angle_along(circle, *turn, corner, point);
                if along > PI {
                    along -= TAU;
                }
                (point, along)
            },
        }
    }

    /// Whether `point`, on this side, lies within `along` of the corner.
    fn covers(&self, corner: Point2<Real>, point: Point2<Real>, along: Real) -> bool {
        match self {
            Side::Line { direction, .. } => (point - corner).dot(direction) <= along + FIT_SLACK,
            Side::Arc { circle, turn, .. } => {
                angle_along(circle, *turn, corner, point) <= along + FIT_SLACK
            },
        }
    }
}

impl Offset {
    fn intersect(&self, other: &Offset) -> Vec<Point2<Real>> {
        match (*self, *other) {
            (
                Offset::Line {
                    point: p,
                    direction: d,
                },
                Offset::Line {
                    point: q,
                    direction: e,
                },
            ) => {
                let denom = d.perp(&e);
                if denom.abs() <= Real::EPSILON {
                    return Vec::new();
                }
                vec![p + d * ((q - p).perp(&e) / denom)]
            },
            (Offset::Line { point, direction }, Offset::Circle { center, radius })
            | (Offset::Circle { center, radius }, Offset::Line { point, direction }) => {
                let d = point - center;
                let b = d.dot(&direction);
                let disc = b * b - (d.norm_squared() - radius * radius);
                if disc < 0.0 {
                    return Vec::new();
                }
                let root = disc.sqrt();
                vec![point + direction * (-b - root), point + direction * (-b + root)]
            },
            (
                Offset::Circle {
                    center: c1,
                    radius: r1,
                },
                Offset::Circle {
                    center: c2,
                    radius: r2,
                },
            ) => {
                let d = c2 - c1;
                let dist = d.norm();
                if dist <= Real::EPSILON || dist > r1 + r2 || dist < (r1 - r2).abs() {
                    return Vec::new();
                }
                let a = (r1 * r1 - r2 * r2 + dist * dist) / (2.0 * dist);
                let h = (r1 * r1 - a * a).max(0.0).sqrt();
                let mid = c1 + d * (a / dist);
                let across = Vector2::new(-d.y, d.x) / dist;
                vec![mid + across * h, mid - across * h]
            },
        }
    }
}

/// Angle swept around `circle` going from `from` to `to` in the `turn` sense, in
/// `[0, 2π)`.
fn angle_along(circle: &ArcSpan, turn: Real, from: Point2<Real>, to: Point2<Real>) -> Real {
    let a0 = (from.y - circle.center.y).atan2(from.x - circle.center.x);
    let a1 = (to.y - circle.center.y).atan2(to.x - circle.center.x);
    (turn * (a1 - a0)).rem_euclid(TAU)
}

/// Chords of the short arc around `center` from `from` to `to`, both included.
fn fillet_arc(
    center: Point2<Real>,
    from: Point2<Real>,
    to: Point2<Real>,
    segments: usize,
) -> Vec<Point2<Real>> {
    let r = (from - center).norm();
    let a0 = (from.y - center.y).atan2(from.x - center.x);
    let a1 = (to.y - center.y).atan2(to.x - center.x);
    let mut sweep = a1 - a0;
    if sweep > PI {
        sweep -= TAU;
    } else if sweep < -PI {
        sweep += TAU;
    }

    let mut arc = Vec::with_capacity(segments + 1);
    arc.push(from);
    for k in 1..segments {
        let a = a0 + sweep * k as Real / segments as Real;
        arc.push(Point2::new(center.x + r * a.cos(), center.y + r * a.sin()));
    }
    arc.push(to);
    arc
}
