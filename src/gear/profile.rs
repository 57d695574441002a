//! Closed tooth outline of a full gear

use super::{GearGeometry, GearSpec, ROOT_CORNER_FILLET_RADIUS, RootCase, involute_point};
use crate::errors::{GearError, ProfileError};
use crate::float_types::{Real, tolerance};
use log::debug;
use nalgebra::{Point2, Rotation2, Vector2};

/// One piece of a [`ToothProfile`]. Each segment starts where the previous one ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Straight line to `to`.
    Line { to: Point2<Real> },
    /// Circular arc of `|signed_radius|` to `to`, never longer than a half turn.
    ///
    /// A negative radius puts the center on the left of the chord, so the arc turns
    /// counter-clockwise; a positive radius turns clockwise.
    ArcByRadius {
        to: Point2<Real>,
        signed_radius: Real,
    },
    /// Sampled involute flank. The points follow the previous segment's end point.
    SampledCurve { points: Vec<Point2<Real>> },
}

impl Segment {
    /// Where this segment ends.
    pub fn end(&self) -> Point2<Real> {
        match self {
            Segment::Line { to } | Segment::ArcByRadius { to, .. } => *to,
            // Never empty: the accumulator only stores non-empty curves.
            Segment::SampledCurve { points } => points[points.len() - 1],
        }
    }

    pub const fn is_line(&self) -> bool {
        matches!(self, Segment::Line { .. })
    }
}

/// Center of the arc from `from` to `to` with the given signed radius, or `None`
/// when the radius is too small to span the chord.
pub fn arc_center(
    from: Point2<Real>,
    to: Point2<Real>,
    signed_radius: Real,
) -> Option<Point2<Real>> {
    let chord = to - from;
    let half = chord.norm() * 0.5;
    let radius = signed_radius.abs();
    if half <= Real::EPSILON || radius < half * (1.0 - tolerance()) {
        return None;
    }
    let sagitta_offset = (radius * radius - half * half).max(0.0).sqrt();
    let dir = chord / (2.0 * half);
    let left = Vector2::new(-dir.y, dir.x);
    let mid = from + chord * 0.5;
    if signed_radius < 0.0 {
        Some(mid + left * sagitta_offset)
    } else {
        Some(mid - left * sagitta_offset)
    }
}

/// How the flank is continued from the base circle down to the root circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootFlank {
    /// Straight line, standing in for the trochoid a hobbing cutter would leave.
    #[default]
    Line,
}

/// Knobs of [`ProfileBuilder`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileOptions {
    /// Points per involute flank, not counting the flank start.
    pub involute_samples: usize,
    /// Fillet radius for root corners when the `GearSpec` does not name one.
    pub fillet_radius: Real,
    /// Vertices with `|p| < root_radius * root_vertex_tolerance` count as root vertices.
    pub root_vertex_tolerance: Real,
    pub root_flank: RootFlank,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            involute_samples: 16,
            fillet_radius: ROOT_CORNER_FILLET_RADIUS,
            root_vertex_tolerance: 1.001,
            root_flank: RootFlank::Line,
        }
    }
}

/// Fillet request attached to a profile: round `vertices` with `radius`.
#[derive(Debug, Clone, PartialEq)]
pub struct RootFillet {
    /// Indices into [`ToothProfile::vertices`].
    pub vertices: Vec<usize>,
    pub radius: Real,
}

/// Closed outline of every tooth of one gear, counter-clockwise around the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct ToothProfile {
    start: Point2<Real>,
    segments: Vec<Segment>,
    geometry: GearGeometry,
    root_fillet: Option<RootFillet>,
}

impl ToothProfile {
    pub const fn start(&self) -> Point2<Real> {
        self.start
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub const fn geometry(&self) -> &GearGeometry {
        &self.geometry
    }

    pub const fn root_case(&self) -> RootCase {
        self.geometry.root_case
    }

    pub const fn teeth(&self) -> usize {
        self.geometry.teeth
    }

    /// The fillet the kernel should apply to the root corners, if any.
    pub const fn root_fillet(&self) -> Option<&RootFillet> {
        self.root_fillet.as_ref()
    }

    /// Last point of the loop; equal to [`ToothProfile::start`] for a closed profile.
    pub fn end(&self) -> Point2<Real> {
        self.segments.last().map_or(self.start, Segment::end)
    }

    /// Corner points of the loop: the start and every segment end except the closing one.
    pub fn vertices(&self) -> Vec<Point2<Real>> {
        let mut vertices = Vec::with_capacity(self.segments.len());
        vertices.push(self.start);
        let open = self.segments.len().saturating_sub(1);
        vertices.extend(self.segments[..open].iter().map(Segment::end));
        vertices
    }

    /// Every explicit point of the loop, in order, including the closing point.
    pub fn points(&self) -> Vec<Point2<Real>> {
        let mut points = vec![self.start];
        for segment in &self.segments {
            match segment {
                Segment::Line { to } | Segment::ArcByRadius { to, .. } => points.push(*to),
                Segment::SampledCurve { points: curve } => points.extend_from_slice(curve),
            }
        }
        points
    }

    /// Whether the last point meets the first within `tol`.
    pub fn is_closed(&self, tol: Real) -> bool {
        (self.end() - self.start).norm() <= tol
    }
}

/// Ordered-segment accumulator: start at a point, append segments, close.
///
/// Each builder owns its accumulator; nothing is shared between builds.
#[derive(Debug, Clone)]
pub struct PathAccumulator {
    start: Point2<Real>,
    cursor: Point2<Real>,
    segments: Vec<Segment>,
}

impl PathAccumulator {
    pub const fn new(start: Point2<Real>) -> Self {
        Self {
            start,
            cursor: start,
            segments: Vec::new(),
        }
    }

    pub const fn cursor(&self) -> Point2<Real> {
        self.cursor
    }

    pub fn line_to(&mut self, to: Point2<Real>) {
        self.segments.push(Segment::Line { to });
        self.cursor = to;
    }

    pub fn arc_to(&mut self, to: Point2<Real>, signed_radius: Real) {
        self.segments.push(Segment::ArcByRadius { to, signed_radius });
        self.cursor = to;
    }

    pub fn curve_through(&mut self, points: Vec<Point2<Real>>) {
        if let Some(&last) = points.last() {
            self.cursor = last;
            self.segments.push(Segment::SampledCurve { points });
        }
    }

    /// Finish the loop. The cursor must be back within `tol` of the start; the last
    /// segment is then snapped onto the start point exactly.
    pub fn close(mut self, tol: Real) -> Result<(Point2<Real>, Vec<Segment>), ProfileError> {
        let gap = (self.cursor - self.start).norm();
        if gap > tol {
            return Err(ProfileError::InvariantViolation(format!(
                "profile does not close: last point is {gap} away from the first"
            )));
        }
        let start = self.start;
        match self.segments.last_mut() {
            None => {
                return Err(ProfileError::InvariantViolation(
                    "profile has no segments".to_string(),
                ));
            },
            Some(Segment::Line { to } | Segment::ArcByRadius { to, .. }) => *to = start,
            Some(Segment::SampledCurve { points }) => {
                if let Some(last) = points.last_mut() {
                    *last = start;
                }
            },
        }
        Ok((start, self.segments))
    }
}

/// Builds [`ToothProfile`]s from [`GearSpec`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProfileBuilder {
    options: ProfileOptions,
}

impl ProfileBuilder {
    pub const fn new(options: ProfileOptions) -> Self {
        Self { options }
    }

    pub const fn options(&self) -> &ProfileOptions {
        &self.options
    }

    /// Builds the closed outline of every tooth.
    ///
    /// Per tooth, starting at polar angle `2π·i/teeth`:
    /// root line (root inside base only), involute up to the tip, crest arc,
    /// reversed involute back down, root line (root inside base only), root arc to
    /// the next tooth. When root lines were emitted, the `2·teeth` corners on the
    /// root circle are recorded as the profile's [`RootFillet`].
    pub fn build(&self, spec: &GearSpec) -> Result<ToothProfile, GearError> {
        if self.options.involute_samples < 2 {
            return Err(GearError::InvalidSampleCount {
                samples: self.options.involute_samples,
            });
        }
        let geometry = spec.geometry()?;
        debug!(
            "gear m={} z={} internal={}: pitch={:.6} base={:.6} tip={:.6} root={:.6} case={:?}",
            geometry.module,
            geometry.teeth,
            geometry.internal,
            geometry.pitch_radius,
            geometry.base_radius,
            geometry.tip_radius,
            geometry.root_radius,
            geometry.root_case
        );

        let (start, segments) = match geometry.root_case {
            RootCase::RootInsideBase => self.trace(&geometry, true)?,
            RootCase::RootOutsideBase => self.trace(&geometry, false)?,
        };

        let mut profile = ToothProfile {
            start,
            segments,
            geometry,
            root_fillet: None,
        };

        if geometry.root_case == RootCase::RootInsideBase {
            let radius = spec.root_fillet.unwrap_or(self.options.fillet_radius);
            profile.root_fillet = Some(self.select_root_corners(&profile, radius)?);
        }

        Ok(profile)
    }

    fn trace(
        &self,
        g: &GearGeometry,
        root_lines: bool,
    ) -> Result<(Point2<Real>, Vec<Segment>), GearError> {
        let pitch = g.angular_pitch();
        let first = polar(g.root_radius, g.involute_start_angle);
        let mut path = PathAccumulator::new(first);

        for i in 0..g.teeth {
            let start_angle = pitch * i as Real;
            let end_angle = start_angle + 2.0 * g.involute_angle + g.tip_angle;

            if root_lines {
                path.line_to(polar(g.base_radius, start_angle));
            }
            path.curve_through(self.flank(g, start_angle, false)?);
            path.arc_to(
                polar(g.tip_radius, start_angle + g.involute_angle + g.tip_angle),
                -g.tip_radius,
            );
            path.curve_through(self.flank(g, end_angle, true)?);
            if root_lines {
                path.line_to(polar(g.root_radius, end_angle));
            }

            path.arc_to(
                polar(g.root_radius, pitch * (i + 1) as Real + g.involute_start_angle),
                -g.root_radius,
            );
        }

        Ok(path.close(g.module * 1e-6)?)
    }

    /// Samples of one flank, excluding the point the path is already at.
    fn flank(
        &self,
        g: &GearGeometry,
        offset: Real,
        reversed: bool,
    ) -> Result<Vec<Point2<Real>>, GearError> {
        let n = self.options.involute_samples;
        let (from, to) = if reversed {
            (g.tip_radius, g.involute_start_radius)
        } else {
            (g.involute_start_radius, g.tip_radius)
        };
        (1..=n)
            .map(|k| {
                let t = k as Real / n as Real;
                involute_point(from + (to - from) * t, g.base_radius, offset, reversed)
            })
            .collect()
    }

    fn select_root_corners(
        &self,
        profile: &ToothProfile,
        radius: Real,
    ) -> Result<RootFillet, ProfileError> {
        let limit = profile.geometry.root_radius * self.options.root_vertex_tolerance;
        let limit_sq = limit * limit;
        let vertices: Vec<usize> = profile
            .vertices()
            .iter()
            .enumerate()
            .filter(|(_, v)| v.coords.norm_squared() < limit_sq)
            .map(|(i, _)| i)
            .collect();

        let expected = 2 * profile.teeth();
        if vertices.len() != expected {
            return Err(ProfileError::InvariantViolation(format!(
                "expected {expected} vertices on the root circle, found {}",
                vertices.len()
            )));
        }
        debug!("root fillet r={radius} on {} corners", vertices.len());
        Ok(RootFillet { vertices, radius })
    }
}

/// Build a profile with [`ProfileOptions::default`].
pub fn build_profile(spec: &GearSpec) -> Result<ToothProfile, GearError> {
    ProfileBuilder::default().build(spec)
}

#[inline]
fn polar(radius: Real, angle: Real) -> Point2<Real> {
    Rotation2::new(angle) * Point2::new(radius, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float_types::PI;
    use approx::assert_relative_eq;

    #[test]
    fn arc_center_respects_sign() {
        let a = Point2::new(1.0, 0.0);
        let b = Point2::new(0.0, 1.0);
        let ccw = arc_center(a, b, -1.0).unwrap();
        assert_relative_eq!(ccw.coords.norm(), 0.0, epsilon = 1e-12);
        let cw = arc_center(a, b, 1.0).unwrap();
        assert_relative_eq!(cw.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(cw.y, 1.0, epsilon = 1e-12);
        assert!(arc_center(a, b, 0.5).is_none());
    }

    #[test]
    fn accumulator_rejects_open_path() {
        let mut path = PathAccumulator::new(Point2::new(1.0, 0.0));
        path.line_to(Point2::new(2.0, 0.0));
        assert!(path.close(1e-9).is_err());
        assert!(PathAccumulator::new(Point2::origin()).close(1e-9).is_err());
    }

    #[test]
    fn accumulator_snaps_closing_point() {
        let mut path = PathAccumulator::new(Point2::new(1.0, 0.0));
        path.line_to(Point2::new(0.0, 1.0));
        path.arc_to(Point2::new(1.0, 1e-12), -1.0);
        let (start, segments) = path.close(1e-9).unwrap();
        assert_eq!(segments[1].end(), start);
    }

    #[test]
    fn inside_case_segment_pattern() {
        let profile = build_profile(&GearSpec::new(1.0, 20)).unwrap();
        // line, involute, crest, involute, line, root arc
        assert_eq!(profile.segments().len(), 6 * 20);
        let first_tooth: Vec<&str> = profile.segments()[..6]
            .iter()
            .map(|s| match s {
                Segment::Line { .. } => "line",
                Segment::ArcByRadius { .. } => "arc",
                Segment::SampledCurve { .. } => "curve",
            })
            .collect();
        assert_eq!(first_tooth, ["line", "curve", "arc", "curve", "line", "arc"]);
    }

    #[test]
    fn flanks_have_configured_sample_count() {
        let builder = ProfileBuilder::new(ProfileOptions {
            involute_samples: 5,
            ..Default::default()
        });
        let profile = builder.build(&GearSpec::new(2.0, 12)).unwrap();
        for segment in profile.segments() {
            if let Segment::SampledCurve { points } = segment {
                assert_eq!(points.len(), 5);
            }
        }
    }

    #[test]
    fn rejects_single_sample() {
        let builder = ProfileBuilder::new(ProfileOptions {
            involute_samples: 1,
            ..Default::default()
        });
        assert!(matches!(
            builder.build(&GearSpec::new(1.0, 20)),
            Err(GearError::InvalidSampleCount { samples: 1 })
        ));
    }

    #[test]
    fn crest_ends_on_tip_circle() {
        let profile = build_profile(&GearSpec::new(1.0, 20)).unwrap();
        let Segment::ArcByRadius { to, signed_radius } = &profile.segments()[2] else {
            panic!("third segment should be the crest arc");
        };
        assert_relative_eq!(to.coords.norm(), 11.0, epsilon = 1e-9);
        assert_relative_eq!(*signed_radius, -11.0);
        let g = profile.geometry();
        assert_relative_eq!(
            to.y.atan2(to.x),
            g.involute_angle + g.tip_angle,
            epsilon = 1e-9
        );
        assert!(g.involute_angle + g.tip_angle < PI);
    }
}
