//! Involute gear parameters and the closed tooth outline built from them.
//!
//! A [`GearSpec`] holds the handful of numbers a gear is described by. Its derived
//! radii and angles live in [`GearGeometry`], and [`ProfileBuilder`] turns both into
//! a [`ToothProfile`]: a closed, counter-clockwise loop of lines, arcs and sampled
//! involute flanks centered on the origin.
//!
//! ```text
//!          tip arc
//!        .-------.            tip radius      = pitch + addendum
//!       /         \           pitch radius    = module * teeth / 2
//!      | involute  |          base radius     = pitch * cos(pressure angle)
//!      |  flank    |          root radius     = pitch - dedendum
//!  ____|           |____      (addendum/dedendum swap for internal gears)
//!   root line   root arc
//! ```

use crate::errors::GearError;
use crate::float_types::{PI, Real, TAU};

mod involute;
mod profile;

pub use involute::{involute_function, involute_point, roll_angle};
pub use profile::{
    PathAccumulator, ProfileBuilder, ProfileOptions, RootFillet, RootFlank, Segment,
    ToothProfile, arc_center, build_profile,
};

/// Addendum of a standard tooth, in modules.
pub const ADDENDUM_COEFF: Real = 1.0;
/// Dedendum of a standard tooth, in modules.
pub const DEDENDUM_COEFF: Real = 1.25;
/// Nominal root fillet radius, in modules, used when a [`GearSpec`] does not name one.
pub const NOMINAL_ROOT_FILLET_COEFF: Real = 0.38;
/// Radius of the fillet placed where a root line meets the root arc.
///
/// Independent of the module: a 0.1 fillet is large on a 0.3 module gear and invisible
/// on a 10 module gear. Kept as-is until the scaling is settled.
pub const ROOT_CORNER_FILLET_RADIUS: Real = 0.1;
/// Default pressure angle in degrees.
pub const DEFAULT_PRESSURE_ANGLE: Real = 20.0;

/// Scalar description of one involute gear.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GearSpec {
    /// Pitch diameter divided by tooth count.
    pub module: Real,
    pub teeth: usize,
    /// Pressure angle in degrees.
    pub pressure_angle: Real,
    /// Root fillet radius; `None` means [`GearSpec::root_fillet_radius`] applies.
    pub root_fillet: Option<Real>,
    /// Ring gear: teeth point inward, material sits outside the tip circle.
    pub internal: bool,
}

impl GearSpec {
    /// An external gear with the default 20° pressure angle.
    pub const fn new(module: Real, teeth: usize) -> Self {
        Self {
            module,
            teeth,
            pressure_angle: DEFAULT_PRESSURE_ANGLE,
            root_fillet: None,
            internal: false,
        }
    }

    pub const fn with_pressure_angle(mut self, degrees: Real) -> Self {
        self.pressure_angle = degrees;
        self
    }

    pub const fn with_root_fillet(mut self, radius: Real) -> Self {
        self.root_fillet = Some(radius);
        self
    }

    /// Switch to the ring-gear proportions (addendum and dedendum swapped).
    pub const fn as_internal(mut self) -> Self {
        self.internal = true;
        self
    }

    /// The root fillet radius asked for, `0.38 * module` unless set.
    pub fn root_fillet_radius(&self) -> Real {
        self.root_fillet
            .unwrap_or(NOMINAL_ROOT_FILLET_COEFF * self.module)
    }

    /// Reject parameters no profile can be built from.
    pub fn validate(&self) -> Result<(), GearError> {
        if !self.module.is_finite() || self.module <= 0.0 {
            return Err(GearError::NonPositiveModule {
                module: self.module,
            });
        }
        if self.teeth < 1 {
            return Err(GearError::TooFewTeeth {
                teeth: self.teeth,
                minimum: 1,
            });
        }
        if !self.pressure_angle.is_finite()
            || self.pressure_angle <= 0.0
            || self.pressure_angle >= 90.0
        {
            return Err(GearError::PressureAngleOutOfRange {
                degrees: self.pressure_angle,
            });
        }
        if let Some(radius) = self.root_fillet {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(GearError::InvalidRootFillet { radius });
            }
        }
        Ok(())
    }

    /// Validate and compute every radius and angle the outline is built from.
    pub fn geometry(&self) -> Result<GearGeometry, GearError> {
        self.validate()?;
        GearGeometry::from_spec(self)
    }
}

/// Which way the involute flank meets the root circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootCase {
    /// The root circle lies inside the base circle: a straight line runs from the
    /// root up to where the involute starts, and the corner at the root is filleted.
    RootInsideBase,
    /// The involute reaches down to the root circle itself; the root arc closes the
    /// gap directly and no fillet is placed.
    RootOutsideBase,
}

/// Radii and angles derived from a [`GearSpec`], fixed for one profile build.
///
/// All angles are in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GearGeometry {
    pub teeth: usize,
    pub module: Real,
    pub internal: bool,
    pub pressure_angle: Real,
    pub pitch_radius: Real,
    pub base_radius: Real,
    pub tip_radius: Real,
    pub root_radius: Real,
    /// Roll angle of the involute from the base circle to the tip circle.
    pub involute_angle: Real,
    /// Roll angle of the involute at the pitch circle.
    pub pitch_involute_angle: Real,
    /// Angular width of the tooth crest.
    pub tip_angle: Real,
    /// Radius where the sampled flank begins: `max(base, root)`.
    pub involute_start_radius: Real,
    /// Polar angle of the flank start, zero when the flank starts on the base circle.
    pub involute_start_angle: Real,
    pub root_case: RootCase,
    /// `0.38 * module` or the explicit root fillet of the spec.
    pub nominal_root_fillet: Real,
}

impl GearGeometry {
    fn from_spec(spec: &GearSpec) -> Result<Self, GearError> {
        let module = spec.module;
        let teeth = spec.teeth as Real;
        let pressure_angle = spec.pressure_angle.to_radians();

        let pitch_radius = module * teeth / 2.0;
        let base_radius = pitch_radius * pressure_angle.cos();
        // Material sits on the other side of the pitch circle for a ring gear,
        // so the cutter outline gets the deeper half outside.
        let (tip_radius, root_radius) = if spec.internal {
            (
                pitch_radius + DEDENDUM_COEFF * module,
                pitch_radius - ADDENDUM_COEFF * module,
            )
        } else {
            (
                pitch_radius + ADDENDUM_COEFF * module,
                pitch_radius - DEDENDUM_COEFF * module,
            )
        };

        if tip_radius < base_radius {
            return Err(GearError::TipInsideBase {
                tip_radius,
                base_radius,
            });
        }
        if root_radius <= 0.0 {
            return Err(GearError::NonPositiveRootRadius { root_radius });
        }

        let involute_angle = roll_angle(tip_radius, base_radius)?;
        let pitch_involute_angle = involute_function(pressure_angle);
        // Tooth thickness on the pitch circle is half the circular pitch.
        let tip_angle = PI / teeth + 2.0 * (pitch_involute_angle - involute_angle);
        if !tip_angle.is_finite() || tip_angle <= 0.0 {
            return Err(GearError::PointedTeeth { tip_angle });
        }

        let root_case = if root_radius < base_radius {
            RootCase::RootInsideBase
        } else {
            RootCase::RootOutsideBase
        };
        if root_case == RootCase::RootOutsideBase && spec.root_fillet.is_some() {
            return Err(GearError::UnsupportedRootFillet {
                root_radius,
                base_radius,
            });
        }

        let involute_start_radius = base_radius.max(root_radius);
        let start = involute_point(involute_start_radius, base_radius, 0.0, false)?;
        let involute_start_angle = start.y.atan2(start.x);

        let geometry = Self {
            teeth: spec.teeth,
            module,
            internal: spec.internal,
            pressure_angle,
            pitch_radius,
            base_radius,
            tip_radius,
            root_radius,
            involute_angle,
            pitch_involute_angle,
            tip_angle,
            involute_start_radius,
            involute_start_angle,
            root_case,
            nominal_root_fillet: spec.root_fillet_radius(),
        };

        let gap_angle = geometry.gap_angle();
        if !gap_angle.is_finite() || gap_angle <= 0.0 {
            return Err(GearError::TeethOverlap { gap_angle });
        }

        Ok(geometry)
    }

    /// Angle between corresponding points of neighbouring teeth.
    pub fn angular_pitch(&self) -> Real {
        TAU / self.teeth as Real
    }

    /// Angle swept by one tooth from flank start to flank end.
    pub fn tooth_angle(&self) -> Real {
        2.0 * (self.involute_angle - self.involute_start_angle) + self.tip_angle
    }

    /// Angle swept by the root arc between two teeth.
    pub fn gap_angle(&self) -> Real {
        self.angular_pitch() - self.tooth_angle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn standard_external_radii() {
        let g = GearSpec::new(1.0, 20).geometry().unwrap();
        assert_relative_eq!(g.pitch_radius, 10.0);
        assert_relative_eq!(g.tip_radius, 11.0);
        assert_relative_eq!(g.root_radius, 8.75);
        assert_relative_eq!(g.base_radius, 9.396_926_207_859_083, epsilon = 1e-9);
        assert_eq!(g.root_case, RootCase::RootInsideBase);
        assert_relative_eq!(g.involute_start_radius, g.base_radius);
        assert_relative_eq!(g.involute_start_angle, 0.0);
    }

    #[test]
    fn internal_swaps_addendum_and_dedendum() {
        let g = GearSpec::new(1.0, 30).as_internal().geometry().unwrap();
        assert_relative_eq!(g.tip_radius, 16.25);
        assert_relative_eq!(g.root_radius, 14.0);
    }

    #[test]
    fn nominal_root_fillet_scales_with_module() {
        assert_relative_eq!(GearSpec::new(2.0, 20).root_fillet_radius(), 0.76);
        assert_relative_eq!(
            GearSpec::new(2.0, 20).with_root_fillet(0.2).root_fillet_radius(),
            0.2
        );
    }

    #[test]
    fn tooth_and_gap_fill_one_pitch() {
        let g = GearSpec::new(1.5, 17).geometry().unwrap();
        assert_relative_eq!(
            g.tooth_angle() + g.gap_angle(),
            g.angular_pitch(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn rejects_bad_scalars() {
        assert!(matches!(
            GearSpec::new(0.0, 20).geometry(),
            Err(GearError::NonPositiveModule { .. })
        ));
        assert!(matches!(
            GearSpec::new(1.0, 0).geometry(),
            Err(GearError::TooFewTeeth { .. })
        ));
        assert!(matches!(
            GearSpec::new(1.0, 20).with_pressure_angle(0.0).geometry(),
            Err(GearError::PressureAngleOutOfRange { .. })
        ));
        assert!(matches!(
            GearSpec::new(1.0, 20).with_pressure_angle(90.0).geometry(),
            Err(GearError::PressureAngleOutOfRange { .. })
        ));
        assert!(matches!(
            GearSpec::new(1.0, 20).with_root_fillet(-1.0).geometry(),
            Err(GearError::InvalidRootFillet { .. })
        ));
    }

    #[test]
    fn rejects_root_inside_origin() {
        assert!(matches!(
            GearSpec::new(1.0, 2).geometry(),
            Err(GearError::NonPositiveRootRadius { .. })
        ));
    }
}
