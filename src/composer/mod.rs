//! Turning tooth profiles into gear solids.
//!
//! [`SolidComposer`] builds the profile a [`GearRequest`] describes and drives a
//! [`GeometryKernel`] through the primitive calls each [`GearType`] needs:
//!
//! | type | solid |
//! |---|---|
//! | `spur` | straight extrusion |
//! | `helical` | twisted extrusion |
//! | `herringbone` | half-width twisted extrusion, mirrored about its top face and united |
//! | `internal*` | the above, subtracted from a cylinder of the outer diameter |
//! | `bevel` | profile projected onto the pitch-cone sphere, thickened, flats trimmed |

use crate::errors::ComposeError;
use crate::float_types::Real;
use crate::gear::{GearSpec, ProfileBuilder, ProfileOptions, ToothProfile};
use crate::kernel::GeometryKernel;
use log::{debug, info};
use std::fmt;
use std::str::FromStr;

mod batch;
mod bevel;
mod parallel_shaft;

pub use batch::{build_gears, build_gears_with};
pub use bevel::BevelGeometry;
pub use parallel_shaft::{helix_twist_degrees, transverse_from_normal};

/// Default helix angle in degrees.
pub const DEFAULT_HELIX_ANGLE: Real = 20.0;
/// Default angle between the shafts of a bevel pair, in degrees.
pub const DEFAULT_SHAFT_ANGLE: Real = 90.0;
/// Default share of the pitch radius kept flat at the bevel gear's faces.
pub const DEFAULT_FLAT_PART_COEFF: Real = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GearType {
    Spur,
    Helical,
    Herringbone,
    Internal,
    InternalHelical,
    InternalHerringbone,
    Bevel,
}

/// How the profile is swept into a parallel-shaft gear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sweep {
    Straight,
    Twisted,
    Herringbone,
}

impl GearType {
    pub const ALL: [GearType; 7] = [
        GearType::Spur,
        GearType::Helical,
        GearType::Herringbone,
        GearType::Internal,
        GearType::InternalHelical,
        GearType::InternalHerringbone,
        GearType::Bevel,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            GearType::Spur => "spur",
            GearType::Helical => "helical",
            GearType::Herringbone => "herringbone",
            GearType::Internal => "internal",
            GearType::InternalHelical => "internal_helical",
            GearType::InternalHerringbone => "internal_herringbone",
            GearType::Bevel => "bevel",
        }
    }

    pub const fn is_internal(self) -> bool {
        matches!(
            self,
            GearType::Internal | GearType::InternalHelical | GearType::InternalHerringbone
        )
    }

    /// Sweep of a parallel-shaft type; `None` for bevel gears.
    pub const fn sweep(self) -> Option<Sweep> {
        match self {
            GearType::Spur | GearType::Internal => Some(Sweep::Straight),
            GearType::Helical | GearType::InternalHelical => Some(Sweep::Twisted),
            GearType::Herringbone | GearType::InternalHerringbone => Some(Sweep::Herringbone),
            GearType::Bevel => None,
        }
    }

    /// Whether teeth run along a helix.
    pub const fn is_helical(self) -> bool {
        matches!(self.sweep(), Some(Sweep::Twisted | Sweep::Herringbone))
    }
}

impl fmt::Display for GearType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GearType {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GearType::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| ComposeError::UnsupportedGearType(s.to_string()))
    }
}

/// Everything needed to build one gear solid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GearRequest {
    pub gear_type: GearType,
    pub module: Real,
    pub teeth: usize,
    /// Face width; the gear occupies `0 <= z <= width` (parallel shaft types).
    pub width: Real,
    /// Degrees.
    pub pressure_angle: Real,
    pub root_fillet: Option<Real>,
    /// Degrees; used by helical and herringbone types.
    pub helix_angle: Real,
    /// Module and pressure angle are given in the normal plane of the teeth.
    pub normal: bool,
    /// Required by internal types.
    pub outer_diameter: Option<Real>,
    /// Required by bevel gears.
    pub counterpart_teeth: Option<usize>,
    /// Degrees; bevel gears only.
    pub shaft_angle: Real,
    /// Bevel gears only.
    pub flat_part_coeff: Real,
}

impl GearRequest {
    pub const fn new(gear_type: GearType, module: Real, teeth: usize, width: Real) -> Self {
        Self {
            gear_type,
            module,
            teeth,
            width,
            pressure_angle: crate::gear::DEFAULT_PRESSURE_ANGLE,
            root_fillet: None,
            helix_angle: DEFAULT_HELIX_ANGLE,
            normal: false,
            outer_diameter: None,
            counterpart_teeth: None,
            shaft_angle: DEFAULT_SHAFT_ANGLE,
            flat_part_coeff: DEFAULT_FLAT_PART_COEFF,
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

    pub const fn with_helix_angle(mut self, degrees: Real) -> Self {
        self.helix_angle = degrees;
        self
    }

    pub const fn with_normal_module(mut self, normal: bool) -> Self {
        self.normal = normal;
        self
    }

    pub const fn with_outer_diameter(mut self, diameter: Real) -> Self {
        self.outer_diameter = Some(diameter);
        self
    }

    pub const fn with_counterpart_teeth(mut self, teeth: usize) -> Self {
        self.counterpart_teeth = Some(teeth);
        self
    }

    pub const fn with_shaft_angle(mut self, degrees: Real) -> Self {
        self.shaft_angle = degrees;
        self
    }

    pub const fn with_flat_part_coeff(mut self, coeff: Real) -> Self {
        self.flat_part_coeff = coeff;
        self
    }

    /// Pitch radius of the requested module, before any normal-plane conversion.
    pub fn pitch_radius(&self) -> Real {
        self.module * self.teeth as Real / 2.0
    }

    /// The profile spec: transverse module and pressure angle, internal proportions
    /// for ring gears.
    pub fn profile_spec(&self) -> GearSpec {
        let (module, pressure_angle) = if self.normal && self.gear_type.is_helical() {
            transverse_from_normal(self.module, self.pressure_angle, self.helix_angle)
        } else {
            (self.module, self.pressure_angle)
        };
        GearSpec {
            module,
            teeth: self.teeth,
            pressure_angle,
            root_fillet: self.root_fillet,
            internal: self.gear_type.is_internal(),
        }
    }

    /// Check the type-specific parameters; profile parameters are checked by
    /// [`GearSpec::validate`].
    pub fn validate(&self) -> Result<(), ComposeError> {
        let kind = self.gear_type.name();
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(invalid("width", self.width, "must be > 0"));
        }
        if self.gear_type.is_helical()
            && (!self.helix_angle.is_finite() || self.helix_angle.abs() >= 90.0)
        {
            return Err(invalid("helix_angle", self.helix_angle, "must be in (-90, 90) degrees"));
        }
        if self.gear_type.is_internal() {
            let diameter = self.outer_diameter.ok_or(ComposeError::MissingParameter {
                parameter: "outer_diameter",
                gear_type: kind,
            })?;
            if !diameter.is_finite() || diameter <= 0.0 {
                return Err(invalid("outer_diameter", diameter, "must be > 0"));
            }
        }
        if self.gear_type == GearType::Bevel {
            let counterpart = self.counterpart_teeth.ok_or(ComposeError::MissingParameter {
                parameter: "counterpart_teeth",
                gear_type: kind,
            })?;
            if counterpart < 1 {
                return Err(invalid("counterpart_teeth", counterpart as Real, "must be >= 1"));
            }
            if !self.shaft_angle.is_finite() || self.shaft_angle <= 0.0 || self.shaft_angle >= 180.0
            {
                return Err(invalid("shaft_angle", self.shaft_angle, "must be in (0, 180) degrees"));
            }
            if !self.flat_part_coeff.is_finite()
                || self.flat_part_coeff <= 0.0
                || self.flat_part_coeff >= 1.0
            {
                return Err(invalid("flat_part_coeff", self.flat_part_coeff, "must be in (0, 1)"));
            }
        }
        self.profile_spec().validate()?;
        Ok(())
    }
}

pub(crate) const fn invalid(parameter: &'static str, value: Real, reason: &'static str) -> ComposeError {
    ComposeError::InvalidParameter {
        parameter,
        value,
        reason,
    }
}

/// Builds gear solids on one kernel context.
#[derive(Debug, Clone)]
pub struct SolidComposer<K: GeometryKernel> {
    kernel: K,
    builder: ProfileBuilder,
}

impl<K: GeometryKernel> SolidComposer<K> {
    pub fn new(kernel: K) -> Self {
        Self {
            kernel,
            builder: ProfileBuilder::default(),
        }
    }

    pub fn with_profile_options(mut self, options: ProfileOptions) -> Self {
        self.builder = ProfileBuilder::new(options);
        self
    }

    pub const fn kernel(&self) -> &K {
        &self.kernel
    }

    pub fn into_kernel(self) -> K {
        self.kernel
    }

    /// Build the solid `request` describes.
    pub fn compose(&mut self, request: &GearRequest) -> Result<K::Solid, ComposeError> {
        request.validate()?;
        let solid = match request.gear_type.sweep() {
            Some(sweep) => self.parallel_shaft(request, sweep)?,
            None => self.bevel(request)?,
        };
        info!(
            "composed {} gear: module {}, {} teeth, width {}",
            request.gear_type, request.module, request.teeth, request.width
        );
        Ok(solid)
    }

    /// Profile for `spec` as a kernel wire, root corners filleted when the profile
    /// asks for it.
    fn profile_wire(&mut self, spec: &GearSpec) -> Result<(ToothProfile, K::Wire), ComposeError> {
        let profile = self.builder.build(spec)?;
        let mut wire = self.kernel.wire_from_profile(&profile)?;
        if let Some(fillet) = profile.root_fillet() {
            debug!(
                "filleting {} root corners with r={}",
                fillet.vertices.len(),
                fillet.radius
            );
            wire = self
                .kernel
                .fillet_2d(&wire, &fillet.vertices, fillet.radius)?;
        }
        Ok((profile, wire))
    }
}
