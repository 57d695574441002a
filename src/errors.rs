//! Error types for profile construction, kernel calls and gear composition

use crate::float_types::Real;

/// Rejected gear parameters, unsupported configurations and broken profile invariants.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GearError {
    /// (NonPositiveModule) The module must be a finite value above zero
    #[error("(NonPositiveModule) module must be > 0, got {module}")]
    NonPositiveModule { module: Real },
    /// (TooFewTeeth) The tooth count is below what the gear kind needs
    #[error("(TooFewTeeth) at least {minimum} teeth required, got {teeth}")]
    TooFewTeeth { teeth: usize, minimum: usize },
    /// (PressureAngleOutOfRange) The pressure angle must lie strictly between 0 and 90 degrees
    #[error("(PressureAngleOutOfRange) pressure angle must be in (0, 90) degrees, got {degrees}")]
    PressureAngleOutOfRange { degrees: Real },
    /// (TipInsideBase) The involute can not reach the tip circle
    #[error(
        "(TipInsideBase) tip radius {tip_radius} is smaller than base radius {base_radius}, the involute is undefined"
    )]
    TipInsideBase { tip_radius: Real, base_radius: Real },
    /// (NonPositiveRootRadius) The dedendum swallows the whole pitch circle
    #[error("(NonPositiveRootRadius) root radius must be > 0, got {root_radius}")]
    NonPositiveRootRadius { root_radius: Real },
    /// (PointedTeeth) The crest arc has no width left
    #[error("(PointedTeeth) tooth crest angle must be > 0, got {tip_angle} rad")]
    PointedTeeth { tip_angle: Real },
    /// (TeethOverlap) Neighbouring teeth leave no room for a root arc
    #[error("(TeethOverlap) root gap angle must be > 0, got {gap_angle} rad")]
    TeethOverlap { gap_angle: Real },
    /// (InvalidRootFillet) A root fillet radius must be finite and above zero
    #[error("(InvalidRootFillet) root fillet radius must be > 0, got {radius}")]
    InvalidRootFillet { radius: Real },
    /// (UnsupportedRootFillet) Fillets are only placed where a root line meets the root arc
    #[error(
        "(UnsupportedRootFillet) root fillet requested but root radius {root_radius} is not inside base radius {base_radius}"
    )]
    UnsupportedRootFillet { root_radius: Real, base_radius: Real },
    /// (InvalidSampleCount) An involute flank needs at least two samples
    #[error("(InvalidSampleCount) involute sample count must be >= 2, got {samples}")]
    InvalidSampleCount { samples: usize },
    /// (InvolutePointInsideBase) An involute point was requested below its base circle
    #[error(
        "(InvolutePointInsideBase) radius {radius} is inside base radius {base_radius}"
    )]
    InvolutePointInsideBase { radius: Real, base_radius: Real },
    /// (Invariant) A geometric invariant of a finished profile does not hold
    #[error(transparent)]
    Invariant(#[from] ProfileError),
}

/// Violations detected after a profile has been assembled.
///
/// These indicate a bug or an input combination the construction does not support;
/// they are never repaired.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    /// (InvariantViolation) Anything that breaks the closed-loop contract
    #[error("(InvariantViolation) {0}")]
    InvariantViolation(String),
}

/// Failures raised by a [`GeometryKernel`](crate::kernel::GeometryKernel) implementation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KernelError {
    /// The kernel does not implement the request
    #[error("unsupported kernel operation: {0}")]
    Unsupported(String),
    /// The input geometry is degenerate for the requested operation
    #[error("degenerate geometry: {0}")]
    Degenerate(String),
    /// A wire point has no intersection with the target sphere
    #[error("projection of ({x}, {y}) misses the sphere of radius {radius}")]
    ProjectionMissesSphere { x: Real, y: Real, radius: Real },
    /// A fillet of the requested radius runs past a neighbouring stretch
    #[error("fillet of radius {radius} does not fit at corner {corner}")]
    FilletDoesNotFit { corner: usize, radius: Real },
    /// A boolean or construction step produced nothing
    #[error("{0} produced an empty solid")]
    EmptyResult(&'static str),
    /// Profile data handed to the kernel was rejected
    #[error(transparent)]
    Gear(#[from] GearError),
}

/// Errors raised while turning a profile into a gear solid.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComposeError {
    #[error(transparent)]
    Gear(#[from] GearError),
    #[error(transparent)]
    Kernel(#[from] KernelError),
    /// A parameter the chosen gear type needs was not given
    #[error("{gear_type} gears require `{parameter}`")]
    MissingParameter {
        parameter: &'static str,
        gear_type: &'static str,
    },
    /// A type-specific parameter is out of range
    #[error("invalid `{parameter}`: {value} ({reason})")]
    InvalidParameter {
        parameter: &'static str,
        value: Real,
        reason: &'static str,
    },
    /// The gear type string is not one of the supported kinds
    #[error("unsupported gear type `{0}`")]
    UnsupportedGearType(String),
}
