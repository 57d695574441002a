mod support;

use approx::assert_relative_eq;
use geargen::{
    errors::GearError,
    float_types::{Real, TAU},
    gear::{
        GearSpec, ProfileBuilder, ProfileOptions, ROOT_CORNER_FILLET_RADIUS, RootCase, Segment,
        ToothProfile, build_profile, involute_point,
    },
};
use nalgebra::Rotation2;
use support::polar_radius;

const TOL: Real = 1e-9;

/// External specs at the usual pressure angles plus a few ring gears.
fn representative_specs() -> Vec<GearSpec> {
    let mut specs = Vec::new();
    for teeth in [12, 20, 37, 60] {
        for pressure in [14.5, 20.0, 25.0] {
            specs.push(GearSpec::new(1.0, teeth).with_pressure_angle(pressure));
        }
    }
    specs.push(GearSpec::new(2.5, 24));
    for teeth in [30, 45, 60] {
        specs.push(GearSpec::new(1.0, teeth).as_internal());
        specs.push(GearSpec::new(1.0, teeth).with_pressure_angle(25.0).as_internal());
    }
    specs
}

fn distinct_points(profile: &ToothProfile) -> Vec<nalgebra::Point2<Real>> {
    let mut points = profile.points();
    points.pop();
    points
}

#[test]
fn profiles_close() {
    for spec in representative_specs() {
        let profile = build_profile(&spec).unwrap();
        assert!(profile.is_closed(TOL), "{spec:?} does not close");
        assert_eq!(profile.end(), profile.start());
        assert_eq!(profile.points().last(), Some(&profile.start()));
    }
}

#[test]
fn profiles_repeat_every_tooth() {
    for spec in representative_specs() {
        let profile = build_profile(&spec).unwrap();
        let points = distinct_points(&profile);
        assert_eq!(points.len() % spec.teeth, 0, "{spec:?}");
        let per_tooth = points.len() / spec.teeth;
        let rotation = Rotation2::new(TAU / spec.teeth as Real);
        for (i, p) in points.iter().enumerate() {
            let expected = points[(i + per_tooth) % points.len()];
            let rotated = rotation * p;
            assert!(
                (rotated - expected).norm() < 1e-7,
                "{spec:?}: point {i} maps to {rotated:?}, expected {expected:?}"
            );
        }
    }
}

#[test]
fn points_stay_between_root_and_tip() {
    for spec in representative_specs() {
        let profile = build_profile(&spec).unwrap();
        let g = profile.geometry();
        for p in profile.points() {
            let r = polar_radius(&p);
            assert!(r >= g.root_radius - 1e-7, "{spec:?}: {r} below root");
            assert!(r <= g.tip_radius + 1e-7, "{spec:?}: {r} above tip");
        }
    }
}

#[test]
fn root_corners_follow_root_case() {
    for spec in representative_specs() {
        let profile = build_profile(&spec).unwrap();
        let g = profile.geometry();
        let has_lines = profile.segments().iter().any(Segment::is_line);
        match profile.root_case() {
            RootCase::RootInsideBase => {
                assert!(g.root_radius < g.base_radius);
                assert!(has_lines);
                let fillet = profile.root_fillet().unwrap();
                assert_eq!(fillet.vertices.len(), 2 * spec.teeth, "{spec:?}");
                let vertices = profile.vertices();
                for &i in &fillet.vertices {
                    assert_relative_eq!(polar_radius(&vertices[i]), g.root_radius, epsilon = 1e-7);
                }
            },
            RootCase::RootOutsideBase => {
                assert!(g.root_radius >= g.base_radius);
                assert!(!has_lines, "{spec:?} has root lines");
                assert!(profile.root_fillet().is_none());
            },
        }
    }
}

#[test]
fn involute_starts_on_base_circle() {
    for base in [0.5, 9.396_926_207_859_083, 140.0] {
        let p = involute_point(base, base, 0.0, false).unwrap();
        assert_relative_eq!(p.x, base, epsilon = 1e-12);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-12);
    }
}

#[test]
fn involute_rejects_points_inside_base() {
    assert!(matches!(
        involute_point(5.0, 6.0, 0.0, false),
        Err(GearError::InvolutePointInsideBase { .. })
    ));
}

#[test]
fn standard_external_gear() {
    let profile = build_profile(&GearSpec::new(1.0, 20)).unwrap();
    let g = profile.geometry();
    assert_relative_eq!(g.pitch_radius, 10.0);
    assert_relative_eq!(g.base_radius, 9.397, epsilon = 1e-3);
    assert_relative_eq!(g.tip_radius, 11.0);
    assert_relative_eq!(g.root_radius, 8.75);
    assert_eq!(profile.root_case(), RootCase::RootInsideBase);
    assert_eq!(profile.teeth(), 20);
    assert!(profile.is_closed(TOL));
}

#[test]
fn root_corner_fillet_radius_is_module_independent() {
    assert_relative_eq!(ROOT_CORNER_FILLET_RADIUS, 0.1);
    for module in [0.3, 1.0, 10.0] {
        let profile = build_profile(&GearSpec::new(module, 20)).unwrap();
        assert_relative_eq!(profile.root_fillet().unwrap().radius, 0.1);
    }
}

#[test]
fn explicit_root_fillet_overrides_corner_radius() {
    let profile = build_profile(&GearSpec::new(1.0, 20).with_root_fillet(0.25)).unwrap();
    assert_relative_eq!(profile.root_fillet().unwrap().radius, 0.25);

    let builder = ProfileBuilder::new(ProfileOptions {
        fillet_radius: 0.05,
        ..Default::default()
    });
    let profile = builder.build(&GearSpec::new(1.0, 20)).unwrap();
    assert_relative_eq!(profile.root_fillet().unwrap().radius, 0.05);
}

#[test]
fn near_zero_pressure_angle_builds() {
    let profile = build_profile(&GearSpec::new(1.0, 20).with_pressure_angle(0.01)).unwrap();
    let g = profile.geometry();
    assert_relative_eq!(g.base_radius, g.pitch_radius, epsilon = 1e-4);
    assert!(profile.is_closed(TOL));
}

#[test]
fn steep_pressure_angle_is_rejected() {
    let result = build_profile(&GearSpec::new(1.0, 20).with_pressure_angle(89.0));
    assert!(matches!(
        result,
        Err(GearError::PointedTeeth { .. } | GearError::TeethOverlap { .. })
    ));
}

#[test]
fn internal_gear_at_20_degrees_keeps_root_lines() {
    let profile = build_profile(&GearSpec::new(1.0, 30).as_internal()).unwrap();
    let g = profile.geometry();
    assert_relative_eq!(g.tip_radius, g.pitch_radius + 1.25);
    assert_relative_eq!(g.root_radius, g.pitch_radius - 1.0);
    // base 14.095 sits just above the 14.0 root
    assert!(g.base_radius > g.root_radius);
    assert_eq!(profile.root_case(), RootCase::RootInsideBase);
    assert_eq!(profile.root_fillet().unwrap().vertices.len(), 60);
}

#[test]
fn internal_gear_at_25_degrees_has_no_fillet() {
    let spec = GearSpec::new(1.0, 30).with_pressure_angle(25.0).as_internal();
    let profile = build_profile(&spec).unwrap();
    assert_eq!(profile.root_case(), RootCase::RootOutsideBase);
    assert!(profile.root_fillet().is_none());

    assert!(matches!(
        build_profile(&spec.with_root_fillet(0.2)),
        Err(GearError::UnsupportedRootFillet { .. })
    ));
}

#[test]
fn single_tooth_has_no_root_circle() {
    // pitch radius 0.5 is smaller than the 1.25 dedendum
    assert!(matches!(
        build_profile(&GearSpec::new(1.0, 1)),
        Err(GearError::NonPositiveRootRadius { .. })
    ));
}

#[test]
fn builds_are_independent() {
    let spec = GearSpec::new(1.25, 33);
    let a = build_profile(&spec).unwrap();
    let b = std::thread::spawn(move || build_profile(&spec).unwrap())
        .join()
        .unwrap();
    assert_eq!(a, b);
}
