use geargen::{
    composer::{GearRequest, GearType, SolidComposer},
    io::{IoError, export_mesh},
    kernel::CsgKernel,
    mesh::Mesh,
};
use std::path::PathBuf;

fn small_gear() -> Mesh<()> {
    SolidComposer::new(CsgKernel::default())
        .compose(&GearRequest::new(GearType::Spur, 1.0, 10, 2.0))
        .unwrap()
}

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("geargen-{}-{name}", std::process::id()))
}

#[cfg(feature = "stl-io")]
#[test]
fn stl_ascii_names_the_solid() {
    let gear = small_gear();
    let text = gear.to_stl_ascii("spur_gear");
    assert!(text.starts_with("solid spur_gear\n"));
    assert!(text.trim_end().ends_with("endsolid spur_gear"));
    assert_eq!(text.matches("facet normal").count(), gear.triangle_count());
}

#[cfg(feature = "stl-io")]
#[test]
fn binary_stl_keeps_every_triangle() -> Result<(), Box<dyn std::error::Error>> {
    let gear = small_gear();
    let path = scratch("binary.stl");
    export_mesh(&gear, &path, false)?;

    let mut file = std::fs::File::open(&path)?;
    let read = stl_io::read_stl(&mut file)?;
    assert_eq!(read.faces.len(), gear.triangle_count());

    let _ = std::fs::remove_file(&path);
    Ok(())
}

#[cfg(feature = "stl-io")]
#[test]
fn ascii_flag_writes_text_stl() -> Result<(), Box<dyn std::error::Error>> {
    let path = scratch("ascii.STL");
    export_mesh(&small_gear(), &path, true)?;
    let text = std::fs::read_to_string(&path)?;
    assert!(text.starts_with("solid "));
    let _ = std::fs::remove_file(&path);
    Ok(())
}

#[cfg(feature = "dxf-io")]
#[test]
fn dxf_has_a_face_per_triangle() -> Result<(), Box<dyn std::error::Error>> {
    let gear = small_gear();
    let path = scratch("faces.dxf");
    export_mesh(&gear, &path, false)?;

    let drawing = dxf::Drawing::load_file(path.to_string_lossy().as_ref())?;
    let faces = drawing
        .entities()
        .filter(|e| matches!(e.specific, dxf::entities::EntityType::Face3D(_)))
        .count();
    assert_eq!(faces, gear.triangle_count());

    let _ = std::fs::remove_file(&path);
    Ok(())
}

#[test]
fn unknown_extension_is_rejected() {
    let path = scratch("gear.step");
    assert!(matches!(
        export_mesh(&small_gear(), &path, false),
        Err(IoError::UnsupportedExtension(ext)) if ext == "step"
    ));
    assert!(!path.exists());
}

#[test]
fn missing_extension_is_rejected() {
    assert!(matches!(
        export_mesh(&small_gear(), &scratch("gear"), false),
        Err(IoError::MalformedPath(_))
    ));
}

#[cfg(feature = "stl-io")]
#[test]
fn write_failure_keeps_the_io_error_as_source() {
    use std::error::Error;

    let path = scratch("no-such-dir").join("gear.stl");
    let error = export_mesh(&small_gear(), &path, false).unwrap_err();
    assert!(matches!(&error, IoError::StdIo(e) if e.kind() == std::io::ErrorKind::NotFound));
    assert!(error.to_string().starts_with("std::io::Error: "));
    assert!(error.source().is_some());
}

#[test]
fn unsupported_extension_message_names_the_extension() {
    let error = IoError::UnsupportedExtension("step".into());
    assert_eq!(error.to_string(), "No exporter for '.step' files in this build");
}
