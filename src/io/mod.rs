//! Writing composed gears to disk.
//!
//! The format is picked from the file extension: `.stl` (binary, or ASCII on
//! request) behind the `stl-io` feature and `.dxf` (`3DFACE` entities) behind
//! `dxf-io`.

use crate::mesh::Mesh;
use log::info;
use std::fmt::Debug;
use std::path::Path;

#[cfg(feature = "stl-io")]
mod stl;

#[cfg(feature = "dxf-io")]
mod dxf;

#[cfg(feature = "stl-io")]
pub use stl::{to_stl_ascii, to_stl_binary};

#[cfg(feature = "dxf-io")]
pub use dxf::to_dxf;

/// Mesh export errors.
///
/// Formats are behind cargo feature-flags. When a feature is disabled the
/// corresponding variant does not exist.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("std::io::Error: {0}")]
    StdIo(#[from] std::io::Error),

    #[error("The path is malformed: {0}")]
    MalformedPath(String),
    #[error("No exporter for '.{0}' files in this build")]
    UnsupportedExtension(String),

    /// Error bubbled up from the `dxf` crate while writing the drawing.
    #[cfg(feature = "dxf-io")]
    #[error("DXF error: {0}")]
    Dxf(#[from] ::dxf::DxfError),
}

/// Write `mesh` to `path` in the format its extension names. `ascii` selects ASCII
/// over binary STL and is ignored by other formats.
pub fn export_mesh<S: Clone + Send + Sync + Debug>(
    mesh: &Mesh<S>,
    path: &Path,
    ascii: bool,
) -> Result<(), IoError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| IoError::MalformedPath(format!("{} has no extension", path.display())))?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("gear");

    let bytes = match extension.as_str() {
        #[cfg(feature = "stl-io")]
        "stl" if ascii => to_stl_ascii(mesh, name).into_bytes(),
        #[cfg(feature = "stl-io")]
        "stl" => to_stl_binary(mesh, name)?,
        #[cfg(feature = "dxf-io")]
        "dxf" => to_dxf(mesh)?,
        _ => return Err(IoError::UnsupportedExtension(extension)),
    };
    std::fs::write(path, &bytes)?;
    info!(
        "wrote {} triangles to {} ({} bytes)",
        mesh.triangle_count(),
        path.display(),
        bytes.len()
    );
    Ok(())
}
