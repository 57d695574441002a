//! Building many gears at once, one kernel context per gear.

use super::{GearRequest, SolidComposer};
use crate::errors::ComposeError;
use crate::kernel::{CsgKernel, GeometryKernel, Tessellation};
use crate::mesh::Mesh;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Compose every request on a fresh [`CsgKernel`]; results keep the order of
/// `requests`.
pub fn build_gears(
    requests: &[GearRequest],
    tessellation: Tessellation,
) -> Vec<Result<Mesh<()>, ComposeError>> {
    build_gears_with(requests, || CsgKernel::new(tessellation))
}

/// Compose every request, each on its own kernel from `make_kernel`.
#[cfg(not(feature = "parallel"))]
pub fn build_gears_with<K, F>(
    requests: &[GearRequest],
    make_kernel: F,
) -> Vec<Result<K::Solid, ComposeError>>
where
    K: GeometryKernel,
    F: Fn() -> K,
{
    requests
        .iter()
        .map(|request| SolidComposer::new(make_kernel()).compose(request))
        .collect()
}

/// Compose every request in parallel, each on its own kernel from `make_kernel`.
#[cfg(feature = "parallel")]
pub fn build_gears_with<K, F>(
    requests: &[GearRequest],
    make_kernel: F,
) -> Vec<Result<K::Solid, ComposeError>>
where
    K: GeometryKernel,
    K::Solid: Send,
    F: Fn() -> K + Sync,
{
    requests
        .par_iter()
        .map(|request| SolidComposer::new(make_kernel()).compose(request))
        .collect()
}
