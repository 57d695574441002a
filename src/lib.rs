//! Involute gear generation, from tooth outline to solid.
//!
//! The [`gear`] module computes the closed 2D outline of a spur or internal gear
//! (involute flanks, tip and root arcs, fillet vertices at the root corners). The
//! [`composer`] turns that outline into spur, helical, herringbone, internal and
//! bevel gear solids through a [`kernel::GeometryKernel`]; [`kernel::CsgKernel`]
//! implements it on polygon meshes stored in [BSP](mesh::bsp) trees.
//!
//! ```
//! use geargen::composer::{GearRequest, GearType, SolidComposer};
//! use geargen::kernel::CsgKernel;
//!
//! let request = GearRequest::new(GearType::Helical, 1.0, 12, 4.0).with_helix_angle(15.0);
//! let gear = SolidComposer::new(CsgKernel::default()).compose(&request).unwrap();
//! assert!(gear.volume() > 0.0);
//! ```
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//! - [**stl-io**](https://en.wikipedia.org/wiki/STL_(file_format)): `.stl` export
//! - [**dxf-io**](https://en.wikipedia.org/wiki/AutoCAD_DXF): `.dxf` export
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon to build batches of gears on all cores

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod composer;
pub mod errors;
pub mod float_types;
pub mod gear;
pub mod io;
pub mod kernel;
pub mod mesh;
pub mod sketch;
pub mod traits;
pub mod triangulated;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use composer::{GearRequest, GearType, SolidComposer};
pub use gear::{GearSpec, ProfileBuilder, ToothProfile};
pub use kernel::{CsgKernel, GeometryKernel};
pub use mesh::Mesh;
pub use traits::CSG;
