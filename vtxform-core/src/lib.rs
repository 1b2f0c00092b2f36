//! vtxform core library - transform kernel for shared vertex lists
//!
//! Resolves a [`TransformSpec`] (manual or computed matrix, rotation,
//! translation, scale) into one 4x4 homogeneous matrix and applies it in
//! place to a mesh's vertex buffer.
//!
//! ```
//! use nalgebra::Point3;
//! use vtxform_core::{apply, TransformSpec};
//!
//! let mut vertices = vec![Point3::new(0.0, 0.0, 2.0)];
//! apply(&mut vertices, &TransformSpec::scale(1.0, 1.0, 2.5)).unwrap();
//! assert_eq!(vertices[0], Point3::new(0.0, 0.0, 5.0));
//! ```

// Library code reports errors; tests may unwrap.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

pub mod config;
pub mod error;
pub mod geometry;
pub mod kernel;
pub mod parse;
pub mod transform;

// Re-export commonly used types
pub use config::ApplyConfig;
pub use error::{TransformError, TransformResult};
pub use geometry::{Bounds, QuadGeometry, VertexStorage};
pub use kernel::{apply, apply_matrix, apply_to, apply_with};
pub use parse::parse_transform;
pub use transform::{AngleUnit, Transform, TransformKind, TransformSpec};
