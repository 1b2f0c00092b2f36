/// Transformation specifications and homogeneous matrix construction
use std::fmt;

use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{TransformError, TransformResult};

/// Unit of a rotation angle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleUnit {
    #[default]
    Degrees,
    Radians,
}

impl AngleUnit {
    pub fn to_radians(self, angle: f64) -> f64 {
        match self {
            AngleUnit::Degrees => angle.to_radians(),
            AngleUnit::Radians => angle,
        }
    }
}

/// The five ways a transformation may be specified.
///
/// Discriminants follow the data-processing framework's
/// `transformation_matrix_type` numbering. Code 0 there means "no
/// transformation" and has no kind here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum TransformKind {
    Computed = 1,
    Manual = 2,
    Rotation = 3,
    Translation = 4,
    Scale = 5,
}

impl TransformKind {
    /// Map a framework type code onto a kind.
    pub fn from_code(code: u32) -> TransformResult<Self> {
        match code {
            1 => Ok(TransformKind::Computed),
            2 => Ok(TransformKind::Manual),
            3 => Ok(TransformKind::Rotation),
            4 => Ok(TransformKind::Translation),
            5 => Ok(TransformKind::Scale),
            other => Err(TransformError::invalid(format!(
                "unrecognized transform kind code {other}"
            ))),
        }
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            TransformKind::Computed => "computed",
            TransformKind::Manual => "manual",
            TransformKind::Rotation => "rotation",
            TransformKind::Translation => "translation",
            TransformKind::Scale => "scale",
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single transformation request.
///
/// Matrices are 16 values in row-major order, acting on column vectors
/// `(x, y, z, 1)`. Every variant resolves to one 4x4 homogeneous matrix via
/// [`TransformSpec::resolve`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransformSpec {
    Manual {
        matrix: [f32; 16],
    },
    /// A matrix looked up elsewhere and handed over already resolved
    Computed {
        matrix: [f32; 16],
    },
    Rotation {
        axis: Vector3<f32>,
        angle: f32,
        #[serde(default)]
        unit: AngleUnit,
        #[serde(default = "default_point")]
        point: Point3<f32>,
    },
    Translation {
        offset: Vector3<f32>,
    },
    Scale {
        factors: Vector3<f32>,
        #[serde(default)]
        origin: Option<Point3<f32>>,
    },
}

fn default_point() -> Point3<f32> {
    Point3::origin()
}

impl TransformSpec {
    pub fn manual(matrix: [f32; 16]) -> Self {
        TransformSpec::Manual { matrix }
    }

    pub fn identity() -> Self {
        #[rustfmt::skip]
        let matrix = [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        TransformSpec::Manual { matrix }
    }

    /// Wrap a resolved computed-matrix tuple, which must hold exactly 16 values.
    pub fn computed_from_slice(values: &[f32]) -> TransformResult<Self> {
        let matrix: [f32; 16] = values.try_into().map_err(|_| {
            TransformError::invalid(format!(
                "computed transformation matrix needs 16 components, got {}",
                values.len()
            ))
        })?;
        Ok(TransformSpec::Computed { matrix })
    }

    /// Rotation about an axis through the origin.
    pub fn rotation(axis: Vector3<f32>, angle: f32, unit: AngleUnit) -> Self {
        TransformSpec::Rotation {
            axis,
            angle,
            unit,
            point: Point3::origin(),
        }
    }

    /// Rotation about an axis through `point`.
    pub fn rotation_about(
        axis: Vector3<f32>,
        angle: f32,
        unit: AngleUnit,
        point: Point3<f32>,
    ) -> Self {
        TransformSpec::Rotation {
            axis,
            angle,
            unit,
            point,
        }
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        TransformSpec::Translation {
            offset: Vector3::new(x, y, z),
        }
    }

    pub fn scale(sx: f32, sy: f32, sz: f32) -> Self {
        TransformSpec::Scale {
            factors: Vector3::new(sx, sy, sz),
            origin: None,
        }
    }

    /// Scale that keeps `origin` fixed.
    pub fn scale_about(factors: Vector3<f32>, origin: Point3<f32>) -> Self {
        TransformSpec::Scale {
            factors,
            origin: Some(origin),
        }
    }

    pub fn kind(&self) -> TransformKind {
        match self {
            TransformSpec::Manual { .. } => TransformKind::Manual,
            TransformSpec::Computed { .. } => TransformKind::Computed,
            TransformSpec::Rotation { .. } => TransformKind::Rotation,
            TransformSpec::Translation { .. } => TransformKind::Translation,
            TransformSpec::Scale { .. } => TransformKind::Scale,
        }
    }

    /// Resolve this spec into its effective homogeneous matrix.
    ///
    /// Fails with [`TransformError::InvalidParameter`] on non-finite input or
    /// a zero rotation axis.
    pub fn resolve(&self) -> TransformResult<Matrix4<f32>> {
        match self {
            TransformSpec::Manual { matrix } | TransformSpec::Computed { matrix } => {
                ensure_finite(matrix, "transformation matrix")?;
                Ok(Matrix4::from_row_slice(matrix))
            }
            TransformSpec::Rotation {
                axis,
                angle,
                unit,
                point,
            } => {
                ensure_finite(axis.as_slice(), "rotation axis")?;
                ensure_finite(&[*angle], "rotation angle")?;
                ensure_finite(point.coords.as_slice(), "rotation point")?;
                let radians = unit.to_radians(f64::from(*angle));
                let rotation = Transform::rotation_matrix(axis, radians)
                    .ok_or_else(|| TransformError::invalid("rotation axis is the zero vector"))?;
                Ok(Transform::about_point(&rotation, point))
            }
            TransformSpec::Translation { offset } => {
                ensure_finite(offset.as_slice(), "translation")?;
                Ok(Transform::translation_matrix(offset.x, offset.y, offset.z))
            }
            TransformSpec::Scale { factors, origin } => {
                ensure_finite(factors.as_slice(), "scale")?;
                let scale = Transform::scale_matrix(factors.x, factors.y, factors.z);
                match origin {
                    Some(origin) => {
                        ensure_finite(origin.coords.as_slice(), "scale origin")?;
                        Ok(Transform::about_point(&scale, origin))
                    }
                    None => Ok(scale),
                }
            }
        }
    }
}

fn ensure_finite(values: &[f32], what: &str) -> TransformResult<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(TransformError::invalid(format!("{what} contains a non-finite value")))
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Axis-angle rotation (Rodrigues' formula), angle in radians.
    ///
    /// Returns `None` when the axis has no direction.
    #[allow(clippy::many_single_char_names)]
    pub fn rotation_matrix(axis: &Vector3<f32>, angle: f64) -> Option<Matrix4<f32>> {
        // f64 keeps the normalization safe for very large or very small axes
        let axis = axis.map(f64::from);
        let norm = axis.norm();
        if norm == 0.0 || !norm.is_finite() {
            return None;
        }

        let axis = axis / norm;
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        let (x, y, z) = (axis.x, axis.y, axis.z);

        #[rustfmt::skip]
        let matrix = Matrix4::<f64>::new(
            t*x*x + c,     t*x*y - s*z,   t*x*z + s*y,   0.0,
            t*x*y + s*z,   t*y*y + c,     t*y*z - s*x,   0.0,
            t*x*z - s*y,   t*y*z + s*x,   t*z*z + c,     0.0,
            0.0,           0.0,           0.0,           1.0,
        );
        Some(matrix.map(|v| v as f32))
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Create a scale matrix
    pub fn scale_matrix(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Conjugate `matrix` so that it acts about `point` instead of the origin:
    /// `T(point) * matrix * T(-point)`.
    pub fn about_point(matrix: &Matrix4<f32>, point: &Point3<f32>) -> Matrix4<f32> {
        if point.coords == Vector3::zeros() {
            return *matrix;
        }
        let to_origin = Matrix4::new_translation(&-point.coords);
        let back = Matrix4::new_translation(&point.coords);
        back * matrix * to_origin
    }
}
