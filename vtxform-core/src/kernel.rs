/// The transform kernel: resolve a spec, then rewrite a vertex buffer in place
use nalgebra::{Matrix4, Point3};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::ApplyConfig;
use crate::error::{TransformError, TransformResult};
use crate::geometry::VertexStorage;
use crate::transform::TransformSpec;

/// Apply `spec` to every vertex with the default [`ApplyConfig`].
pub fn apply(vertices: &mut [Point3<f32>], spec: &TransformSpec) -> TransformResult<()> {
    apply_with(vertices, spec, &ApplyConfig::default())
}

/// Apply `spec` to every vertex.
///
/// On error the buffer is left exactly as it was passed in: parameter
/// problems surface during matrix resolution, and a vanishing w' is found by
/// a read-only scan before the first write.
pub fn apply_with(
    vertices: &mut [Point3<f32>],
    spec: &TransformSpec,
    config: &ApplyConfig,
) -> TransformResult<()> {
    let kind = spec.kind();
    let result = spec.resolve().and_then(|matrix| {
        debug!(%kind, vertex_count = vertices.len(), "Resolved transformation matrix");
        apply_matrix(vertices, &matrix, config)
    });

    match &result {
        Ok(()) => info!(%kind, vertex_count = vertices.len(), "Applied transformation"),
        Err(e) => warn!(%kind, error = %e, "Transformation rejected"),
    }
    result
}

/// Apply `spec` to the shared vertex list of `storage`.
pub fn apply_to<S: VertexStorage + ?Sized>(
    storage: &mut S,
    spec: &TransformSpec,
    config: &ApplyConfig,
) -> TransformResult<()> {
    apply_with(storage.vertices_mut(), spec, config)
}

/// Apply an already resolved homogeneous matrix to every vertex.
pub fn apply_matrix(
    vertices: &mut [Point3<f32>],
    matrix: &Matrix4<f32>,
    config: &ApplyConfig,
) -> TransformResult<()> {
    check_vertices(vertices)?;
    if matrix.iter().any(|v| !v.is_finite()) {
        return Err(TransformError::invalid("transformation matrix contains a non-finite value"));
    }

    let epsilon = config.degenerate_epsilon;
    if !(epsilon.is_finite() && epsilon >= 0.0) {
        return Err(TransformError::invalid(format!(
            "degenerate_epsilon must be finite and non-negative, got {epsilon}"
        )));
    }
    let parallel = config.use_parallel(vertices.len());

    // Bottom row only: w' = r . (x, y, z, 1)
    let row = matrix.fixed_view::<1, 4>(3, 0).into_owned();
    let degenerate = |p: &Point3<f32>| {
        let w = row[0] * p.x + row[1] * p.y + row[2] * p.z + row[3];
        w.abs() <= epsilon
    };

    let first_bad = if parallel {
        vertices.par_iter().position_first(degenerate)
    } else {
        vertices.iter().position(degenerate)
    };
    if let Some(index) = first_bad {
        return Err(TransformError::DegenerateTransform { index });
    }

    debug!(vertex_count = vertices.len(), parallel, "Running apply pass");
    if parallel {
        vertices.par_iter_mut().for_each(|p| *p = transform_vertex(matrix, p));
    } else {
        for p in vertices.iter_mut() {
            *p = transform_vertex(matrix, p);
        }
    }

    Ok(())
}

fn transform_vertex(matrix: &Matrix4<f32>, p: &Point3<f32>) -> Point3<f32> {
    let h = matrix * p.to_homogeneous();
    Point3::new(h.x / h.w, h.y / h.w, h.z / h.w)
}

fn check_vertices(vertices: &[Point3<f32>]) -> TransformResult<()> {
    if vertices.is_empty() {
        return Err(TransformError::invalid("vertex buffer is empty"));
    }
    if let Some(index) = vertices
        .iter()
        .position(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
    {
        return Err(TransformError::invalid(format!(
            "vertex {index} has a non-finite coordinate"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::QuadGeometry;
    use crate::transform::AngleUnit;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    #[test]
    fn test_scale_z_only() {
        let mut vertices = vec![Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 0.0, 2.0)];
        apply(&mut vertices, &TransformSpec::scale(1.0, 1.0, 2.5)).unwrap();
        assert_eq!(vertices[0], Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(vertices[1], Point3::new(0.0, 0.0, 5.0), epsilon = 1e-6);
    }

    #[test]
    fn test_quarter_turn_about_z() {
        let mut vertices = vec![Point3::new(1.0, 1.0, 1.0)];
        let spec = TransformSpec::rotation(Vector3::z(), 90.0, AngleUnit::Degrees);
        apply(&mut vertices, &spec).unwrap();
        assert_relative_eq!(vertices[0], Point3::new(-1.0, 1.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_empty_buffer_rejected() {
        let mut vertices: Vec<Point3<f32>> = Vec::new();
        let err = apply(&mut vertices, &TransformSpec::identity()).unwrap_err();
        assert!(matches!(err, TransformError::InvalidParameter(_)));
    }

    #[test]
    fn test_non_finite_vertex_rejected() {
        let mut vertices = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(f32::NAN, 0.0, 0.0)];
        let err = apply(&mut vertices, &TransformSpec::translation(1.0, 0.0, 0.0)).unwrap_err();
        assert!(matches!(err, TransformError::InvalidParameter(_)));
        assert_eq!(vertices[0], Point3::origin());
    }

    #[test]
    fn test_degenerate_reports_first_index() {
        // w' = x, vanishes at vertices 2 and 4
        #[rustfmt::skip]
        let spec = TransformSpec::manual([
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            1.0, 0.0, 0.0, 0.0,
        ]);
        let original = vec![
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(2.0, 2.0, 3.0),
            Point3::new(0.0, 2.0, 3.0),
            Point3::new(4.0, 2.0, 3.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        let mut vertices = original.clone();
        let err = apply(&mut vertices, &spec).unwrap_err();
        assert_eq!(err, TransformError::DegenerateTransform { index: 2 });
        assert_eq!(vertices, original);
    }

    #[test]
    fn test_projective_divide() {
        #[rustfmt::skip]
        let spec = TransformSpec::manual([
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 2.0,
        ]);
        let mut vertices = vec![Point3::new(2.0, 4.0, 6.0)];
        apply(&mut vertices, &spec).unwrap();
        assert_relative_eq!(vertices[0], Point3::new(1.0, 2.0, 3.0), epsilon = 1e-6);
    }

    #[test]
    fn test_degenerate_epsilon() {
        #[rustfmt::skip]
        let matrix = Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1e-4,
        );
        let mut vertices = vec![Point3::new(1.0, 1.0, 1.0)];
        let config = ApplyConfig::sequential().with_degenerate_epsilon(1e-3);
        let err = apply_matrix(&mut vertices, &matrix, &config).unwrap_err();
        assert_eq!(err, TransformError::DegenerateTransform { index: 0 });

        apply_matrix(&mut vertices, &matrix, &ApplyConfig::sequential()).unwrap();
        assert_relative_eq!(vertices[0].x, 1e4, max_relative = 1e-5);
    }

    #[test]
    fn test_bad_degenerate_epsilon_from_toml() {
        #[rustfmt::skip]
        let spec = TransformSpec::manual([
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 0.0,
        ]);
        for text in [
            "degenerate_epsilon = -1.0",
            "degenerate_epsilon = nan",
            "degenerate_epsilon = inf",
        ] {
            let config: ApplyConfig = toml::from_str(text).unwrap();
            let mut vertices = vec![Point3::new(1.0, 2.0, 3.0)];
            let err = apply_with(&mut vertices, &spec, &config).unwrap_err();
            assert!(matches!(err, TransformError::InvalidParameter(_)), "{text}");
            assert_eq!(vertices[0], Point3::new(1.0, 2.0, 3.0));
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let spec = TransformSpec::rotation_about(
            Vector3::new(1.0, 2.0, 3.0),
            17.0,
            AngleUnit::Degrees,
            Point3::new(5.0, 5.0, 0.0),
        );
        let mut sequential = QuadGeometry::grid(40, 40, 0.25);
        let mut parallel = sequential.clone();

        apply_to(&mut sequential, &spec, &ApplyConfig::sequential()).unwrap();
        apply_to(
            &mut parallel,
            &spec,
            &ApplyConfig::default().with_parallel_threshold(1),
        )
        .unwrap();

        assert_eq!(sequential.vertices, parallel.vertices);
        assert_eq!(sequential.quads, parallel.quads);
    }

    #[test]
    fn test_parallel_degenerate_first_index() {
        #[rustfmt::skip]
        let matrix = Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
        );
        let mut grid = QuadGeometry::grid(50, 50, 1.0);
        let config = ApplyConfig::default().with_parallel_threshold(1);
        // every vertex of the first grid row has y = 0
        let err = apply_matrix(&mut grid.vertices, &matrix, &config).unwrap_err();
        assert_eq!(err, TransformError::DegenerateTransform { index: 0 });
    }
}
