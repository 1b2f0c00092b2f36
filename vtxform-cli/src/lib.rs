/// End-to-end regression runner: build a quad geometry, transform its
/// shared vertex list, and report what changed
use std::fmt;

use anyhow::{Context, Result};
use nalgebra::Point3;
use tracing::info;
use vtxform_core::{
    apply_to, parse_transform, ApplyConfig, Bounds, QuadGeometry, TransformKind, TransformSpec,
};

pub mod settings;

pub use settings::{GridSettings, RunSettings};

/// Summary of one transform run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub kind: TransformKind,
    pub vertex_count: usize,
    pub quad_count: usize,
    pub before: Bounds,
    pub after: Bounds,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Applied {} transform (type {}) to {} vertices / {} quads",
            self.kind,
            self.kind.code(),
            self.vertex_count,
            self.quad_count
        )?;
        let (b, a) = (&self.before, &self.after);
        writeln!(
            f,
            "  before: min ({:.3}, {:.3}, {:.3}) max ({:.3}, {:.3}, {:.3})",
            b.min.x, b.min.y, b.min.z, b.max.x, b.max.y, b.max.z
        )?;
        write!(
            f,
            "  after:  min ({:.3}, {:.3}, {:.3}) max ({:.3}, {:.3}, {:.3})",
            a.min.x, a.min.y, a.min.z, a.max.x, a.max.y, a.max.z
        )
    }
}

/// One regression scenario: a geometry, the transform to apply, and how
pub struct RegressionRun {
    geometry: QuadGeometry,
    spec: TransformSpec,
    config: ApplyConfig,
}

impl RegressionRun {
    pub fn new(geometry: QuadGeometry, spec: TransformSpec, config: ApplyConfig) -> Self {
        Self {
            geometry,
            spec,
            config,
        }
    }

    /// Build a run from settings. A transform expression, when given, takes
    /// precedence over the settings' `[transform]` table.
    pub fn from_settings(settings: &RunSettings, expression: Option<&str>) -> Result<Self> {
        let spec = match expression {
            Some(text) => parse_transform(text).context("Invalid --transform expression")?,
            None => settings
                .transform
                .clone()
                .unwrap_or_else(Self::default_transform),
        };
        let grid = settings.grid;
        check_grid_size(&grid)?;
        let geometry = QuadGeometry::grid(grid.nx, grid.ny, grid.spacing);
        Ok(Self::new(geometry, spec, settings.apply))
    }

    /// Stretch along z by 2.5, leaving x and y untouched.
    pub fn default_transform() -> TransformSpec {
        TransformSpec::scale(1.0, 1.0, 2.5)
    }

    pub fn geometry(&self) -> &QuadGeometry {
        &self.geometry
    }

    pub fn spec(&self) -> &TransformSpec {
        &self.spec
    }

    pub fn run(&mut self) -> Result<RunReport> {
        let before = self
            .geometry
            .bounds()
            .context("Geometry has no vertices to transform")?;
        info!(
            vertices = self.geometry.vertex_count(),
            quads = self.geometry.quad_count(),
            kind = %self.spec.kind(),
            "Starting transform run"
        );

        apply_to(&mut self.geometry, &self.spec, &self.config)
            .with_context(|| format!("Failed to apply {} transform", self.spec.kind()))?;

        let after = self
            .geometry
            .bounds()
            .context("Geometry lost its vertices")?;

        Ok(RunReport {
            kind: self.spec.kind(),
            vertex_count: self.geometry.vertex_count(),
            quad_count: self.geometry.quad_count(),
            before,
            after,
        })
    }
}

/// Reject grids whose vertex or quad buffers cannot be allocated.
fn check_grid_size(grid: &GridSettings) -> Result<()> {
    let limit = isize::MAX as usize;
    let vertices = grid
        .nx
        .checked_mul(grid.ny)
        .and_then(|n| n.checked_mul(std::mem::size_of::<Point3<f32>>()));
    let quads = grid
        .nx
        .saturating_sub(1)
        .checked_mul(grid.ny.saturating_sub(1))
        .and_then(|n| n.checked_mul(std::mem::size_of::<[usize; 4]>()));
    match (vertices, quads) {
        (Some(v), Some(q)) if v <= limit && q <= limit => Ok(()),
        _ => anyhow::bail!("Grid of {} x {} vertices is too large", grid.nx, grid.ny),
    }
}
