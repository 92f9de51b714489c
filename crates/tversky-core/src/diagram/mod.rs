//! Two-set overlap diagrams.
//!
//! The engine hands three cardinalities and two labels to a
//! [`DiagramRenderer`]; the renderer stores an image artifact and returns a
//! reference to it. [`SvgRenderer`] is the bundled implementation: it lays the
//! circles out area-proportionally ([`VennLayout`]) and writes an SVG file
//! under a collision-resistant name ([`ArtifactId`]).

mod id;
mod layout;
mod svg;

use std::path::PathBuf;

use serde::Serialize;

pub use id::ArtifactId;
pub use layout::{Circle, Point, VennLayout};
pub use svg::{SvgRenderer, render_svg};

use crate::engine::TverskyOutcome;

/// Input to a renderer: region sizes and display labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramRequest {
    pub only_a: usize,
    pub only_b: usize,
    pub intersection: usize,
    pub label_a: String,
    pub label_b: String,
}

impl DiagramRequest {
    /// Region sizes of a finished computation, with the given labels.
    #[must_use]
    pub fn from_outcome(
        outcome: &TverskyOutcome,
        label_a: impl Into<String>,
        label_b: impl Into<String>,
    ) -> Self {
        Self {
            only_a: outcome.only_a_size,
            only_b: outcome.only_b_size,
            intersection: outcome.intersection_size,
            label_a: label_a.into(),
            label_b: label_b.into(),
        }
    }
}

/// A stored diagram and where to fetch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramArtifact {
    /// Filesystem location of the written file.
    pub path: PathBuf,
    /// Retrievable reference handed back to clients.
    pub url: String,
}

/// Errors that can occur while storing a diagram.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The output directory could not be created.
    #[error("failed to create diagram directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The artifact could not be written.
    #[error("failed to write diagram {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Something that turns region sizes into a stored image.
///
/// Every call must produce a distinct artifact reference so concurrent
/// results never overwrite each other.
pub trait DiagramRenderer: Send + Sync {
    /// Render and store one diagram.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if the artifact cannot be stored.
    fn render(&self, request: &DiagramRequest) -> Result<DiagramArtifact, RenderError>;
}
