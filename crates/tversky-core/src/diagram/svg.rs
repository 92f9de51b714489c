use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use super::layout::{CANVAS_HEIGHT, CANVAS_WIDTH, Circle, Point, VennLayout};
use super::{ArtifactId, DiagramArtifact, DiagramRenderer, DiagramRequest, RenderError};

const BACKGROUND: &str = "#f0f2f5";
const FILL_A: &str = "#d62728";
const FILL_B: &str = "#2ca02c";
const FILL_OPACITY: f64 = 0.4;

/// Writes diagrams as standalone SVG files.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    output_dir: PathBuf,
    url_prefix: String,
}

impl SvgRenderer {
    /// Store artifacts in `output_dir`, referenced as `<url_prefix>/<file>`.
    pub fn new(output_dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            url_prefix: url_prefix.into(),
        }
    }

    #[must_use]
    pub fn output_dir(&self) -> &std::path::Path {
        &self.output_dir
    }

    fn url_for(&self, file_name: &str) -> String {
        let prefix = self.url_prefix.trim_end_matches('/');
        if prefix.is_empty() {
            file_name.to_string()
        } else {
            format!("{prefix}/{file_name}")
        }
    }
}

impl DiagramRenderer for SvgRenderer {
    fn render(&self, request: &DiagramRequest) -> Result<DiagramArtifact, RenderError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| RenderError::CreateDir {
            path: self.output_dir.clone(),
            source,
        })?;

        let file_name = format!("venn-{}.svg", ArtifactId::generate());
        let path = self.output_dir.join(&file_name);
        let document = render_svg(request);
        debug!(bytes = document.len(), path = %path.display(), "writing diagram");

        fs::write(&path, document).map_err(|source| RenderError::Write {
            path: path.clone(),
            source,
        })?;

        let url = self.url_for(&file_name);
        info!(%url, "diagram written");
        Ok(DiagramArtifact { path, url })
    }
}

/// Render a diagram to an SVG document string.
#[must_use]
pub fn render_svg(request: &DiagramRequest) -> String {
    let layout = VennLayout::solve(request.only_a, request.only_b, request.intersection);
    let empty_a = request.only_a + request.intersection == 0;
    let empty_b = request.only_b + request.intersection == 0;

    let mut svg = String::with_capacity(1024);
    // Writing into a String cannot fail.
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
        w = CANVAS_WIDTH,
        h = CANVAS_HEIGHT,
    );
    let _ = writeln!(
        svg,
        r#"  <rect width="100%" height="100%" fill="{BACKGROUND}"/>"#
    );
    push_circle(&mut svg, &layout.circle_a, FILL_A, empty_a);
    push_circle(&mut svg, &layout.circle_b, FILL_B, empty_b);
    push_text(&mut svg, layout.label_a_anchor, &request.label_a, 18, "bold");
    push_text(&mut svg, layout.label_b_anchor, &request.label_b, 18, "bold");

    for (count, anchor) in [
        (request.only_a, layout.only_a_anchor),
        (request.only_b, layout.only_b_anchor),
        (request.intersection, layout.intersection_anchor),
    ] {
        if count > 0 {
            push_text(&mut svg, anchor, &count.to_string(), 16, "normal");
        }
    }

    svg.push_str("</svg>\n");
    svg
}

fn push_circle(svg: &mut String, circle: &Circle, fill: &str, empty: bool) {
    if empty {
        let _ = writeln!(
            svg,
            r#"  <circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="none" stroke="{fill}" stroke-width="1.5" stroke-dasharray="4 4"/>"#,
            circle.centre.x, circle.centre.y, circle.radius,
        );
    } else {
        let _ = writeln!(
            svg,
            r##"  <circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{fill}" fill-opacity="{FILL_OPACITY}" stroke="#333333" stroke-width="1"/>"##,
            circle.centre.x, circle.centre.y, circle.radius,
        );
    }
}

fn push_text(svg: &mut String, at: Point, text: &str, size: u32, weight: &str) {
    let _ = writeln!(
        svg,
        r#"  <text x="{:.2}" y="{:.2}" text-anchor="middle" dominant-baseline="middle" font-size="{size}" font-weight="{weight}">{}</text>"#,
        at.x,
        at.y,
        html_escape::encode_text(text),
    );
}
