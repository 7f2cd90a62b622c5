//! Scene model and SVG assembly.
//!
//! Widgets build a [`Scene`] in their own local coordinates; the
//! [`Canvas`] nests the scenes at their layout positions and serializes
//! the whole dashboard to one SVG document.
//!
//! Gradient ids are document-global in SVG, so every gradient a widget
//! defines must be prefixed with something unique to that widget
//! instance. Builders that define gradients take the owning widget's id
//! for exactly that purpose.

use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::color::Rgba;
use crate::error::Result;

/// How an element's interior is painted.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    /// Solid color.
    Solid(Rgba),
    /// Reference to a gradient definition by id.
    Gradient(String),
    /// No paint.
    None,
}

impl Paint {
    fn to_css(&self) -> String {
        match self {
            Self::Solid(color) => color.to_hex(),
            Self::Gradient(id) => format!("url(#{id})"),
            Self::None => "none".to_string(),
        }
    }
}

impl From<Rgba> for Paint {
    fn from(color: Rgba) -> Self {
        Self::Solid(color)
    }
}

/// Direction of a linear gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientAxis {
    /// Left to right.
    Horizontal,
    /// Top to bottom.
    Vertical,
}

/// One gradient stop; offsets are fractions of the axis and may lie
/// outside `0..=1`, which SVG clamps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position along the axis.
    pub offset: f64,
    /// Stop color.
    pub color: Rgba,
}

/// A linear gradient definition.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    /// Document-unique id.
    pub id: String,
    /// Axis direction.
    pub axis: GradientAxis,
    /// Stops, in paint order.
    pub stops: Vec<GradientStop>,
}

/// Text anchor position for SVG text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAnchor {
    /// Align text start at position.
    #[default]
    Start,
    /// Center text at position.
    Middle,
    /// Align text end at position.
    End,
}

/// A scene element.
///
/// Field names match SVG attribute names.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum SceneElement {
    /// Rectangle
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Paint,
        opacity: f64,
    },
    /// Line
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: Rgba,
        stroke_width: f64,
        dash: Option<f64>,
    },
    /// Path (SVG path data)
    Path {
        d: String,
        fill: Paint,
        stroke: Option<Rgba>,
        stroke_width: f64,
    },
    /// Circle
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        fill: Paint,
    },
    /// Text
    Text {
        x: f64,
        y: f64,
        text: String,
        font_size: f64,
        fill: Rgba,
        anchor: TextAnchor,
    },
    /// Symbol glyph, positioned by its bounding box top-left corner
    Glyph {
        x: f64,
        y: f64,
        size: f64,
        glyph: String,
        fill: Rgba,
    },
    /// External image reference
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        href: String,
    },
}

/// One widget's drawing, in local coordinates.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    width: f64,
    height: f64,
    background: Option<Paint>,
    defs: Vec<LinearGradient>,
    elements: Vec<SceneElement>,
}

impl Scene {
    /// Create an empty scene with the given local dimensions.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            background: None,
            defs: Vec::new(),
            elements: Vec::new(),
        }
    }

    /// Local width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Local height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Elements in paint order.
    #[must_use]
    pub fn elements(&self) -> &[SceneElement] {
        &self.elements
    }

    /// Gradient definitions.
    #[must_use]
    pub fn defs(&self) -> &[LinearGradient] {
        &self.defs
    }

    /// Set a background paint covering the whole scene.
    #[must_use]
    pub fn background(mut self, paint: impl Into<Paint>) -> Self {
        self.background = Some(paint.into());
        self
    }

    /// Add a gradient definition.
    #[must_use]
    pub fn gradient(mut self, gradient: LinearGradient) -> Self {
        self.defs.push(gradient);
        self
    }

    /// Add a filled rectangle.
    #[must_use]
    pub fn rect(self, x: f64, y: f64, width: f64, height: f64, fill: impl Into<Paint>) -> Self {
        self.rect_faded(x, y, width, height, fill, 1.0)
    }

    /// Add a filled rectangle with element opacity.
    #[must_use]
    pub fn rect_faded(
        mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: impl Into<Paint>,
        opacity: f64,
    ) -> Self {
        self.elements.push(SceneElement::Rect {
            x,
            y,
            width,
            height,
            fill: fill.into(),
            opacity,
        });
        self
    }

    /// Add a line.
    #[must_use]
    pub fn line(mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: Rgba, width: f64) -> Self {
        self.elements.push(SceneElement::Line {
            x1,
            y1,
            x2,
            y2,
            stroke,
            stroke_width: width,
            dash: None,
        });
        self
    }

    /// Add a dashed line.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn dashed_line(
        mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: Rgba,
        width: f64,
        dash: f64,
    ) -> Self {
        self.elements.push(SceneElement::Line {
            x1,
            y1,
            x2,
            y2,
            stroke,
            stroke_width: width,
            dash: Some(dash),
        });
        self
    }

    /// Add an SVG path.
    #[must_use]
    pub fn path(
        mut self,
        d: impl Into<String>,
        fill: impl Into<Paint>,
        stroke: Option<Rgba>,
        stroke_width: f64,
    ) -> Self {
        self.elements.push(SceneElement::Path {
            d: d.into(),
            fill: fill.into(),
            stroke,
            stroke_width,
        });
        self
    }

    /// Add a circle.
    #[must_use]
    pub fn circle(mut self, cx: f64, cy: f64, r: f64, fill: impl Into<Paint>) -> Self {
        self.elements.push(SceneElement::Circle { cx, cy, r, fill: fill.into() });
        self
    }

    /// Add start-anchored text.
    #[must_use]
    pub fn text(
        self,
        x: f64,
        y: f64,
        text: impl Into<String>,
        font_size: f64,
        fill: Rgba,
    ) -> Self {
        self.text_anchored(x, y, text, font_size, fill, TextAnchor::Start)
    }

    /// Add text with an explicit anchor.
    #[must_use]
    pub fn text_anchored(
        mut self,
        x: f64,
        y: f64,
        text: impl Into<String>,
        font_size: f64,
        fill: Rgba,
        anchor: TextAnchor,
    ) -> Self {
        self.elements.push(SceneElement::Text {
            x,
            y,
            text: text.into(),
            font_size,
            fill,
            anchor,
        });
        self
    }

    /// Add a symbol glyph inside a `size`-square box at `(x, y)`.
    #[must_use]
    pub fn glyph(
        mut self,
        x: f64,
        y: f64,
        size: f64,
        glyph: impl Into<String>,
        fill: Rgba,
    ) -> Self {
        self.elements.push(SceneElement::Glyph { x, y, size, glyph: glyph.into(), fill });
        self
    }

    /// Add an external image.
    #[must_use]
    pub fn image(
        mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        href: impl Into<String>,
    ) -> Self {
        self.elements.push(SceneElement::Image { x, y, width, height, href: href.into() });
        self
    }

    /// Add a raw element.
    pub fn add_element(&mut self, element: SceneElement) {
        self.elements.push(element);
    }

    /// Render as a standalone SVG document.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(4096);
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, self.width, self.height
        );
        self.render_contents(&mut svg);
        svg.push_str("</svg>\n");
        svg
    }

    /// Render as a nested SVG fragment at a canvas position.
    #[must_use]
    pub fn render_at(&self, x: f64, y: f64) -> String {
        let mut svg = String::with_capacity(4096);
        let _ = writeln!(
            svg,
            r#"<svg x="{x}" y="{y}" width="{}" height="{}" viewBox="0 0 {} {}" preserveAspectRatio="none">"#,
            self.width, self.height, self.width, self.height
        );
        self.render_contents(&mut svg);
        svg.push_str("</svg>");
        svg
    }

    fn render_contents(&self, svg: &mut String) {
        if !self.defs.is_empty() {
            svg.push_str("  <defs>\n");
            for def in &self.defs {
                let _ = writeln!(svg, "    {}", gradient_to_svg(def));
            }
            svg.push_str("  </defs>\n");
        }

        if let Some(bg) = &self.background {
            let _ = writeln!(
                svg,
                r#"  <rect width="100%" height="100%" fill="{}"/>"#,
                bg.to_css()
            );
        }

        for element in &self.elements {
            let _ = writeln!(svg, "  {}", element_to_svg(element));
        }
    }
}

/// The assembled dashboard document.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    background: Rgba,
    panels: Vec<(f64, f64, Scene)>,
}

impl Canvas {
    /// Create an empty canvas.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: Rgba::BLACK,
            panels: Vec::new(),
        }
    }

    /// Set the backdrop color.
    #[must_use]
    pub fn with_background(mut self, color: Rgba) -> Self {
        self.background = color;
        self
    }

    /// Place a scene at a canvas position.
    pub fn place(&mut self, x: f64, y: f64, scene: Scene) {
        self.panels.push((x, y, scene));
    }

    /// Number of placed scenes.
    #[must_use]
    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    /// Render the full document.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(16384);
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, self.width, self.height
        );
        let _ = writeln!(
            svg,
            r#"  <rect width="100%" height="100%" fill="{}"/>"#,
            self.background.to_hex()
        );
        for (x, y, scene) in &self.panels {
            let _ = writeln!(svg, "{}", scene.render_at(*x, *y));
        }
        svg.push_str("</svg>\n");
        svg
    }

    /// Write the document to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.render().as_bytes())?;
        Ok(())
    }
}

fn gradient_to_svg(gradient: &LinearGradient) -> String {
    let (x2, y2) = match gradient.axis {
        GradientAxis::Horizontal => (1, 0),
        GradientAxis::Vertical => (0, 1),
    };
    let mut out = format!(
        r#"<linearGradient id="{}" x1="0" y1="0" x2="{x2}" y2="{y2}">"#,
        gradient.id
    );
    for stop in &gradient.stops {
        let _ = write!(
            out,
            r#"<stop offset="{}" stop-color="{}"/>"#,
            stop.offset,
            stop.color.to_hex()
        );
    }
    out.push_str("</linearGradient>");
    out
}

fn element_to_svg(element: &SceneElement) -> String {
    match element {
        SceneElement::Rect { x, y, width, height, fill, opacity } => {
            let opacity_attr = if *opacity < 1.0 {
                format!(r#" opacity="{opacity}""#)
            } else {
                String::new()
            };
            format!(
                r#"<rect x="{x}" y="{y}" width="{width}" height="{height}" fill="{}"{opacity_attr}/>"#,
                fill.to_css()
            )
        }
        SceneElement::Line { x1, y1, x2, y2, stroke, stroke_width, dash } => {
            let dash_attr = dash
                .map(|d| format!(r#" stroke-dasharray="{d}""#))
                .unwrap_or_default();
            format!(
                r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{}" stroke-width="{stroke_width}"{dash_attr}/>"#,
                stroke.to_hex()
            )
        }
        SceneElement::Path { d, fill, stroke, stroke_width } => {
            let stroke_attr = stroke
                .map(|s| {
                    format!(r#" stroke="{}" stroke-width="{stroke_width}""#, s.to_hex())
                })
                .unwrap_or_default();
            format!(r#"<path d="{d}" fill="{}"{stroke_attr}/>"#, fill.to_css())
        }
        SceneElement::Circle { cx, cy, r, fill } => {
            format!(r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{}"/>"#, fill.to_css())
        }
        SceneElement::Text { x, y, text, font_size, fill, anchor } => {
            let anchor_str = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            format!(
                r#"<text x="{x}" y="{y}" font-size="{font_size}" fill="{}" text-anchor="{anchor_str}" font-family="sans-serif">{}</text>"#,
                fill.to_hex(),
                escape_xml(text)
            )
        }
        SceneElement::Glyph { x, y, size, glyph, fill } => {
            // Anchor the glyph by the middle of its box; the baseline sits
            // near the bottom of the em square.
            let cx = x + size / 2.0;
            let baseline = y + size * 0.85;
            format!(
                r#"<text x="{cx}" y="{baseline}" font-size="{size}" fill="{}" text-anchor="middle">{}</text>"#,
                fill.to_hex(),
                escape_xml(glyph)
            )
        }
        SceneElement::Image { x, y, width, height, href } => {
            format!(
                r#"<image x="{x}" y="{y}" width="{width}" height="{height}" href="{}" preserveAspectRatio="xMidYMid slice"/>"#,
                escape_xml(href)
            )
        }
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
