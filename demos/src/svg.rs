// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A [`Painter`] that renders to an SVG document.

use std::fmt::Write as _;

use understory_quadgrid::{Layer, Painter, Rect};

/// Light or dark palette.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    /// Dark strokes on a white background.
    #[default]
    Light,
    /// Light strokes on a black background.
    Dark,
}

impl Theme {
    fn background(self) -> &'static str {
        match self {
            Self::Light => "white",
            Self::Dark => "black",
        }
    }

    fn ink(self) -> &'static str {
        match self {
            Self::Light => "black",
            Self::Dark => "white",
        }
    }
}

const CELL_COLOR: &str = "red";
const HIGHLIGHT_COLOR: &str = "blue";
const LABEL_SIZE: f64 = 16.0;

/// Accumulates SVG elements for one snapshot.
#[derive(Debug)]
pub struct SvgPainter {
    width: f64,
    height: f64,
    theme: Theme,
    body: String,
}

impl SvgPainter {
    /// Start a `width` x `height` document.
    pub fn new(width: f64, height: f64, theme: Theme) -> Self {
        Self {
            width,
            height,
            theme,
            body: String::new(),
        }
    }

    fn color(&self, layer: Layer) -> &'static str {
        match layer {
            Layer::Cell => CELL_COLOR,
            Layer::Node | Layer::Item => self.theme.ink(),
        }
    }

    /// Outline the queried region.
    pub fn highlight_range(&mut self, rect: &Rect) {
        self.rect(rect, "none", HIGHLIGHT_COLOR);
    }

    /// Fill a query hit.
    pub fn highlight_hit(&mut self, rect: &Rect) {
        self.rect(rect, HIGHLIGHT_COLOR, "none");
    }

    /// Draw `text` centered on `(x, y)` with a dark outline.
    pub fn badge(&mut self, text: &str, x: f64, y: f64) {
        let _ = writeln!(
            self.body,
            r#"<text x="{x}" y="{y}" font-family="sans-serif" font-size="30" text-anchor="middle" fill="white" stroke="black" stroke-width="8" paint-order="stroke">{}</text>"#,
            escape(text)
        );
    }

    fn rect(&mut self, rect: &Rect, fill: &str, stroke: &str) {
        // SVG rejects negative sizes, so normalize first.
        let x = rect.x.min(rect.right());
        let y = rect.y.min(rect.bottom());
        let _ = writeln!(
            self.body,
            r#"<rect x="{x}" y="{y}" width="{}" height="{}" fill="{fill}" stroke="{stroke}"/>"#,
            rect.width.abs(),
            rect.height.abs(),
        );
    }

    /// The finished document.
    pub fn finish(self) -> String {
        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
                "\n",
                r#"<rect width="100%" height="100%" fill="{bg}"/>"#,
                "\n{body}</svg>\n"
            ),
            w = self.width,
            h = self.height,
            bg = self.theme.background(),
            body = self.body,
        )
    }
}

impl Painter for SvgPainter {
    fn stroke_rect(&mut self, rect: &Rect, layer: Layer) {
        let color = self.color(layer);
        self.rect(rect, "none", color);
    }

    fn fill_rect(&mut self, rect: &Rect, layer: Layer) {
        let color = self.color(layer);
        self.rect(rect, color, "none");
    }

    fn label(&mut self, text: &str, x: f64, y: f64, layer: Layer) {
        let color = self.color(layer);
        let _ = writeln!(
            self.body,
            r#"<text x="{x}" y="{}" font-family="sans-serif" font-size="{LABEL_SIZE}" fill="{color}">{}</text>"#,
            y + LABEL_SIZE,
            escape(text)
        );
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
