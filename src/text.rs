use std::{borrow::Cow, sync::Arc};

use crate::{
    fonts::FontLibrary,
    foundation::{
        core::Rgba8,
        error::{InsigniaError, InsigniaResult},
    },
};

/// RGBA8 brush color carried through Parley glyph runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Unstroked rendered extents of a shaped run.
///
/// Placement math always uses these; the stroke applied at raster time
/// grows the visual bounding box but never the layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    pub width_px: f64,
    pub height_px: f64,
}

/// A shaped single-line run plus its measured extents.
#[derive(Clone)]
pub struct ShapedText {
    pub layout: Arc<parley::Layout<TextBrushRgba8>>,
    pub metrics: TextMetrics,
}

impl std::fmt::Debug for ShapedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapedText")
            .field("layout_ptr", &Arc::as_ptr(&self.layout))
            .field("metrics", &self.metrics)
            .finish()
    }
}

/// Per-render Parley engine over the process-wide [`FontLibrary`].
///
/// Registers the primary and fallback faces into a fresh `FontContext` and
/// shapes every run against a two-family stack, so mixed-script strings
/// resolve through the fallback face without caller-visible branching.
pub struct TextShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    stack: String,
}

impl TextShaper {
    pub fn new(library: &FontLibrary) -> InsigniaResult<Self> {
        let mut font_ctx = parley::FontContext::default();

        let mut names = Vec::with_capacity(2);
        for (label, bytes) in [
            ("primary", library.primary.as_ref()),
            ("fallback", library.fallback.as_ref()),
        ] {
            let families = font_ctx
                .collection
                .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
            let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
                InsigniaError::asset_load(format!(
                    "no font families registered from {label} font bytes"
                ))
            })?;
            let name = font_ctx
                .collection
                .family_name(family_id)
                .ok_or_else(|| {
                    InsigniaError::asset_load(format!("{label} font family has no name"))
                })?
                .to_string();
            names.push(name);
        }

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            stack: names.join(", "),
        })
    }

    /// Shape a single-line run and measure its unstroked extents.
    pub fn shape(
        &mut self,
        text: &str,
        size_px: f64,
        brush: TextBrushRgba8,
    ) -> InsigniaResult<ShapedText> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(InsigniaError::config("font size must be finite and > 0"));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.stack.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px as f32));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        let metrics = measure_layout(&layout);
        Ok(ShapedText {
            layout: Arc::new(layout),
            metrics,
        })
    }

    /// Measurement-only variant of [`TextShaper::shape`].
    pub fn measure(&mut self, text: &str, size_px: f64) -> InsigniaResult<TextMetrics> {
        Ok(self.shape(text, size_px, TextBrushRgba8::default())?.metrics)
    }
}

fn measure_layout(layout: &parley::Layout<TextBrushRgba8>) -> TextMetrics {
    let mut width = 0.0f64;
    let mut height = 0.0f64;
    for line in layout.lines() {
        let m = line.metrics();
        width = width.max(f64::from(m.advance));
        height += f64::from(m.ascent + m.descent + m.leading);
    }
    TextMetrics {
        width_px: width,
        height_px: height,
    }
}
