use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::{
    core::{Affine, Rgba8},
    error::{InsigniaError, InsigniaResult},
};

/// Padding around the text block, authored at 1x scale.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct Padding {
    pub top: f64,
    pub bottom: f64,
    pub x: f64,
    /// Viewport shift applied at raster time; trims the left margin visually
    /// without changing the derived canvas width.
    pub left_trim: f64,
}

/// Every calibration constant of the mark. All pixel values are authored at
/// 1x and multiplied by `scale` before use, which keeps the geometry
/// resolution-independent.
///
/// `Default` is the reference calibration; a JSON file with any subset of
/// fields can override it via [`RenderConfig::from_json_file`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub initial_font_size: f64,
    pub left_color: Rgba8,
    pub right_color: Rgba8,
    pub stroke_color: Rgba8,
    pub padding: Padding,
    pub scale: f64,
    pub stroke_width: f64,
    /// Shared text skew, canvas-convention coefficients [a, b, c, d, e, f].
    pub skew: [f64; 6],
    pub ring_bottom_offset: f64,
    pub cross_bottom_offset: f64,
    pub cross_left_offset: f64,
    pub wedge_top_left_dx: f64,
    pub wedge_top_right_dx: f64,
    pub wedge_bottom_dx: f64,
    pub wedge_bottom_dy: f64,
    /// Hard upper bound on derived canvas width (at 1x); rendering is
    /// refused, never degraded, past it.
    pub max_canvas_width: f64,
    pub jpeg_quality: u8,
    /// Debug-only: skip the opaque white background (PNG output).
    pub transparent_background: bool,
    /// Directory holding `fonts/` and `images/`.
    pub assets_root: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            initial_font_size: 100.0,
            left_color: Rgba8::rgb(0x12, 0x8A, 0xFA),
            right_color: Rgba8::rgb(0x2B, 0x2B, 0x2B),
            stroke_color: Rgba8::WHITE,
            padding: Padding {
                top: 100.0,
                bottom: 55.0,
                x: 85.0,
                left_trim: 5.0,
            },
            scale: 2.0,
            stroke_width: 10.0,
            skew: [1.0, 0.0, -0.4, 1.0, 0.0, 0.0],
            ring_bottom_offset: 30.0,
            cross_bottom_offset: 10.0,
            cross_left_offset: 17.0,
            wedge_top_left_dx: 13.0,
            wedge_top_right_dx: 14.0,
            wedge_bottom_dx: 135.0,
            wedge_bottom_dy: 110.0,
            max_canvas_width: 2500.0,
            jpeg_quality: 90,
            transparent_background: false,
            assets_root: PathBuf::from("assets"),
        }
    }
}

impl RenderConfig {
    pub fn from_json_file(path: &Path) -> InsigniaResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse config JSON '{}'", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> InsigniaResult<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(InsigniaError::config("scale must be finite and > 0"));
        }
        if !self.initial_font_size.is_finite() || self.initial_font_size <= 0.0 {
            return Err(InsigniaError::config(
                "initial_font_size must be finite and > 0",
            ));
        }
        if !self.max_canvas_width.is_finite() || self.max_canvas_width <= 0.0 {
            return Err(InsigniaError::config(
                "max_canvas_width must be finite and > 0",
            ));
        }
        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            return Err(InsigniaError::config(
                "stroke_width must be finite and >= 0",
            ));
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(InsigniaError::config("jpeg_quality must be in 1..=100"));
        }
        Ok(())
    }

    /// Effective font size in device pixels.
    pub fn font_size_px(&self) -> f64 {
        self.initial_font_size * self.scale
    }

    pub fn skew_affine(&self) -> Affine {
        Affine::new(self.skew)
    }

    pub fn fonts_dir(&self) -> PathBuf {
        self.assets_root.join("fonts")
    }

    pub fn images_dir(&self) -> PathBuf {
        self.assets_root.join("images")
    }
}
