//! Insignia composites a stylized two-part logo mark (blue left text, dark
//! right text, a halo ring, a cross, and a connecting white wedge) into a
//! JPEG or PNG.
//!
//! # Pipeline overview
//!
//! 1. **Validate**: output extension and text normalization ([`normalize_pair`])
//! 2. **Measure**: shape both runs against the registered faces ([`TextShaper`])
//! 3. **Plan**: derive the canvas and every placement record ([`plan_scene`])
//! 4. **Rasterize**: composite all layers in fixed z-order ([`rasterize`])
//! 5. **Encode**: JPEG/PNG bytes, to a confirmed file or a byte stream
//!
//! The canvas is never user-sized: its dimensions derive from the measured
//! text, subject to a hard width bound ([`InsigniaError::TextTooLong`]).
//! Each [`draw`] call is fully self-contained; the only process-wide state
//! is the one-time, idempotent font registration ([`font_library`]).
#![forbid(unsafe_code)]

mod config;
mod decor;
mod draw;
mod encode;
mod fonts;
mod foundation;
mod input;
mod raster;
mod scene;
mod text;
mod transform;

pub use config::{Padding, RenderConfig};
pub use decor::{Decorations, PreparedImage, decode_image, load_decorations, load_image};
pub use draw::{DrawOptions, DrawOutput, draw, draw_to_file, draw_to_vec, draw_to_writer};
pub use encode::{encode_frame, write_to_path};
pub use fonts::{FontLibrary, font_library};
pub use foundation::core::{Affine, BezPath, Point, Rect, Rgba8, Vec2};
pub use foundation::error::{InsigniaError, InsigniaResult};
pub use input::{
    ImageKind, NormalizedText, OutputTarget, TextPair, normalize_pair, strip_newlines,
};
pub use raster::{FrameRgba, rasterize};
pub use scene::{
    Background, CanvasPlan, PlacedImage, PlacedText, RingCenterSource, ScenePlan, Wedge,
    plan_scene,
};
pub use text::{ShapedText, TextBrushRgba8, TextMetrics, TextShaper};
pub use transform::{Decomposed, qr_decompose, recompose_linear, skew_about_center};
