use crate::{
    config::RenderConfig,
    decor::{Decorations, PreparedImage},
    foundation::{
        core::{Affine, Point, Rgba8, Vec2},
        error::{InsigniaError, InsigniaResult},
    },
    input::NormalizedText,
    text::{ShapedText, TextMetrics, TextShaper},
    transform,
};

/// Canvas derived from measured text; never user-supplied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasPlan {
    pub width_px: f64,
    pub height_px: f64,
    pub background: Background,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Background {
    OpaqueWhite,
    Transparent,
}

/// A placed text object ready for rasterization: shaped glyphs (the fill
/// color travels in their brush), unstroked metrics, stroke styling, and
/// the local-to-canvas affine with the shared skew already folded in about
/// the object's visual center.
#[derive(Clone, Debug)]
pub struct PlacedText {
    pub shaped: ShapedText,
    pub origin: Point,
    pub metrics: TextMetrics,
    pub stroke: Rgba8,
    pub stroke_width_px: f64,
    pub transform: Affine,
}

/// A decoration anchored by its horizontal center and bottom edge.
#[derive(Clone, Debug)]
pub struct PlacedImage {
    pub image: PreparedImage,
    pub center_x: f64,
    pub bottom_y: f64,
    pub scale: f64,
}

impl PlacedImage {
    pub fn scaled_width(&self) -> f64 {
        f64::from(self.image.width) * self.scale
    }

    pub fn scaled_height(&self) -> f64 {
        f64::from(self.image.height) * self.scale
    }

    /// Local-to-canvas affine for the image's native pixel space.
    pub fn transform(&self) -> Affine {
        Affine::translate(Vec2::new(
            self.center_x - self.scaled_width() / 2.0,
            self.bottom_y - self.scaled_height(),
        )) * Affine::scale(self.scale)
    }
}

/// The white triangle bridging the ring/cross group to the text baseline.
/// Its geometry is purely a function of cross placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wedge {
    pub points: [Point; 3],
}

/// How the ring's horizontal center was chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RingCenterSource {
    /// First-stage heuristic: a fixed fraction of the ring height past the
    /// right text's left edge.
    Heuristic,
    /// Re-anchored to the right text's isolated first glyph.
    FirstGlyph,
    /// Conservative override for short right-hand text.
    Fallback,
}

/// Everything the rasterizer needs, produced once per render and consumed
/// read-only. Draw order is ring, left text, right text, wedge, cross.
#[derive(Clone, Debug)]
pub struct ScenePlan {
    pub canvas: CanvasPlan,
    pub left: PlacedText,
    pub right: PlacedText,
    pub ring: PlacedImage,
    pub cross: PlacedImage,
    pub wedge: Wedge,
    pub ring_center_source: RingCenterSource,
    /// Global viewport shift applied to every layer at raster time.
    pub viewport_shift_x: f64,
}

/// Horizontal and vertical edges of the placed right text; every
/// decoration coordinate hangs off these.
#[derive(Clone, Copy, Debug)]
struct RightEdges {
    left_edge: f64,
    right_edge: f64,
    top_edge: f64,
    bottom_edge: f64,
}

/// Lay out the whole mark from measured text.
///
/// Fails fast with [`InsigniaError::TextTooLong`] when the derived canvas
/// width reaches the configured safety bound; nothing is rasterized past
/// that point.
#[tracing::instrument(skip(shaper, decor, cfg))]
pub fn plan_scene(
    text: &NormalizedText,
    shaper: &mut TextShaper,
    decor: &Decorations,
    cfg: &RenderConfig,
) -> InsigniaResult<ScenePlan> {
    let s = cfg.scale;
    let font_size = cfg.font_size_px();

    let left_origin = Point::new(cfg.padding.x * s, cfg.padding.top * s);
    let left_shaped = shaper.shape(&text.left, font_size, cfg.left_color.into())?;
    let left_right_edge = left_shaped.metrics.width_px + cfg.padding.x * s;

    let right_origin = Point::new(left_right_edge, cfg.padding.top * s);
    let right_shaped = shaper.shape(&text.right, font_size, cfg.right_color.into())?;
    let right = RightEdges {
        left_edge: right_origin.x,
        right_edge: right_origin.x + right_shaped.metrics.width_px,
        top_edge: right_origin.y,
        bottom_edge: right_origin.y + right_shaped.metrics.height_px,
    };

    let canvas_width = right.right_edge + cfg.padding.x * s;
    let canvas_height = left_shaped.metrics.height_px + (cfg.padding.top + cfg.padding.bottom) * s;
    let width_limit = cfg.max_canvas_width * s;
    if canvas_width >= width_limit {
        return Err(InsigniaError::text_too_long(format!(
            "derived canvas width {canvas_width:.0} reaches the permitted maximum {width_limit:.0}"
        )));
    }

    let ring_target_height = font_size;
    let ring_scale = ring_target_height / f64::from(decor.ring.height);
    let ring_half_width = f64::from(decor.ring.width) * ring_scale / 2.0;
    let (ring_center, ring_center_source) = resolve_ring_center(
        shaper,
        &text.right,
        right,
        ring_target_height,
        ring_half_width,
        font_size,
    )?;
    let ring = PlacedImage {
        image: decor.ring.clone(),
        center_x: ring_center,
        bottom_y: right.top_edge + cfg.ring_bottom_offset * s,
        scale: ring_scale,
    };

    let cross_height = ring_target_height * 2.1;
    let cross = PlacedImage {
        image: decor.cross.clone(),
        center_x: ring_center - cfg.cross_left_offset * s,
        bottom_y: right.bottom_edge + cfg.cross_bottom_offset * s,
        scale: cross_height / f64::from(decor.cross.height),
    };

    let wedge = Wedge {
        points: [
            Point::new(cross.center_x - cfg.wedge_top_left_dx * s, right.top_edge),
            Point::new(cross.center_x + cfg.wedge_top_right_dx * s, right.top_edge),
            Point::new(
                cross.center_x - cfg.wedge_bottom_dx * s,
                cross.bottom_y + cfg.wedge_bottom_dy * s,
            ),
        ],
    };

    let skew = cfg.skew_affine();
    let stroke_width_px = cfg.stroke_width * s;
    let left = placed_text(left_shaped, left_origin, skew, cfg.stroke_color, stroke_width_px);
    let right_placed = placed_text(
        right_shaped,
        right_origin,
        skew,
        cfg.stroke_color,
        stroke_width_px,
    );

    Ok(ScenePlan {
        canvas: CanvasPlan {
            width_px: canvas_width,
            height_px: canvas_height,
            background: if cfg.transparent_background {
                Background::Transparent
            } else {
                Background::OpaqueWhite
            },
        },
        left,
        right: right_placed,
        ring,
        cross,
        wedge,
        ring_center_source,
        viewport_shift_x: -(cfg.padding.left_trim * s),
    })
}

fn placed_text(
    shaped: ShapedText,
    origin: Point,
    skew: Affine,
    stroke: Rgba8,
    stroke_width_px: f64,
) -> PlacedText {
    let metrics = shaped.metrics;
    let transform =
        transform::skew_about_center(origin, metrics.width_px, metrics.height_px, skew);
    PlacedText {
        shaped,
        origin,
        metrics,
        stroke,
        stroke_width_px,
        transform,
    }
}

/// Two-stage self-correcting ring placement.
///
/// Ring size is proportional to font size, not to the first glyph's width:
/// naive placement on wide glyphs overlaps the following glyph, while on
/// narrow glyphs it leaves the ring floating. Re-measuring the right
/// text's first character as an isolated run keeps the ring hugging it
/// across scripts of very different glyph widths, and the final overflow
/// check catches short right-hand text. The 0.85/0.55/0.5 factors and the
/// length cutoff are fixed calibration, not tunables.
fn resolve_ring_center(
    shaper: &mut TextShaper,
    right_text: &str,
    right: RightEdges,
    ring_target_height: f64,
    ring_half_width: f64,
    font_size: f64,
) -> InsigniaResult<(f64, RingCenterSource)> {
    let mut center = right.left_edge + ring_target_height * 0.85;
    let mut source = RingCenterSource::Heuristic;

    let over_layout = |center: f64| center + ring_half_width >= right.right_edge;

    if right_text.chars().count() > 2 {
        if let Some(first) = right_text.chars().next() {
            let glyph = shaper.measure(&first.to_string(), font_size)?;
            let first_right_edge = right.left_edge + glyph.width_px;
            let candidate = first_right_edge + ring_target_height * 0.55;
            if !over_layout(candidate) {
                center = candidate;
                source = RingCenterSource::FirstGlyph;
            } else {
                tracing::debug!(candidate, "ring right edge would pass the right text");
            }
        }
    }

    if over_layout(center) {
        center = right.left_edge + ring_target_height * 0.5;
        source = RingCenterSource::Fallback;
        tracing::debug!(center, "short right text, conservative ring center");
    }

    Ok((center, source))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::{decor::load_decorations, input::TextPair};

    fn fixtures() -> (TextShaper, Decorations, RenderConfig) {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");
        let library = crate::fonts::font_library(&root.join("fonts")).unwrap();
        let shaper = TextShaper::new(library).unwrap();
        let decor = load_decorations(&root.join("images")).unwrap();
        let cfg = RenderConfig {
            assets_root: root,
            ..RenderConfig::default()
        };
        (shaper, decor, cfg)
    }

    fn plan(left: &str, right: &str) -> InsigniaResult<ScenePlan> {
        let (mut shaper, decor, cfg) = fixtures();
        let text = crate::input::normalize_pair(&TextPair {
            left: left.to_string(),
            right: right.to_string(),
        })?;
        plan_scene(&text, &mut shaper, &decor, &cfg)
    }

    #[test]
    fn canvas_height_tracks_left_text_and_padding() {
        let (mut shaper, decor, cfg) = fixtures();
        let text = crate::input::normalize_pair(&TextPair {
            left: "Blue".to_string(),
            right: "Archive".to_string(),
        })
        .unwrap();
        let p = plan_scene(&text, &mut shaper, &decor, &cfg).unwrap();

        let expected = p.left.metrics.height_px
            + (cfg.padding.top + cfg.padding.bottom) * cfg.scale;
        assert_eq!(p.canvas.height_px, expected);
    }

    #[test]
    fn right_text_never_changes_canvas_height() {
        let a = plan("Blue", "Archive").unwrap();
        let b = plan("Blue", "Archipelago Annals").unwrap();
        assert_eq!(a.canvas.height_px, b.canvas.height_px);
        assert!(b.canvas.width_px > a.canvas.width_px);
    }

    #[test]
    fn overlong_text_is_rejected_before_placement() {
        let long = "A".repeat(120);
        let err = plan("Blue", &long).unwrap_err();
        assert!(matches!(err, InsigniaError::TextTooLong(_)));
    }

    #[test]
    fn wedge_is_a_pure_function_of_cross_placement() {
        let p = plan("Blue", "Archive").unwrap();
        let s = 2.0;
        assert_eq!(p.wedge.points[0].x, p.cross.center_x - 13.0 * s);
        assert_eq!(p.wedge.points[1].x, p.cross.center_x + 14.0 * s);
        assert_eq!(p.wedge.points[0].y, p.wedge.points[1].y);
        assert_eq!(p.wedge.points[2].x, p.cross.center_x - 135.0 * s);
        assert_eq!(p.wedge.points[2].y, p.cross.bottom_y + 110.0 * s);
    }

    #[test]
    fn cross_sits_left_of_ring_center() {
        let p = plan("Blue", "Archive").unwrap();
        assert_eq!(p.cross.center_x, p.ring.center_x - 17.0 * 2.0);
        assert!((p.cross.scaled_height() - p.ring.scaled_height() * 2.1).abs() < 1e-6);
    }

    #[test]
    fn decorations_hang_off_right_text_edges() {
        let (mut shaper, decor, cfg) = fixtures();
        let text = crate::input::normalize_pair(&TextPair {
            left: "Blue".to_string(),
            right: "Archive".to_string(),
        })
        .unwrap();
        let p = plan_scene(&text, &mut shaper, &decor, &cfg).unwrap();

        let right_top = cfg.padding.top * cfg.scale;
        let right_bottom = right_top + p.right.metrics.height_px;
        assert_eq!(p.ring.bottom_y, right_top + 30.0 * cfg.scale);
        assert_eq!(p.cross.bottom_y, right_bottom + 10.0 * cfg.scale);
    }
}
