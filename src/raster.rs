use std::sync::Arc;

use crate::{
    decor::PreparedImage,
    foundation::{
        core::{Affine, Rgba8},
        error::{InsigniaError, InsigniaResult},
    },
    scene::{Background, PlacedImage, PlacedText, ScenePlan, Wedge},
};

/// Rasterized frame in premultiplied RGBA8, row-major, tightly packed.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Rasterize a scene plan.
///
/// Layers composite bottom to top: ring, left text, right text, wedge,
/// cross. Every layer transform is premultiplied by the plan's viewport
/// shift; the background fill is canvas-wide and deliberately not shifted.
pub fn rasterize(plan: &ScenePlan) -> InsigniaResult<FrameRgba> {
    let (width, height) = canvas_dims(plan)?;

    let mut ctx = vello_cpu::RenderContext::new(width, height);
    let viewport = Affine::translate((plan.viewport_shift_x, 0.0));

    if plan.canvas.background == Background::OpaqueWhite {
        ctx.set_transform(affine_to_cpu(Affine::IDENTITY));
        ctx.set_paint(color_to_cpu(Rgba8::WHITE));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(width),
            f64::from(height),
        ));
    }

    draw_image(&mut ctx, &plan.ring, viewport)?;
    draw_text(&mut ctx, &plan.left, viewport);
    draw_text(&mut ctx, &plan.right, viewport);
    draw_wedge(&mut ctx, &plan.wedge, viewport);
    draw_image(&mut ctx, &plan.cross, viewport)?;

    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    ctx.render_to_pixmap(&mut pixmap);

    Ok(FrameRgba {
        width: u32::from(width),
        height: u32::from(height),
        data: pixmap.data_as_u8_slice().to_vec(),
    })
}

fn canvas_dims(plan: &ScenePlan) -> InsigniaResult<(u16, u16)> {
    let width = plan.canvas.width_px.round();
    let height = plan.canvas.height_px.round();
    if width < 1.0 || height < 1.0 {
        return Err(anyhow::anyhow!("derived canvas dimensions are empty").into());
    }
    let width_u16: u16 = (width as u32)
        .try_into()
        .map_err(|_| anyhow::anyhow!("canvas width exceeds u16"))?;
    let height_u16: u16 = (height as u32)
        .try_into()
        .map_err(|_| anyhow::anyhow!("canvas height exceeds u16"))?;
    Ok((width_u16, height_u16))
}

fn draw_image(
    ctx: &mut vello_cpu::RenderContext,
    placed: &PlacedImage,
    viewport: Affine,
) -> InsigniaResult<()> {
    let paint = image_paint(&placed.image)?;
    ctx.set_transform(affine_to_cpu(viewport * placed.transform()));
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(placed.image.width),
        f64::from(placed.image.height),
    ));
    Ok(())
}

/// Glyphs paint stroke first, then fill, so the fill always sits on top of
/// the white outline.
fn draw_text(ctx: &mut vello_cpu::RenderContext, placed: &PlacedText, viewport: Affine) {
    ctx.set_transform(affine_to_cpu(viewport * placed.transform));

    let stroked = placed.stroke_width_px > 0.0;
    if stroked {
        let mut stroke = vello_cpu::kurbo::Stroke::new(placed.stroke_width_px);
        stroke.join = vello_cpu::kurbo::Join::Round;
        stroke.start_cap = vello_cpu::kurbo::Cap::Round;
        stroke.end_cap = vello_cpu::kurbo::Cap::Round;
        ctx.set_stroke(stroke);
    }

    for line in placed.shaped.layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };

            let font = font_for_run(run.run());
            let glyphs: Vec<vello_cpu::Glyph> = run
                .glyphs()
                .map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                })
                .collect();

            if stroked {
                ctx.set_paint(color_to_cpu(placed.stroke));
                ctx.glyph_run(&font)
                    .font_size(run.run().font_size())
                    .stroke_glyphs(glyphs.iter().copied());
            }

            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            ctx.glyph_run(&font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs.into_iter());
        }
    }
}

fn draw_wedge(ctx: &mut vello_cpu::RenderContext, wedge: &Wedge, viewport: Affine) {
    let mut path = vello_cpu::kurbo::BezPath::new();
    let [p0, p1, p2] = wedge.points;
    path.move_to(point_to_cpu(p0));
    path.line_to(point_to_cpu(p1));
    path.line_to(point_to_cpu(p2));
    path.close_path();

    ctx.set_transform(affine_to_cpu(viewport));
    ctx.set_paint(color_to_cpu(Rgba8::WHITE));
    ctx.fill_path(&path);
}

/// Rebuild the run's backing font for the CPU glyph pipeline. Runs shaped
/// through the fallback face carry their own font data, so this must stay
/// per-run rather than per-text.
fn font_for_run(
    run: &parley::layout::Run<'_, crate::text::TextBrushRgba8>,
) -> vello_cpu::peniko::FontData {
    let font = run.font();
    vello_cpu::peniko::FontData::new(
        vello_cpu::peniko::Blob::from(font.data.as_ref().to_vec()),
        font.index,
    )
}

fn image_paint(image: &PreparedImage) -> InsigniaResult<vello_cpu::Image> {
    let pixmap = premul_bytes_to_pixmap(&image.rgba8_premul, image.width, image.height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> InsigniaResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| InsigniaError::asset_load("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| InsigniaError::asset_load("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(anyhow::anyhow!("prepared image byte length mismatch").into());
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}
