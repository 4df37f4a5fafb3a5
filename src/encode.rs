use std::path::Path;

use anyhow::Context;
use image::ImageEncoder;

use crate::{
    foundation::error::{InsigniaError, InsigniaResult},
    input::ImageKind,
    raster::FrameRgba,
};

/// Encode a premultiplied frame to the requested format.
///
/// JPEG flattens alpha over white; PNG keeps the alpha channel
/// (unpremultiplied back to straight RGBA).
pub fn encode_frame(
    frame: &FrameRgba,
    kind: ImageKind,
    jpeg_quality: u8,
) -> InsigniaResult<Vec<u8>> {
    let mut out = Vec::new();
    match kind {
        ImageKind::Jpeg => {
            let rgb = flatten_over_white(&frame.data);
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, jpeg_quality)
                .write_image(
                    &rgb,
                    frame.width,
                    frame.height,
                    image::ExtendedColorType::Rgb8,
                )
                .context("encode JPEG")?;
        }
        ImageKind::Png => {
            let rgba = unpremultiply(&frame.data);
            image::codecs::png::PngEncoder::new(&mut out)
                .write_image(
                    &rgba,
                    frame.width,
                    frame.height,
                    image::ExtendedColorType::Rgba8,
                )
                .context("encode PNG")?;
        }
    }
    Ok(out)
}

/// Encode and write to `path`, confirming the artifact actually landed on
/// the backing store before signaling success.
pub fn write_to_path(
    frame: &FrameRgba,
    path: &Path,
    kind: ImageKind,
    jpeg_quality: u8,
) -> InsigniaResult<()> {
    let bytes = encode_frame(frame, kind, jpeg_quality)
        .map_err(|e| InsigniaError::encode_write(path, e.to_string()))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                InsigniaError::encode_write(path, format!("create output dir: {e}"))
            })?;
        }
    }
    std::fs::write(path, &bytes)
        .map_err(|e| InsigniaError::encode_write(path, format!("write: {e}")))?;

    let meta = std::fs::metadata(path).map_err(|e| {
        InsigniaError::encode_write(path, format!("confirm written artifact: {e}"))
    })?;
    if !meta.is_file() || meta.len() != bytes.len() as u64 {
        return Err(InsigniaError::encode_write(
            path,
            "written artifact is missing or truncated",
        ));
    }
    Ok(())
}

/// Composite premultiplied pixels over opaque white, dropping alpha.
fn flatten_over_white(premul: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(premul.len() / 4 * 3);
    for px in premul.chunks_exact(4) {
        let inv = 255 - u16::from(px[3]);
        rgb.push((u16::from(px[0]) + inv).min(255) as u8);
        rgb.push((u16::from(px[1]) + inv).min(255) as u8);
        rgb.push((u16::from(px[2]) + inv).min(255) as u8);
    }
    rgb
}

/// Premultiplied RGBA back to straight alpha, rounded.
fn unpremultiply(premul: &[u8]) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(premul.len());
    for px in premul.chunks_exact(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            rgba.extend_from_slice(&[0, 0, 0, 0]);
            continue;
        }
        for c in &px[..3] {
            rgba.push(((u16::from(*c) * 255 + a / 2) / a).min(255) as u8);
        }
        rgba.push(px[3]);
    }
    rgba
}
