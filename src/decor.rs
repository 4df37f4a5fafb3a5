use std::{path::Path, sync::Arc};

use crate::foundation::{
    error::{InsigniaError, InsigniaResult},
    math::mul_div255_u8,
};

/// Decoded decorative bitmap in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// The two fixed overlays of the mark, loaded fresh per render call.
#[derive(Clone, Debug)]
pub struct Decorations {
    pub ring: PreparedImage,
    pub cross: PreparedImage,
}

pub fn load_decorations(images_dir: &Path) -> InsigniaResult<Decorations> {
    Ok(Decorations {
        ring: load_image(&images_dir.join("ring.png"))?,
        cross: load_image(&images_dir.join("cross.png"))?,
    })
}

pub fn load_image(path: &Path) -> InsigniaResult<PreparedImage> {
    let bytes = std::fs::read(path).map_err(|e| {
        InsigniaError::asset_load(format!("read image '{}': {e}", path.display()))
    })?;
    decode_image(&bytes).map_err(|e| {
        InsigniaError::asset_load(format!("decode image '{}': {e}", path.display()))
    })
}

pub fn decode_image(bytes: &[u8]) -> InsigniaResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| InsigniaError::asset_load(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3];
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = mul_div255_u8(u16::from(px[0]), u16::from(a));
        px[1] = mul_div255_u8(u16::from(px[1]), u16::from(a));
        px[2] = mul_div255_u8(u16::from(px[2]), u16::from(a));
    }
}
