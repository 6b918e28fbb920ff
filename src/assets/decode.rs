use std::sync::Arc;

use anyhow::Context;

use crate::{
    assets::store::{PreparedFont, PreparedImage},
    foundation::error::{ChatstripError, ChatstripResult},
};

pub fn decode_image(bytes: &[u8]) -> ChatstripResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(ChatstripError::asset("decoded image has zero area"));
    }
    Ok(PreparedImage::new(rgba))
}

/// Check that `bytes` hold at least one usable font face and wrap them for later shaping.
pub fn decode_font(name: &str, bytes: Vec<u8>) -> ChatstripResult<PreparedFont> {
    let mut font_ctx = parley::FontContext::default();
    let families = font_ctx
        .collection
        .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
    if families.is_empty() {
        return Err(ChatstripError::asset(format!(
            "font '{name}' contains no font families"
        )));
    }

    Ok(PreparedFont {
        name: name.to_string(),
        bytes: Arc::new(bytes),
    })
}

/// Row-major premultiplied RGBA8 copy of a straight-alpha image.
pub fn premultiplied_rgba8(img: &image::RgbaImage) -> Vec<u8> {
    let mut out = img.as_raw().clone();
    premultiply_rgba8_in_place(&mut out);
    out
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
