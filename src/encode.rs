use std::path::Path;

use anyhow::Context as _;

use crate::foundation::{
    core::{Raster, Rgba8},
    error::ChatstripResult,
};

/// Color every transparent pixel is flattened over before encoding.
pub const PNG_BACKGROUND: Rgba8 = Rgba8::WHITE;

pub fn ensure_parent_dir(path: &Path) -> ChatstripResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Write `raster` as an opaque PNG, flattened over [`PNG_BACKGROUND`].
pub fn write_png(raster: &Raster, path: &Path) -> ChatstripResult<()> {
    let img = raster.to_opaque_rgba_image(PNG_BACKGROUND)?;
    ensure_parent_dir(path)?;
    img.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", path.display()))?;
    tracing::info!(
        path = %path.display(),
        width = raster.width,
        height = raster.height,
        "wrote comic"
    );
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/encode.rs"]
mod tests;
