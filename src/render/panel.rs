use std::sync::Arc;

use image::RgbaImage;

use crate::{
    assets::store::{AssetProvider, PreparedFont},
    compile::framing::{BACKGROUND_ZOOM, zoom_background},
    compile::plan::compile_panel,
    foundation::core::Raster,
    foundation::error::{ChatstripError, ChatstripResult},
    layout::grouper::PanelGroup,
    render::cpu::CpuBackend,
    script::conversation::Conversation,
};

/// Shared, read-only inputs for rendering any panel of one conversation.
///
/// Cheap to share across threads; each thread pairs it with its own [`CpuBackend`].
pub struct PanelScene<'a> {
    pub conversation: &'a Conversation,
    pub assets: &'a dyn AssetProvider,
    /// Background after the zoom crop, shared by every panel.
    pub background: Arc<RgbaImage>,
    pub font: &'a PreparedFont,
    pub font_size_px: f32,
    pub expression: &'a str,
}

impl<'a> PanelScene<'a> {
    /// Resolve the named background and font, zooming the background once up front.
    pub fn new(
        conversation: &'a Conversation,
        assets: &'a dyn AssetProvider,
        background: &str,
        font: &str,
        font_size_px: f32,
        expression: &'a str,
    ) -> ChatstripResult<Self> {
        let bg = assets
            .background(background)
            .ok_or_else(|| ChatstripError::asset(format!("background '{background}' not found")))?;
        let font = assets
            .font(font)
            .ok_or_else(|| ChatstripError::asset(format!("font '{font}' not found")))?;

        Ok(Self {
            conversation,
            assets,
            background: Arc::new(zoom_background(bg.rgba(), BACKGROUND_ZOOM)),
            font,
            font_size_px,
            expression,
        })
    }

    pub fn backend(&self) -> ChatstripResult<CpuBackend> {
        CpuBackend::new(self.font, self.font_size_px)
    }
}

/// Renders panel groups of one conversation into rasters.
pub struct PanelRenderer<'a> {
    scene: &'a PanelScene<'a>,
    backend: CpuBackend,
}

impl<'a> PanelRenderer<'a> {
    pub fn new(scene: &'a PanelScene<'a>) -> ChatstripResult<Self> {
        Ok(Self {
            scene,
            backend: scene.backend()?,
        })
    }

    pub fn render(&mut self, group: &PanelGroup<'_>) -> ChatstripResult<Raster> {
        render_group(self.scene, &mut self.backend, group)
    }
}

pub(crate) fn render_group(
    scene: &PanelScene<'_>,
    backend: &mut CpuBackend,
    group: &PanelGroup<'_>,
) -> ChatstripResult<Raster> {
    let plan = compile_panel(
        group,
        scene.conversation,
        &scene.background,
        scene.assets,
        backend.text_engine(),
        scene.expression,
    )?;
    backend.render_plan(&plan)
}

#[cfg(test)]
#[path = "../../tests/unit/render/panel.rs"]
mod tests;
