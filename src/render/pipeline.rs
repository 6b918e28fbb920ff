use rayon::prelude::*;

use crate::{
    assets::store::AssetProvider,
    config::ComicConfig,
    foundation::core::Raster,
    foundation::error::{ChatstripError, ChatstripResult},
    layout::grouper::{PanelGroup, group_panels},
    render::comic::Comic,
    render::panel::{PanelScene, render_group},
    script::conversation::Conversation,
    script::parse::parse_script,
};

/// How panels are spread over threads.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderThreading {
    /// Render panels on a rayon pool instead of the calling thread.
    pub parallel: bool,
    /// Pool size; `None` lets rayon decide. Only used when `parallel` is set.
    pub threads: Option<usize>,
}

/// Render every group in order, sequentially or on a thread pool.
///
/// Output order always matches `groups`.
pub fn render_panels(
    groups: &[PanelGroup<'_>],
    scene: &PanelScene<'_>,
    threading: &RenderThreading,
) -> ChatstripResult<Vec<Raster>> {
    if groups.is_empty() {
        return Ok(Vec::new());
    }

    if !threading.parallel {
        let mut backend = scene.backend()?;
        return groups
            .iter()
            .map(|group| render_group(scene, &mut backend, group))
            .collect();
    }

    let pool = build_thread_pool(threading.threads)?;
    pool.install(|| {
        groups
            .par_iter()
            .map_init(
                || scene.backend(),
                |backend, group| -> ChatstripResult<Raster> {
                    match backend {
                        Ok(backend) => render_group(scene, backend, group),
                        Err(err) => Err(ChatstripError::render(format!(
                            "worker backend unavailable: {err}"
                        ))),
                    }
                },
            )
            .collect::<ChatstripResult<Vec<_>>>()
    })
}

/// Group a cast conversation into panels and render them.
#[tracing::instrument(skip_all, fields(messages = conversation.messages().len()))]
pub fn render_comic(
    conversation: &Conversation,
    assets: &dyn AssetProvider,
    config: &ComicConfig,
) -> ChatstripResult<Comic> {
    let groups = group_panels(conversation.messages());
    tracing::debug!(panels = groups.len(), "grouped messages into panels");
    if groups.is_empty() {
        return Comic::new(Vec::new(), config.columns);
    }

    let scene = PanelScene::new(
        conversation,
        assets,
        &config.background,
        &config.font,
        config.font_size_px,
        &config.expression,
    )?;
    let panels = render_panels(&groups, &scene, &config.threading)?;
    tracing::info!(panels = panels.len(), "rendered panels");
    Comic::new(panels, config.columns)
}

/// Parse, cast, render and compose a script into the final comic raster.
#[tracing::instrument(skip_all)]
pub fn render_script(
    src: &str,
    assets: &dyn AssetProvider,
    config: &ComicConfig,
) -> ChatstripResult<Raster> {
    config.validate()?;
    let mut conversation = parse_script(src)?;
    let mut rng = config.rng();
    conversation.assign_characters(assets, &mut rng)?;
    render_comic(&conversation, assets, config)?.to_raster()
}

fn build_thread_pool(threads: Option<usize>) -> ChatstripResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ChatstripError::config(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ChatstripError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
