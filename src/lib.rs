//! Chatstrip turns a scripted chat conversation into a comic strip.
//!
//! # Pipeline overview
//!
//! 1. **Parse**: `nickname,text` lines -> [`Conversation`]
//! 2. **Cast**: every speaker gets a [`Character`] from an [`AssetProvider`]
//! 3. **Group**: messages -> [`PanelGroup`]s of one or two speakers ([`PanelGrouper`])
//! 4. **Compile**: each group -> a backend-agnostic [`PanelPlan`] (background, sprites, bubbles)
//! 5. **Render**: plans -> [`Raster`]s on the CPU ([`CpuBackend`]), optionally in parallel
//! 6. **Compose**: panels -> one grid image ([`GridLayout`], [`Comic`]) -> PNG
//!
//! Layout is pure and deterministic: bubble geometry depends only on the text, the tail
//! direction and a [`TextMetrics`] implementation, so it can be tested without fonts.
#![forbid(unsafe_code)]

mod assets;
mod compile;
mod config;
mod encode;
mod foundation;
mod layout;
mod render;
mod script;
mod text;

pub use assets::decode::{decode_font, decode_image, premultiplied_rgba8};
pub use assets::store::{
    AssetProvider, AssetStore, BACKGROUNDS_DIR, CHARACTERS_DIR, Character, FONTS_DIR,
    PreparedFont, PreparedImage,
};
pub use compile::framing::{
    BACKGROUND_CROP_TOP, BACKGROUND_ZOOM, TWO_SHOT_SPRITE_HEIGHT, TWO_SHOT_SPRITE_WIDTH,
    frame_sprite, zoom_background,
};
pub use compile::plan::{BUBBLE_GAP, BUBBLE_MARGIN, DrawOp, PanelPlan, compile_panel};
pub use config::ComicConfig;
pub use encode::{PNG_BACKGROUND, ensure_parent_dir, write_png};
pub use foundation::core::{Point, Raster, Rect, Rgba8, Vec2};
pub use foundation::error::{ChatstripError, ChatstripResult};
pub use layout::grid::{BORDER_WIDTH, GRID_X_PADDING, GRID_Y_PADDING, GridCell, GridLayout};
pub use layout::grouper::{
    Facing, PanelGroup, PanelGrouper, PanelSlot, StagePosition, ZoomLevel, group_panels,
};
pub use render::comic::{Comic, compose, render_grid};
pub use render::cpu::CpuBackend;
pub use render::panel::{PanelRenderer, PanelScene};
pub use render::pipeline::{RenderThreading, render_comic, render_panels, render_script};
pub use script::conversation::{Conversation, Message, Speaker, SpeakerId};
pub use script::parse::{parse_line, parse_script};
pub use text::bubble::{
    BubbleGeometry, DIALOGUE_WIDTH, MAX_LINES, MONOLOGUE_WIDTH, Pointing, SpeechBubble,
};
pub use text::metrics::{FixedAdvanceMetrics, TextBrushRgba8, TextLayoutEngine, TextMetrics};
pub use text::wrap::wrap;
