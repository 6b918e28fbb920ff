use std::sync::Arc;

use image::RgbaImage;

use crate::{
    assets::store::AssetProvider,
    compile::framing::{SINGLE_SHOT_RISE, SINGLE_SHOT_X, TWO_SHOT_TOP, frame_sprite},
    foundation::core::{Point, Vec2},
    foundation::error::{ChatstripError, ChatstripResult},
    layout::grouper::{PanelGroup, PanelSlot},
    script::conversation::Conversation,
    text::bubble::{BubbleGeometry, Pointing, SpeechBubble},
    text::metrics::TextMetrics,
};

/// Distance between a bubble and the panel edge it hugs.
pub const BUBBLE_MARGIN: f64 = 10.0;
/// Vertical gap between a bubble's body and the next bubble below it.
pub const BUBBLE_GAP: f64 = 40.0;

#[derive(Clone, Debug)]
/// Draw operation emitted by [`compile_panel`], in painter's order.
pub enum DrawOp {
    /// Straight-alpha image with its top-left corner at `origin`.
    Image {
        image: Arc<RgbaImage>,
        origin: Point,
    },
    /// Speech bubble: tail, body, then one text line per origin.
    Bubble {
        geometry: BubbleGeometry,
        lines: Vec<String>,
    },
}

#[derive(Clone, Debug)]
/// Backend-agnostic drawing recipe for one panel.
pub struct PanelPlan {
    pub width: u32,
    pub height: u32,
    pub ops: Vec<DrawOp>,
}

impl PanelPlan {
    pub fn bubbles(&self) -> impl Iterator<Item = &BubbleGeometry> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Bubble { geometry, .. } => Some(geometry),
            DrawOp::Image { .. } => None,
        })
    }
}

/// Compile one panel group into a draw plan sized to `background`.
///
/// `background` is drawn as-is; zooming it is the caller's job. Every speaker in the group must
/// already be cast and their character must have a sprite for `expression`.
pub fn compile_panel(
    group: &PanelGroup<'_>,
    conversation: &Conversation,
    background: &Arc<RgbaImage>,
    assets: &dyn AssetProvider,
    metrics: &mut dyn TextMetrics,
    expression: &str,
) -> ChatstripResult<PanelPlan> {
    let (width, height) = background.dimensions();
    let panel_w = f64::from(width);
    let panel_h = f64::from(height);
    let zoom = group.zoom();

    let mut ops = vec![DrawOp::Image {
        image: background.clone(),
        origin: Point::ORIGIN,
    }];

    match *group {
        PanelGroup::Single(slot) => {
            let sprite = sprite_for(&slot, conversation, assets, expression)?;
            let sprite = frame_sprite(sprite, zoom, slot.facing);
            ops.push(DrawOp::Image {
                image: Arc::new(sprite),
                origin: Point::new(SINGLE_SHOT_X, panel_h - SINGLE_SHOT_RISE),
            });

            let bubbles = SpeechBubble::create_text(&slot.message.text, true);
            stack_bubbles(&bubbles, BUBBLE_MARGIN, None, Pointing::Left, metrics, &mut ops)?;
        }
        PanelGroup::Pair(left, right) => {
            let left_sprite = sprite_for(&left, conversation, assets, expression)?;
            let left_sprite = frame_sprite(left_sprite, zoom, left.facing);
            let right_sprite = sprite_for(&right, conversation, assets, expression)?;
            let right_sprite = frame_sprite(right_sprite, zoom, right.facing);
            let right_x = panel_w - f64::from(right_sprite.width());
            ops.push(DrawOp::Image {
                image: Arc::new(left_sprite),
                origin: Point::new(0.0, TWO_SHOT_TOP),
            });
            ops.push(DrawOp::Image {
                image: Arc::new(right_sprite),
                origin: Point::new(right_x, TWO_SHOT_TOP),
            });

            let first = SpeechBubble::create_text(&left.message.text, false);
            let last_bottom =
                stack_bubbles(&first, BUBBLE_MARGIN, None, Pointing::Left, metrics, &mut ops)?;

            let second = SpeechBubble::create_text(&right.message.text, false);
            stack_bubbles(
                &second,
                last_bottom + BUBBLE_GAP,
                Some(panel_w - BUBBLE_MARGIN),
                Pointing::Right,
                metrics,
                &mut ops,
            )?;
        }
    }

    Ok(PanelPlan { width, height, ops })
}

fn sprite_for<'a>(
    slot: &PanelSlot<'_>,
    conversation: &Conversation,
    assets: &'a dyn AssetProvider,
    expression: &str,
) -> ChatstripResult<&'a RgbaImage> {
    let id = slot.message.speaker;
    let speaker = conversation
        .speaker(id)
        .ok_or_else(|| ChatstripError::render(format!("unknown speaker {id:?}")))?;
    let name = speaker.character.as_deref().ok_or_else(|| {
        ChatstripError::render(format!(
            "speaker '{}' has no character assigned",
            speaker.nick
        ))
    })?;
    let character = assets
        .character(name)
        .ok_or_else(|| ChatstripError::asset(format!("character '{name}' not found")))?;
    let sprite = character.sprite(expression).ok_or_else(|| {
        ChatstripError::asset(format!(
            "character '{name}' has no '{expression}' expression"
        ))
    })?;
    Ok(sprite.rgba().as_ref())
}

/// Lay bubbles out top to bottom starting at `top`, each [`BUBBLE_GAP`] below the last body.
///
/// With `right_edge` set, bubbles are right-aligned to it; otherwise they start at the left
/// margin. Returns the bottom of the last body.
fn stack_bubbles(
    bubbles: &[SpeechBubble],
    top: f64,
    right_edge: Option<f64>,
    pointing: Pointing,
    metrics: &mut dyn TextMetrics,
    ops: &mut Vec<DrawOp>,
) -> ChatstripResult<f64> {
    let mut y = top;
    let mut bottom = top;
    for bubble in bubbles {
        let mut geometry = bubble.layout(Point::new(BUBBLE_MARGIN, y), pointing, metrics)?;
        if let Some(edge) = right_edge {
            let dx = edge - geometry.body.width() - geometry.body.x0;
            geometry = geometry.translated(Vec2::new(dx, 0.0));
        }
        bottom = geometry.body.y1;
        y = bottom + BUBBLE_GAP;
        ops.push(DrawOp::Bubble {
            geometry,
            lines: bubble.lines().to_vec(),
        });
    }
    Ok(bottom)
}

#[cfg(test)]
#[path = "../../tests/unit/compile/plan.rs"]
mod tests;
