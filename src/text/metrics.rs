use crate::{
    assets::store::PreparedFont,
    foundation::error::{ChatstripError, ChatstripResult},
};

/// Font measurements needed to size speech bubbles.
pub trait TextMetrics {
    /// Advance width of a single line of text, in pixels.
    fn text_width(&mut self, text: &str) -> ChatstripResult<f64>;

    /// Distance between consecutive baselines, in pixels.
    fn line_height(&mut self) -> ChatstripResult<f64>;
}

/// Monospace approximation: every character advances by the same amount.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvanceMetrics {
    pub advance_px: f64,
    pub line_height_px: f64,
}

impl TextMetrics for FixedAdvanceMetrics {
    fn text_width(&mut self, text: &str) -> ChatstripResult<f64> {
        Ok(text.chars().count() as f64 * self.advance_px)
    }

    fn line_height(&mut self) -> ChatstripResult<f64> {
        Ok(self.line_height_px)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl TextBrushRgba8 {
    pub const BLACK: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };
}

/// Parley layout contexts bound to one registered font at a fixed size.
///
/// Contexts are not shareable across threads; build one engine per worker.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    size_px: f32,
    line_height: Option<f64>,
}

impl TextLayoutEngine {
    pub fn new(font: &PreparedFont, size_px: f32) -> ChatstripResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ChatstripError::config(
                "font size must be finite and > 0",
            ));
        }

        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font.bytes.as_ref().clone()),
            None,
        );
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            ChatstripError::asset(format!(
                "font '{}' registered no font families",
                font.name
            ))
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| {
                ChatstripError::asset(format!("font '{}' has no family name", font.name))
            })?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            size_px,
            line_height: None,
        })
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    /// Shape one line of text without wrapping.
    pub fn layout_line(&mut self, text: &str) -> parley::Layout<TextBrushRgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8::BLACK));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

impl TextMetrics for TextLayoutEngine {
    fn text_width(&mut self, text: &str) -> ChatstripResult<f64> {
        let layout = self.layout_line(text);
        Ok(layout
            .lines()
            .map(|line| f64::from(line.metrics().advance))
            .fold(0.0, f64::max))
    }

    fn line_height(&mut self) -> ChatstripResult<f64> {
        if let Some(h) = self.line_height {
            return Ok(h);
        }

        let layout = self.layout_line("M");
        let h = layout
            .lines()
            .next()
            .map(|line| {
                let m = line.metrics();
                f64::from(m.ascent + m.descent + m.leading)
            })
            .filter(|h| h.is_finite() && *h > 0.0)
            .ok_or_else(|| {
                ChatstripError::render(format!(
                    "font family '{}' produced no measurable line",
                    self.family_name
                ))
            })?;
        self.line_height = Some(h);
        Ok(h)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/metrics.rs"]
mod tests;
