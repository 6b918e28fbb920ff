use crate::{
    foundation::core::{Point, Rect, Vec2},
    foundation::error::ChatstripResult,
    text::metrics::TextMetrics,
    text::wrap::wrap,
};

/// Most lines a single bubble may hold before overflow moves into a continuation bubble.
pub const MAX_LINES: usize = 5;
/// Wrap budget, in characters, for a speaker who has the panel to themselves.
pub const MONOLOGUE_WIDTH: usize = 26;
/// Wrap budget, in characters, when two bubbles share a panel.
pub const DIALOGUE_WIDTH: usize = 13;

/// Horizontal padding between text and bubble edge, applied on each side.
pub const X_PADDING: f64 = 15.0;
/// Total vertical padding, split evenly above and below the text.
pub const Y_PADDING: f64 = 10.0;
/// How far the tail tip reaches below the body.
pub const TAIL_LENGTH: f64 = 30.0;
/// Corner radius of the rounded bubble body, in pixels.
pub const CORNER_RADIUS: f64 = 5.0;
/// Stroke width of the bubble and tail outline, in pixels.
pub const OUTLINE_WIDTH: f64 = 2.0;

const ROUNDING_EPSILON: f64 = 0.5;

/// Which way a bubble's tail leans.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pointing {
    Left,
    Right,
}

impl Pointing {
    /// Tail x positions as fractions of the body width: two base points, then the tip.
    pub fn tail_fractions(self) -> [f64; 3] {
        match self {
            Pointing::Left => [0.7, 0.6, 0.5],
            Pointing::Right => [0.4, 0.3, 0.5],
        }
    }
}

/// Wrapped, uppercased text of a single speech bubble.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeechBubble {
    lines: Vec<String>,
    longest_line: String,
    wrap_width: usize,
}

/// Placed bubble shape, ready to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct BubbleGeometry {
    pub body: Rect,
    pub tail: [Point; 3],
    /// Top-left of each text line's layout box.
    pub line_origins: Vec<Point>,
    pub line_height: f64,
    pub pointing: Pointing,
}

impl BubbleGeometry {
    /// Bounds of body and tail together.
    pub fn extent(&self) -> Rect {
        self.tail
            .iter()
            .fold(self.body, |acc, p| acc.union_pt(*p))
    }

    pub fn translated(mut self, offset: Vec2) -> Self {
        self.body = self.body + offset;
        for p in &mut self.tail {
            *p += offset;
        }
        for p in &mut self.line_origins {
            *p += offset;
        }
        self
    }
}

impl SpeechBubble {
    /// Split `text` into speech bubbles of at most [`MAX_LINES`] lines each.
    ///
    /// The first bubble wraps at the monologue or dialogue budget. Overflow past five lines is
    /// re-wrapped at the monologue budget, which is wider, and split again until it fits. Blank
    /// text still yields one (empty) bubble.
    pub fn create_text(text: &str, monologue: bool) -> Vec<SpeechBubble> {
        let width = if monologue {
            MONOLOGUE_WIDTH
        } else {
            DIALOGUE_WIDTH
        };

        let mut bubbles = Vec::new();
        let mut current = SpeechBubble::wrapped(text, width);
        while current.lines.len() > MAX_LINES {
            let overflow = current.lines.split_off(MAX_LINES);
            bubbles.push(SpeechBubble::from_lines(current.lines, current.wrap_width));
            current = SpeechBubble::wrapped(&overflow.join(" "), MONOLOGUE_WIDTH);
        }
        bubbles.push(current);
        bubbles
    }

    fn wrapped(text: &str, wrap_width: usize) -> Self {
        Self::from_lines(wrap(&text.to_uppercase(), wrap_width), wrap_width)
    }

    fn from_lines(lines: Vec<String>, wrap_width: usize) -> Self {
        let mut longest_line = String::new();
        let mut longest_len = 0usize;
        for line in &lines {
            let n = line.chars().count();
            if n > longest_len {
                longest_len = n;
                longest_line = line.clone();
            }
        }
        Self {
            lines,
            longest_line,
            wrap_width,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Line with the most characters; the first one wins ties.
    pub fn longest_line(&self) -> &str {
        &self.longest_line
    }

    pub fn wrap_width(&self) -> usize {
        self.wrap_width
    }

    /// Lay the bubble out with its body's top-left corner at `origin`.
    pub fn layout(
        &self,
        origin: Point,
        pointing: Pointing,
        metrics: &mut dyn TextMetrics,
    ) -> ChatstripResult<BubbleGeometry> {
        let line_height = metrics.line_height()?;
        let mut text_width = 0.0f64;
        for line in &self.lines {
            text_width = text_width.max(metrics.text_width(line)?);
        }

        let width = text_width + 2.0 * X_PADDING;
        let height = self.lines.len() as f64 * line_height + Y_PADDING + ROUNDING_EPSILON;
        let body = Rect::from_origin_size(origin, (width, height));

        let [a, b, tip] = pointing.tail_fractions();
        let base_y = body.y1 - 1.0;
        let tail = [
            Point::new(body.x0 + width * a, base_y),
            Point::new(body.x0 + width * b, base_y),
            Point::new(body.x0 + width * tip, body.y1 + TAIL_LENGTH),
        ];

        let line_origins = (0..self.lines.len())
            .map(|i| {
                Point::new(
                    body.x0 + X_PADDING,
                    body.y0 + Y_PADDING / 2.0 + i as f64 * line_height,
                )
            })
            .collect();

        Ok(BubbleGeometry {
            body,
            tail,
            line_origins,
            line_height,
            pointing,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/bubble.rs"]
mod tests;
