// Text layout service
//
// `TextMeasure` abstracts the host toolkit's font metrics and `DrawContext`
// its drawing primitives. `ParagraphLayout` is the line breaker that turns
// measured text into per-glyph geometry for hit testing and drawing.

use crate::geometry::{Point, Rect, Size};
use crate::link::TextRange;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;

/// Font metrics backend.
pub trait TextMeasure {
    fn text_width(&mut self, text: &str, font: u8, size: u8) -> f64;
    fn text_height(&self, font: u8, size: u8) -> i32;
    fn text_descent(&self, font: u8, size: u8) -> i32;
}

/// Drawing backend trait - abstracts over the toolkit's drawing primitives
pub trait DrawContext: TextMeasure {
    fn set_color(&mut self, color: u32);
    fn set_font(&mut self, font: u8, size: u8);
    fn draw_text(&mut self, text: &str, x: i32, y: i32);
    fn draw_rect_filled(&mut self, x: i32, y: i32, w: i32, h: i32);
    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32);
    fn push_clip(&mut self, x: i32, y: i32, w: i32, h: i32);
    fn pop_clip(&mut self);
}

/// Deterministic metrics: every glyph advances `0.6 * size`, lines are
/// `1.2 * size` tall.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonospaceMetrics;

impl TextMeasure for MonospaceMetrics {
    fn text_width(&mut self, text: &str, _font: u8, size: u8) -> f64 {
        let glyphs = text.graphemes(true).count();
        glyphs as f64 * (size as f64 * 0.6)
    }

    fn text_height(&self, _font: u8, size: u8) -> i32 {
        ((size as f64) * 1.2) as i32
    }

    fn text_descent(&self, _font: u8, size: u8) -> i32 {
        ((size as f64) * 0.2) as i32
    }
}

/// How lines that do not fit the label width are broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineBreakMode {
    /// Break at whitespace, falling back to a character break for words
    /// wider than the line.
    #[default]
    WordWrap,
    /// Break at any glyph boundary.
    CharWrap,
    /// Never wrap; glyphs starting past the right edge are not laid out.
    Clip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Everything a layout pass depends on besides the text itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConstraints {
    pub size: Size,
    /// Maximum number of lines; 0 means unlimited.
    pub max_lines: usize,
    pub break_mode: LineBreakMode,
    pub align: TextAlign,
    pub font: u8,
    pub font_size: u8,
}

impl LayoutConstraints {
    pub fn new(size: Size) -> Self {
        LayoutConstraints {
            size,
            max_lines: 0,
            break_mode: LineBreakMode::WordWrap,
            align: TextAlign::Left,
            font: 0,
            font_size: 14,
        }
    }

    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines;
        self
    }

    pub fn with_break_mode(mut self, mode: LineBreakMode) -> Self {
        self.break_mode = mode;
        self
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn with_font(mut self, font: u8, size: u8) -> Self {
        self.font = font;
        self.font_size = size;
        self
    }
}

/// One grapheme cluster placed on a line.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutGlyph {
    /// Characters covered, in UTF-16 code units.
    pub range: TextRange,
    /// Byte range in the source text.
    pub bytes: Range<usize>,
    /// Tight bounding box relative to the label's top-left corner.
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutLine {
    /// Glyphs in visual order, including a zero-width glyph for a trailing
    /// newline.
    pub glyphs: Vec<LayoutGlyph>,
    pub top: f64,
    pub height: f64,
    pub baseline: f64,
    /// Width of the visible content, excluding collapsed trailing whitespace.
    pub width: f64,
    pub range: TextRange,
}

impl LayoutLine {
    /// Glyph under `x`, or the nearest one at either end of the line.
    fn nearest_glyph(&self, x: f64) -> Option<&LayoutGlyph> {
        self.glyphs
            .iter()
            .find(|g| g.rect.width() > 0.0 && x < g.rect.right())
            .or_else(|| self.glyphs.iter().rev().find(|g| g.rect.width() > 0.0))
            .or_else(|| self.glyphs.last())
    }
}

#[derive(Debug, Clone)]
struct Cluster {
    bytes: Range<usize>,
    range: TextRange,
    newline: bool,
    space: bool,
}

/// Result of one layout pass. Never cached by the label: bounds, line limits
/// and content can all change between passes.
#[derive(Debug, Clone, Default)]
pub struct ParagraphLayout {
    lines: Vec<LayoutLine>,
    truncated: bool,
}

impl ParagraphLayout {
    /// Lay out `text` under `constraints` using `measure` for glyph widths.
    pub fn compute(
        text: &str,
        constraints: &LayoutConstraints,
        measure: &mut dyn TextMeasure,
    ) -> Self {
        let mut layout = ParagraphLayout::default();
        let max_width = constraints.size.width;
        if text.is_empty() || constraints.size.is_empty() {
            return layout;
        }

        let font = constraints.font;
        let size = constraints.font_size;
        let line_height = measure.text_height(font, size) as f64;
        let descent = measure.text_descent(font, size) as f64;
        if line_height <= 0.0 {
            return layout;
        }

        let clusters = segment(text);
        let mut paragraphs: Vec<&[Cluster]> = Vec::new();
        let mut start = 0;
        for (i, cluster) in clusters.iter().enumerate() {
            if cluster.newline {
                paragraphs.push(&clusters[start..=i]);
                start = i + 1;
            }
        }
        if start < clusters.len() {
            paragraphs.push(&clusters[start..]);
        }

        'paragraphs: for paragraph in paragraphs {
            let (body, newline) = match paragraph.split_last() {
                Some((last, body)) if last.newline => (body, Some(last)),
                _ => (paragraph, None),
            };

            let mut line_start = 0;
            loop {
                if !layout.has_room_for_line(constraints, line_height) {
                    layout.truncated = true;
                    break 'paragraphs;
                }

                let line_end = break_line(text, body, line_start, constraints, measure);
                let wrapped = line_end < body.len();
                let top = layout.lines.len() as f64 * line_height;
                let mut line = place_line(
                    text,
                    &body[line_start..line_end],
                    wrapped,
                    constraints,
                    measure,
                    top,
                    line_height,
                    descent,
                );
                if !wrapped {
                    if let Some(nl) = newline {
                        line.glyphs.push(LayoutGlyph {
                            range: nl.range,
                            bytes: nl.bytes.clone(),
                            rect: Rect::new(line_x_end(&line), top, 0.0, line_height),
                        });
                    }
                }
                line.range = glyph_span(&line.glyphs);
                layout.lines.push(line);

                line_start = line_end;
                if line_start >= body.len() {
                    break;
                }
            }
        }

        layout
    }

    pub fn lines(&self) -> &[LayoutLine] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Whether some of the text did not fit under the constraints.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn glyphs(&self) -> impl Iterator<Item = &LayoutGlyph> {
        self.lines.iter().flat_map(|line| line.glyphs.iter())
    }

    /// Character nearest to `point`, in the lenient sense of an insertion
    /// point lookup: the point is clamped onto the closest line and then onto
    /// the closest glyph of that line. `None` only when nothing was laid out.
    pub fn character_index(&self, point: Point) -> Option<usize> {
        let first = self.lines.first()?;
        let line = if point.y < first.top {
            first
        } else {
            self.lines
                .iter()
                .find(|line| point.y < line.top + line.height)
                .or_else(|| self.lines.last())?
        };
        line.nearest_glyph(point.x).map(|glyph| glyph.range.start)
    }

    /// Bounding rectangle of the glyph that renders character `index`.
    pub fn glyph_rect(&self, index: usize) -> Option<Rect> {
        self.glyphs()
            .find(|glyph| glyph.range.contains(index))
            .map(|glyph| glyph.rect)
    }

    /// Rectangle covering every laid-out glyph.
    pub fn used_rect(&self) -> Rect {
        self.glyphs()
            .map(|glyph| glyph.rect)
            .reduce(|acc, rect| acc.union(&rect))
            .unwrap_or_default()
    }

    fn has_room_for_line(&self, constraints: &LayoutConstraints, line_height: f64) -> bool {
        if constraints.max_lines > 0 && self.lines.len() >= constraints.max_lines {
            return false;
        }
        let bottom = (self.lines.len() + 1) as f64 * line_height;
        bottom <= constraints.size.height
    }
}

fn segment(text: &str) -> Vec<Cluster> {
    let mut clusters = Vec::new();
    let mut utf16 = 0;
    for (byte, grapheme) in text.grapheme_indices(true) {
        let units: usize = grapheme.chars().map(char::len_utf16).sum();
        let newline = grapheme.contains('\n') || grapheme == "\r";
        clusters.push(Cluster {
            bytes: byte..byte + grapheme.len(),
            range: TextRange::new(utf16, units),
            newline,
            space: !newline && grapheme.chars().all(char::is_whitespace),
        });
        utf16 += units;
    }
    clusters
}

fn span_width(
    text: &str,
    clusters: &[Cluster],
    constraints: &LayoutConstraints,
    measure: &mut dyn TextMeasure,
) -> f64 {
    match (clusters.first(), clusters.last()) {
        (Some(first), Some(last)) => measure.text_width(
            &text[first.bytes.start..last.bytes.end],
            constraints.font,
            constraints.font_size,
        ),
        _ => 0.0,
    }
}

/// Index one past the last cluster of the line starting at `start`.
fn break_line(
    text: &str,
    body: &[Cluster],
    start: usize,
    constraints: &LayoutConstraints,
    measure: &mut dyn TextMeasure,
) -> usize {
    let max_width = constraints.size.width;
    if constraints.break_mode == LineBreakMode::Clip || !max_width.is_finite() {
        return body.len();
    }

    let mut end = start;
    let mut last_word_break = None;
    while end < body.len() {
        let cluster = &body[end];
        // Whitespace hangs past the edge instead of forcing a break.
        if !cluster.space
            && end > start
            && span_width(text, &body[start..=end], constraints, measure) > max_width
        {
            break;
        }
        end += 1;
        if cluster.space {
            last_word_break = Some(end);
        }
    }

    if end >= body.len() {
        return body.len();
    }
    match (constraints.break_mode, last_word_break) {
        (LineBreakMode::WordWrap, Some(word_break)) if word_break > start => word_break,
        _ => end.max(start + 1),
    }
}

#[allow(clippy::too_many_arguments)]
fn place_line(
    text: &str,
    clusters: &[Cluster],
    wrapped: bool,
    constraints: &LayoutConstraints,
    measure: &mut dyn TextMeasure,
    top: f64,
    height: f64,
    descent: f64,
) -> LayoutLine {
    let max_width = constraints.size.width;
    let clip = constraints.break_mode == LineBreakMode::Clip;

    // Trailing whitespace of a wrapped line collapses to zero width.
    let visible = if wrapped {
        clusters.iter().rposition(|c| !c.space).map_or(0, |i| i + 1)
    } else {
        clusters.len()
    };

    let line_start = clusters.first().map_or(0, |c| c.bytes.start);
    let mut glyphs = Vec::with_capacity(clusters.len());
    let mut x = 0.0;
    let mut content_width: f64 = 0.0;
    for (i, cluster) in clusters.iter().enumerate() {
        if clip && x >= max_width {
            break;
        }
        let width = if i < visible {
            let right = measure.text_width(
                &text[line_start..cluster.bytes.end],
                constraints.font,
                constraints.font_size,
            );
            content_width = right.min(max_width);
            (right - x).max(0.0)
        } else {
            0.0
        };
        // Nothing extends past the right edge: hanging whitespace collapses
        // and a glyph straddling the edge is cut at it.
        let width = width.min((max_width - x).max(0.0));
        glyphs.push(LayoutGlyph {
            range: cluster.range,
            bytes: cluster.bytes.clone(),
            rect: Rect::new(x, top, width, height),
        });
        x += width;
    }

    let offset = if max_width.is_finite() {
        let slack = (max_width - content_width).max(0.0);
        match constraints.align {
            TextAlign::Left => 0.0,
            TextAlign::Center => slack / 2.0,
            TextAlign::Right => slack,
        }
    } else {
        0.0
    };
    if offset > 0.0 {
        for glyph in &mut glyphs {
            glyph.rect.origin.x += offset;
        }
    }

    LayoutLine {
        range: glyph_span(&glyphs),
        glyphs,
        top,
        height,
        baseline: top + height - descent,
        width: content_width,
    }
}

fn glyph_span(glyphs: &[LayoutGlyph]) -> TextRange {
    match (glyphs.first(), glyphs.last()) {
        (Some(first), Some(last)) => TextRange::from(first.range.start..last.range.end()),
        _ => TextRange::default(),
    }
}

fn line_x_end(line: &LayoutLine) -> f64 {
    line.glyphs.last().map_or(0.0, |g| g.rect.right())
}
