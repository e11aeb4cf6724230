// LinkedLabel: a text label with tappable, URL-bearing ranges
//
// The label owns its styled text (through the registry), a measurer for
// layout, and the tap callback. It knows nothing about any particular toolkit;
// the FLTK adapter feeds it release events and a draw context.

use crate::config::LabelConfig;
use crate::geometry::{Point, Size};
use crate::hit_test::{self, HitTestInput};
use crate::layout::{
    DrawContext, LayoutConstraints, LayoutGlyph, LineBreakMode, ParagraphLayout, TextAlign,
    TextMeasure,
};
use crate::link::{RangeLink, TextLink, TextRange};
use crate::opener::{SystemOpener, UrlOpener};
use crate::registry::{LinkRegistry, RangePolicy};
use crate::styled_text::StyledText;
use crate::touch::Touch;
use std::cell::RefCell;
use url::Url;

/// Outcome of offering an event to the label.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    /// A link was hit and the tap callback ran.
    Handled,
    /// Nothing was hit; the event belongs to whoever handles it next.
    Passthrough,
}

impl EventDisposition {
    pub fn is_handled(self) -> bool {
        self == EventDisposition::Handled
    }

    /// Run `base` unless the label already consumed the event. Returns whether
    /// anyone handled it, in the shape toolkit handlers expect.
    pub fn or_else(self, base: impl FnOnce() -> bool) -> bool {
        match self {
            EventDisposition::Handled => true,
            EventDisposition::Passthrough => base(),
        }
    }
}

type TapCallback = Box<dyn FnMut(&Url) + 'static>;

pub struct LinkedLabel {
    // Position and size
    x: i32,
    y: i32,
    w: i32,
    h: i32,

    registry: LinkRegistry,
    measure: RefCell<Box<dyn TextMeasure>>,

    // Font and colors
    text_font: u8,
    text_size: u8,
    text_color: u32,
    link_color: u32,
    hover_color: u32,
    background_color: Option<u32>,
    underline_links: bool,

    // Layout
    break_mode: LineBreakMode,
    number_of_lines: usize,
    align: TextAlign,

    hovered_link: Option<TextRange>,

    opener: Box<dyn UrlOpener>,
    link_did_tap: Option<TapCallback>,

    needs_display: bool,
}

impl LinkedLabel {
    pub fn new(x: i32, y: i32, w: i32, h: i32, measure: Box<dyn TextMeasure>) -> Self {
        LinkedLabel {
            x,
            y,
            w,
            h,
            registry: LinkRegistry::default(),
            measure: RefCell::new(measure),
            text_font: 0,
            text_size: 14,
            text_color: 0x000000FF,
            link_color: 0x0000FFFF,
            hover_color: 0xE8EEFFFF,
            background_color: None,
            underline_links: true,
            break_mode: LineBreakMode::WordWrap,
            number_of_lines: 0,
            align: TextAlign::Left,
            hovered_link: None,
            opener: Box::new(SystemOpener::new()),
            link_did_tap: None,
            needs_display: true,
        }
    }

    // --- Text and links ---

    pub fn text(&self) -> &str {
        self.registry.text()
    }

    /// Replace the text. Every link is dropped.
    pub fn set_text(&mut self, text: &str) {
        self.registry.set_text(text);
        self.hovered_link = None;
        self.needs_display = true;
    }

    pub fn styled_text(&self) -> &StyledText {
        self.registry.styled_text()
    }

    /// Changes each time links or text are replaced.
    pub fn revision(&self) -> u64 {
        self.registry.revision()
    }

    pub fn add_link(&mut self, url: &Url, range: TextRange) -> bool {
        let changed = self.registry.add_link(url, range);
        self.links_changed(changed)
    }

    pub fn add_link_for_text(&mut self, url: &Url, text: &str) -> bool {
        let changed = self.registry.add_link_for_text(url, text);
        self.links_changed(changed)
    }

    pub fn add_text_links(&mut self, links: &[TextLink]) -> bool {
        let changed = self.registry.add_text_links(links);
        self.links_changed(changed)
    }

    pub fn add_range_links(&mut self, links: &[RangeLink]) -> bool {
        let changed = self.registry.add_range_links(links);
        self.links_changed(changed)
    }

    /// Runs may have merged or split, so a remembered hover range is stale.
    fn links_changed(&mut self, changed: bool) -> bool {
        if changed {
            self.hovered_link = None;
            self.needs_display = true;
        }
        changed
    }

    pub fn range_policy(&self) -> RangePolicy {
        self.registry.policy()
    }

    pub fn set_range_policy(&mut self, policy: RangePolicy) {
        self.registry.set_policy(policy);
    }

    // --- Tapping ---

    /// Replace what happens when a link is tapped. Without a callback the
    /// label hands the URL to its opener.
    pub fn set_link_did_tap(&mut self, callback: impl FnMut(&Url) + 'static) {
        self.link_did_tap = Some(Box::new(callback));
    }

    /// Go back to opening tapped links with the opener.
    pub fn clear_link_did_tap(&mut self) {
        self.link_did_tap = None;
    }

    pub fn set_opener(&mut self, opener: Box<dyn UrlOpener>) {
        self.opener = opener;
    }

    /// URL under the most recent of `touches`, given in window coordinates.
    pub fn url_at(&self, touches: &[Touch]) -> Option<Url> {
        let input = self.hit_input();
        hit_test::url_at(&input, touches, &mut **self.measure.borrow_mut())
    }

    /// Link and its full range under a label-local point. Used for hover.
    pub fn link_at_point(&self, point: Point) -> Option<(Url, TextRange)> {
        let input = self.hit_input();
        let index = hit_test::character_at(&input, point, &mut **self.measure.borrow_mut())?;
        self.registry
            .styled_text()
            .link_run_at(index)
            .map(|(url, range)| (url.clone(), range))
    }

    /// Offer a pointer release to the label. When it lands on a link the tap
    /// callback runs and the event is consumed.
    pub fn handle_release(&mut self, touches: &[Touch]) -> EventDisposition {
        let Some(url) = self.url_at(touches) else {
            return EventDisposition::Passthrough;
        };
        tracing::debug!(url = %url, "link tapped");
        self.link_tapped(&url);
        EventDisposition::Handled
    }

    fn link_tapped(&mut self, url: &Url) {
        if let Some(callback) = self.link_did_tap.as_mut() {
            callback(url);
            return;
        }

        if !self.opener.can_open(url) {
            tracing::warn!(url = %url, "no handler for tapped link");
            return;
        }
        if let Err(err) = self.opener.open(url) {
            tracing::warn!("{err}");
        }
    }

    // --- Hover ---

    pub fn hovered_link(&self) -> Option<TextRange> {
        self.hovered_link
    }

    /// Returns whether the hover state changed.
    pub fn set_hovered_link(&mut self, range: Option<TextRange>) -> bool {
        if self.hovered_link == range {
            return false;
        }
        self.hovered_link = range;
        self.needs_display = true;
        true
    }

    // --- Layout and drawing ---

    pub fn constraints(&self) -> LayoutConstraints {
        LayoutConstraints::new(Size::new(self.w.max(0) as f64, self.h.max(0) as f64))
            .with_max_lines(self.number_of_lines)
            .with_break_mode(self.break_mode)
            .with_align(self.align)
            .with_font(self.text_font, self.text_size)
    }

    /// A fresh layout under the label's current bounds and settings.
    pub fn text_layout(&self) -> ParagraphLayout {
        ParagraphLayout::compute(
            self.registry.text(),
            &self.constraints(),
            &mut **self.measure.borrow_mut(),
        )
    }

    fn hit_input(&self) -> HitTestInput<'_> {
        HitTestInput {
            styled: self.registry.styled_text(),
            origin: Point::new(self.x as f64, self.y as f64),
            constraints: self.constraints(),
        }
    }

    pub fn draw(&self, ctx: &mut dyn DrawContext) {
        let layout = self.text_layout();
        let styled = self.registry.styled_text();
        let text = styled.text();

        if let Some(background) = self.background_color {
            ctx.set_color(background);
            ctx.draw_rect_filled(self.x, self.y, self.w, self.h);
        }

        ctx.push_clip(self.x, self.y, self.w, self.h);
        ctx.set_font(self.text_font, self.text_size);

        for line in layout.lines() {
            let baseline = self.y + line.baseline.round() as i32;

            // Visible glyphs grouped into segments that share one link run
            let visible: Vec<&LayoutGlyph> = line
                .glyphs
                .iter()
                .filter(|glyph| glyph.rect.width() > 0.0)
                .collect();
            for segment in visible.chunk_by(|a, b| {
                link_range(styled, a.range.start) == link_range(styled, b.range.start)
            }) {
                let (Some(first), Some(last)) = (segment.first(), segment.last()) else {
                    continue;
                };
                let left = self.x + first.rect.left().round() as i32;
                let right = self.x + last.rect.right().round() as i32;
                let link = link_range(styled, first.range.start);

                if link.is_some() && link == self.hovered_link {
                    ctx.set_color(self.hover_color);
                    ctx.draw_rect_filled(
                        left,
                        self.y + line.top.round() as i32,
                        right - left,
                        line.height.round() as i32,
                    );
                }

                ctx.set_color(if link.is_some() {
                    self.link_color
                } else {
                    self.text_color
                });
                ctx.draw_text(&text[first.bytes.start..last.bytes.end], left, baseline);

                if link.is_some() && self.underline_links {
                    ctx.draw_line(left, baseline + 2, right, baseline + 2);
                }
            }
        }

        ctx.pop_clip();
    }

    pub fn needs_display(&self) -> bool {
        self.needs_display
    }

    pub fn mark_displayed(&mut self) {
        self.needs_display = false;
    }

    // --- Properties ---

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn w(&self) -> i32 {
        self.w
    }

    pub fn h(&self) -> i32 {
        self.h
    }

    pub fn resize(&mut self, x: i32, y: i32, w: i32, h: i32) {
        if (self.x, self.y, self.w, self.h) == (x, y, w, h) {
            return;
        }
        self.x = x;
        self.y = y;
        self.w = w;
        self.h = h;
        self.needs_display = true;
    }

    pub fn text_font(&self) -> u8 {
        self.text_font
    }

    pub fn set_text_font(&mut self, font: u8) {
        self.text_font = font;
        self.needs_display = true;
    }

    pub fn text_size(&self) -> u8 {
        self.text_size
    }

    pub fn set_text_size(&mut self, size: u8) {
        self.text_size = size;
        self.needs_display = true;
    }

    pub fn text_color(&self) -> u32 {
        self.text_color
    }

    pub fn set_text_color(&mut self, color: u32) {
        self.text_color = color;
        self.needs_display = true;
    }

    pub fn link_color(&self) -> u32 {
        self.link_color
    }

    pub fn set_link_color(&mut self, color: u32) {
        self.link_color = color;
        self.needs_display = true;
    }

    pub fn set_hover_color(&mut self, color: u32) {
        self.hover_color = color;
        self.needs_display = true;
    }

    /// `None` leaves the area behind the text untouched.
    pub fn set_background_color(&mut self, color: Option<u32>) {
        self.background_color = color;
        self.needs_display = true;
    }

    pub fn underline_links(&self) -> bool {
        self.underline_links
    }

    pub fn set_underline_links(&mut self, underline: bool) {
        self.underline_links = underline;
        self.needs_display = true;
    }

    pub fn line_break_mode(&self) -> LineBreakMode {
        self.break_mode
    }

    pub fn set_line_break_mode(&mut self, mode: LineBreakMode) {
        self.break_mode = mode;
        self.needs_display = true;
    }

    pub fn number_of_lines(&self) -> usize {
        self.number_of_lines
    }

    /// Limit the label to `lines` lines; 0 means unlimited.
    pub fn set_number_of_lines(&mut self, lines: usize) {
        self.number_of_lines = lines;
        self.needs_display = true;
    }

    pub fn alignment(&self) -> TextAlign {
        self.align
    }

    pub fn set_alignment(&mut self, align: TextAlign) {
        self.align = align;
        self.needs_display = true;
    }

    /// Copy configured defaults onto the label. The opener is replaced by a
    /// system opener restricted to the configured schemes.
    pub fn apply_config(&mut self, config: &LabelConfig) {
        self.text_font = config.text_font;
        self.text_size = config.text_size;
        self.link_color = config.link_color;
        self.underline_links = config.underline_links;
        self.break_mode = config.line_break_mode;
        self.number_of_lines = config.number_of_lines;
        self.align = config.alignment;
        self.registry.set_policy(config.range_policy);
        self.opener = Box::new(SystemOpener::with_schemes(&config.openable_schemes));
        self.needs_display = true;
    }
}

fn link_range(styled: &StyledText, index: usize) -> Option<TextRange> {
    styled.link_run_at(index).map(|(_, range)| range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::OpenError;
    use crate::layout::MonospaceMetrics;
    use std::rc::Rc;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    // Glyphs are 6 wide and lines 12 tall at size 10.
    fn label(text: &str) -> LinkedLabel {
        let mut label = LinkedLabel::new(10, 20, 60, 100, Box::new(MonospaceMetrics));
        label.set_text_size(10);
        label.set_text(text);
        label
    }

    #[derive(Default)]
    struct RecordingOpener {
        opened: Rc<RefCell<Vec<String>>>,
    }

    impl UrlOpener for RecordingOpener {
        fn can_open(&self, url: &Url) -> bool {
            url.scheme() == "https"
        }

        fn open(&self, url: &Url) -> Result<(), OpenError> {
            self.opened.borrow_mut().push(url.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_tap_runs_callback() {
        let a = url("https://a.example/");
        let mut label = label("Please click here now");
        label.add_link_for_text(&a, "click here");

        let tapped = Rc::new(RefCell::new(Vec::new()));
        label.set_link_did_tap({
            let tapped = tapped.clone();
            move |url| tapped.borrow_mut().push(url.clone())
        });

        // "click" starts the second line: local (0..30, 12..24).
        let touches = [Touch::new((12.0, 34.0), 1.0)];
        assert_eq!(label.handle_release(&touches), EventDisposition::Handled);
        assert_eq!(*tapped.borrow(), vec![a]);

        // "Please" on the first line is plain text.
        let touches = [Touch::new((12.0, 22.0), 2.0)];
        let release = label.handle_release(&touches);
        assert_eq!(release, EventDisposition::Passthrough);
        assert_eq!(tapped.borrow().len(), 1);
    }

    #[test]
    fn test_default_tap_uses_opener() {
        let opened = Rc::new(RefCell::new(Vec::new()));
        let mut label = label("secure and plain");
        label.set_opener(Box::new(RecordingOpener {
            opened: opened.clone(),
        }));
        label.add_link_for_text(&url("https://a.example/"), "secure");
        label.add_link_for_text(&url("http://b.example/"), "plain");

        let secure = [Touch::new((13.0, 25.0), 1.0)];
        assert!(label.handle_release(&secure).is_handled());
        // "plain" wraps to the second line: local (0..30, 12..24).
        let plain = [Touch::new((13.0, 37.0), 1.0)];
        assert!(label.handle_release(&plain).is_handled());

        assert_eq!(*opened.borrow(), vec!["https://a.example/".to_string()]);
    }

    #[test]
    fn test_or_else_chaining() {
        let mut base_ran = false;
        assert!(EventDisposition::Handled.or_else(|| {
            base_ran = true;
            false
        }));
        assert!(!base_ran);

        assert!(!EventDisposition::Passthrough.or_else(|| {
            base_ran = true;
            false
        }));
        assert!(base_ran);
    }

    #[test]
    fn test_link_at_point_reports_whole_run() {
        let a = url("https://a.example/");
        let mut label = label("Please click here now");
        label.add_link_for_text(&a, "click here");
        assert_eq!(
            label.link_at_point(Point::new(40.0, 13.0)),
            Some((a, TextRange::new(7, 10)))
        );
        assert_eq!(label.link_at_point(Point::new(1.0, 1.0)), None);
    }

    #[test]
    fn test_hover_cleared_when_runs_change() {
        let a = url("https://a.example/");
        let mut label = label("foobar");
        label.add_link_for_text(&a, "foo");
        assert!(label.set_hovered_link(Some(TextRange::new(0, 3))));

        // The adjacent run with the same URL merges into one wider run.
        assert!(label.add_link_for_text(&a, "bar"));
        assert_eq!(label.hovered_link(), None);
        assert_eq!(
            label.link_at_point(Point::new(1.0, 1.0)),
            Some((a, TextRange::new(0, 6)))
        );
    }

    #[test]
    fn test_layout_follows_bounds() {
        let mut label = label("Please click here now");
        assert_eq!(label.text_layout().line_count(), 3);

        label.resize(10, 20, 200, 100);
        assert_eq!(label.text_layout().line_count(), 1);

        label.set_number_of_lines(1);
        label.resize(10, 20, 60, 100);
        let layout = label.text_layout();
        assert_eq!(layout.line_count(), 1);
        assert!(layout.is_truncated());
    }

    #[test]
    fn test_truncated_link_cannot_be_hit() {
        let a = url("https://a.example/");
        let mut label = label("Please click here now");
        label.add_link_for_text(&a, "now");
        label.set_number_of_lines(2);
        // Where "now" would be on the third line.
        let touches = [Touch::new((13.0, 45.0), 1.0)];
        assert_eq!(label.url_at(&touches), None);
    }

    #[test]
    fn test_needs_display_tracking() {
        let mut label = label("foo and bar");
        assert!(label.needs_display());
        label.mark_displayed();

        assert!(!label.add_link_for_text(&url("https://a.example/"), "baz"));
        assert!(!label.needs_display());

        assert!(label.add_link_for_text(&url("https://a.example/"), "foo"));
        assert!(label.needs_display());
        label.mark_displayed();

        label.resize(10, 20, 60, 100);
        assert!(!label.needs_display());
        label.resize(0, 0, 60, 100);
        assert!(label.needs_display());
    }

    #[test]
    fn test_apply_config() {
        let mut label = label("abc");
        let config = LabelConfig {
            text_size: 20,
            number_of_lines: 3,
            alignment: TextAlign::Right,
            range_policy: RangePolicy::Discard,
            underline_links: false,
            ..LabelConfig::default()
        };
        label.apply_config(&config);
        assert_eq!(label.text_size(), 20);
        assert_eq!(label.number_of_lines(), 3);
        assert_eq!(label.alignment(), TextAlign::Right);
        assert_eq!(label.range_policy(), RangePolicy::Discard);
        assert!(!label.underline_links());
    }
}
