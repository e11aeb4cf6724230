// Snapshot tests for linked label layout and rendering
// Uses SVG rendering for visual verification

use linked_label::layout::{MonospaceMetrics, TextAlign};
use linked_label::{LinkedLabel, TextLink, TextRange};
use url::Url;

use crate::svg_draw_context::SvgDrawContext;

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

/// Label at the origin with 6 px glyphs and 12 px lines
fn label(text: &str, width: i32) -> LinkedLabel {
    let mut label = LinkedLabel::new(0, 0, width, 100, Box::new(MonospaceMetrics));
    label.set_text_size(10);
    label.set_text(text);
    label
}

/// One row per laid-out line followed by one row per link run
fn dump_layout(label: &LinkedLabel) -> String {
    let text = label.text();
    let layout = label.text_layout();
    let mut rows = Vec::new();

    for (i, line) in layout.lines().iter().enumerate() {
        let start = line.glyphs.first().map_or(0, |g| g.bytes.start);
        let end = line.glyphs.last().map_or(0, |g| g.bytes.end);
        rows.push(format!(
            "{} [{}..{}) y={} w={} {:?}",
            i,
            line.range.start,
            line.range.end(),
            line.top,
            line.width,
            &text[start..end]
        ));
    }
    for (range, url) in label.styled_text().links() {
        rows.push(format!("link [{}..{}) {}", range.start, range.end(), url));
    }

    rows.join("\n")
}

fn render(label: &LinkedLabel) -> String {
    let mut ctx = SvgDrawContext::new(label.w(), label.h());
    label.draw(&mut ctx);
    ctx.elements()
}

#[test]
fn test_wrapped_layout_dump() {
    let mut label = label("Please click here now", 60);
    label.add_link_for_text(&url("https://a.example/"), "click here");

    insta::assert_snapshot!(dump_layout(&label), @r#"
    0 [0..7) y=0 w=36 "Please "
    1 [7..18) y=12 w=60 "click here "
    2 [18..21) y=24 w=18 "now"
    link [7..17) https://a.example/
    "#);
}

#[test]
fn test_render_wrapped_link() {
    let mut label = label("Please click here now", 60);
    label.add_link_for_text(&url("https://a.example/"), "click here");

    insta::assert_snapshot!(render(&label), @r##"
    <text x="0" y="10" fill="#000000" font-size="10" clip-path="url(#clip-0-0-60-100)">Please</text>
    <text x="0" y="22" fill="#0000ff" font-size="10" clip-path="url(#clip-0-0-60-100)">click here</text>
    <line x1="0" y1="24" x2="60" y2="24" stroke="#0000ff" stroke-width="1"/>
    <text x="0" y="34" fill="#000000" font-size="10" clip-path="url(#clip-0-0-60-100)">now</text>
    "##);
}

#[test]
fn test_render_adjacent_runs() {
    let mut label = label("foo and bar", 200);
    label.add_text_links(&[
        TextLink::new(url("https://a.example/"), "foo"),
        TextLink::new(url("https://b.example/"), "bar"),
    ]);

    insta::assert_snapshot!(render(&label), @r##"
    <text x="0" y="10" fill="#0000ff" font-size="10" clip-path="url(#clip-0-0-200-100)">foo</text>
    <line x1="0" y1="12" x2="18" y2="12" stroke="#0000ff" stroke-width="1"/>
    <text x="18" y="10" fill="#000000" font-size="10" clip-path="url(#clip-0-0-200-100)"> and </text>
    <text x="48" y="10" fill="#0000ff" font-size="10" clip-path="url(#clip-0-0-200-100)">bar</text>
    <line x1="48" y1="12" x2="66" y2="12" stroke="#0000ff" stroke-width="1"/>
    "##);
}

#[test]
fn test_render_hover_without_underline() {
    let mut label = label("go to docs", 120);
    label.add_link_for_text(&url("https://docs.example/"), "docs");
    label.set_underline_links(false);
    label.set_alignment(TextAlign::Right);
    label.set_hovered_link(Some(TextRange::new(6, 4)));

    insta::assert_snapshot!(render(&label), @r##"
    <text x="60" y="10" fill="#000000" font-size="10" clip-path="url(#clip-0-0-120-100)">go to </text>
    <rect x="96" y="0" width="24" height="12" fill="#e8eeff" clip-path="url(#clip-0-0-120-100)"/>
    <text x="96" y="10" fill="#0000ff" font-size="10" clip-path="url(#clip-0-0-120-100)">docs</text>
    "##);
}

#[test]
fn test_render_background_and_hard_break() {
    let mut label = label("a\nb", 60);
    label.set_background_color(Some(0xFFFFF5FF));
    label.add_link(&url("https://b.example/"), TextRange::new(2, 1));

    insta::assert_snapshot!(render(&label), @r##"
    <rect x="0" y="0" width="60" height="100" fill="#fffff5"/>
    <text x="0" y="10" fill="#000000" font-size="10" clip-path="url(#clip-0-0-60-100)">a</text>
    <text x="0" y="22" fill="#0000ff" font-size="10" clip-path="url(#clip-0-0-60-100)">b</text>
    <line x1="0" y1="24" x2="6" y2="24" stroke="#0000ff" stroke-width="1"/>
    "##);
}
