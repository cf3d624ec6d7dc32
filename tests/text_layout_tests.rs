use plotkit::render::{MetricsDevice, OutputDevice, TextFont};
use plotkit::text::{PLACEHOLDER_GLYPH, Script, TextAlignment, TextLayout};

fn device() -> MetricsDevice {
    MetricsDevice::default()
}

#[test]
fn markup_splits_into_script_pieces() {
    let mut dc = device();
    let layout = TextLayout::new(&mut dc, "x_1^2", TextAlignment::Left);
    let pieces: Vec<_> = layout.pieces().collect();
    assert_eq!(pieces.len(), 3);
    assert_eq!(pieces[0].text, "x");
    assert_eq!(pieces[0].script, Script::Normal);
    assert_eq!(pieces[1].text, "1");
    assert_eq!(pieces[1].script, Script::Subscript);
    assert_eq!(pieces[2].text, "2");
    assert_eq!(pieces[2].script, Script::Superscript);
}

#[test]
fn superscript_sits_above_and_subscript_below_the_baseline() {
    let mut dc = device();
    let layout = TextLayout::new(&mut dc, "x_1^2", TextAlignment::Left);
    let pieces: Vec<_> = layout.pieces().collect();
    let normal_y = pieces[0].origin.y;
    let sub_y = pieces[1].origin.y;
    let sup_y = pieces[2].origin.y;
    assert!(sup_y < normal_y, "superscript must sit above the baseline run");
    assert!(sub_y > normal_y, "subscript must sit below the baseline run");
}

#[test]
fn braced_span_keeps_interior_spaces() {
    let mut dc = device();
    let layout = TextLayout::new(&mut dc, "q^{a b} rest", TextAlignment::Left);
    let pieces: Vec<_> = layout.pieces().collect();
    assert_eq!(pieces[1].text, "a b");
    assert_eq!(pieces[1].script, Script::Superscript);
    assert_eq!(pieces[2].text, "rest");
}

#[test]
fn greek_escape_resolves_and_unknown_escape_is_placeholder() {
    let mut dc = device();
    let layout = TextLayout::new(&mut dc, r"\theta and \nosuchcode", TextAlignment::Left);
    let text: String = layout.pieces().map(|p| p.text.as_str()).collect::<Vec<_>>().join("");
    assert!(text.contains('\u{03b8}'));
    assert!(text.contains(PLACEHOLDER_GLYPH));
}

#[test]
fn multi_line_text_grows_the_height() {
    let mut dc = device();
    let one = TextLayout::new(&mut dc, "alpha", TextAlignment::Left);
    let two = TextLayout::new(&mut dc, "alpha\nbeta", TextAlignment::Left);
    assert!(two.height() > one.height());
    assert_eq!(two.lines().len(), 2);
}

#[test]
fn empty_text_yields_a_zero_size_layout() {
    let mut dc = device();
    let layout = TextLayout::new(&mut dc, "", TextAlignment::Center);
    assert_eq!(layout.width(), 0.0);
    assert_eq!(layout.height(), 0.0);
}

#[test]
fn center_alignment_shifts_the_short_line() {
    let mut dc = device();
    let layout = TextLayout::new(&mut dc, "wide line here\nx", TextAlignment::Center);
    let pieces: Vec<_> = layout.pieces().collect();
    let short = pieces.last().expect("two lines expected");
    assert!(short.origin.x > 0.0, "short centered line must be indented");
}

#[test]
fn render_replays_pieces_with_the_requested_rotation() {
    let mut dc = device();
    let layout = TextLayout::new(&mut dc, "spin", TextAlignment::Left);
    dc.clear_ops();
    layout.render(&mut dc, 40.0, 60.0, 90.0, false);
    let texts = dc.text_ops();
    assert_eq!(texts.len(), 1);
}

#[test]
fn layout_measures_with_the_current_font() {
    let mut dc = device();
    dc.set_font(TextFont::points(4.0));
    let big = TextLayout::new(&mut dc, "same", TextAlignment::Left);
    dc.set_font(TextFont::points(0.0));
    let small = TextLayout::new(&mut dc, "same", TextAlignment::Left);
    assert!(big.width() > small.width());
    assert!(big.height() > small.height());
}
