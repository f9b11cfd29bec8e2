//! Sizing tests: what gets written for a tracked element.

use ratiokit_common::PolyfillConfig;
use ratiokit_dom::{BoxMetrics, Document};
use ratiokit_polyfill::AspectRatioPolyfill;

use crate::support::{assert_no_override, assert_override, init_tracing, TestPage};

#[test]
fn test_width_governed_height() {
    init_tracing();
    let mut page = TestPage::new();
    let body = page.body;
    let el = page.ratio_box(body, "4/3", BoxMetrics::sized(200.0, 10.0));
    page.installed();

    assert_override(&page.doc, el, "height", "150px");
    assert_eq!(page.style(el, "width"), None);
}

#[test]
fn test_height_governed_width_in_flex_row() {
    init_tracing();
    let mut page = TestPage::new();
    let body = page.body;
    let row = page.flex_row(body);
    let el = page.ratio_box(row, "16/9", BoxMetrics::sized(10.0, 90.0));
    page.installed();

    assert_override(&page.doc, el, "width", "160px");
    assert_eq!(page.style(el, "height"), None);
}

#[test]
fn test_inline_flex_row_governs_by_height() {
    init_tracing();
    let mut page = TestPage::new();
    let body = page.body;
    let row = page.div(body);
    page.doc.set_display(row, "inline-flex").unwrap();
    let el = page.ratio_box(row, "2/1", BoxMetrics::sized(10.0, 40.0));
    page.installed();

    assert_override(&page.doc, el, "width", "80px");
}

#[test]
fn test_flex_column_and_row_reverse_govern_by_width() {
    init_tracing();
    let mut page = TestPage::new();
    let body = page.body;
    let column = page.flex_row(body);
    page.doc.set_flex_direction(column, "column").unwrap();
    let reversed = page.flex_row(body);
    page.doc.set_flex_direction(reversed, "row-reverse").unwrap();
    let a = page.ratio_box(column, "2/1", BoxMetrics::sized(100.0, 10.0));
    let b = page.ratio_box(reversed, "2/1", BoxMetrics::sized(100.0, 10.0));
    page.installed();

    assert_override(&page.doc, a, "height", "50px");
    assert_override(&page.doc, b, "height", "50px");
}

#[test]
fn test_non_integer_result_is_written_unrounded() {
    init_tracing();
    let mut page = TestPage::new();
    let body = page.body;
    let el = page.ratio_box(body, "3/1", BoxMetrics::sized(400.0, 0.0));
    page.installed();

    assert_override(&page.doc, el, "height", "133.33333333333334px");
}

#[test]
fn test_max_height_clamps() {
    init_tracing();
    let mut page = TestPage::new();
    let body = page.body;
    let el = page.ratio_box(
        body,
        "1/1",
        BoxMetrics::sized(500.0, 0.0).with_max_height(100.0),
    );
    page.installed();

    assert_override(&page.doc, el, "height", "100px");
}

#[test]
fn test_min_height_clamps() {
    init_tracing();
    let mut page = TestPage::new();
    let body = page.body;
    let el = page.ratio_box(
        body,
        "10/1",
        BoxMetrics::sized(100.0, 0.0).with_min_height(25.0),
    );
    page.installed();

    assert_override(&page.doc, el, "height", "25px");
}

#[test]
fn test_max_width_bounds_height_governed_width() {
    init_tracing();
    let mut page = TestPage::new();
    let body = page.body;
    let row = page.flex_row(body);
    let el = page.ratio_box(
        row,
        "4/1",
        BoxMetrics::sized(0.0, 50.0)
            .with_max_width(120.0)
            .with_max_height(60.0),
    );
    page.installed();

    assert_override(&page.doc, el, "width", "120px");
}

#[test]
fn test_min_width_raises_height_governed_width() {
    init_tracing();
    let mut page = TestPage::new();
    let body = page.body;
    let row = page.flex_row(body);
    let el = page.ratio_box(
        row,
        "1/2",
        BoxMetrics::sized(0.0, 50.0).with_min_width(80.0),
    );
    page.installed();

    assert_override(&page.doc, el, "width", "80px");
    assert_eq!(page.style(el, "height"), None);
}

#[test]
fn test_legacy_width_clamp_uses_max_height() {
    init_tracing();
    let mut page = TestPage::new();
    let body = page.body;
    let row = page.flex_row(body);
    let el = page.ratio_box(
        row,
        "4/1",
        BoxMetrics::sized(0.0, 50.0)
            .with_max_width(120.0)
            .with_max_height(60.0),
    );
    let config = PolyfillConfig {
        clamp_width_to_max_height: true,
        ..PolyfillConfig::default()
    };
    let mut polyfill = AspectRatioPolyfill::<Document>::new(config);
    polyfill.pump(&mut page.doc);

    assert_override(&page.doc, el, "width", "60px");
}

#[test]
fn test_disabled_declarations_write_nothing() {
    init_tracing();
    let mut page = TestPage::new();
    let body = page.body;
    let metrics = BoxMetrics::sized(100.0, 100.0);
    let zero = page.ratio_box(body, "0/3", metrics);
    let word = page.ratio_box(body, "abc", metrics);
    let negative = page.ratio_box(body, "-1/1", metrics);
    let divide_by_zero = page.ratio_box(body, "1/0", metrics);
    let polyfill = page.installed();

    for el in [zero, word, negative, divide_by_zero] {
        assert!(polyfill.is_tracked(el));
        assert_no_override(&page.doc, el);
    }
}

#[test]
fn test_disabling_clears_stale_override() {
    init_tracing();
    let mut page = TestPage::new();
    let body = page.body;
    let el = page.ratio_box(body, "2/1", BoxMetrics::sized(100.0, 0.0));
    let mut polyfill = page.installed();
    assert_override(&page.doc, el, "height", "50px");

    page.doc.set_attribute(el, "aspect-ratio", "0/3").unwrap();
    polyfill.pump(&mut page.doc);

    assert_no_override(&page.doc, el);
}

#[test]
fn test_removing_declaration_clears_override() {
    init_tracing();
    let mut page = TestPage::new();
    let body = page.body;
    let el = page.ratio_box(body, "2/1", BoxMetrics::sized(100.0, 0.0));
    let mut polyfill = page.installed();

    page.doc.remove_attribute(el, "aspect-ratio").unwrap();
    polyfill.pump(&mut page.doc);

    assert_no_override(&page.doc, el);
}

#[test]
fn test_infinite_result_writes_nothing() {
    init_tracing();
    let mut page = TestPage::new();
    let body = page.body;
    let el = page.ratio_box(body, "5e-324/1", BoxMetrics::sized(200.0, 0.0));
    let polyfill = page.installed();

    assert!(polyfill.is_tracked(el));
    assert_no_override(&page.doc, el);
}

#[test]
fn test_unresolved_width_gives_zero_height() {
    init_tracing();
    let mut page = TestPage::new();
    let body = page.body;
    let el = page.ratio_box(body, "4/3", BoxMetrics::default());
    page.installed();

    assert_override(&page.doc, el, "height", "0px");
}

#[test]
fn test_apply_all_is_idempotent() {
    init_tracing();
    let mut page = TestPage::new();
    let body = page.body;
    let row = page.flex_row(body);
    let a = page.ratio_box(body, "4/3", BoxMetrics::sized(200.0, 0.0));
    let b = page.ratio_box(row, "16/9", BoxMetrics::sized(0.0, 90.0));
    let mut polyfill = page.installed();

    let snapshot = |doc: &Document| {
        [a, b].map(|id| doc.inline_style(id).map(|style| style.css_text()))
    };
    polyfill.apply_all(&mut page.doc);
    let first = snapshot(&page.doc);
    polyfill.apply_all(&mut page.doc);

    assert_eq!(first, snapshot(&page.doc));
    assert_override(&page.doc, a, "height", "150px");
    assert_override(&page.doc, b, "width", "160px");
}
