//! Registry tests: which elements the polyfill tracks.

use ratiokit_dom::BoxMetrics;

use crate::support::{assert_registry_consistent, init_tracing, TestPage};

#[test]
fn test_initial_scan_tracks_declared_elements() {
    init_tracing();
    let mut page = TestPage::new();
    let body = page.body;
    let a = page.ratio_box(body, "4/3", BoxMetrics::sized(200.0, 0.0));
    let b = page.ratio_box(body, "abc", BoxMetrics::default());
    let empty = page.ratio_box(body, "", BoxMetrics::default());
    page.div(body);

    let polyfill = page.installed();

    assert_eq!(polyfill.tracked_len(), 2);
    assert!(polyfill.is_tracked(a));
    assert!(polyfill.is_tracked(b));
    assert!(!polyfill.is_tracked(empty));
    assert_eq!(polyfill.declaration(a), Some("4/3"));
    assert_registry_consistent(&polyfill, &page);
}

#[test]
fn test_attribute_added_later_is_picked_up() {
    init_tracing();
    let mut page = TestPage::new();
    let body = page.body;
    let mut polyfill = page.installed();
    assert_eq!(polyfill.tracked_len(), 0);

    let nested = page.div(body);
    let el = page.ratio_box(nested, "2/1", BoxMetrics::sized(100.0, 0.0));
    assert!(polyfill.pump(&mut page.doc));

    assert!(polyfill.is_tracked(el));
    assert_registry_consistent(&polyfill, &page);
}

#[test]
fn test_declaration_change_updates_entry() {
    init_tracing();
    let mut page = TestPage::new();
    let body = page.body;
    let el = page.ratio_box(body, "4/3", BoxMetrics::sized(200.0, 0.0));
    let mut polyfill = page.installed();

    page.doc.set_attribute(el, "aspect-ratio", "2/1").unwrap();
    polyfill.pump(&mut page.doc);

    assert_eq!(polyfill.tracked_len(), 1);
    assert_eq!(polyfill.declaration(el), Some("2/1"));
}

#[test]
fn test_emptied_and_removed_declarations_are_dropped() {
    init_tracing();
    let mut page = TestPage::new();
    let body = page.body;
    let emptied = page.ratio_box(body, "1/1", BoxMetrics::sized(50.0, 0.0));
    let removed = page.ratio_box(body, "1/1", BoxMetrics::sized(50.0, 0.0));
    let mut polyfill = page.installed();

    page.doc.set_attribute(emptied, "aspect-ratio", "").unwrap();
    page.doc.remove_attribute(removed, "aspect-ratio").unwrap();
    polyfill.pump(&mut page.doc);

    assert_eq!(polyfill.tracked_len(), 0);
    assert_registry_consistent(&polyfill, &page);
}

#[test]
fn test_detached_element_leaves_registry() {
    init_tracing();
    let mut page = TestPage::new();
    let body = page.body;
    let el = page.ratio_box(body, "1/1", BoxMetrics::sized(50.0, 0.0));
    let mut polyfill = page.installed();
    assert!(polyfill.is_tracked(el));

    page.doc.detach(el).unwrap();
    polyfill.pump(&mut page.doc);

    assert!(!polyfill.is_tracked(el));
    assert_eq!(page.doc.get_attribute(el, "aspect-ratio"), Some("1/1"));
    assert_registry_consistent(&polyfill, &page);
}

#[test]
fn test_detached_subtree_leaves_registry() {
    init_tracing();
    let mut page = TestPage::new();
    let body = page.body;
    let wrapper = page.div(body);
    let inner = page.ratio_box(wrapper, "1/1", BoxMetrics::sized(50.0, 0.0));
    let mut polyfill = page.installed();

    page.doc.detach(wrapper).unwrap();
    polyfill.pump(&mut page.doc);

    assert!(!polyfill.is_tracked(inner));
}

#[test]
fn test_reattached_element_is_tracked_again() {
    init_tracing();
    let mut page = TestPage::new();
    let body = page.body;
    let el = page.ratio_box(body, "3/1", BoxMetrics::sized(90.0, 0.0));
    let mut polyfill = page.installed();

    page.doc.detach(el).unwrap();
    polyfill.pump(&mut page.doc);
    page.doc.append_child(body, el).unwrap();
    polyfill.pump(&mut page.doc);

    assert!(polyfill.is_tracked(el));
    assert_eq!(page.style(el, "height"), Some("30px"));
}

#[test]
fn test_fallback_connectivity_collects_detached() {
    init_tracing();
    let mut page = TestPage::new();
    page.doc.set_native_connectivity(false);
    let body = page.body;
    let kept = page.ratio_box(body, "1/1", BoxMetrics::sized(50.0, 0.0));
    let gone = page.ratio_box(body, "1/1", BoxMetrics::sized(50.0, 0.0));
    let mut polyfill = page.installed();
    assert_eq!(polyfill.tracked_len(), 2);

    page.doc.detach(gone).unwrap();
    polyfill.pump(&mut page.doc);

    assert!(polyfill.is_tracked(kept));
    assert!(!polyfill.is_tracked(gone));
}

#[test]
fn test_destroyed_element_is_never_resurrected() {
    init_tracing();
    let mut page = TestPage::new();
    let body = page.body;
    let el = page.ratio_box(body, "1/1", BoxMetrics::sized(50.0, 0.0));
    let mut polyfill = page.installed();

    page.doc.destroy(el).unwrap();
    let reused = page.ratio_box(body, "1/1", BoxMetrics::sized(50.0, 0.0));
    polyfill.pump(&mut page.doc);

    assert_eq!(reused.index(), el.index());
    assert_ne!(reused, el);
    assert!(!polyfill.is_tracked(el));
    assert!(polyfill.is_tracked(reused));
    assert_registry_consistent(&polyfill, &page);
}
