//! Randomized registry/tree consistency.

use proptest::prelude::*;
use ratiokit_dom::BoxMetrics;

use crate::support::{assert_registry_consistent, TestPage};

const DECLARATIONS: [&str; 5] = ["4/3", "1/1", "", "abc", "0/3"];

#[derive(Debug, Clone)]
enum Op {
    SetDeclaration(usize, usize),
    RemoveDeclaration(usize),
    Detach(usize),
    Reattach(usize, usize),
    Destroy(usize),
    Resize,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..8usize, 0..DECLARATIONS.len()).prop_map(|(el, d)| Op::SetDeclaration(el, d)),
        (0..8usize).prop_map(Op::RemoveDeclaration),
        (0..8usize).prop_map(Op::Detach),
        (0..8usize, 0..8usize).prop_map(|(el, parent)| Op::Reattach(el, parent)),
        (0..8usize).prop_map(Op::Destroy),
        Just(Op::Resize),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn test_registry_matches_tree_after_every_pump(
        ops in prop::collection::vec(op(), 1..40),
        pump_every in 1..4usize,
    ) {
        let mut page = TestPage::new();
        let body = page.body;
        let pool: Vec<_> = (0..8)
            .map(|i| page.ratio_box(body, DECLARATIONS[i % 2], BoxMetrics::sized(120.0, 0.0)))
            .collect();
        let mut polyfill = page.installed();
        assert_registry_consistent(&polyfill, &page);

        for (step, op) in ops.iter().enumerate() {
            // Failures here are expected for stale ids and cycles; the
            // tree just stays as it was.
            let _ = match *op {
                Op::SetDeclaration(el, d) => page.doc.set_attribute(pool[el], "aspect-ratio", DECLARATIONS[d]),
                Op::RemoveDeclaration(el) => page.doc.remove_attribute(pool[el], "aspect-ratio"),
                Op::Detach(el) => page.doc.detach(pool[el]),
                Op::Reattach(el, parent) => {
                    let parent = if page.doc.is_connected(pool[parent]) { pool[parent] } else { body };
                    page.doc.append_child(parent, pool[el])
                }
                Op::Destroy(el) => page.doc.destroy(pool[el]),
                Op::Resize => {
                    polyfill.signal_sender().resize();
                    Ok(())
                }
            };

            if (step + 1) % pump_every == 0 {
                polyfill.pump(&mut page.doc);
                assert_registry_consistent(&polyfill, &page);
                prop_assert!(!page.doc.has_pending_records());
            }
        }

        polyfill.pump(&mut page.doc);
        assert_registry_consistent(&polyfill, &page);
    }
}
