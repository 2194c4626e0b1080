//! Property tests for the differ: no-op idempotence and round-trip correctness.
mod common;

use common::{expected_sections, FakeWidget};

use collection_reconciler::{
    diff, CellViewModel, CollectionViewModel, CollectionWidget, SectionViewModel, Snapshot,
    ViewRegistration,
};
use proptest::prelude::*;

fn registration() -> ViewRegistration {
    ViewRegistration::cell_by_type("cell", "TestCell")
}

/// An ordered run of unique cells drawn from a small pool, so that two
/// generated sections overlap enough to exercise moves and reconfigures.
fn cells_strategy() -> impl Strategy<Value = Vec<CellViewModel>> {
    let pool: Vec<String> = (0..8).map(|i| format!("c{i}")).collect();
    (
        prop::sample::subsequence(pool, 0..=8).prop_shuffle(),
        prop::collection::vec(any::<u8>(), 8),
    )
        .prop_map(|(ids, contents)| {
            ids.into_iter()
                .zip(contents)
                .map(|(id, content)| CellViewModel::new(id, &content, registration()))
                .collect()
        })
}

fn model_strategy() -> impl Strategy<Value = CollectionViewModel> {
    let pool: Vec<String> = (0..4).map(|i| format!("s{i}")).collect();
    prop::sample::subsequence(pool, 0..=4)
        .prop_shuffle()
        .prop_flat_map(|section_ids| {
            section_ids
                .into_iter()
                .map(|id| {
                    cells_strategy().prop_map(move |cells| {
                        SectionViewModel::of_cells(id.clone(), cells).unwrap()
                    })
                })
                .collect::<Vec<_>>()
        })
        .prop_map(|sections| CollectionViewModel::new("root", sections).unwrap())
}

proptest! {
    #[test]
    fn diff_against_self_is_empty(model in model_strategy()) {
        let snapshot = Snapshot::of(&model);
        prop_assert!(diff(&snapshot, &snapshot).is_empty());
    }

    #[test]
    fn applying_a_diff_round_trips(old in model_strategy(), new in model_strategy()) {
        let result = diff(&Snapshot::of(&old), &Snapshot::of(&new));

        let mut widget = FakeWidget::new();
        widget.reload(&old);
        widget.apply_diff(&result, &new, false);

        prop_assert_eq!(widget.sections, expected_sections(&new));
    }

    #[test]
    fn pure_content_changes_produce_no_structural_ops(
        old in model_strategy(),
        reseed in prop::collection::vec(any::<u8>(), 64),
    ) {
        // Rebuild the same structure with (possibly) different content.
        let mut index = 0usize;
        let sections = old
            .sections()
            .iter()
            .map(|section| {
                let cells = section
                    .cells()
                    .iter()
                    .map(|cell| {
                        let content = reseed[index % reseed.len()];
                        index += 1;
                        CellViewModel::new(cell.id().clone(), &content, registration())
                    })
                    .collect();
                SectionViewModel::of_cells(section.id().clone(), cells).unwrap()
            })
            .collect();
        let new = CollectionViewModel::new("root", sections).unwrap();

        let result = diff(&Snapshot::of(&old), &Snapshot::of(&new));
        prop_assert_eq!(result.structural_op_count(), 0);

        let mut widget = FakeWidget::new();
        widget.reload(&old);
        widget.apply_diff(&result, &new, false);
        prop_assert_eq!(widget.sections, expected_sections(&new));

        // Every reconfigure names an identity whose hash actually changed.
        for section_diff in &result.sections {
            let old_section = old.section(&section_diff.section).unwrap();
            let new_section = new.section(&section_diff.section).unwrap();
            for id in &section_diff.reconfigures {
                let before = old_section.cell(id).unwrap().content_hash();
                let after = new_section.cell(id).unwrap().content_hash();
                prop_assert_ne!(before, after);
            }
        }
    }

    #[test]
    fn structural_diffs_never_reconfigure_unchanged_cells(
        old in model_strategy(),
        new in model_strategy(),
    ) {
        let result = diff(&Snapshot::of(&old), &Snapshot::of(&new));
        for section_diff in &result.sections {
            for id in &section_diff.reconfigures {
                let before = old.cell(&section_diff.section, id).unwrap().content_hash();
                let after = new.cell(&section_diff.section, id).unwrap().content_hash();
                prop_assert_ne!(before, after);
            }
        }
    }
}
