//! A scripted in-memory widget for exercising the driver and differ.
#![allow(dead_code)]

use collection_reconciler::{
    CollectionViewModel, CollectionWidget, DiffResult, Id, ViewRegistration,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeSection {
    pub id: Id,
    pub items: Vec<Id>,
}

/// Mirrors what a real list widget would display, by applying diffs with the
/// index discipline documented on [`CollectionWidget`]. Every call is
/// recorded so tests can assert on registration, reload, and reconfigure
/// traffic.
#[derive(Debug, Default)]
pub struct FakeWidget {
    pub sections: Vec<FakeSection>,
    pub registered: Vec<ViewRegistration>,
    pub reload_count: usize,
    pub apply_count: usize,
    pub reconfigured: Vec<Id>,
    pub supplementary_reconfigured: Vec<(Id, Id)>,
    pub last_animated: Option<bool>,
    pub visible: Option<Vec<Id>>,
}

impl FakeWidget {
    pub fn new() -> Self {
        Self::default()
    }
}

/// The on-screen state a model should produce.
pub fn expected_sections(model: &CollectionViewModel) -> Vec<FakeSection> {
    model
        .sections()
        .iter()
        .map(|section| FakeSection {
            id: section.id().clone(),
            items: section.cells().iter().map(|cell| cell.id().clone()).collect(),
        })
        .collect()
}

impl CollectionWidget for FakeWidget {
    fn register(&mut self, registration: &ViewRegistration) {
        self.registered.push(registration.clone());
    }

    fn reload(&mut self, model: &CollectionViewModel) {
        self.reload_count += 1;
        self.sections = expected_sections(model);
    }

    fn apply_diff(&mut self, diff: &DiffResult, model: &CollectionViewModel, animated: bool) {
        self.apply_count += 1;
        self.last_animated = Some(animated);

        // Item-level operations first; they are keyed by section id and do
        // not disturb section indices.
        for section_diff in &diff.sections {
            let section = self
                .sections
                .iter_mut()
                .find(|s| s.id == section_diff.section)
                .expect("diff references a section not on screen");

            for delete in &section_diff.deletes {
                let removed = section.items.remove(delete.index);
                assert_eq!(removed, delete.id, "delete index does not match identity");
            }
            for mv in &section_diff.moves {
                let position = section
                    .items
                    .iter()
                    .position(|item| *item == mv.id)
                    .expect("moved cell not on screen");
                section.items.remove(position);
            }

            let mut additions: Vec<(usize, Id)> = section_diff
                .inserts
                .iter()
                .map(|insert| (insert.index, insert.id.clone()))
                .chain(section_diff.moves.iter().map(|mv| (mv.to, mv.id.clone())))
                .collect();
            additions.sort_by_key(|(index, _)| *index);
            for (index, id) in additions {
                section.items.insert(index, id);
            }

            self.reconfigured.extend(section_diff.reconfigures.iter().cloned());
        }

        // Section-level operations: deletes (descending old indices), then
        // moved sections out, then inserts and moves merged ascending.
        for delete in &diff.section_deletes {
            let removed = self.sections.remove(delete.index);
            assert_eq!(removed.id, delete.id, "section delete index does not match identity");
        }

        let mut moved = Vec::new();
        for mv in &diff.section_moves {
            let position = self
                .sections
                .iter()
                .position(|s| s.id == mv.id)
                .expect("moved section not on screen");
            moved.push((mv.to, self.sections.remove(position)));
        }

        let mut additions: Vec<(usize, FakeSection)> = diff
            .section_inserts
            .iter()
            .map(|insert| {
                let section = model
                    .section(&insert.id)
                    .expect("inserted section missing from destination model");
                let items = section.cells().iter().map(|c| c.id().clone()).collect();
                (insert.index, FakeSection { id: insert.id.clone(), items })
            })
            .chain(moved)
            .collect();
        additions.sort_by_key(|(index, _)| *index);
        for (index, section) in additions {
            self.sections.insert(index, section);
        }
    }

    fn reconfigure_supplementary(&mut self, section: &Id, view: &Id, model: &CollectionViewModel) {
        let exists = model
            .section(section)
            .and_then(|s| s.supplementary_view(view))
            .is_some();
        assert!(exists, "supplementary reconfigure for a view missing from the model");
        self.supplementary_reconfigured.push((section.clone(), view.clone()));
    }

    fn visible_items(&self) -> Option<Vec<Id>> {
        self.visible.clone()
    }
}
