//! Immutable identity projections of the view-model tree
use crate::types::Id;
use crate::view_model::{CollectionViewModel, SectionViewModel, SupplementaryViewModel};
use indexmap::IndexMap;
use serde::Serialize;

/// The identity projection of one section.
///
/// Cell and supplementary entries map an `Id` to its content hash, preserving
/// the on-screen ordering of the section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionSnapshot {
    id: Id,
    header: Option<(Id, u64)>,
    footer: Option<(Id, u64)>,
    supplementary: IndexMap<Id, u64>,
    items: IndexMap<Id, u64>,
}

impl SectionSnapshot {
    fn of(section: &SectionViewModel) -> Self {
        let identity = |view: &SupplementaryViewModel| (view.id().clone(), view.content_hash());
        SectionSnapshot {
            id: section.id().clone(),
            header: section.header().map(identity),
            footer: section.footer().map(identity),
            supplementary: section.supplementary_views().iter().map(identity).collect(),
            items: section
                .cells()
                .iter()
                .map(|cell| (cell.id().clone(), cell.content_hash()))
                .collect(),
        }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn header(&self) -> Option<&(Id, u64)> {
        self.header.as_ref()
    }

    pub fn footer(&self) -> Option<&(Id, u64)> {
        self.footer.as_ref()
    }

    pub fn supplementary(&self) -> &IndexMap<Id, u64> {
        &self.supplementary
    }

    pub fn items(&self) -> &IndexMap<Id, u64> {
        &self.items
    }

    /// Ordered cell identifiers of this section.
    pub fn item_ids(&self) -> impl Iterator<Item = &Id> {
        self.items.keys()
    }

    pub fn num_items(&self) -> usize {
        self.items.len()
    }
}

/// An immutable, ordered projection of a whole model into identifiers and
/// content hashes.
///
/// A snapshot is the sole input format of the differ: one snapshot per side,
/// old and new. It is `Send`, so it can cross to a worker thread while the
/// model itself stays on the widget-owning context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    container_id: Id,
    sections: IndexMap<Id, SectionSnapshot>,
}

impl Snapshot {
    /// Projects a validated model. Ordering follows the model exactly.
    pub fn of(model: &CollectionViewModel) -> Self {
        Snapshot {
            container_id: model.id().clone(),
            sections: model
                .sections()
                .iter()
                .map(|section| (section.id().clone(), SectionSnapshot::of(section)))
                .collect(),
        }
    }

    /// A snapshot with the given container id and no sections.
    pub fn empty(container_id: impl Into<Id>) -> Self {
        Snapshot { container_id: container_id.into(), sections: IndexMap::new() }
    }

    pub fn container_id(&self) -> &Id {
        &self.container_id
    }

    pub fn sections(&self) -> &IndexMap<Id, SectionSnapshot> {
        &self.sections
    }

    /// Ordered section identifiers.
    pub fn section_ids(&self) -> impl Iterator<Item = &Id> {
        self.sections.keys()
    }

    pub fn section(&self, id: &Id) -> Option<&SectionSnapshot> {
        self.sections.get(id)
    }

    pub fn num_sections(&self) -> usize {
        self.sections.len()
    }

    pub fn num_items(&self) -> usize {
        self.sections.values().map(SectionSnapshot::num_items).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.num_items() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::{SupplementaryKind, ViewRegistration};
    use crate::view_model::CellViewModel;

    fn cell(id: &str, content: u32) -> CellViewModel {
        CellViewModel::new(id, &content, ViewRegistration::cell_by_type("cell", "TestCell"))
    }

    fn model(sections: Vec<SectionViewModel>) -> CollectionViewModel {
        CollectionViewModel::new("root", sections).unwrap()
    }

    #[test]
    fn projection_preserves_order() {
        let s1 = SectionViewModel::of_cells("s1", vec![cell("a", 1), cell("b", 2)]).unwrap();
        let s2 = SectionViewModel::of_cells("s2", vec![cell("c", 3)]).unwrap();
        let snapshot = Snapshot::of(&model(vec![s1, s2]));

        let section_ids: Vec<_> = snapshot.section_ids().map(Id::as_str).collect();
        assert_eq!(section_ids, vec!["s1", "s2"]);

        let item_ids: Vec<_> = snapshot
            .section(&Id::from("s1"))
            .unwrap()
            .item_ids()
            .map(Id::as_str)
            .collect();
        assert_eq!(item_ids, vec!["a", "b"]);
        assert_eq!(snapshot.num_items(), 3);
        assert!(!snapshot.is_empty());
    }

    #[test]
    fn hashes_follow_content() {
        let before = Snapshot::of(&model(vec![
            SectionViewModel::of_cells("s", vec![cell("a", 1)]).unwrap(),
        ]));
        let same = Snapshot::of(&model(vec![
            SectionViewModel::of_cells("s", vec![cell("a", 1)]).unwrap(),
        ]));
        let changed = Snapshot::of(&model(vec![
            SectionViewModel::of_cells("s", vec![cell("a", 2)]).unwrap(),
        ]));

        assert_eq!(before, same);
        let item = |s: &Snapshot| s.section(&Id::from("s")).unwrap().items()[&Id::from("a")];
        assert_ne!(item(&before), item(&changed));
    }

    #[test]
    fn header_and_footer_are_projected() {
        let header = SupplementaryViewModel::header(
            "hdr",
            &"People",
            ViewRegistration::supplementary_by_type("h", "Header", SupplementaryKind::Header),
        );
        let section =
            SectionViewModel::new("s", vec![cell("a", 1)], Some(header), None, vec![]).unwrap();
        let snapshot = Snapshot::of(&model(vec![section]));

        let section = snapshot.section(&Id::from("s")).unwrap();
        assert_eq!(section.header().unwrap().0, Id::from("hdr"));
        assert!(section.footer().is_none());
    }

    #[test]
    fn empty_model_projects_empty_snapshot() {
        let model = CollectionViewModel::empty();
        let snapshot = Snapshot::of(&model);
        assert_eq!(snapshot.num_sections(), 0);
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.container_id(), model.id());
    }
}
