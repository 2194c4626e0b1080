//! The declarative view-model tree: container, sections, cells, supplementary views
use crate::errors::ModelError;
use crate::registration::{SupplementaryKind, ViewRegistration};
use crate::types::{content_hash, Id};
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use uuid::Uuid;

/// A single cell: stable identity, content hash, and how to register its view.
///
/// The configuration payload itself stays with the host; the reconciler only
/// needs its hash to decide between reconfigure and removal+reinsertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellViewModel {
    id: Id,
    content_hash: u64,
    registration: ViewRegistration,
}

impl CellViewModel {
    pub fn new(id: impl Into<Id>, content: &impl Hash, registration: ViewRegistration) -> Self {
        CellViewModel {
            id: id.into(),
            content_hash: content_hash(content),
            registration,
        }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn content_hash(&self) -> u64 {
        self.content_hash
    }

    pub fn registration(&self) -> &ViewRegistration {
        &self.registration
    }
}

/// A header, footer, or custom supplementary view belonging to a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplementaryViewModel {
    id: Id,
    kind: SupplementaryKind,
    content_hash: u64,
    registration: ViewRegistration,
}

impl SupplementaryViewModel {
    pub fn new(
        id: impl Into<Id>,
        kind: SupplementaryKind,
        content: &impl Hash,
        registration: ViewRegistration,
    ) -> Self {
        SupplementaryViewModel {
            id: id.into(),
            kind,
            content_hash: content_hash(content),
            registration,
        }
    }

    pub fn header(id: impl Into<Id>, content: &impl Hash, registration: ViewRegistration) -> Self {
        Self::new(id, SupplementaryKind::Header, content, registration)
    }

    pub fn footer(id: impl Into<Id>, content: &impl Hash, registration: ViewRegistration) -> Self {
        Self::new(id, SupplementaryKind::Footer, content, registration)
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn kind(&self) -> &SupplementaryKind {
        &self.kind
    }

    pub fn content_hash(&self) -> u64 {
        self.content_hash
    }

    pub fn registration(&self) -> &ViewRegistration {
        &self.registration
    }
}

/// An ordered run of cells with optional header, footer, and custom
/// supplementary views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionViewModel {
    id: Id,
    cells: Vec<CellViewModel>,
    header: Option<SupplementaryViewModel>,
    footer: Option<SupplementaryViewModel>,
    supplementary_views: Vec<SupplementaryViewModel>,
}

impl SectionViewModel {
    /// Builds a section, validating identifier uniqueness within it.
    ///
    /// The header must carry `SupplementaryKind::Header` and the footer
    /// `SupplementaryKind::Footer`; custom supplementary views may use any
    /// kind.
    pub fn new(
        id: impl Into<Id>,
        cells: Vec<CellViewModel>,
        header: Option<SupplementaryViewModel>,
        footer: Option<SupplementaryViewModel>,
        supplementary_views: Vec<SupplementaryViewModel>,
    ) -> Result<Self, ModelError> {
        let id = id.into();

        if let Some(header) = &header {
            if header.kind != SupplementaryKind::Header {
                return Err(ModelError::SupplementaryKindMismatch {
                    section: id,
                    id: header.id.clone(),
                    expected: SupplementaryKind::Header,
                    found: header.kind.clone(),
                });
            }
        }
        if let Some(footer) = &footer {
            if footer.kind != SupplementaryKind::Footer {
                return Err(ModelError::SupplementaryKindMismatch {
                    section: id,
                    id: footer.id.clone(),
                    expected: SupplementaryKind::Footer,
                    found: footer.kind.clone(),
                });
            }
        }

        let mut cell_ids = HashSet::with_capacity(cells.len());
        for cell in &cells {
            if !cell_ids.insert(&cell.id) {
                return Err(ModelError::DuplicateCell {
                    section: id,
                    id: cell.id.clone(),
                });
            }
        }

        let mut view_ids = HashSet::new();
        let all_views = header.iter().chain(footer.iter()).chain(supplementary_views.iter());
        for view in all_views {
            if !view_ids.insert(&view.id) {
                return Err(ModelError::DuplicateSupplementary {
                    section: id,
                    id: view.id.clone(),
                });
            }
        }

        Ok(SectionViewModel {
            id,
            cells,
            header,
            footer,
            supplementary_views,
        })
    }

    /// A section holding only cells.
    pub fn of_cells(id: impl Into<Id>, cells: Vec<CellViewModel>) -> Result<Self, ModelError> {
        Self::new(id, cells, None, None, Vec::new())
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn cells(&self) -> &[CellViewModel] {
        &self.cells
    }

    pub fn header(&self) -> Option<&SupplementaryViewModel> {
        self.header.as_ref()
    }

    pub fn footer(&self) -> Option<&SupplementaryViewModel> {
        self.footer.as_ref()
    }

    pub fn supplementary_views(&self) -> &[SupplementaryViewModel] {
        &self.supplementary_views
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn has_supplementary_views(&self) -> bool {
        self.header.is_some() || self.footer.is_some() || !self.supplementary_views.is_empty()
    }

    /// Looks up a cell by identifier.
    pub fn cell(&self, id: &Id) -> Option<&CellViewModel> {
        self.cells.iter().find(|c| &c.id == id)
    }

    /// Looks up any supplementary view (header, footer, or custom) by identifier.
    pub fn supplementary_view(&self, id: &Id) -> Option<&SupplementaryViewModel> {
        self.header
            .iter()
            .chain(self.footer.iter())
            .chain(self.supplementary_views.iter())
            .find(|v| &v.id == id)
    }

    fn registrations(&self) -> impl Iterator<Item = &ViewRegistration> {
        self.cells
            .iter()
            .map(|c| &c.registration)
            .chain(self.header.iter().map(|h| &h.registration))
            .chain(self.footer.iter().map(|f| &f.registration))
            .chain(self.supplementary_views.iter().map(|v| &v.registration))
    }
}

/// The full declarative description of the widget's content.
///
/// Giving the driver a model whose container `id` differs from the previous
/// one is a *replacement*; the driver can be configured to hard-reload
/// instead of diffing in that case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionViewModel {
    id: Id,
    sections: Vec<SectionViewModel>,
}

impl CollectionViewModel {
    /// Builds a model, validating section identifier uniqueness.
    pub fn new(id: impl Into<Id>, sections: Vec<SectionViewModel>) -> Result<Self, ModelError> {
        let id = id.into();
        let mut section_ids = HashSet::with_capacity(sections.len());
        for section in &sections {
            if !section_ids.insert(&section.id) {
                return Err(ModelError::DuplicateSection { id: section.id.clone() });
            }
        }
        Ok(CollectionViewModel { id, sections })
    }

    /// A model with no sections and a fresh anonymous container id.
    pub fn empty() -> Self {
        CollectionViewModel {
            id: Id::new(Uuid::new_v4().to_string()),
            sections: Vec::new(),
        }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn sections(&self) -> &[SectionViewModel] {
        &self.sections
    }

    /// `true` when there are no sections, or every section has no cells.
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(SectionViewModel::is_empty)
    }

    pub fn num_sections(&self) -> usize {
        self.sections.len()
    }

    /// Number of cells in the section at `index`. Panics when out of range.
    pub fn num_cells(&self, index: usize) -> usize {
        assert!(
            index < self.sections.len(),
            "section index {index} out of range ({} sections)",
            self.sections.len()
        );
        self.sections[index].cells.len()
    }

    /// Looks up a section by identifier.
    pub fn section(&self, id: &Id) -> Option<&SectionViewModel> {
        self.sections.iter().find(|s| &s.id == id)
    }

    /// Looks up a cell anywhere in the tree by `(section, cell)` identifiers.
    pub fn cell(&self, section: &Id, cell: &Id) -> Option<&CellViewModel> {
        self.section(section).and_then(|s| s.cell(cell))
    }

    /// The cell at `(section index, cell index)`. Panics when out of range.
    pub fn cell_at(&self, section: usize, index: usize) -> &CellViewModel {
        assert!(
            section < self.sections.len(),
            "section index {section} out of range ({} sections)",
            self.sections.len()
        );
        let cells = &self.sections[section].cells;
        assert!(
            index < cells.len(),
            "cell index {index} out of range in section '{}' ({} cells)",
            self.sections[section].id,
            cells.len()
        );
        &cells[index]
    }

    /// All distinct view registrations in the tree, in first-seen order.
    pub fn all_registrations(&self) -> Vec<ViewRegistration> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for registration in self.sections.iter().flat_map(SectionViewModel::registrations) {
            if seen.insert(registration) {
                out.push(registration.clone());
            }
        }
        out
    }
}

impl fmt::Display for CollectionViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CollectionViewModel(id: {}, {} sections, {} cells)",
            self.id,
            self.sections.len(),
            self.sections.iter().map(|s| s.cells.len()).sum::<usize>()
        )
    }
}
