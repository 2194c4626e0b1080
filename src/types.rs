//! Identity tokens, content hashing, and the diff operation types
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};

/// An opaque identifier for a section, cell, or supplementary view.
///
/// Identifiers must be unique within their sibling scope: cells within their
/// section, supplementary views within their section, sections within the
/// container. An `Id` is stable across updates that represent the same
/// logical entity.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    pub fn new(id: impl Into<String>) -> Self {
        Id(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id(s.to_owned())
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id(s)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.0)
    }
}

/// Hashes a configuration payload into the content hash carried by snapshots.
///
/// The hash is stable within a process, which is all the differ requires:
/// both snapshots under comparison are built in the same process. Two view
/// models with the same `Id` but different content hashes yield a
/// reconfigure, not a removal and reinsertion.
pub fn content_hash<T: Hash + ?Sized>(content: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}

/// An identifier paired with the index at which its operation applies.
///
/// Deletes carry indices into the *old* ordering, inserts into the *new*
/// ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexedId {
    pub index: usize,
    pub id: Id,
}

impl IndexedId {
    pub fn new(index: usize, id: impl Into<Id>) -> Self {
        IndexedId { index, id: id.into() }
    }
}

/// A reordering of one identity from an old index to a new index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Move {
    pub from: usize,
    pub to: usize,
    pub id: Id,
}

/// Item-level changes within a single section that survives the update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionItemDiff {
    /// Identifier of the section these operations apply to.
    pub section: Id,
    /// Cells removed, indexed against the old ordering, descending.
    pub deletes: Vec<IndexedId>,
    /// Cells added, indexed against the new ordering, ascending.
    pub inserts: Vec<IndexedId>,
    /// Cells whose position changed; stable cells are never listed.
    pub moves: Vec<Move>,
    /// Cells present in both snapshots whose content hash changed.
    pub reconfigures: Vec<Id>,
    /// Header/footer/custom supplementary views whose content hash changed.
    pub supplementary_reconfigures: Vec<Id>,
}

impl SectionItemDiff {
    /// An empty change set for the given section.
    pub fn new(section: impl Into<Id>) -> Self {
        SectionItemDiff {
            section: section.into(),
            deletes: Vec::new(),
            inserts: Vec::new(),
            moves: Vec::new(),
            reconfigures: Vec::new(),
            supplementary_reconfigures: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.deletes.is_empty()
            && self.inserts.is_empty()
            && self.moves.is_empty()
            && self.reconfigures.is_empty()
            && self.supplementary_reconfigures.is_empty()
    }
}

/// The complete set of operations transforming one snapshot into another.
///
/// Index discipline: deletes are indexed against the old ordering and emitted
/// in descending index order; inserts are indexed against the new ordering and
/// emitted ascending; moves carry both endpoints and are emitted in ascending
/// destination order. Applying deletes, then removing moved identities, then
/// inserting inserts and moves merged in ascending destination order yields
/// the new ordering without any index invalidation along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffResult {
    pub section_deletes: Vec<IndexedId>,
    pub section_inserts: Vec<IndexedId>,
    pub section_moves: Vec<Move>,
    /// Item-level changes, one entry per surviving section with changes.
    pub sections: Vec<SectionItemDiff>,
}

impl DiffResult {
    /// `true` when applying this diff would not touch the widget at all.
    pub fn is_empty(&self) -> bool {
        self.section_deletes.is_empty()
            && self.section_inserts.is_empty()
            && self.section_moves.is_empty()
            && self.sections.iter().all(SectionItemDiff::is_empty)
    }

    /// Total number of structural operations (excludes reconfigures).
    pub fn structural_op_count(&self) -> usize {
        self.section_deletes.len()
            + self.section_inserts.len()
            + self.section_moves.len()
            + self
                .sections
                .iter()
                .map(|s| s.deletes.len() + s.inserts.len() + s.moves.len())
                .sum::<usize>()
    }

    /// Total number of cell reconfigures across all sections.
    pub fn reconfigure_count(&self) -> usize {
        self.sections.iter().map(|s| s.reconfigures.len()).sum()
    }

    /// Drops cell reconfigures not matched by `keep`.
    ///
    /// The driver uses this to limit reconfigure work to items the widget
    /// reports as visible. Structural operations are never filtered.
    pub fn retain_cell_reconfigures(&mut self, mut keep: impl FnMut(&Id) -> bool) {
        for section in &mut self.sections {
            section.reconfigures.retain(|id| keep(id));
        }
        self.sections.retain(|s| !s.is_empty());
    }

    /// Iterates `(section id, view id)` pairs for supplementary reconfigures.
    pub fn supplementary_reconfigures(&self) -> impl Iterator<Item = (&Id, &Id)> {
        self.sections
            .iter()
            .flat_map(|s| s.supplementary_reconfigures.iter().map(move |v| (&s.section, v)))
    }
}

impl fmt::Display for DiffResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} section ops, {} item ops, {} reconfigures, {} supplementary reconfigures",
            self.section_deletes.len() + self.section_inserts.len() + self.section_moves.len(),
            self.sections
                .iter()
                .map(|s| s.deletes.len() + s.inserts.len() + s.moves.len())
                .sum::<usize>(),
            self.reconfigure_count(),
            self.sections
                .iter()
                .map(|s| s.supplementary_reconfigures.len())
                .sum::<usize>(),
        )
    }
}
