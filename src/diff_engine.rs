//! Identity-keyed, order-preserving diff between two snapshots
use crate::snapshot::{SectionSnapshot, Snapshot};
use crate::types::{DiffResult, Id, IndexedId, Move, SectionItemDiff};
use std::collections::{HashMap, HashSet};

/// Computes the operations transforming `old` into `new`.
///
/// Deterministic and pure: equal inputs produce an empty result, and the
/// result applied to the on-screen state described by `old` yields exactly
/// the content of `new`. Identities present on both sides with unequal
/// content hashes become reconfigures, never delete+insert pairs.
pub fn diff(old: &Snapshot, new: &Snapshot) -> DiffResult {
    let engine = DiffEngine { old, new };
    let result = engine.run();
    log::trace!(
        "diff {} -> {}: {}",
        old.container_id(),
        new.container_id(),
        result
    );
    result
}

struct DiffEngine<'a> {
    old: &'a Snapshot,
    new: &'a Snapshot,
}

impl<'a> DiffEngine<'a> {
    fn run(&self) -> DiffResult {
        let old_ids: Vec<&Id> = self.old.section_ids().collect();
        let new_ids: Vec<&Id> = self.new.section_ids().collect();
        let section_ops = keyed_list_diff(&old_ids, &new_ids);

        let mut sections = Vec::new();
        for (id, new_section) in self.new.sections() {
            if let Some(old_section) = self.old.section(id) {
                let item_diff = self.diff_section(old_section, new_section);
                if !item_diff.is_empty() {
                    sections.push(item_diff);
                }
            }
            // Sections absent from the old snapshot are inserts; the widget
            // materializes their content wholesale from the new model.
        }

        DiffResult {
            section_deletes: section_ops.deletes,
            section_inserts: section_ops.inserts,
            section_moves: section_ops.moves,
            sections,
        }
    }

    fn diff_section(&self, old: &SectionSnapshot, new: &SectionSnapshot) -> SectionItemDiff {
        let old_ids: Vec<&Id> = old.item_ids().collect();
        let new_ids: Vec<&Id> = new.item_ids().collect();
        let ops = keyed_list_diff(&old_ids, &new_ids);

        // Same identity on both sides, different content: reconfigure in
        // place so the widget keeps scroll position and view state.
        let mut reconfigures = Vec::new();
        for (id, new_hash) in new.items() {
            if let Some(old_hash) = old.items().get(id) {
                if old_hash != new_hash {
                    reconfigures.push(id.clone());
                }
            }
        }

        SectionItemDiff {
            section: new.id().clone(),
            deletes: ops.deletes,
            inserts: ops.inserts,
            moves: ops.moves,
            reconfigures,
            supplementary_reconfigures: self.diff_supplementary(old, new),
        }
    }

    fn diff_supplementary(&self, old: &SectionSnapshot, new: &SectionSnapshot) -> Vec<Id> {
        let mut out = Vec::new();

        // Header and footer occupy fixed slots: when both sides populate the
        // slot and identity or content changed, the slot is reconfigured in
        // place under the new view's id. A slot gained or lost is handled by
        // the widget when it lays the section out, not by the differ.
        let slot_changed = |old_slot: Option<&(Id, u64)>, new_slot: Option<&(Id, u64)>| {
            match (old_slot, new_slot) {
                (Some(old_view), Some(new_view)) if old_view != new_view => {
                    Some(new_view.0.clone())
                }
                _ => None,
            }
        };
        out.extend(slot_changed(old.header(), new.header()));
        out.extend(slot_changed(old.footer(), new.footer()));

        for (id, new_hash) in new.supplementary() {
            if let Some(old_hash) = old.supplementary().get(id) {
                if old_hash != new_hash {
                    out.push(id.clone());
                }
            }
        }
        out
    }
}

struct KeyedListDiff {
    deletes: Vec<IndexedId>,
    inserts: Vec<IndexedId>,
    moves: Vec<Move>,
}

/// Order-preserving diff of two identifier lists.
///
/// Identities present on both sides are aligned by a longest increasing
/// subsequence over their old indices taken in new order; everything on the
/// LIS keeps its position, everything off it becomes a move. This minimizes
/// move operations the same way classic keyed-list reconciliation does.
fn keyed_list_diff(old_ids: &[&Id], new_ids: &[&Id]) -> KeyedListDiff {
    let old_index: HashMap<&Id, usize> =
        old_ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    let new_set: HashSet<&Id> = new_ids.iter().copied().collect();

    // Deletes against original indices, descending, so sequential removal
    // never invalidates a later index.
    let mut deletes = Vec::new();
    for (i, id) in old_ids.iter().enumerate().rev() {
        if !new_set.contains(id) {
            deletes.push(IndexedId { index: i, id: (*id).clone() });
        }
    }

    // Inserts against final indices, ascending. Surviving identities are
    // collected in new order for the LIS pass.
    let mut inserts = Vec::new();
    let mut common: Vec<(usize, usize, &Id)> = Vec::new();
    for (j, id) in new_ids.iter().enumerate() {
        match old_index.get(id) {
            Some(&i) => common.push((i, j, id)),
            None => inserts.push(IndexedId { index: j, id: (*id).clone() }),
        }
    }

    let old_positions: Vec<usize> = common.iter().map(|&(i, _, _)| i).collect();
    let stable: HashSet<usize> =
        longest_increasing_subsequence(&old_positions).into_iter().collect();

    let moves = common
        .iter()
        .enumerate()
        .filter(|(k, _)| !stable.contains(k))
        .map(|(_, &(from, to, id))| Move { from, to, id: id.clone() })
        .collect();

    KeyedListDiff { deletes, inserts, moves }
}

/// O(n log n) longest increasing subsequence; returns indices into `seq`.
fn longest_increasing_subsequence(seq: &[usize]) -> Vec<usize> {
    if seq.is_empty() {
        return Vec::new();
    }

    let mut predecessors = vec![0; seq.len()];
    let mut indices = vec![0; seq.len()];
    let mut length = 0;

    for (i, &value) in seq.iter().enumerate() {
        let mut low = 0;
        let mut high = length;

        while low < high {
            let mid = low + (high - low) / 2;
            if seq[indices[mid]] < value {
                low = mid + 1;
            } else {
                high = mid;
            }
        }

        if low > 0 {
            predecessors[i] = indices[low - 1];
        }
        indices[low] = i;

        if low == length {
            length += 1;
        }
    }

    let mut lis = Vec::with_capacity(length);
    let mut k = indices[length - 1];
    for _ in 0..length {
        lis.push(k);
        k = predecessors[k];
    }
    lis.reverse();
    lis
}
