//! The abstract seam between the reconciler and the host's list widget
use crate::registration::ViewRegistration;
use crate::types::{DiffResult, Id};
use crate::view_model::CollectionViewModel;

/// A live, stateful scrolling list/grid control driven by the reconciler.
///
/// Implementations wrap the host toolkit's widget. Every method is invoked
/// only from the widget-owning context; the driver never calls into the
/// widget from its diff worker.
///
/// When applying a [`DiffResult`], honor its index discipline at both the
/// section and item level: deletes first (old indices, already descending),
/// then removal of moved identities, then inserts and moves merged in
/// ascending destination order, each landing at its final index. Content for
/// inserted sections and cells is pulled from `model`, which always describes
/// the destination state.
pub trait CollectionWidget {
    /// Registers a reusable view kind. Called at most once per distinct
    /// descriptor for the lifetime of the driver.
    fn register(&mut self, registration: &ViewRegistration);

    /// Discards all widget state and rebuilds it from `model`.
    fn reload(&mut self, model: &CollectionViewModel);

    /// Applies one batch of incremental operations, including in-place cell
    /// reconfigures. `animated` forwards the driver's animation policy.
    fn apply_diff(&mut self, diff: &DiffResult, model: &CollectionViewModel, animated: bool);

    /// Reconfigures a single supplementary view in place. Invoked after
    /// [`CollectionWidget::apply_diff`] for each changed header, footer, or
    /// custom view, since batch application cannot reach them.
    fn reconfigure_supplementary(&mut self, section: &Id, view: &Id, model: &CollectionViewModel);

    /// Cell identifiers currently on screen, if the widget can report them.
    ///
    /// When this returns `Some`, the driver limits reconfigure operations to
    /// the listed items; `None` means every changed item is reconfigured.
    fn visible_items(&self) -> Option<Vec<Id>> {
        None
    }
}
