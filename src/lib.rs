//! Identity-keyed diffing and reconciliation for declarative list/grid view models.
//!
//! Callers describe their UI as a tree of sections, cells, and supplementary
//! views, each with a stable identifier and a hashable content payload. On
//! every model update the library projects the tree into an immutable
//! [`Snapshot`], computes a minimal [`DiffResult`] against the previous
//! snapshot (optionally on a worker thread), and drives an abstract
//! [`CollectionWidget`] through the resulting insert/remove/move/reconfigure
//! operations, registering reusable view kinds exactly once along the way.
//!
//! ```
//! use collection_reconciler::{
//!     CellViewModel, CollectionViewModel, CollectionViewDriver, DriverOptions,
//!     SectionViewModel, ViewRegistration,
//! };
//! # use collection_reconciler::{CollectionWidget, DiffResult, Id};
//! # struct NullWidget;
//! # impl CollectionWidget for NullWidget {
//! #     fn register(&mut self, _: &ViewRegistration) {}
//! #     fn reload(&mut self, _: &CollectionViewModel) {}
//! #     fn apply_diff(&mut self, _: &DiffResult, _: &CollectionViewModel, _: bool) {}
//! #     fn reconfigure_supplementary(&mut self, _: &Id, _: &Id, _: &CollectionViewModel) {}
//! # }
//!
//! let registration = ViewRegistration::cell_by_type("person-cell", "PersonCell");
//! let people = SectionViewModel::of_cells(
//!     "people",
//!     vec![
//!         CellViewModel::new("p1", &"Alice", registration.clone()),
//!         CellViewModel::new("p2", &"Bob", registration),
//!     ],
//! )?;
//! let model = CollectionViewModel::new("contacts", vec![people])?;
//!
//! let driver = CollectionViewDriver::new(NullWidget, model, DriverOptions::default());
//! assert_eq!(driver.num_sections(), 1);
//! # Ok::<(), collection_reconciler::ModelError>(())
//! ```

mod diff_engine;
mod driver;
mod errors;
mod registration;
mod snapshot;
mod types;
mod view_model;
mod widget;

pub use diff_engine::diff;
pub use driver::{CollectionViewDriver, DidUpdate, DriverOptions, DriverState, WakeHandler};
pub use errors::ModelError;
pub use registration::{
    RegistrationCache, RegistrationMethod, SupplementaryKind, ViewRegistration, ViewRole,
};
pub use snapshot::{SectionSnapshot, Snapshot};
pub use types::{content_hash, DiffResult, Id, IndexedId, Move, SectionItemDiff};
pub use view_model::{
    CellViewModel, CollectionViewModel, SectionViewModel, SupplementaryViewModel,
};
pub use widget::CollectionWidget;
