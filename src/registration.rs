//! Reusable-view registration descriptors and the registration cache
use crate::widget::CollectionWidget;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// The kind of a supplementary view within its section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupplementaryKind {
    Header,
    Footer,
    /// A host-defined kind, such as a badge or separator.
    Custom(String),
}

impl SupplementaryKind {
    pub fn as_str(&self) -> &str {
        match self {
            SupplementaryKind::Header => "header",
            SupplementaryKind::Footer => "footer",
            SupplementaryKind::Custom(kind) => kind,
        }
    }
}

impl fmt::Display for SupplementaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the host toolkit materializes a registered view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistrationMethod {
    /// A view constructed in code, named by its concrete type.
    ByType { type_name: String },
    /// A view loaded from a serialized resource, optionally bundle-scoped.
    ByResource { name: String, bundle: Option<String> },
}

/// The role a registered view plays in the widget.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewRole {
    Cell,
    Supplementary(SupplementaryKind),
}

/// Everything the widget needs to register a view kind for reuse.
///
/// Two registrations are the same view kind exactly when their reuse
/// identifier, role, and method are structurally equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewRegistration {
    pub reuse_id: String,
    pub role: ViewRole,
    pub method: RegistrationMethod,
}

impl ViewRegistration {
    /// A cell registered by concrete type.
    pub fn cell_by_type(reuse_id: impl Into<String>, type_name: impl Into<String>) -> Self {
        ViewRegistration {
            reuse_id: reuse_id.into(),
            role: ViewRole::Cell,
            method: RegistrationMethod::ByType { type_name: type_name.into() },
        }
    }

    /// A cell registered from a named resource in the main bundle.
    pub fn cell_by_resource(reuse_id: impl Into<String>, resource: impl Into<String>) -> Self {
        ViewRegistration {
            reuse_id: reuse_id.into(),
            role: ViewRole::Cell,
            method: RegistrationMethod::ByResource { name: resource.into(), bundle: None },
        }
    }

    /// A supplementary view of the given kind, registered by concrete type.
    pub fn supplementary_by_type(
        reuse_id: impl Into<String>,
        type_name: impl Into<String>,
        kind: SupplementaryKind,
    ) -> Self {
        ViewRegistration {
            reuse_id: reuse_id.into(),
            role: ViewRole::Supplementary(kind),
            method: RegistrationMethod::ByType { type_name: type_name.into() },
        }
    }
}

/// Tracks which view kinds have already been registered with the widget.
///
/// Membership is keyed by the full structural equality of the descriptor.
/// There is no eviction: the set of view kinds an application registers is
/// assumed small and bounded, and it lives exactly as long as the owning
/// driver.
#[derive(Debug, Default)]
pub struct RegistrationCache {
    seen: HashSet<ViewRegistration>,
}

impl RegistrationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when this descriptor has not yet been registered.
    pub fn needs_registration(&self, registration: &ViewRegistration) -> bool {
        !self.seen.contains(registration)
    }

    /// Marks a descriptor as registered.
    pub fn record(&mut self, registration: ViewRegistration) {
        self.seen.insert(registration);
    }

    /// Registers every not-yet-seen descriptor with the widget.
    ///
    /// Descriptors already in the cache produce no widget call, so
    /// registering the same view kind twice performs exactly one underlying
    /// registration.
    pub fn register_new<W: CollectionWidget>(
        &mut self,
        widget: &mut W,
        registrations: impl IntoIterator<Item = ViewRegistration>,
    ) {
        for registration in registrations {
            if self.needs_registration(&registration) {
                log::debug!(
                    "registering view kind '{}' ({:?})",
                    registration.reuse_id,
                    registration.role
                );
                widget.register(&registration);
                self.record(registration);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_tracks_structural_equality() {
        let mut cache = RegistrationCache::new();
        let reg = ViewRegistration::cell_by_type("person-cell", "PersonCell");

        assert!(cache.needs_registration(&reg));
        cache.record(reg.clone());
        assert!(!cache.needs_registration(&reg));

        // Same reuse id, different role: a distinct view kind.
        let header = ViewRegistration::supplementary_by_type(
            "person-cell",
            "PersonCell",
            SupplementaryKind::Header,
        );
        assert!(cache.needs_registration(&header));
    }

    #[test]
    fn method_distinguishes_type_from_resource() {
        let by_type = ViewRegistration::cell_by_type("c", "Cell");
        let by_resource = ViewRegistration::cell_by_resource("c", "Cell");
        assert_ne!(by_type, by_resource);

        let mut cache = RegistrationCache::new();
        cache.record(by_type);
        assert!(cache.needs_registration(&by_resource));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn custom_kinds_compare_by_name() {
        let badge = SupplementaryKind::Custom("badge".into());
        assert_eq!(badge.as_str(), "badge");
        assert_ne!(badge, SupplementaryKind::Header);
        assert_eq!(SupplementaryKind::Header.as_str(), "header");
    }
}
