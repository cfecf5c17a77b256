use crate::catalog::identity::{CategoryId, EntryId};
use thiserror::Error;

/// Structural defect in a catalog or in the edits applied to it.
///
/// Every variant is an authoring mistake in a version definition; none are
/// recovered from. The version being built is abandoned and the error is
/// reported to whoever runs the build.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("entry not found: {0}")]
    EntryNotFound(EntryId),

    #[error("category not found: {0}")]
    CategoryNotFound(CategoryId),

    #[error("duplicate entry id: {0}")]
    DuplicateEntry(EntryId),

    #[error("duplicate category id: {0}")]
    DuplicateCategory(CategoryId),

    #[error("entry {entry} references unknown category {category}")]
    DanglingCategory { entry: EntryId, category: CategoryId },

    #[error("cannot clone an inconsistent catalog")]
    CloneFailed(#[source] Box<CatalogError>),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
