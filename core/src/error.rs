//! Error types for positional list operations.
//!
//! # Design
//! Only positional operations fail. Lookups that may legitimately find
//! nothing (`first`, `last`, `shift`, `pop`, `find_by_title`) return
//! `Option` instead, so a `ListError` always signals a caller bug.

use thiserror::Error;

/// Errors returned by `TodoList` positional operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    /// The index does not name an element currently in the list.
    #[error("invalid index: {index} (list size {size})")]
    InvalidIndex { index: usize, size: usize },
}
