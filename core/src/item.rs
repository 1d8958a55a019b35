//! The item capability contract and the stock `Todo` item.
//!
//! # Design
//! Items are shared by reference between a list and the lists derived from
//! it, so marking goes through `&self`. `Todo` keeps its flag in a `Cell`.

use std::cell::Cell;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Capabilities a value needs to live in a `TodoList`.
///
/// `Display` renders the item as one line of the list's text form.
pub trait Item: fmt::Display {
    fn title(&self) -> &str;

    fn is_done(&self) -> bool;

    fn mark_done(&self);

    fn mark_undone(&self);
}

/// A single task with a title and a completion flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    title: String,
    #[serde(default)]
    done: Cell<bool>,
}

impl Todo {
    /// Create an undone todo.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            done: Cell::new(false),
        }
    }
}

impl Item for Todo {
    fn title(&self) -> &str {
        &self.title
    }

    fn is_done(&self) -> bool {
        self.done.get()
    }

    fn mark_done(&self) {
        self.done.set(true);
    }

    fn mark_undone(&self) {
        self.done.set(false);
    }
}

impl fmt::Display for Todo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.is_done() { 'X' } else { ' ' };
        write!(f, "[{marker}] {}", self.title)
    }
}
