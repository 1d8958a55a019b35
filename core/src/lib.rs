//! In-memory ordered todo list.
//!
//! # Overview
//! A `TodoList` is a titled, ordered collection of shared item references
//! with positional access, linear search by title, bulk status changes and
//! filtering into derived lists.
//!
//! # Design
//! - The item capability contract is the `Item` trait; the list accepts
//!   any `Rc<T>` with `T: Item + ?Sized`, including `dyn Item`.
//! - Derived lists (`filter`, `all_done`, `all_not_done`) hold clones of the
//!   same `Rc`s, never copies of the items. Marking an item through any list
//!   is visible through every other list that holds it.
//! - Out-of-range positions are errors (`ListError`); legitimate absence
//!   (empty list, no title match) is `None`.

pub mod error;
pub mod item;
pub mod list;

pub use error::ListError;
pub use item::{Item, Todo};
pub use list::TodoList;
