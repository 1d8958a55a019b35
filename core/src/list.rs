//! Ordered, titled container of shared items.
//!
//! # Design
//! `TodoList` holds `Rc<T>` in insertion order. Every accessor hands out a
//! clone of the `Rc`, so callers, the list and any derived lists all see
//! the same item. Positional operations validate the index first and fail
//! with `ListError::InvalidIndex` instead of clamping.

use std::fmt;
use std::rc::Rc;

use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::{debug, trace};

use crate::error::ListError;
use crate::item::{Item, Todo};

/// An ordered collection of todo items under a display title.
///
/// Duplicates are allowed, both the same `Rc` twice and distinct items with
/// equal titles.
#[derive(Debug)]
pub struct TodoList<T: ?Sized = Todo> {
    title: String,
    items: Vec<Rc<T>>,
}

impl<T: Item + ?Sized> TodoList<T> {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Append `item` to the end of the list.
    pub fn add(&mut self, item: Rc<T>) {
        debug!(list = %self.title, item = item.title(), "adding item");
        self.items.push(item);
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<Rc<T>> {
        self.items.first().cloned()
    }

    pub fn last(&self) -> Option<Rc<T>> {
        self.items.last().cloned()
    }

    pub fn item_at(&self, index: usize) -> Result<Rc<T>, ListError> {
        self.validate_index(index)?;
        Ok(Rc::clone(&self.items[index]))
    }

    /// Remove and return the item at `index`. Later items shift down by one.
    pub fn remove_at(&mut self, index: usize) -> Result<Rc<T>, ListError> {
        self.validate_index(index)?;
        let item = self.items.remove(index);
        debug!(list = %self.title, index, item = item.title(), "removed item");
        Ok(item)
    }

    /// Remove and return the first item, or `None` if the list is empty.
    pub fn shift(&mut self) -> Option<Rc<T>> {
        if self.items.is_empty() {
            return None;
        }
        let item = self.items.remove(0);
        debug!(list = %self.title, item = item.title(), "shifted item");
        Some(item)
    }

    /// Remove and return the last item, or `None` if the list is empty.
    pub fn pop(&mut self) -> Option<Rc<T>> {
        let item = self.items.pop()?;
        debug!(list = %self.title, item = item.title(), "popped item");
        Some(item)
    }

    pub fn mark_done_at(&self, index: usize) -> Result<(), ListError> {
        let item = self.item_at(index)?;
        trace!(list = %self.title, index, "marking done");
        item.mark_done();
        Ok(())
    }

    pub fn mark_undone_at(&self, index: usize) -> Result<(), ListError> {
        let item = self.item_at(index)?;
        trace!(list = %self.title, index, "marking undone");
        item.mark_undone();
        Ok(())
    }

    /// True when every item is done. An empty list is done.
    pub fn is_done(&self) -> bool {
        self.items.iter().all(|item| item.is_done())
    }

    pub fn for_each(&self, mut f: impl FnMut(&T)) {
        for item in &self.items {
            f(&**item);
        }
    }

    /// Build a new list with the same title holding, in order, every item
    /// for which `predicate` returns true. The receiver is left untouched.
    pub fn filter(&self, mut predicate: impl FnMut(&T) -> bool) -> Self {
        let mut filtered = Self::new(self.title.clone());
        for item in &self.items {
            if predicate(&**item) {
                filtered.items.push(Rc::clone(item));
            }
        }
        filtered
    }

    /// First item whose title equals `title` exactly.
    pub fn find_by_title(&self, title: &str) -> Option<Rc<T>> {
        self.filter(|item| item.title() == title).first()
    }

    pub fn all_done(&self) -> Self {
        self.filter(|item| item.is_done())
    }

    pub fn all_not_done(&self) -> Self {
        self.filter(|item| !item.is_done())
    }

    /// Mark the first item titled `title` as done. Does nothing when no
    /// item matches.
    pub fn mark_done(&self, title: &str) {
        match self.find_by_title(title) {
            Some(item) => {
                trace!(list = %self.title, item = title, "marking done");
                item.mark_done();
            }
            None => trace!(list = %self.title, item = title, "no item to mark done"),
        }
    }

    pub fn mark_all_done(&self) {
        self.for_each(|item| item.mark_done());
    }

    pub fn mark_all_undone(&self) {
        self.for_each(|item| item.mark_undone());
    }

    /// Snapshot of the items in order. Changing the returned vector does not
    /// change the list.
    pub fn to_array(&self) -> Vec<Rc<T>> {
        self.items.clone()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rc<T>> {
        self.items.iter()
    }

    fn validate_index(&self, index: usize) -> Result<(), ListError> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(ListError::InvalidIndex {
                index,
                size: self.items.len(),
            })
        }
    }
}

// Shallow: the clone holds the same `Rc`s.
impl<T: ?Sized> Clone for TodoList<T> {
    fn clone(&self) -> Self {
        Self {
            title: self.title.clone(),
            items: self.items.clone(),
        }
    }
}

impl<T: PartialEq + ?Sized> PartialEq for TodoList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title && self.items == other.items
    }
}

impl<'a, T: ?Sized> IntoIterator for &'a TodoList<T> {
    type Item = &'a Rc<T>;
    type IntoIter = std::slice::Iter<'a, Rc<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Item + ?Sized> fmt::Display for TodoList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "---- {} ----", self.title)?;
        for item in &self.items {
            write!(f, "\n{item}")?;
        }
        Ok(())
    }
}

impl<T: Serialize + ?Sized> Serialize for TodoList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TodoList", 2)?;
        state.serialize_field("title", &self.title)?;
        state.serialize_field("items", &Items(&self.items))?;
        state.end()
    }
}

struct Items<'a, T: ?Sized>(&'a [Rc<T>]);

impl<T: Serialize + ?Sized> Serialize for Items<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(|item| &**item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        milk: Rc<Todo>,
        room: Rc<Todo>,
        gym: Rc<Todo>,
        list: TodoList,
    }

    fn fixture() -> Fixture {
        let milk = Rc::new(Todo::new("Buy milk"));
        let room = Rc::new(Todo::new("Clean room"));
        let gym = Rc::new(Todo::new("Go to the gym"));
        let mut list = TodoList::new("Today's Todos");
        list.add(Rc::clone(&milk));
        list.add(Rc::clone(&room));
        list.add(Rc::clone(&gym));
        Fixture {
            milk,
            room,
            gym,
            list,
        }
    }

    fn same(a: &[Rc<Todo>], b: &[&Rc<Todo>]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| Rc::ptr_eq(x, y))
    }

    #[test]
    fn size_counts_items() {
        let f = fixture();
        assert_eq!(f.list.size(), 3);
        assert!(!f.list.is_empty());
        assert_eq!(f.list.title(), "Today's Todos");
    }

    #[test]
    fn first_and_last_return_shared_items() {
        let f = fixture();
        assert!(Rc::ptr_eq(&f.list.first().unwrap(), &f.milk));
        assert!(Rc::ptr_eq(&f.list.last().unwrap(), &f.gym));
    }

    #[test]
    fn empty_list_has_no_first_or_last() {
        let mut list: TodoList = TodoList::new("Empty");
        assert!(list.first().is_none());
        assert!(list.last().is_none());
        assert!(list.shift().is_none());
        assert!(list.pop().is_none());
        assert!(list.is_empty());
    }

    #[test]
    fn item_at_returns_item_at_position() {
        let f = fixture();
        assert!(Rc::ptr_eq(&f.list.item_at(1).unwrap(), &f.room));
    }

    #[test]
    fn positional_operations_reject_out_of_range() {
        let mut f = fixture();
        let expected = ListError::InvalidIndex { index: 3, size: 3 };
        assert_eq!(f.list.item_at(3).unwrap_err(), expected);
        assert_eq!(f.list.mark_done_at(3).unwrap_err(), expected);
        assert_eq!(f.list.mark_undone_at(3).unwrap_err(), expected);
        assert_eq!(
            f.list.remove_at(5).unwrap_err(),
            ListError::InvalidIndex { index: 5, size: 3 }
        );
        assert_eq!(f.list.size(), 3);
        assert!(!f.milk.is_done() && !f.room.is_done() && !f.gym.is_done());
    }

    #[test]
    fn item_at_on_empty_list_fails() {
        let list: TodoList = TodoList::new("Empty");
        assert!(matches!(
            list.item_at(0),
            Err(ListError::InvalidIndex { index: 0, size: 0 })
        ));
    }

    #[test]
    fn shift_removes_first_item() {
        let mut f = fixture();
        assert!(Rc::ptr_eq(&f.list.shift().unwrap(), &f.milk));
        assert!(same(&f.list.to_array(), &[&f.room, &f.gym]));
    }

    #[test]
    fn pop_removes_last_item() {
        let mut f = fixture();
        assert!(Rc::ptr_eq(&f.list.pop().unwrap(), &f.gym));
        assert!(same(&f.list.to_array(), &[&f.milk, &f.room]));
    }

    #[test]
    fn remove_at_shifts_later_items_down() {
        let mut f = fixture();
        let removed = f.list.remove_at(1).unwrap();
        assert!(Rc::ptr_eq(&removed, &f.room));
        assert!(same(&f.list.to_array(), &[&f.milk, &f.gym]));
        assert!(Rc::ptr_eq(&f.list.item_at(1).unwrap(), &f.gym));
    }

    #[test]
    fn add_then_remove_restores_previous_state() {
        let mut f = fixture();
        let before = f.list.to_array();
        let extra = Rc::new(Todo::new("Call mom"));
        f.list.add(Rc::clone(&extra));
        let removed = f.list.remove_at(f.list.size() - 1).unwrap();
        assert!(Rc::ptr_eq(&removed, &extra));
        assert_eq!(f.list.size(), before.len());
        assert!(same(&f.list.to_array(), &before.iter().collect::<Vec<_>>()));
    }

    #[test]
    fn duplicates_are_allowed() {
        let mut f = fixture();
        f.list.add(Rc::clone(&f.milk));
        f.list.add(Rc::new(Todo::new("Buy milk")));
        assert_eq!(f.list.size(), 5);
        assert!(Rc::ptr_eq(&f.list.find_by_title("Buy milk").unwrap(), &f.milk));
    }

    #[test]
    fn mark_done_at_only_touches_that_item() {
        let f = fixture();
        f.list.mark_done_at(1).unwrap();
        assert!(f.room.is_done());
        assert!(!f.milk.is_done());
        assert!(!f.gym.is_done());
    }

    #[test]
    fn mark_undone_at_only_touches_that_item() {
        let f = fixture();
        f.list.mark_all_done();
        f.list.mark_undone_at(1).unwrap();
        assert!(!f.room.is_done());
        assert!(f.milk.is_done());
        assert!(f.gym.is_done());
    }

    #[test]
    fn is_done_tracks_every_item() {
        let f = fixture();
        assert!(!f.list.is_done());
        f.list.mark_all_done();
        assert!(f.list.is_done());
        f.list.mark_undone_at(2).unwrap();
        assert!(!f.list.is_done());
        f.list.mark_done_at(2).unwrap();
        assert!(f.list.is_done());
        f.list.mark_all_undone();
        assert!(!f.list.is_done());
    }

    #[test]
    fn empty_list_is_done() {
        let list: TodoList = TodoList::new("Empty");
        assert!(list.is_done());
    }

    #[test]
    fn for_each_visits_items_in_order() {
        let f = fixture();
        let mut titles = Vec::new();
        f.list.for_each(|item| titles.push(item.title().to_string()));
        assert_eq!(titles, ["Buy milk", "Clean room", "Go to the gym"]);
    }

    #[test]
    fn filter_builds_new_list_with_same_title() {
        let f = fixture();
        f.room.mark_done();
        let mut expected = TodoList::new(f.list.title());
        expected.add(Rc::clone(&f.room));

        let filtered = f.list.filter(|item| item.is_done());
        assert_eq!(filtered, expected);
        assert!(Rc::ptr_eq(&filtered.first().unwrap(), &f.room));
        assert_eq!(f.list.size(), 3);
    }

    #[test]
    fn derived_lists_share_items() {
        let f = fixture();
        let pending = f.list.all_not_done();
        pending.mark_done_at(0).unwrap();
        assert!(f.milk.is_done());
        assert!(f.list.item_at(0).unwrap().is_done());
    }

    #[test]
    fn all_done_and_all_not_done_partition_the_list() {
        let f = fixture();
        f.list.mark_done_at(1).unwrap();

        let done = f.list.all_done();
        assert_eq!(done.title(), "Today's Todos");
        assert!(same(&done.to_array(), &[&f.room]));

        let not_done = f.list.all_not_done();
        assert_eq!(not_done.title(), "Today's Todos");
        assert!(same(&not_done.to_array(), &[&f.milk, &f.gym]));

        assert_eq!(f.list.size(), 3);
    }

    #[test]
    fn find_by_title_requires_exact_match() {
        let f = fixture();
        assert!(Rc::ptr_eq(&f.list.find_by_title("Buy milk").unwrap(), &f.milk));
        assert!(f.list.find_by_title("by mlk").is_none());
        assert!(f.list.find_by_title("buy milk").is_none());
    }

    #[test]
    fn mark_done_by_title() {
        let f = fixture();
        f.list.mark_done("Buy milk");
        assert!(f.milk.is_done());
        assert!(!f.room.is_done());
        assert!(!f.gym.is_done());
    }

    #[test]
    fn mark_done_unknown_title_is_noop() {
        let f = fixture();
        f.list.mark_done("Walk the dog");
        assert!(!f.list.iter().any(|item| item.is_done()));
    }

    #[test]
    fn to_array_is_a_detached_copy() {
        let f = fixture();
        let mut array = f.list.to_array();
        assert!(same(&array, &[&f.milk, &f.room, &f.gym]));
        array.clear();
        assert_eq!(f.list.size(), 3);
    }

    #[test]
    fn display_renders_title_and_items() {
        let f = fixture();
        assert_eq!(
            f.list.to_string(),
            "---- Today's Todos ----\n[ ] Buy milk\n[ ] Clean room\n[ ] Go to the gym"
        );
        f.list.mark_done_at(0).unwrap();
        assert_eq!(
            f.list.to_string(),
            "---- Today's Todos ----\n[X] Buy milk\n[ ] Clean room\n[ ] Go to the gym"
        );
    }

    #[test]
    fn display_of_empty_list_is_title_line() {
        let list: TodoList = TodoList::new("Nothing");
        assert_eq!(list.to_string(), "---- Nothing ----");
    }

    #[test]
    fn clone_is_shallow() {
        let f = fixture();
        let mut copy = f.list.clone();
        copy.pop();
        assert_eq!(f.list.size(), 3);
        copy.mark_done_at(0).unwrap();
        assert!(f.milk.is_done());
    }

    #[test]
    fn iterates_by_reference() {
        let f = fixture();
        let titles: Vec<&str> = (&f.list).into_iter().map(|item| item.title()).collect();
        assert_eq!(titles, ["Buy milk", "Clean room", "Go to the gym"]);
    }

    #[test]
    fn serializes_title_and_items() {
        let f = fixture();
        f.list.mark_done("Clean room");
        let json = serde_json::to_value(&f.list).unwrap();
        assert_eq!(json["title"], "Today's Todos");
        assert_eq!(json["items"].as_array().unwrap().len(), 3);
        assert_eq!(json["items"][1]["title"], "Clean room");
        assert_eq!(json["items"][1]["done"], true);
        assert_eq!(json["items"][0]["done"], false);
    }

    struct Chore {
        name: &'static str,
        done: std::cell::Cell<bool>,
    }

    impl fmt::Display for Chore {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{} ({})", self.name, if self.done.get() { "done" } else { "open" })
        }
    }

    impl Item for Chore {
        fn title(&self) -> &str {
            self.name
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

    #[test]
    fn accepts_any_item_implementation() {
        let mut list: TodoList<dyn Item> = TodoList::new("Mixed");
        list.add(Rc::new(Todo::new("Buy milk")));
        list.add(Rc::new(Chore {
            name: "Dishes",
            done: std::cell::Cell::new(false),
        }));
        list.mark_done("Dishes");
        assert_eq!(
            list.to_string(),
            "---- Mixed ----\n[ ] Buy milk\nDishes (done)"
        );
        assert_eq!(list.all_done().size(), 1);
    }
}
