//! C-ABI wrapper around `todolist-core`.
//!
//! # Overview
//! Exposes todo items and todo lists to any language with a C FFI through
//! opaque handles and `extern "C"` functions.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Positional operations return an `FfiStatus` and write items through an
//!   out pointer. Lookups that can legitimately find nothing (`first`,
//!   `last`, `shift`, `pop`, `find_by_title`) return null instead.
//! - Item handles share the underlying item: marking through a handle is
//!   visible through every list holding that item.
//! - The C caller owns all returned pointers and must call the matching
//!   `*_free` function to release them.
//! - Strings from C must be valid UTF-8. Titles are compared byte for byte,
//!   so invalid input is rejected rather than repaired.
//! - Handles are single-threaded: they wrap `Rc` and `Cell`, with no locking.
//!   A caller sharing one list or item between threads must synchronize
//!   every call externally, for example with a mutex around the handle.

pub mod types;

use std::ffi::CString;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use todolist_core::{Item, Todo, TodoList};
use tracing::warn;

use types::*;

/// Run `f`, turning a panic into `Err` and logging it against `function`.
/// Handles wrap `Rc` and `Cell`, which are not unwind safe, but nothing
/// observes them after a caught panic except through the C caller's own
/// handles.
fn guard<R>(function: &str, f: impl FnOnce() -> R) -> std::thread::Result<R> {
    let result = catch_unwind(AssertUnwindSafe(f));
    if result.is_err() {
        warn!(function, "caught panic at FFI boundary");
    }
    result
}

/// Resolve a C index, logging rejected negative values.
fn resolve_index(index: i64) -> Result<usize, FfiStatus> {
    to_index(index).ok_or_else(|| {
        warn!(index, "negative index rejected");
        FfiStatus::InvalidIndex
    })
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// Create a new, undone todo item.
///
/// Returns null if `title` is null or not valid UTF-8.
/// Free with `todolist_item_free`.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_item_new(title: *const c_char) -> *mut FfiTodo {
    guard("todolist_item_new", || match from_c_str(title) {
        Ok(title) => FfiTodo::into_raw(Rc::new(Todo::new(title))),
        Err(_) => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Release an item handle. Lists holding the item keep it alive.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_item_free(item: *mut FfiTodo) {
    if !item.is_null() {
        let _ = guard("todolist_item_free", || {
            drop(unsafe { Box::from_raw(item) });
        });
    }
}

/// Copy of the item's title. Free with `todolist_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_item_title(item: *const FfiTodo) -> *mut c_char {
    guard("todolist_item_title", || {
        if item.is_null() {
            return std::ptr::null_mut();
        }
        let item = unsafe { &*item };
        to_c_string(item.inner.title().to_string())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Whether the item is done. A null item is reported as not done.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_item_is_done(item: *const FfiTodo) -> bool {
    guard("todolist_item_is_done", || {
        !item.is_null() && unsafe { &*item }.inner.is_done()
    })
    .unwrap_or(false)
}

#[unsafe(no_mangle)]
pub extern "C" fn todolist_item_mark_done(item: *const FfiTodo) -> FfiStatus {
    guard("todolist_item_mark_done", || {
        if item.is_null() {
            return FfiStatus::NullArg;
        }
        unsafe { &*item }.inner.mark_done();
        FfiStatus::Ok
    })
    .unwrap_or(FfiStatus::Panic)
}

#[unsafe(no_mangle)]
pub extern "C" fn todolist_item_mark_undone(item: *const FfiTodo) -> FfiStatus {
    guard("todolist_item_mark_undone", || {
        if item.is_null() {
            return FfiStatus::NullArg;
        }
        unsafe { &*item }.inner.mark_undone();
        FfiStatus::Ok
    })
    .unwrap_or(FfiStatus::Panic)
}

/// Render the item as `[X] title` or `[ ] title`.
/// Free with `todolist_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_item_to_string(item: *const FfiTodo) -> *mut c_char {
    guard("todolist_item_to_string", || {
        if item.is_null() {
            return std::ptr::null_mut();
        }
        to_c_string(unsafe { &*item }.inner.to_string())
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// List lifecycle
// ---------------------------------------------------------------------------

/// Create an empty list titled `title`.
///
/// Returns null if `title` is null or not valid UTF-8.
/// Free with `todolist_free`.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_new(title: *const c_char) -> *mut FfiTodoList {
    guard("todolist_new", || match from_c_str(title) {
        Ok(title) => FfiTodoList::into_raw(TodoList::new(title)),
        Err(_) => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a list. Item handles obtained from it stay valid.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_free(list: *mut FfiTodoList) {
    if !list.is_null() {
        let _ = guard("todolist_free", || {
            drop(unsafe { Box::from_raw(list) });
        });
    }
}

/// Append `item` to `list`. The caller keeps ownership of its handle.
///
/// Returns `TypeMismatch` if `item` is null, since nothing else can be
/// checked about a foreign pointer.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_add(list: *mut FfiTodoList, item: *const FfiTodo) -> FfiStatus {
    guard("todolist_add", || {
        if list.is_null() {
            return FfiStatus::NullArg;
        }
        if item.is_null() {
            warn!("todolist_add called without an item handle");
            return FfiStatus::TypeMismatch;
        }
        let list = unsafe { &mut *list };
        let item = unsafe { &*item };
        list.inner.add(Rc::clone(&item.inner));
        FfiStatus::Ok
    })
    .unwrap_or(FfiStatus::Panic)
}

/// Number of items in the list; 0 for null.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_size(list: *const FfiTodoList) -> usize {
    guard("todolist_size", || {
        if list.is_null() {
            return 0;
        }
        unsafe { &*list }.inner.size()
    })
    .unwrap_or(0)
}

/// Whether every item is done. An empty list is done; null is not.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_is_done(list: *const FfiTodoList) -> bool {
    guard("todolist_is_done", || {
        !list.is_null() && unsafe { &*list }.inner.is_done()
    })
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Access and removal
// ---------------------------------------------------------------------------

/// First item, or null if the list is empty.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_first(list: *const FfiTodoList) -> *mut FfiTodo {
    guard("todolist_first", || {
        if list.is_null() {
            return std::ptr::null_mut();
        }
        FfiTodo::or_null(unsafe { &*list }.inner.first())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Last item, or null if the list is empty.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_last(list: *const FfiTodoList) -> *mut FfiTodo {
    guard("todolist_last", || {
        if list.is_null() {
            return std::ptr::null_mut();
        }
        FfiTodo::or_null(unsafe { &*list }.inner.last())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Remove and return the first item, or null if the list is empty.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_shift(list: *mut FfiTodoList) -> *mut FfiTodo {
    guard("todolist_shift", || {
        if list.is_null() {
            return std::ptr::null_mut();
        }
        FfiTodo::or_null(unsafe { &mut *list }.inner.shift())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Remove and return the last item, or null if the list is empty.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_pop(list: *mut FfiTodoList) -> *mut FfiTodo {
    guard("todolist_pop", || {
        if list.is_null() {
            return std::ptr::null_mut();
        }
        FfiTodo::or_null(unsafe { &mut *list }.inner.pop())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Write a handle to the item at `index` into `*out`.
///
/// `*out` is left untouched unless the status is `Ok`.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_item_at(
    list: *const FfiTodoList,
    index: i64,
    out: *mut *mut FfiTodo,
) -> FfiStatus {
    guard("todolist_item_at", || {
        if list.is_null() || out.is_null() {
            return FfiStatus::NullArg;
        }
        let list = unsafe { &*list };
        let index = match resolve_index(index) {
            Ok(i) => i,
            Err(status) => return status,
        };
        match list.inner.item_at(index) {
            Ok(item) => {
                unsafe { *out = FfiTodo::into_raw(item) };
                FfiStatus::Ok
            }
            Err(e) => e.into(),
        }
    })
    .unwrap_or(FfiStatus::Panic)
}

/// Remove the item at `index`. When `out` is non-null a handle to the
/// removed item is written there; otherwise the list's reference is dropped.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_remove_at(
    list: *mut FfiTodoList,
    index: i64,
    out: *mut *mut FfiTodo,
) -> FfiStatus {
    guard("todolist_remove_at", || {
        if list.is_null() {
            return FfiStatus::NullArg;
        }
        let list = unsafe { &mut *list };
        let index = match resolve_index(index) {
            Ok(i) => i,
            Err(status) => return status,
        };
        match list.inner.remove_at(index) {
            Ok(item) => {
                if !out.is_null() {
                    unsafe { *out = FfiTodo::into_raw(item) };
                }
                FfiStatus::Ok
            }
            Err(e) => e.into(),
        }
    })
    .unwrap_or(FfiStatus::Panic)
}

/// First item titled exactly `title`, or null if none matches. A title that
/// is not valid UTF-8 matches nothing.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_find_by_title(
    list: *const FfiTodoList,
    title: *const c_char,
) -> *mut FfiTodo {
    guard("todolist_find_by_title", || {
        if list.is_null() {
            return std::ptr::null_mut();
        }
        let Ok(title) = from_c_str(title) else {
            return std::ptr::null_mut();
        };
        FfiTodo::or_null(unsafe { &*list }.inner.find_by_title(&title))
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Marking
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub extern "C" fn todolist_mark_done_at(list: *const FfiTodoList, index: i64) -> FfiStatus {
    guard("todolist_mark_done_at", || {
        if list.is_null() {
            return FfiStatus::NullArg;
        }
        let list = unsafe { &*list };
        match resolve_index(index) {
            Ok(i) => list.inner.mark_done_at(i).map_or_else(Into::into, |()| FfiStatus::Ok),
            Err(status) => status,
        }
    })
    .unwrap_or(FfiStatus::Panic)
}

#[unsafe(no_mangle)]
pub extern "C" fn todolist_mark_undone_at(list: *const FfiTodoList, index: i64) -> FfiStatus {
    guard("todolist_mark_undone_at", || {
        if list.is_null() {
            return FfiStatus::NullArg;
        }
        let list = unsafe { &*list };
        match resolve_index(index) {
            Ok(i) => list.inner.mark_undone_at(i).map_or_else(Into::into, |()| FfiStatus::Ok),
            Err(status) => status,
        }
    })
    .unwrap_or(FfiStatus::Panic)
}

/// Mark the first item titled `title` as done. An unknown title is not an
/// error; a title that is not valid UTF-8 is `InvalidUtf8`.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_mark_done(list: *const FfiTodoList, title: *const c_char) -> FfiStatus {
    guard("todolist_mark_done", || {
        if list.is_null() {
            return FfiStatus::NullArg;
        }
        let title = match from_c_str(title) {
            Ok(title) => title,
            Err(status) => return status,
        };
        unsafe { &*list }.inner.mark_done(&title);
        FfiStatus::Ok
    })
    .unwrap_or(FfiStatus::Panic)
}

#[unsafe(no_mangle)]
pub extern "C" fn todolist_mark_all_done(list: *const FfiTodoList) -> FfiStatus {
    guard("todolist_mark_all_done", || {
        if list.is_null() {
            return FfiStatus::NullArg;
        }
        unsafe { &*list }.inner.mark_all_done();
        FfiStatus::Ok
    })
    .unwrap_or(FfiStatus::Panic)
}

#[unsafe(no_mangle)]
pub extern "C" fn todolist_mark_all_undone(list: *const FfiTodoList) -> FfiStatus {
    guard("todolist_mark_all_undone", || {
        if list.is_null() {
            return FfiStatus::NullArg;
        }
        unsafe { &*list }.inner.mark_all_undone();
        FfiStatus::Ok
    })
    .unwrap_or(FfiStatus::Panic)
}

// ---------------------------------------------------------------------------
// Derived lists
// ---------------------------------------------------------------------------

/// New list with the same title holding the done items.
/// Free with `todolist_free`.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_all_done(list: *const FfiTodoList) -> *mut FfiTodoList {
    guard("todolist_all_done", || {
        if list.is_null() {
            return std::ptr::null_mut();
        }
        FfiTodoList::into_raw(unsafe { &*list }.inner.all_done())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// New list with the same title holding the items not yet done.
/// Free with `todolist_free`.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_all_not_done(list: *const FfiTodoList) -> *mut FfiTodoList {
    guard("todolist_all_not_done", || {
        if list.is_null() {
            return std::ptr::null_mut();
        }
        FfiTodoList::into_raw(unsafe { &*list }.inner.all_not_done())
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the list: a `---- title ----` line followed by one line per item.
/// Free with `todolist_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_to_string(list: *const FfiTodoList) -> *mut c_char {
    guard("todolist_to_string", || {
        if list.is_null() {
            return std::ptr::null_mut();
        }
        to_c_string(unsafe { &*list }.inner.to_string())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Serialize the list as `{"title": ..., "items": [{"title", "done"}, ...]}`.
/// Returns null on failure. Free with `todolist_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_to_json(list: *const FfiTodoList) -> *mut c_char {
    guard("todolist_to_json", || {
        if list.is_null() {
            return std::ptr::null_mut();
        }
        match serde_json::to_string(&unsafe { &*list }.inner) {
            Ok(json) => to_c_string(json),
            Err(e) => {
                warn!(error = %e, "list serialization failed");
                std::ptr::null_mut()
            }
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todolist_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = guard("todolist_free_string", || {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
