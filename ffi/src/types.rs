//! C-facing handle and status types.
//!
//! # Design
//! `FfiTodo` and `FfiTodoList` are opaque to C: callers only ever hold
//! pointers to them. An `FfiTodo` wraps an `Rc<Todo>`, so a handle obtained
//! from a list refers to the same item the list holds. String helpers live
//! here to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::rc::Rc;

use todolist_core::{ListError, Todo, TodoList};
use tracing::warn;

/// Opaque handle to a shared todo item.
pub struct FfiTodo {
    pub(crate) inner: Rc<Todo>,
}

impl FfiTodo {
    /// Move a shared item onto the heap as a C-owned handle.
    pub(crate) fn into_raw(inner: Rc<Todo>) -> *mut Self {
        Box::into_raw(Box::new(FfiTodo { inner }))
    }

    pub(crate) fn or_null(item: Option<Rc<Todo>>) -> *mut Self {
        item.map_or(std::ptr::null_mut(), Self::into_raw)
    }
}

/// Opaque handle to a todo list.
pub struct FfiTodoList {
    pub(crate) inner: TodoList<Todo>,
}

impl FfiTodoList {
    pub(crate) fn into_raw(inner: TodoList<Todo>) -> *mut Self {
        Box::into_raw(Box::new(FfiTodoList { inner }))
    }
}

/// Outcome of a list or item operation.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiStatus {
    Ok = 0,
    /// A required pointer argument was null.
    NullArg = 1,
    /// The value passed as an item is not a todo item handle.
    TypeMismatch = 2,
    /// The index does not name an element currently in the list.
    InvalidIndex = 3,
    /// A panic was caught at the boundary.
    Panic = 4,
    /// A string argument is not valid UTF-8.
    InvalidUtf8 = 5,
}

impl From<ListError> for FfiStatus {
    fn from(err: ListError) -> Self {
        match err {
            ListError::InvalidIndex { .. } => FfiStatus::InvalidIndex,
        }
    }
}

/// Hand a Rust string to C. Returns null if `s` contains an interior NUL.
pub(crate) fn to_c_string(s: String) -> *mut c_char {
    CString::new(s).map_or(std::ptr::null_mut(), CString::into_raw)
}

/// Copy a C string into an owned `String`. Null is `NullArg`; bytes that
/// are not UTF-8 are `InvalidUtf8`, never replaced.
pub(crate) fn from_c_str(ptr: *const c_char) -> Result<String, FfiStatus> {
    if ptr.is_null() {
        return Err(FfiStatus::NullArg);
    }
    match unsafe { CStr::from_ptr(ptr) }.to_str() {
        Ok(s) => Ok(s.to_string()),
        Err(e) => {
            warn!(error = %e, "rejected non UTF-8 string");
            Err(FfiStatus::InvalidUtf8)
        }
    }
}

/// Convert a C index to a list position. Negative indices never name an
/// element.
pub(crate) fn to_index(index: i64) -> Option<usize> {
    usize::try_from(index).ok()
}
