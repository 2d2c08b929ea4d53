//! Type aliases for commonly used shared-state types.
//!
//! The customizer runs on a single UI event loop: no two handlers execute
//! concurrently, so shared state is `Rc<RefCell<T>>` rather than a lock.
//!
//! ## Usage
//!
//! ```rust
//! use garmentkit_core::types::*;
//!
//! let log: SharedVec<String> = shared(Vec::new());
//! log.borrow_mut().push("selected".to_string());
//! assert_eq!(log.borrow().len(), 1);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

// =============================================================================
// SINGLE-THREADED SHARED TYPES (Rc<RefCell<T>>)
// =============================================================================

/// A reference-counted, interior-mutable wrapper for single-threaded sharing.
///
/// Used for image slots and by host views that keep a handle to state they
/// also hand to the session as a listener.
pub type Shared<T> = Rc<RefCell<T>>;

/// An optional shared reference, for lazily-initialized shared state.
pub type SharedOption<T> = Rc<RefCell<Option<T>>>;

/// A shared vector for single-threaded collection management.
pub type SharedVec<T> = Rc<RefCell<Vec<T>>>;

// =============================================================================
// CONSTRUCTOR HELPERS
// =============================================================================

/// Create a new `Shared<T>` from a value.
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Create an empty `SharedOption<T>`.
pub fn shared_none<T>() -> SharedOption<T> {
    Rc::new(RefCell::new(None))
}
