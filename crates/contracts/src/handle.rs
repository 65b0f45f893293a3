//! Handle - opaque membership token issued by a multiplexer
//!
//! Uses Arc<str> internally so handles can be cloned into logs, metrics
//! and error values without reallocating.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Opaque identifier for one destination inside a multiplexer.
///
/// A handle only means something to the multiplexer that issued it.
/// Callers must not assume ordering, density or any relationship between
/// handles issued for different destinations.
///
/// # Examples
/// ```
/// use contracts::Handle;
///
/// let handle: Handle = "5f3e9a".into();
/// let copy = handle.clone();
/// assert_eq!(handle, copy);
/// assert_eq!(handle.as_str(), "5f3e9a");
/// ```
#[derive(Clone)]
pub struct Handle(Arc<str>);

impl Handle {
    /// Create a handle from its textual form.
    #[inline]
    pub fn new(s: &str) -> Self {
        Self(Arc::from(s))
    }

    /// Textual form of the handle.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Handle {
    #[inline]
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

impl From<String> for Handle {
    #[inline]
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({:?})", self.0)
    }
}

impl PartialEq for Handle {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for Handle {}

impl Hash for Handle {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}
