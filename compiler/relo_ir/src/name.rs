//! Interned string identifiers.
//!
//! Path specifiers, identifiers, and opaque emitted text are all stored as
//! `Name(u32)` indices into a `StringInterner`. Interning keeps `NodeKind`
//! `Copy` and makes path comparison an integer compare.

use std::fmt;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Interned string identifier.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// Pre-interned empty string.
    pub const EMPTY: Name = Name(0);

    /// Get raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Create from raw u32 value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::EMPTY
    }
}

struct InternInner {
    /// Map from string content to index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents.
    strings: Vec<&'static str>,
}

/// String interner.
///
/// Provides O(1) lookup and equality comparison for interned strings.
/// Interning takes `&self` (lock inside) so tree construction and rewriting
/// can share one interner without threading `&mut` everywhere.
pub struct StringInterner {
    inner: RwLock<InternInner>,
}

impl StringInterner {
    /// Create a new interner with the empty string pre-interned at index 0.
    pub fn new() -> Self {
        let empty: &'static str = "";
        let mut map = FxHashMap::default();
        map.insert(empty, 0);
        StringInterner {
            inner: RwLock::new(InternInner {
                map,
                strings: vec![empty],
            }),
        }
    }

    /// Intern a string, returning its `Name`.
    pub fn intern(&self, s: &str) -> Name {
        // Fast path: already interned.
        {
            let guard = self.inner.read();
            if let Some(&idx) = guard.map.get(s) {
                return Name(idx);
            }
        }

        let mut guard = self.inner.write();
        // Double-check after acquiring the write lock.
        if let Some(&idx) = guard.map.get(s) {
            return Name(idx);
        }

        // Leak to get 'static lifetime; the interner lives for the whole
        // run and strings are never removed.
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let Ok(idx) = u32::try_from(guard.strings.len()) else {
            unreachable!("interner capacity exceeded");
        };
        guard.strings.push(leaked);
        guard.map.insert(leaked, idx);
        Name(idx)
    }

    /// Resolve a `Name` back to its string.
    ///
    /// # Panics
    /// Panics if `name` was not produced by this interner.
    pub fn resolve(&self, name: Name) -> &'static str {
        let guard = self.inner.read();
        guard.strings[name.raw() as usize]
    }

    /// Number of interned strings (including the pre-interned empty string).
    pub fn len(&self) -> usize {
        self.inner.read().strings.len()
    }

    /// Whether only the empty string is interned.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StringInterner({} strings)", self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_dedups() {
        let interner = StringInterner::new();
        let a = interner.intern("./foo");
        let b = interner.intern("./foo");
        let c = interner.intern("./bar");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.resolve(a), "./foo");
        assert_eq!(interner.resolve(c), "./bar");
    }

    #[test]
    fn empty_string_is_pre_interned() {
        let interner = StringInterner::new();
        assert_eq!(interner.intern(""), Name::EMPTY);
        assert_eq!(interner.resolve(Name::EMPTY), "");
    }
}
