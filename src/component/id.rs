//! Component identity: `ComponentId` and the injectable `IdGenerator`.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Opaque identifier binding a component instance to one document element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(String);

impl ComponentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ComponentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for ComponentId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ComponentId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Issues `uid-1`, `uid-2`, ... from a shared monotonic counter.
///
/// Clones share the counter, so every component built from one application's
/// generator gets a distinct id. Separate generators number independently;
/// give each application (and each test) its own.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    issued: Rc<Cell<u64>>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next id. Never returns the same id twice.
    pub fn next_id(&self) -> ComponentId {
        let n = self.issued.get() + 1;
        self.issued.set(n);
        ComponentId(format!("uid-{n}"))
    }

    /// How many ids this generator has issued.
    pub fn issued(&self) -> u64 {
        self.issued.get()
    }
}
