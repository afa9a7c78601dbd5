//! Instrumented elements for tests.

use std::{cell::Cell, fmt, rc::Rc};

/// Counts live [`Tracked`] values and arms clone failures.
pub struct Census {
    live: Cell<usize>,
    clones_left: Cell<Option<usize>>,
}

impl Census {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            live: Cell::new(0),
            clones_left: Cell::new(None),
        })
    }

    pub fn live(&self) -> usize {
        self.live.get()
    }

    /// The clone after `n` successful ones panics.
    pub fn fail_clones_after(&self, n: usize) {
        self.clones_left.set(Some(n));
    }

    pub fn track(self: &Rc<Self>, value: u32) -> Tracked {
        self.live.set(self.live.get() + 1);
        Tracked {
            value,
            census: self.clone(),
        }
    }
}

/// Element that reports its construction and drop to a [`Census`].
pub struct Tracked {
    pub value: u32,
    census: Rc<Census>,
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        match self.census.clones_left.get() {
            Some(0) => panic!("clone failure"),
            Some(n) => self.census.clones_left.set(Some(n - 1)),
            None => (),
        }
        self.census.track(self.value)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        let live = self.census.live.get();
        assert!(live > 0, "Double drop of {}", self.value);
        self.census.live.set(live - 1);
    }
}

impl fmt::Debug for Tracked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
