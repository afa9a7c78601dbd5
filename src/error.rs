use std::{alloc::Layout, fmt::Display};

/// Recoverable allocation errors.
/// Element construction failures are not represented here, they are
/// returned as is by the `try_*` operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayError {
    /// Requested capacity in bytes doesn't fit in `isize`.
    CapacityOverflow { requested: usize },
    /// Global allocator returned null.
    AllocFailed { layout: Layout },
}

impl ArrayError {
    pub fn overflow(requested: usize) -> Self {
        Self::CapacityOverflow { requested }
    }

    /// Aborts or panics, the same way an infallible allocation would.
    pub(crate) fn raise(self) -> ! {
        match self {
            Self::CapacityOverflow { .. } => panic!("{}", self),
            Self::AllocFailed { layout } => std::alloc::handle_alloc_error(layout),
        }
    }
}

impl Display for ArrayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CapacityOverflow { requested } => write!(
                f,
                "Capacity of {} elements overflows the address space.",
                requested
            ),
            Self::AllocFailed { layout } => write!(
                f,
                "Allocation of {} bytes aligned to {} failed.",
                layout.size(),
                layout.align()
            ),
        }
    }
}

impl std::error::Error for ArrayError {}
