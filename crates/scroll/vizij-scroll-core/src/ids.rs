//! Identifiers and simple allocators for core entities.

use serde::{Deserialize, Serialize};

/// Handle returned by `Choreographer::register`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectionId(pub u32);

/// Opaque element key (small string) the host resolves to a real element.
pub type TargetHandle = String;

/// Monotonic allocator for SectionId.
/// Ids are never reused within one allocator, so a stale handle can't alias a
/// newer section.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_section: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_section(&mut self) -> SectionId {
        let id = SectionId(self.next_section);
        self.next_section = self.next_section.wrapping_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_section(), SectionId(0));
        assert_eq!(alloc.alloc_section(), SectionId(1));
        assert_eq!(alloc.alloc_section(), SectionId(2));
    }
}
