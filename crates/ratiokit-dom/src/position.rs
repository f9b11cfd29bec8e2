//! `compareDocumentPosition` result flags.

use bitflags::bitflags;

bitflags! {
    /// Relationship of one node to another, with the DOM bit values.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DocumentPosition: u16 {
        const DISCONNECTED = 0x01;
        const PRECEDING = 0x02;
        const FOLLOWING = 0x04;
        const CONTAINS = 0x08;
        const CONTAINED_BY = 0x10;
        const IMPLEMENTATION_SPECIFIC = 0x20;
    }
}

impl DocumentPosition {
    pub fn is_disconnected(self) -> bool {
        self.contains(DocumentPosition::DISCONNECTED)
    }
}
