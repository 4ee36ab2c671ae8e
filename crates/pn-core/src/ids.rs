use core::fmt;
use core::num::NonZeroU32;

/// Position of a node or edge in a built network's canonical vectors.
///
/// Stored off by one in a `NonZeroU32` so `Option<Id>` (an unresolved
/// endpoint) costs nothing extra.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(NonZeroU32);

impl Id {
    pub fn from_index(index: u32) -> Self {
        Self(NonZeroU32::MIN.saturating_add(index))
    }

    /// Id of the element at `pos` in a `Vec`.
    ///
    /// Networks beyond `u32::MAX` elements saturate; the builder never
    /// produces them.
    pub fn from_usize(pos: usize) -> Self {
        Self::from_index(u32::try_from(pos).unwrap_or(u32::MAX - 1))
    }

    pub fn index(self) -> u32 {
        self.0.get() - 1
    }

    /// Back to a `Vec` position.
    pub fn pos(self) -> usize {
        self.index() as usize
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

pub type NodeIdx = Id;
pub type EdgeIdx = Id;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_survive_the_offset() {
        for pos in [0_usize, 1, 7, 65_535, 1_000_000] {
            let id = Id::from_usize(pos);
            assert_eq!(id.pos(), pos);
            assert_eq!(format!("{id}"), pos.to_string());
        }
    }

    #[test]
    fn ids_order_like_positions() {
        assert!(Id::from_usize(3) < Id::from_usize(4));
        assert_eq!(format!("{:?}", Id::from_index(2)), "#2");
    }

    #[test]
    fn unresolved_endpoint_is_free() {
        assert_eq!(core::mem::size_of::<Option<NodeIdx>>(), 4);
    }
}
