use std::fmt::Debug;

/// Number of element slots in every block.
pub const BLOCK_CAPACITY: usize = 10;

/// Factor by which the block directory grows when either end runs out of room.
/// The live elements are moved into the middle third of the new directory.
pub const GROWTH_FACTOR: usize = 3;

/// Returns the number of blocks needed to hold `len` elements.
#[inline]
pub(crate) const fn blocks_for(len: usize) -> usize {
    len.div_ceil(BLOCK_CAPACITY)
}

#[derive(Copy, Clone, Debug, Default)]
pub struct FrontToBack;

#[derive(Copy, Clone, Debug, Default)]
pub struct BackToFront;

/// Selects the order in which a [`Deque`](crate::Deque) destroys its elements on `clear` and drop.
pub trait DropBehavior: seal_drop_behavior::Sealed + Debug + Copy + Default {}
pub(crate) mod seal_drop_behavior {
    pub trait Sealed {
        const IS_INVERTED: bool;
    }
}

impl DropBehavior for FrontToBack {}
impl DropBehavior for BackToFront {}

impl seal_drop_behavior::Sealed for FrontToBack {
    const IS_INVERTED: bool = false;
}
impl seal_drop_behavior::Sealed for BackToFront {
    const IS_INVERTED: bool = true;
}

/// The end of the deque that needs room.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum End {
    Front,
    Back,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_for_rounds_up() {
        assert_eq!(blocks_for(0), 0);
        assert_eq!(blocks_for(1), 1);
        assert_eq!(blocks_for(BLOCK_CAPACITY), 1);
        assert_eq!(blocks_for(BLOCK_CAPACITY + 1), 2);
        assert_eq!(blocks_for(34), 4);
    }
}
