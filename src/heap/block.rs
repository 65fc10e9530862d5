/// Capability the engine needs from a heap block.
///
/// The engine never looks inside a block; it only needs where the block
/// starts and how many bytes it spans. Both are constrained by the line
/// quantum of the covering [`MarkBits`](super::mark_bits::MarkBits):
/// `address()` must be line-aligned and `byte_size()` must be a positive
/// multiple of the line alignment. Upholding that is the object
/// representation's contract, checked by the engine in debug builds.
pub trait Block {
    /// Line-aligned start address of this block.
    fn address(&self) -> usize;

    /// Size of this block in bytes.
    fn byte_size(&self) -> usize;
}

/// The line-aligned address immediately after `block`'s span.
#[inline]
pub fn next_block_address<B: Block>(block: &B) -> usize {
    block.address() + block.byte_size()
}
