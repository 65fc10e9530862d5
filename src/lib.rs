//! Mark-and-forward bitmap engine for sliding compaction.
//!
//! One [`MarkBits`] instance covers a fixed, line-quantized heap region for
//! the duration of a single stop-the-world collection cycle. The tracer marks
//! live blocks into it, the compactor asks it where each live address lands
//! after all live lines are slid down to the region start, and the sweeper
//! walks live/free runs through it without materializing them.

pub mod heap;

pub use heap::block::{next_block_address, Block};
pub use heap::mark_bits::{Line, MarkBits, BITS_PER_WORD};
pub use heap::memory_region::MemoryRegion;
