use std::mem::size_of;

use super::block::{next_block_address, Block};
use super::is_aligned;
use super::memory_region::MemoryRegion;

#[cfg(target_pointer_width = "64")]
pub const LOG_BITS_PER_WORD: usize = 6;
#[cfg(target_pointer_width = "32")]
pub const LOG_BITS_PER_WORD: usize = 5;

/// Lines tracked by one word of the mark vector.
pub const BITS_PER_WORD: usize = size_of::<usize>() * 8;

pub const BIT_IN_WORD_MASK: usize = BITS_PER_WORD - 1;

#[inline(always)]
const fn bit_mask(bit: usize) -> usize {
    1 << bit
}

/// Index of one alignment-sized line within a covered region.
///
/// All engine arithmetic happens in line-index space; raw addresses only
/// appear at the [`Block`] boundary and in the conversion functions.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Line(pub usize);

/// Mark-and-forward bitmap over a fixed, line-quantized heap region.
///
/// Two parallel word vectors cover the same line-indexed address space:
/// `marked` holds one bit per line (set for *every* line a live block
/// spans), and `forwarding` holds, per word, the exclusive prefix sum of
/// mark popcounts of all earlier words. Together they answer
/// [`forward_address`](MarkBits::forward_address) with one table read and
/// one in-word popcount, which is what keeps sliding compaction linear.
///
/// Cycle protocol, enforced by the collector's phase structure rather than
/// by the engine: clear both vectors, mark every live block, call
/// [`compute_forwarding`](MarkBits::compute_forwarding) exactly once, then
/// forward and scan freely until the next cycle's reset.
pub struct MarkBits {
    covered: MemoryRegion,
    alignment: usize,
    bits_size: usize,
    marked: Box<[usize]>,
    forwarding: Box<[usize]>,
}

impl MarkBits {
    /// Creates an engine covering `covered`, with `alignment` bytes per line.
    ///
    /// `alignment` must be a power of two and both region bounds must fall
    /// on line boundaries; both vectors start zeroed.
    pub fn new(covered: MemoryRegion, alignment: usize) -> Self {
        assert!(
            alignment.is_power_of_two(),
            "line alignment must be a power of two: {}",
            alignment
        );
        assert!(
            covered.aligned_on(alignment),
            "region {:#x}+{:#x} is not aligned to its {} byte lines",
            covered.start(),
            covered.size(),
            alignment
        );

        let line_count = covered.size() / alignment;
        let bits_size = (line_count + BITS_PER_WORD - 1) >> LOG_BITS_PER_WORD;

        log::debug!(
            target: "gc",
            "mark bits cover {:#x}..{:#x}: {} lines of {} bytes, {} words per vector",
            covered.start(),
            covered.end(),
            line_count,
            alignment,
            bits_size
        );

        Self {
            covered,
            alignment,
            bits_size,
            marked: vec![0; bits_size].into_boxed_slice(),
            forwarding: vec![0; bits_size].into_boxed_slice(),
        }
    }

    #[inline]
    pub const fn covered(&self) -> MemoryRegion {
        self.covered
    }

    #[inline]
    pub const fn alignment(&self) -> usize {
        self.alignment
    }

    /// Words allocated for each of the two vectors.
    #[inline]
    pub const fn bits_size(&self) -> usize {
        self.bits_size
    }

    #[inline]
    pub const fn line_count(&self) -> usize {
        self.covered.size() / self.alignment
    }

    /// Line holding `addr`. `addr` must lie inside the covered region.
    #[inline]
    pub fn line_of(&self, addr: usize) -> Line {
        debug_assert!(
            self.covered.contains(addr),
            "address {:#x} is outside {:#x}..{:#x}",
            addr,
            self.covered.start(),
            self.covered.end()
        );
        Line((addr - self.covered.start()) / self.alignment)
    }

    /// Start address of `line`; exact inverse of [`line_of`](MarkBits::line_of)
    /// for line-aligned addresses.
    #[inline]
    pub const fn address_of(&self, line: Line) -> usize {
        self.covered.start() + line.0 * self.alignment
    }

    /// Flat bit-vector coordinate of `addr`: word index and bit offset
    /// within that word. Accepts the one-past-the-end address so a block
    /// span's exclusive limit has a coordinate too.
    #[inline]
    fn bit_coordinate(&self, addr: usize) -> (usize, usize) {
        debug_assert!(
            addr >= self.covered.start() && addr <= self.covered.end(),
            "address {:#x} is outside {:#x}..={:#x}",
            addr,
            self.covered.start(),
            self.covered.end()
        );
        let line = (addr - self.covered.start()) / self.alignment;
        (line >> LOG_BITS_PER_WORD, line & BIT_IN_WORD_MASK)
    }

    /// True when the line holding `addr` is marked live.
    #[inline]
    pub fn marked_p(&self, addr: usize) -> bool {
        let (index, bit) = self.bit_coordinate(addr);
        self.marked[index] & bit_mask(bit) != 0
    }

    /// Marks every line `block` spans as live.
    ///
    /// Overlapping or repeated marking is an allowed no-op: the mark vector
    /// is only ever ORed into, so double-marking cannot change it.
    pub fn set_marked_p<B: Block>(&mut self, block: &B) {
        debug_assert!(
            is_aligned(block.address(), self.alignment),
            "block at {:#x} does not start on a line boundary",
            block.address()
        );
        debug_assert!(
            block.byte_size() > 0 && is_aligned(block.byte_size(), self.alignment),
            "block size {} is not a positive multiple of {}",
            block.byte_size(),
            self.alignment
        );

        let (start_index, start_bit) = self.bit_coordinate(block.address());
        let (end_index, end_bit) = self.bit_coordinate(next_block_address(block));

        // Bits strictly below the start/end offsets within their words.
        let start_mask = bit_mask(start_bit) - 1;
        let end_mask = bit_mask(end_bit) - 1;

        if start_index == end_index {
            self.marked[start_index] |= start_mask ^ end_mask;
        } else {
            assert!(
                start_index < self.bits_size,
                "mark range begins past the bit vector: {} >= {}",
                start_index,
                self.bits_size
            );
            self.marked[start_index] |= !start_mask;

            for word in &mut self.marked[start_index + 1..end_index] {
                *word = !0;
            }

            // end_mask == 0 means the span ends exactly on a word boundary;
            // the end word belongs to the next range (or does not exist at
            // all when the block ends at the region end) and must stay
            // untouched.
            if end_mask != 0 {
                assert!(
                    end_index < self.bits_size,
                    "mark range ends past the bit vector: {} >= {}",
                    end_index,
                    self.bits_size
                );
                self.marked[end_index] |= end_mask;
            }
        }
    }

    /// Builds the rank table: for each word, the count of marked lines in
    /// all earlier words.
    ///
    /// Call exactly once per cycle, after the mark vector reached its final
    /// state and before any [`forward_address`](MarkBits::forward_address);
    /// any later marking invalidates every previously computed result.
    pub fn compute_forwarding(&mut self) {
        let mut accum = 0;
        for index in 0..self.bits_size {
            self.forwarding[index] = accum;
            accum += self.marked[index].count_ones() as usize;
        }

        log::debug!(
            target: "gc",
            "forwarding table ready: {} of {} lines live",
            accum,
            self.line_count()
        );
    }

    /// Post-compaction destination of the marked address `original`.
    ///
    /// The destination line index is the number of marked lines strictly
    /// before `original`'s line: compaction packs live lines contiguously
    /// from the region start, preserving order. Any intra-line byte offset
    /// is preserved, so interior pointers forward correctly. O(1).
    pub fn forward_address(&self, original: usize) -> usize {
        assert!(
            self.marked_p(original),
            "forwarding an unmarked address: {:#x}",
            original
        );
        let (index, bit) = self.bit_coordinate(original);
        let offset = original & (self.alignment - 1);

        let below = bit_mask(bit) - 1;
        let rank = self.forwarding[index] + (self.marked[index] & below).count_ones() as usize;

        let forwarded = self.address_of(Line(rank)) + offset;
        assert!(
            forwarded <= original,
            "compaction slid {:#x} up to {:#x}",
            original,
            forwarded
        );
        forwarded
    }

    /// Address of the first line at or after `cursor` whose mark bit equals
    /// `value`, or the region's one-past-the-end address when no such line
    /// remains.
    pub fn next_line_with(&self, value: bool, cursor: usize) -> usize {
        let (mut index, mut bit) = self.bit_coordinate(cursor);

        while index < self.bits_size {
            let residue = if value {
                self.marked[index] >> bit
            } else {
                // Arithmetic shift: the vacated high bits replicate the
                // word's top line instead of reading as clear lines that
                // belong to the next word.
                !(((self.marked[index] as isize) >> bit) as usize)
            };

            if residue != 0 {
                let line = Line((index << LOG_BITS_PER_WORD) + bit + residue.trailing_zeros() as usize);
                // The last word may carry padding bits past the region end.
                return self.address_of(line).min(self.covered.end());
            }

            bit = 0;
            index += 1;
        }

        self.covered.end()
    }

    /// Byte length of the free run starting at `cursor`, i.e. the distance
    /// to the next marked line. `cursor` must be line-aligned and itself
    /// unmarked.
    pub fn unmarked_span_size(&self, cursor: usize) -> usize {
        debug_assert!(
            is_aligned(cursor, self.alignment),
            "span cursor {:#x} is not line-aligned",
            cursor
        );
        self.next_line_with(true, cursor) - cursor
    }

    pub fn clear_mark_bits(&mut self) {
        self.marked.fill(0);
    }

    pub fn clear_forwarding(&mut self) {
        self.forwarding.fill(0);
    }
}
