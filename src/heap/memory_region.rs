use super::is_aligned;

/// A contiguous range of heap addresses, `[start, start + size)`.
///
/// Immutable once created; one `MemoryRegion` describes the range a
/// [`MarkBits`](super::mark_bits::MarkBits) instance covers for its whole
/// lifetime.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MemoryRegion {
    start: usize,
    size: usize,
}

impl MemoryRegion {
    pub const fn new(start: usize, size: usize) -> Self {
        Self { start, size }
    }

    #[inline]
    pub const fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// One past the last covered address.
    #[inline]
    pub const fn end(&self) -> usize {
        self.start + self.size
    }

    #[inline]
    pub const fn contains(&self, addr: usize) -> bool {
        addr >= self.start && addr < self.end()
    }

    /// True when both bounds fall on `align` boundaries.
    #[inline]
    pub const fn aligned_on(&self, align: usize) -> bool {
        is_aligned(self.start, align) && is_aligned(self.size, align)
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryRegion;

    #[test]
    fn bounds_and_containment() {
        let region = MemoryRegion::new(0x1000, 0x400);
        assert_eq!(region.end(), 0x1400);
        assert!(region.contains(0x1000));
        assert!(region.contains(0x13ff));
        assert!(!region.contains(0x1400));
        assert!(!region.contains(0xfff));
        assert!(region.aligned_on(16));
        assert!(!region.aligned_on(0x2000));
    }
}
