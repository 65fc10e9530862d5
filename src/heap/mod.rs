pub mod block;
pub mod mark_bits;
pub mod memory_region;

#[inline(always)]
pub const fn align_down(addr: usize, align: usize) -> usize {
    addr & !align.wrapping_sub(1)
}

#[inline(always)]
pub const fn align_up(addr: usize, align: usize) -> usize {
    addr.wrapping_add(align).wrapping_sub(1) & !align.wrapping_sub(1)
}

#[inline(always)]
pub const fn is_aligned(addr: usize, align: usize) -> bool {
    addr & align.wrapping_sub(1) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_helpers() {
        assert_eq!(align_down(0x1037, 16), 0x1030);
        assert_eq!(align_up(0x1031, 16), 0x1040);
        assert_eq!(align_up(0x1040, 16), 0x1040);
        assert!(is_aligned(0x1040, 16));
        assert!(!is_aligned(0x1041, 16));
    }
}
