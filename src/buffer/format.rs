//! Page formatters - initial content for freshly allocated blocks.

use crate::storage::Page;

/// Initializes the content of a newly allocated block.
///
/// Invoked only from [`BufferPool::pin_new`](crate::buffer::BufferPool::pin_new):
/// the pool allocates the block, hands the formatter a fresh page, and writes
/// the formatted image through the store so disk and memory agree from the
/// start. Record layouts, headers and the like belong to the formatter's
/// implementer, not to the pool.
pub trait PageFormatter {
    /// Initialize `page` in place for a freshly allocated block.
    fn format(&self, page: &mut Page);
}

/// Formatter that leaves the block zeroed.
///
/// Allocation already zeroes the block on disk, so this formats to the same
/// image. Useful as a placeholder wherever no real layout exists yet.
pub struct ZeroFormatter;

impl PageFormatter for ZeroFormatter {
    fn format(&self, page: &mut Page) {
        page.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StampFormatter(u32);

    impl PageFormatter for StampFormatter {
        fn format(&self, page: &mut Page) {
            page.write_u32(0, self.0);
        }
    }

    #[test]
    fn test_zero_formatter() {
        let mut page = Page::new();
        page.as_mut_slice()[10] = 0xFF;

        ZeroFormatter.format(&mut page);
        assert_eq!(page.as_slice()[10], 0);
    }

    #[test]
    fn test_custom_formatter() {
        let mut page = Page::new();
        StampFormatter(0xCAFE).format(&mut page);
        assert_eq!(page.read_u32(0), 0xCAFE);
    }
}
