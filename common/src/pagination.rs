//! Abstractions for page-number pagination over an in-memory collection.

use std::num::NonZeroUsize;

/// Pagination arguments.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Arguments {
    /// 1-based number of the requested page.
    pub number: usize,

    /// Number of items on a single page.
    pub size: NonZeroUsize,
}

impl Arguments {
    /// Creates new [`Arguments`] requesting the page with the provided
    /// `number`.
    #[must_use]
    pub const fn new(number: usize, size: NonZeroUsize) -> Self {
        Self { number, size }
    }

    /// Returns these [`Arguments`] with the page number clamped into the
    /// `[1, total_pages]` range of a collection with `total` items.
    #[must_use]
    pub fn clamp(self, total: usize) -> Self {
        Self {
            number: self.number.clamp(1, total_pages(total, self.size)),
            size: self.size,
        }
    }
}

/// Returns the number of pages of `size` items required to hold `total`
/// items.
///
/// An empty collection still has a single (empty) page.
#[must_use]
pub fn total_pages(total: usize, size: NonZeroUsize) -> usize {
    total.div_ceil(size.get()).max(1)
}

/// Information about a [`Page`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PageInfo {
    /// 1-based number of the [`Page`].
    pub number: usize,

    /// Total number of pages.
    pub total_pages: usize,

    /// Total number of items in the paginated collection.
    pub total_items: usize,

    /// Indicator whether there is a page before this one.
    pub has_previous_page: bool,

    /// Indicator whether there is a page after this one.
    pub has_next_page: bool,
}

/// Slice of a collection representing a single page.
#[derive(Debug)]
pub struct Page<'a, T> {
    /// Items on this [`Page`].
    pub items: &'a [T],

    /// [`PageInfo`] of this [`Page`].
    pub info: PageInfo,
}

impl<'a, T> Page<'a, T> {
    /// Cuts a [`Page`] out of the provided `items`.
    ///
    /// Out-of-range page numbers are clamped rather than rejected.
    #[must_use]
    pub fn new(items: &'a [T], args: Arguments) -> Self {
        let Arguments { number, size } = args.clamp(items.len());
        let total_pages = total_pages(items.len(), size);

        Self {
            items: items.chunks(size.get()).nth(number - 1).unwrap_or(&[]),
            info: PageInfo {
                number,
                total_pages,
                total_items: items.len(),
                has_previous_page: number > 1,
                has_next_page: number < total_pages,
            },
        }
    }

    /// Indicates whether the paginated collection has no items at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.info.total_items == 0
    }
}

impl<T> Copy for Page<'_, T> {}
impl<T> Clone for Page<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

#[cfg(test)]
mod spec {
    use std::num::NonZeroUsize;

    use super::{total_pages, Arguments, Page};

    const SIZE: NonZeroUsize = match NonZeroUsize::new(10) {
        Some(s) => s,
        None => unreachable!(),
    };

    #[test]
    fn counts_pages() {
        assert_eq!(total_pages(0, SIZE), 1);
        assert_eq!(total_pages(1, SIZE), 1);
        assert_eq!(total_pages(10, SIZE), 1);
        assert_eq!(total_pages(11, SIZE), 2);
        assert_eq!(total_pages(25, SIZE), 3);
    }

    #[test]
    fn slices_pages() {
        let items = (1..=25).collect::<Vec<u32>>();

        let first = Page::new(&items, Arguments::new(1, SIZE));
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.items.first(), Some(&1));
        assert!(!first.info.has_previous_page);
        assert!(first.info.has_next_page);

        let last = Page::new(&items, Arguments::new(3, SIZE));
        assert_eq!(last.items, &[21, 22, 23, 24, 25]);
        assert_eq!(last.info.total_pages, 3);
        assert!(last.info.has_previous_page);
        assert!(!last.info.has_next_page);
    }

    #[test]
    fn clamps_out_of_range_pages() {
        let items = (1..=25).collect::<Vec<u32>>();

        let beyond = Page::new(&items, Arguments::new(4, SIZE));
        let last = Page::new(&items, Arguments::new(3, SIZE));
        assert_eq!(beyond.items, last.items);
        assert_eq!(beyond.info, last.info);

        let zero = Page::new(&items, Arguments::new(0, SIZE));
        assert_eq!(zero.info.number, 1);
        assert_eq!(zero.items.len(), 10);
    }

    #[test]
    fn empty_collection_has_single_empty_page() {
        let items: Vec<u32> = vec![];

        let page = Page::new(&items, Arguments::new(7, SIZE));
        assert!(page.is_empty());
        assert!(page.items.is_empty());
        assert_eq!(page.info.number, 1);
        assert_eq!(page.info.total_pages, 1);
        assert!(!page.info.has_next_page);
        assert!(!page.info.has_previous_page);
    }
}
