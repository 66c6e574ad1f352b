/// Number of pages needed for `len` items. Zero items means zero pages.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// The 1-based `page` of `items`, clipped to what exists.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Page cursor owned by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pager {
    pub page: usize,
    pub page_size: usize,
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    pub fn next(&mut self, total_pages: usize) {
        if self.page < total_pages {
            self.page += 1;
        }
    }

    pub fn prev(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    pub fn jump(&mut self, page: usize, total_pages: usize) {
        if (1..=total_pages).contains(&page) {
            self.page = page;
        }
    }

    /// Pull the cursor back inside `[1, total_pages]` after the list shrank.
    pub fn clamp(&mut self, total_pages: usize) {
        self.page = self.page.min(total_pages).max(1);
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        paginate(items, self.page, self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fourteen_items_in_pages_of_six() {
        let items: Vec<u32> = (0..14).collect();
        assert_eq!(total_pages(items.len(), 6), 3);
        assert_eq!(paginate(&items, 1, 6), &items[0..6]);
        assert_eq!(paginate(&items, 2, 6), &items[6..12]);
        assert_eq!(paginate(&items, 3, 6), &items[12..14]);
        assert!(paginate(&items, 4, 6).is_empty());
    }

    #[test]
    fn empty_list_has_no_pages() {
        let items: Vec<u32> = Vec::new();
        assert_eq!(total_pages(0, 6), 0);
        assert!(paginate(&items, 1, 6).is_empty());
    }

    #[test]
    fn degenerate_arguments_yield_nothing() {
        let items = [1, 2, 3];
        assert!(paginate(&items, 0, 2).is_empty());
        assert!(paginate(&items, 1, 0).is_empty());
        assert_eq!(total_pages(3, 0), 0);
        assert!(paginate(&items, usize::MAX, usize::MAX).is_empty());
    }

    #[test]
    fn pager_stays_in_range() {
        let mut pager = Pager::new(6);
        pager.prev();
        assert_eq!(pager.page, 1);
        pager.next(3);
        pager.next(3);
        pager.next(3);
        assert_eq!(pager.page, 3);
        pager.jump(7, 3);
        assert_eq!(pager.page, 3);
        pager.clamp(2);
        assert_eq!(pager.page, 2);
        pager.clamp(0);
        assert_eq!(pager.page, 1);
        pager.reset();
        assert_eq!(pager.page, 1);
    }
}
