//! Offset pagination for product listings.

/// Hard upper bound on the number of products returned by one listing.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// A `skip`/`limit` window over products ordered by id.
///
/// `limit` is clamped to [`MAX_PAGE_LIMIT`] on construction; oversized
/// requests are reduced, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    skip: u32,
    limit: u32,
}

impl Page {
    pub fn new(skip: u32, limit: u32) -> Self {
        Self {
            skip,
            limit: limit.min(MAX_PAGE_LIMIT),
        }
    }

    pub fn skip(&self) -> u32 {
        self.skip
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Apply the window to an already ordered sequence.
    pub fn slice<I>(&self, items: I) -> impl Iterator<Item = I::Item>
    where
        I: IntoIterator,
    {
        items
            .into_iter()
            .skip(self.skip as usize)
            .take(self.limit as usize)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, MAX_PAGE_LIMIT)
    }
}
