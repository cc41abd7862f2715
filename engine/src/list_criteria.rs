use crate::pagination::Pagination;

/// Bit identifying the kind of a filter. Two filters with the same tag
/// cannot both be applied to one listing.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Tag {
    One = 1,
    Two = 2,
    Four = 4,
    Eight = 8,
}

pub trait ListFilter: Sized {
    type Criteria;

    fn tag(&self) -> Tag;
    fn criteria(pagination: Pagination, default_page_size: u64) -> Self::Criteria;
}

/// Pagination plus the filters applied to a listing, in the order they were added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCriteria<T> {
    pagination: Pagination,
    default_page_size: u64,
    filters: Vec<T>,
    applied: u8,
}

impl<T> ListCriteria<T> {
    pub fn new(pagination: Pagination, default_page_size: u64) -> Self {
        Self {
            pagination,
            default_page_size,
            filters: Vec::new(),
            applied: 0,
        }
    }

    /// 1-based page, page 0 is treated as the first page.
    pub fn page(&self) -> u64 {
        self.pagination.page.max(1)
    }

    pub fn page_size(&self) -> u64 {
        self.pagination.page_size.unwrap_or(self.default_page_size)
    }

    /// Number of items to skip to reach the requested page, `None` on overflow.
    pub fn offset(&self) -> Option<u64> {
        (self.page() - 1).checked_mul(self.page_size())
    }

    pub fn filters(&self) -> &[T] {
        &self.filters
    }
}

impl<T> ListCriteria<T>
where
    T: ListFilter,
{
    /// Applies `filter` unless a filter with the same tag was already applied.
    pub fn add(&mut self, filter: T) -> &mut Self {
        let tag = filter.tag() as u8;

        if tag & self.applied == 0 {
            self.applied |= tag;
            self.filters.push(filter);
        }

        self
    }

    pub fn with(mut self, filter: T) -> Self {
        self.add(filter);
        self
    }

    pub fn with_opt(self, filter: Option<T>) -> Self {
        match filter {
            Some(f) => self.with(f),
            None => self,
        }
    }
}
