use crate::error::DomainError;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Largest row offset a request may reach; SQL `OFFSET` is a signed 64-bit value.
const MAX_OFFSET: u64 = i64::MAX as u64;

/// Offset/limit pagination request. Pages are zero-based.
///
/// Only constructible through [`PageRequest::new`], so `size` is always in
/// `1..=MAX_PAGE_SIZE` and `page * size` never exceeds `i64::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    size: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: Option<u64>, size: Option<u64>) -> Result<Self, DomainError> {
        let size = size.unwrap_or(DEFAULT_PAGE_SIZE);
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(DomainError::validation(format!(
                "size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        let page = page.unwrap_or(0);
        if page.checked_mul(size).is_none_or(|offset| offset > MAX_OFFSET) {
            return Err(DomainError::validation(format!(
                "page {page} is out of range for size {size}"
            )));
        }

        Ok(Self { page, size })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn offset(&self) -> u64 {
        self.page * self.size
    }
}

/// One page of results plus the totals needed to navigate the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            page: request.page,
            size: request.size,
            total_items,
            total_pages: total_items.div_ceil(request.size),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let req = PageRequest::new(None, None).unwrap();
        assert_eq!(req, PageRequest::default());
        assert_eq!(req.size, 20);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_offset() {
        let req = PageRequest::new(Some(3), Some(10)).unwrap();
        assert_eq!(req.offset(), 30);
    }

    #[test]
    fn test_rejects_out_of_range_size() {
        assert!(PageRequest::new(None, Some(0)).is_err());
        assert!(PageRequest::new(None, Some(MAX_PAGE_SIZE + 1)).is_err());
        assert!(PageRequest::new(None, Some(MAX_PAGE_SIZE)).is_ok());
    }

    #[test]
    fn test_rejects_page_past_addressable_offset() {
        assert!(matches!(
            PageRequest::new(Some(u64::MAX), Some(20)),
            Err(DomainError::Validation(_))
        ));
        assert!(PageRequest::new(Some(MAX_OFFSET / 20 + 1), Some(20)).is_err());

        let last = PageRequest::new(Some(MAX_OFFSET / 20), Some(20)).unwrap();
        assert!(last.offset() <= MAX_OFFSET);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let req = PageRequest::new(Some(0), Some(20)).unwrap();
        assert_eq!(Page::new(Vec::<u8>::new(), req, 0).total_pages, 0);
        assert_eq!(Page::new(Vec::<u8>::new(), req, 20).total_pages, 1);
        assert_eq!(Page::new(Vec::<u8>::new(), req, 41).total_pages, 3);
    }
}
