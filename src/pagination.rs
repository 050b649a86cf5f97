use crate::domain::types::TypeConstraintError;

/// Page size used when the configuration does not provide one.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 5;

/// 1-indexed page of a fixed size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    per_page: usize,
}

impl PageRequest {
    pub fn new(page: usize, per_page: usize) -> Result<Self, TypeConstraintError> {
        if page == 0 || per_page == 0 {
            return Err(TypeConstraintError::NonPositivePage);
        }
        Ok(Self { page, per_page })
    }

    pub const fn page(&self) -> usize {
        self.page
    }

    pub const fn per_page(&self) -> usize {
        self.per_page
    }

    /// Zero-based index of the first row on this page.
    pub const fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// One page of results along with the size of the whole result set.
#[derive(Debug)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// Number of rows matching the query across all pages.
    pub total: usize,
    pub total_pages: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: usize) -> Self {
        Self {
            items,
            total,
            total_pages: total.div_ceil(request.per_page()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_numbers_start_at_one() {
        assert_eq!(
            PageRequest::new(0, 5),
            Err(TypeConstraintError::NonPositivePage)
        );
        assert_eq!(
            PageRequest::new(1, 0),
            Err(TypeConstraintError::NonPositivePage)
        );
    }

    #[test]
    fn offset_is_zero_indexed() {
        assert_eq!(PageRequest::new(1, 5).unwrap().offset(), 0);
        assert_eq!(PageRequest::new(3, 5).unwrap().offset(), 10);
    }

    #[test]
    fn total_pages_rounds_up() {
        let request = PageRequest::new(1, 5).unwrap();
        assert_eq!(Paginated::new(vec![1, 2, 3], request, 12).total_pages, 3);
        assert_eq!(Paginated::<i32>::new(vec![], request, 0).total_pages, 0);
    }
}
