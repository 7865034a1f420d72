//! Search use case: text match, discount threshold, ordering.

use crate::employer::Employer;
use crate::error::Result;
use crate::repository::EmployerRepository;
use crate::sort::SortOption;
use std::sync::Arc;

/// Parameters of one search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    /// Keep only employers with at least this discount. `None` keeps all.
    pub min_discount: Option<u8>,
    pub sort: SortOption,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        SearchRequest {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_min_discount(mut self, min_discount: Option<u8>) -> Self {
        self.min_discount = min_discount;
        self
    }

    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }
}

/// Runs searches against an [`EmployerRepository`].
///
/// Cheap to clone; clones share the repository.
///
/// # Example
///
/// ```ignore
/// let use_case = SearchEmployersUseCase::new(repository);
///
/// let top_deals = use_case
///     .execute("amsterdam", Some(15), SortOption::DiscountDesc)
///     .await?;
/// ```
pub struct SearchEmployersUseCase<R: EmployerRepository> {
    repository: Arc<R>,
}

impl<R: EmployerRepository> Clone for SearchEmployersUseCase<R> {
    fn clone(&self) -> Self {
        SearchEmployersUseCase {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: EmployerRepository> SearchEmployersUseCase<R> {
    pub fn new(repository: R) -> Self {
        Self::from_shared(Arc::new(repository))
    }

    pub fn from_shared(repository: Arc<R>) -> Self {
        SearchEmployersUseCase { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Search, filter by discount and sort.
    ///
    /// 1. Trim surrounding whitespace from `query`
    /// 2. Text-match through the repository
    /// 3. Keep `discount_percentage >= min_discount` (if given)
    /// 4. Sort by `sort_by` (stable)
    ///
    /// # Errors
    ///
    /// Repository failures are returned unchanged.
    pub async fn execute(
        &self,
        query: &str,
        min_discount: Option<u8>,
        sort_by: SortOption,
    ) -> Result<Vec<Employer>> {
        let query = query.trim();
        let mut employers = self.repository.search(query).await?;

        if let Some(min) = min_discount {
            employers.retain(|e| e.discount_percentage >= min);
        }
        sort_by.sort(&mut employers);

        debug!(
            "» Search {:?} (min discount {:?}, sort {}) -> {} results",
            query,
            min_discount,
            sort_by.code(),
            employers.len()
        );
        Ok(employers)
    }

    /// Same as [`execute`](Self::execute), taking a [`SearchRequest`].
    ///
    /// # Errors
    ///
    /// Repository failures are returned unchanged.
    pub async fn execute_request(&self, request: &SearchRequest) -> Result<Vec<Employer>> {
        self.execute(&request.query, request.min_discount, request.sort)
            .await
    }
}
