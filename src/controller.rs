//! Search session driving the use case from user input.
//!
//! Keystrokes arrive faster than searches should run, so query changes are
//! debounced and only the most recent request may publish results:
//!
//! ```text
//! submit_query("a")   ──┐ superseded
//! submit_query("am")  ──┤ superseded
//! submit_query("ams") ──┴── 300 ms quiet ──> execute ──> publish
//! ```
//!
//! Two counters keep this ordered. A settle token tracks typing: a query
//! whose token is no longer current when its debounce ends is dropped with
//! [`SearchOutcome::Superseded`]. A generation tracks searches actually
//! started: results whose generation is no longer current are discarded.
//! Only a search that runs takes a generation, so a query skipped as a
//! duplicate never cancels a search in flight. Filter, sort and
//! favorites-only changes run immediately without debouncing and absorb any
//! query still settling.
//!
//! Subscribe with [`SearchController::subscribe`] to observe [`SearchState`]
//! changes.

use crate::config::SearchConfig;
use crate::employer::Employer;
use crate::error::Error;
use crate::favorites::FavoritesStore;
use crate::repository::EmployerRepository;
use crate::sort::SortOption;
use crate::usecase::{SearchEmployersUseCase, SearchRequest};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// Published state of the search session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchState {
    pub results: Vec<Employer>,
    pub is_loading: bool,
    /// Set when the last search failed; previous results are kept.
    pub error_message: Option<String>,
}

/// What happened to one request.
#[derive(Clone, Debug)]
pub enum SearchOutcome {
    /// Results were published.
    Completed(Vec<Employer>),
    /// The search failed; the error message was published.
    Failed(Error),
    /// A newer request took over; nothing was published.
    Superseded,
    /// Same settled query as last time; nothing ran.
    Duplicate,
}

impl SearchOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, SearchOutcome::Completed(_))
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, SearchOutcome::Superseded)
    }
}

#[derive(Debug, Default)]
struct Params {
    request: SearchRequest,
    favorites_only: bool,
    last_settled_query: Option<String>,
}

/// Debounced, last-request-wins search session.
///
/// # Example
///
/// ```ignore
/// let controller = SearchController::new(use_case, favorites, SearchConfig::default());
///
/// // UI text field
/// controller.submit_query("amster").await;
///
/// // filter chip
/// controller.set_min_discount(Some(15)).await;
///
/// let state = controller.state();
/// ```
pub struct SearchController<R: EmployerRepository> {
    use_case: SearchEmployersUseCase<R>,
    favorites: Arc<FavoritesStore>,
    config: SearchConfig,
    settle: AtomicU64,
    generation: AtomicU64,
    params: Mutex<Params>,
    state: watch::Sender<SearchState>,
}

impl<R: EmployerRepository> SearchController<R> {
    pub fn new(
        use_case: SearchEmployersUseCase<R>,
        favorites: Arc<FavoritesStore>,
        config: SearchConfig,
    ) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        SearchController {
            use_case,
            favorites,
            config,
            settle: AtomicU64::new(0),
            generation: AtomicU64::new(0),
            params: Mutex::new(Params::default()),
            state,
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Parameters the next search will use.
    pub fn request(&self) -> SearchRequest {
        self.lock_params().request.clone()
    }

    pub fn favorites_only(&self) -> bool {
        self.lock_params().favorites_only
    }

    pub fn favorites(&self) -> &Arc<FavoritesStore> {
        &self.favorites
    }

    fn lock_params(&self) -> MutexGuard<'_, Params> {
        self.params.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn next_settle(&self) -> u64 {
        self.settle.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Start a search now: cancel any query still settling, mark the current
    /// query as settled and take a fresh generation.
    fn begin_immediate(&self, params: &mut Params) -> u64 {
        self.next_settle();
        params.last_settled_query = Some(params.request.query.trim().to_string());
        self.next_generation()
    }

    /// Record a new query and search once it has settled.
    ///
    /// Waits `config.debounce`; if another query or an immediate change came
    /// in meanwhile this one returns [`SearchOutcome::Superseded`]. With
    /// deduplication on, a settled query equal (after trimming) to the
    /// previous settled query returns [`SearchOutcome::Duplicate`] and leaves
    /// any search in flight alone.
    pub async fn submit_query(&self, query: &str) -> SearchOutcome {
        let token = self.next_settle();
        self.lock_params().request.query = query.to_string();

        tokio::time::sleep(self.config.debounce).await;

        let normalized = query.trim().to_string();
        let generation = {
            let mut params = self.lock_params();
            if self.settle.load(Ordering::SeqCst) != token {
                debug!("Query {:?} superseded while settling", query);
                return SearchOutcome::Superseded;
            }
            if self.config.dedupe_queries
                && params.last_settled_query.as_deref() == Some(normalized.as_str())
            {
                debug!("Query {:?} unchanged, skipping search", normalized);
                return SearchOutcome::Duplicate;
            }
            params.last_settled_query = Some(normalized);
            self.next_generation()
        };

        self.run(generation).await
    }

    /// Change the discount threshold and search immediately.
    pub async fn set_min_discount(&self, min_discount: Option<u8>) -> SearchOutcome {
        let generation = {
            let mut params = self.lock_params();
            params.request.min_discount = min_discount;
            self.begin_immediate(&mut params)
        };
        self.run(generation).await
    }

    /// Change the ordering and search immediately.
    pub async fn set_sort(&self, sort: SortOption) -> SearchOutcome {
        let generation = {
            let mut params = self.lock_params();
            params.request.sort = sort;
            self.begin_immediate(&mut params)
        };
        self.run(generation).await
    }

    /// Toggle the favorites-only view and search immediately.
    pub async fn set_favorites_only(&self, favorites_only: bool) -> SearchOutcome {
        let generation = {
            let mut params = self.lock_params();
            params.favorites_only = favorites_only;
            self.begin_immediate(&mut params)
        };
        self.run(generation).await
    }

    /// Re-run the current parameters, e.g. after a failure.
    pub async fn retry(&self) -> SearchOutcome {
        let generation = self.begin_immediate(&mut self.lock_params());
        self.run(generation).await
    }

    /// Forward the cache maintenance hook to the repository.
    pub async fn clear_expired_cache(&self) {
        self.use_case.repository().clear_expired_cache().await;
    }

    async fn run(&self, generation: u64) -> SearchOutcome {
        let (request, favorites_only) = {
            let params = self.lock_params();
            (params.request.clone(), params.favorites_only)
        };

        self.state.send_modify(|state| {
            state.is_loading = true;
            state.error_message = None;
        });

        let result = self.use_case.execute_request(&request).await;

        if !self.is_current(generation) {
            debug!("Discarding stale results for {:?}", request.query);
            return SearchOutcome::Superseded;
        }

        match result {
            Ok(employers) => {
                let employers = if favorites_only {
                    self.favorites.retain_favorites(employers)
                } else {
                    employers
                };

                self.state.send_modify(|state| {
                    state.results = employers.clone();
                    state.is_loading = false;
                    state.error_message = None;
                });
                SearchOutcome::Completed(employers)
            }
            Err(e) => {
                warn!("Search {:?} failed: {}", request.query, e);
                self.state.send_modify(|state| {
                    state.is_loading = false;
                    state.error_message = Some(e.to_string());
                });
                SearchOutcome::Failed(e)
            }
        }
    }
}
