//! Single-resource async fetch with loading/success/error state.
//!
//! A `Query<T>` owns a fetcher closure. `fetch()` spawns it on tokio and the
//! result is picked up by `poll()` on the next tick (or awaited with
//! `wait()`). Detail views hold one per record; the category list holds one
//! with a long stale time.
//!
//! ```ignore
//! let api = api_client.clone();
//! let mut query = Query::new(move || {
//!   let api = api.clone();
//!   async move { api.get_user(5).await.map_err(|e| e.to_string()) }
//! });
//! query.fetch();
//!
//! // every tick
//! if query.poll() {
//!   // redraw
//! }
//! ```

use std::future::Future;
use std::time::{Duration, Instant};

use futures::future::{BoxFuture, FutureExt};
use tokio::sync::oneshot;

type QueryResult<T> = Result<T, String>;
type Fetcher<T> = Box<dyn Fn() -> BoxFuture<'static, QueryResult<T>> + Send + Sync>;

#[derive(Debug, Clone)]
pub enum QueryState<T> {
  /// Never fetched, or reset
  Idle,
  Loading,
  Success(T),
  Error(String),
}

impl<T> QueryState<T> {
  pub fn is_loading(&self) -> bool {
    matches!(self, QueryState::Loading)
  }

  pub fn data(&self) -> Option<&T> {
    match self {
      QueryState::Success(data) => Some(data),
      _ => None,
    }
  }

  pub fn error(&self) -> Option<&str> {
    match self {
      QueryState::Error(e) => Some(e),
      _ => None,
    }
  }
}

pub struct Query<T> {
  state: QueryState<T>,
  fetcher: Fetcher<T>,
  pending: Option<oneshot::Receiver<QueryResult<T>>>,
  fetched_at: Option<Instant>,
  stale_time: Duration,
}

impl<T: Send + 'static> Query<T> {
  pub fn new<F, Fut>(fetcher: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = QueryResult<T>> + Send + 'static,
  {
    Self {
      state: QueryState::Idle,
      fetcher: Box::new(move || fetcher().boxed()),
      pending: None,
      fetched_at: None,
      stale_time: Duration::from_secs(60),
    }
  }

  /// How long a successful result counts as fresh (default one minute)
  pub fn with_stale_time(mut self, duration: Duration) -> Self {
    self.stale_time = duration;
    self
  }

  pub fn state(&self) -> &QueryState<T> {
    &self.state
  }

  pub fn data(&self) -> Option<&T> {
    self.state.data()
  }

  pub fn is_loading(&self) -> bool {
    self.state.is_loading()
  }

  pub fn error(&self) -> Option<&str> {
    self.state.error()
  }

  /// Successful data older than the stale time. Other states are never stale.
  pub fn is_stale(&self) -> bool {
    match (&self.state, self.fetched_at) {
      (QueryState::Success(_), Some(at)) => at.elapsed() >= self.stale_time,
      _ => false,
    }
  }

  /// Start fetching unless a fetch is already running.
  pub fn fetch(&mut self) {
    if !self.is_loading() {
      self.start();
    }
  }

  /// Start a new fetch, disowning any running one.
  pub fn refetch(&mut self) {
    self.start();
  }

  /// Apply a finished fetch. Returns `true` if the state changed.
  pub fn poll(&mut self) -> bool {
    let Some(rx) = self.pending.as_mut() else {
      return false;
    };

    match rx.try_recv() {
      Ok(result) => self.finish(Some(result)),
      Err(oneshot::error::TryRecvError::Empty) => return false,
      Err(oneshot::error::TryRecvError::Closed) => self.finish(None),
    }
    true
  }

  /// Wait for the running fetch. Returns `false` if nothing was running.
  pub async fn wait(&mut self) -> bool {
    let Some(rx) = self.pending.take() else {
      return false;
    };
    self.finish(rx.await.ok());
    true
  }

  /// Back to `Idle`, dropping data and any running fetch.
  pub fn reset(&mut self) {
    self.pending = None;
    self.state = QueryState::Idle;
    self.fetched_at = None;
  }

  fn start(&mut self) {
    let (tx, rx) = oneshot::channel();
    // Dropping the old receiver disowns the old task's result
    self.pending = Some(rx);
    self.state = QueryState::Loading;

    let future = (self.fetcher)();
    tokio::spawn(async move {
      let _ = tx.send(future.await);
    });
  }

  fn finish(&mut self, result: Option<QueryResult<T>>) {
    self.pending = None;
    self.state = match result {
      Some(Ok(data)) => {
        self.fetched_at = Some(Instant::now());
        QueryState::Success(data)
      }
      Some(Err(error)) => QueryState::Error(error),
      None => QueryState::Error("Request was dropped".to_string()),
    };
  }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Query<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Query")
      .field("state", &self.state)
      .field("fetched_at", &self.fetched_at)
      .finish_non_exhaustive()
  }
}
