use crate::product::Product;
use crate::source::ProductSource;
use chrono::{DateTime, Local};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};

/// Snapshot of the product store.
#[derive(Debug, Clone, Default)]
pub struct ProductState {
    pub products: Arc<Vec<Product>>,
    pub loading: bool,
    pub error: Option<String>,
    pub fetched_at: Option<DateTime<Local>>,
}

pub fn select_products(state: &ProductState) -> &[Product] {
    &state.products
}

pub fn select_loading(state: &ProductState) -> bool {
    state.loading
}

pub fn select_error(state: &ProductState) -> Option<&str> {
    state.error.as_deref()
}

/// Lifecycle of one fetch, applied to the state in order.
#[derive(Debug, Clone)]
pub enum FetchAction {
    Pending,
    Fulfilled(Vec<Product>),
    Rejected(String),
}

impl ProductState {
    /// Apply a fetch action. Rejection keeps whatever was loaded before.
    pub fn reduce(&mut self, action: FetchAction) {
        match action {
            FetchAction::Pending => {
                self.loading = true;
                self.error = None;
            }
            FetchAction::Fulfilled(products) => {
                self.loading = false;
                self.products = Arc::new(products);
                self.fetched_at = Some(Local::now());
            }
            FetchAction::Rejected(message) => {
                self.loading = false;
                self.error = Some(message);
            }
        }
    }
}

/// Notifications pushed to subscribers.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    StateChanged(ProductState),
}

/// What the dashboard needs from a store.
pub trait Store {
    /// Kick off a fetch. Completion is only observable through `subscribe`.
    fn fetch_products(&self);

    fn subscribe(&self) -> Receiver<StoreEvent>;

    fn state(&self) -> ProductState;
}

/// Product store backed by a [`ProductSource`], fetching on the tokio runtime.
#[derive(Clone)]
pub struct ProductStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    state: Mutex<ProductState>,
    subscribers: Mutex<Vec<Sender<StoreEvent>>>,
    source: Arc<dyn ProductSource>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl StoreInner {
    fn dispatch(&self, action: FetchAction) {
        let snapshot = {
            let mut state = lock(&self.state);
            state.reduce(action);
            state.clone()
        };

        // Drop subscribers whose receiver is gone.
        lock(&self.subscribers)
            .retain(|tx| tx.send(StoreEvent::StateChanged(snapshot.clone())).is_ok());
    }
}

impl ProductStore {
    pub fn new(source: Arc<dyn ProductSource>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: Mutex::new(ProductState::default()),
                subscribers: Mutex::new(Vec::new()),
                source,
            }),
        }
    }

    pub fn describe_source(&self) -> String {
        self.inner.source.describe()
    }
}

impl Store for ProductStore {
    fn fetch_products(&self) {
        self.inner.dispatch(FetchAction::Pending);

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let origin = inner.source.describe();
            match inner.source.fetch().await {
                Ok(products) => {
                    tracing::info!(count = products.len(), %origin, "products fetched");
                    inner.dispatch(FetchAction::Fulfilled(products));
                }
                Err(e) => {
                    tracing::warn!(error = %e, %origin, "product fetch failed");
                    inner.dispatch(FetchAction::Rejected(e.user_message()));
                }
            }
        });
    }

    fn subscribe(&self) -> Receiver<StoreEvent> {
        let (tx, rx) = std::sync::mpsc::channel();
        lock(&self.inner.subscribers).push(tx);
        rx
    }

    fn state(&self) -> ProductState {
        lock(&self.inner.state).clone()
    }
}
