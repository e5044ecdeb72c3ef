//! Runtime view of the configured pins, kept in step with the host.
//!
//! The view holds one [`DeviceStateEntry`] per configuration, in the same
//! order. A refresh resets every entry to [`PinState::Unknown`] before asking
//! the host for fresh states, and each refresh carries a generation number so
//! that a slow response cannot overwrite the result of a later refresh.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use derive_builder::Builder;
use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::config::pin::ConfigId;
use crate::config::store::ConfigurationStore;
use crate::error::GpioControlError;
use crate::protocol::api::HostCommandApi;
use crate::protocol::messages::{BoardDescriptor, CommandParams, HostCommand};
use crate::sync::state::{DeviceStateEntry, PinState};

#[derive(Builder, Debug, Clone)]
pub struct SyncOptions {
    #[builder(default = "Duration::from_secs(5)")]
    pub fetch_timeout: Duration,
    #[builder(default = "Duration::from_secs(5)")]
    pub command_timeout: Duration,
}

impl SyncOptions {
    pub fn builder() -> SyncOptionsBuilder {
        SyncOptionsBuilder::default()
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(5),
            command_timeout: Duration::from_secs(5),
        }
    }
}

/// What became of one refresh. Purely informational: failures are already
/// logged and never reach the caller as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Every entry received a state.
    Applied,
    /// The host answered with the wrong number of states; only the
    /// overlapping entries were patched.
    Partial { applied: usize, expected: usize },
    /// A newer refresh started before this one resolved.
    Stale,
    /// The fetch failed or timed out; entries stay unknown.
    Failed,
}

#[derive(Debug, Default)]
struct View {
    entries: Vec<DeviceStateEntry>,
    /// Store revision the entries were derived from.
    revision: u64,
    generation: u64,
    boards: Vec<BoardDescriptor>,
}

#[derive(Clone)]
pub struct DeviceStateSynchronizer {
    store: ConfigurationStore,
    host: Arc<dyn HostCommandApi>,
    options: SyncOptions,
    view: Arc<RwLock<View>>,
}

impl DeviceStateSynchronizer {
    pub fn new(
        store: ConfigurationStore,
        host: Arc<dyn HostCommandApi>,
        options: SyncOptions,
    ) -> Self {
        Self {
            store,
            host,
            options,
            view: Arc::new(RwLock::new(View::default())),
        }
    }

    pub fn store(&self) -> &ConfigurationStore {
        &self.store
    }

    /// Current entries. A store change since the last rebuild resets the
    /// view to the new list, every entry unknown, without contacting the host.
    pub fn view(&self) -> Vec<DeviceStateEntry> {
        self.follow_store();
        self.view.read().entries.clone()
    }

    pub fn entry(&self, index: usize) -> Option<DeviceStateEntry> {
        self.follow_store();
        self.view.read().entries.get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.follow_store();
        self.view.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the store changed after the view was last rebuilt. Reading
    /// the view through [`view`](Self::view) clears it.
    pub fn is_stale(&self) -> bool {
        self.view.read().revision != self.store.revision()
    }

    pub fn boards(&self) -> Vec<BoardDescriptor> {
        self.view.read().boards.clone()
    }

    /// Rebuilds the view right away, every entry unknown, and returns the
    /// future that fetches and applies the host states.
    ///
    /// The reset happens on call, not on first poll, so callers observe the
    /// unknown state even if they never await the returned future.
    pub fn refresh(&self) -> impl Future<Output = RefreshOutcome> + Send + use<> {
        let generation = self.rebuild();
        let this = self.clone();
        async move { this.resolve(generation).await }
    }

    /// Fire-and-forget variant of [`refresh`](Self::refresh).
    pub fn spawn_refresh(&self) -> JoinHandle<RefreshOutcome> {
        tokio::spawn(self.refresh())
    }

    /// Refreshes after every store change until the returned task is aborted.
    pub fn watch_store(&self) -> JoinHandle<()> {
        let this = self.clone();
        let mut revisions = self.store.subscribe();
        tokio::spawn(async move {
            while revisions.changed().await.is_ok() {
                let revision = *revisions.borrow_and_update();
                debug!("Configuration revision {revision}, refreshing GPIO view");
                this.refresh().await;
            }
        })
    }

    /// Sends `turnGpioOn` for the entry at `index` and refreshes on success.
    ///
    /// Returns the outcome of the trailing refresh, or `None` when the command
    /// was not acknowledged.
    pub async fn turn_on(&self, index: usize) -> Option<RefreshOutcome> {
        self.dispatch_index(HostCommand::TurnGpioOn, index).await
    }

    pub async fn turn_off(&self, index: usize) -> Option<RefreshOutcome> {
        self.dispatch_index(HostCommand::TurnGpioOff, index).await
    }

    /// Like [`turn_on`](Self::turn_on), but resolves the index from the
    /// configuration's current position in the store.
    pub async fn turn_on_config(&self, id: ConfigId) -> Option<RefreshOutcome> {
        self.dispatch_config(HostCommand::TurnGpioOn, id).await
    }

    pub async fn turn_off_config(&self, id: ConfigId) -> Option<RefreshOutcome> {
        self.dispatch_config(HostCommand::TurnGpioOff, id).await
    }

    /// Fetches the selectable boards. Failures leave the list empty.
    pub async fn fetch_boards(&self) -> Vec<BoardDescriptor> {
        let boards = match bounded(self.options.fetch_timeout, self.host.fetch_boards()).await {
            Ok(boards) => {
                debug!("Fetched {} boards", boards.len());
                boards
            }
            Err(e) => {
                error!("Failed to fetch boards: {e}");
                vec![]
            }
        };
        self.view.write().boards = boards.clone();
        boards
    }

    /// Any fetch still in flight for the old list resolves as stale.
    fn follow_store(&self) {
        if self.is_stale() {
            self.rebuild();
        }
    }

    fn rebuild(&self) -> u64 {
        let revision = self.store.revision();
        let entries: Vec<DeviceStateEntry> = self
            .store
            .snapshot()
            .iter()
            .map(DeviceStateEntry::from)
            .collect();
        let mut view = self.view.write();
        view.entries = entries;
        view.revision = revision;
        view.generation += 1;
        debug!(
            "Rebuilt GPIO view with {} entries (generation {})",
            view.entries.len(),
            view.generation
        );
        view.generation
    }

    async fn resolve(&self, generation: u64) -> RefreshOutcome {
        match bounded(self.options.fetch_timeout, self.host.fetch_states()).await {
            Ok(states) => self.apply(generation, states),
            Err(e) => {
                error!("Failed to fetch GPIO states: {e}");
                RefreshOutcome::Failed
            }
        }
    }

    fn apply(&self, generation: u64, states: Vec<PinState>) -> RefreshOutcome {
        let mut view = self.view.write();
        if view.generation != generation {
            debug!(
                "Dropping GPIO states of generation {generation}, view is at {}",
                view.generation
            );
            return RefreshOutcome::Stale;
        }

        let expected = view.entries.len();
        let actual = states.len();
        let applied = expected.min(actual);
        for (entry, state) in view.entries.iter_mut().zip(states) {
            entry.current_state = state;
        }

        if actual == expected {
            RefreshOutcome::Applied
        } else {
            warn!("{}", GpioControlError::DataShapeMismatch { expected, actual });
            RefreshOutcome::Partial { applied, expected }
        }
    }

    async fn dispatch_index(&self, command: HostCommand, index: usize) -> Option<RefreshOutcome> {
        if index >= self.len() {
            error!("{command} rejected: {}", GpioControlError::InvalidIndex(index));
            return None;
        }
        self.dispatch(command, index).await
    }

    async fn dispatch_config(&self, command: HostCommand, id: ConfigId) -> Option<RefreshOutcome> {
        let Some(index) = self.store.position(id) else {
            error!("{command} rejected for {id}: {}", GpioControlError::UnknownConfig);
            return None;
        };
        self.dispatch(command, index).await
    }

    async fn dispatch(&self, command: HostCommand, index: usize) -> Option<RefreshOutcome> {
        let params = CommandParams::new(index);
        match bounded(
            self.options.command_timeout,
            self.host.send_command(command, params),
        )
        .await
        {
            Ok(_) => {
                info!("{command} acknowledged for GPIO entry {index}");
                Some(self.refresh().await)
            }
            Err(e) => {
                error!("{command} failed for GPIO entry {index}: {e}");
                None
            }
        }
    }
}

async fn bounded<T>(
    limit: Duration,
    request: impl Future<Output = Result<T, GpioControlError>>,
) -> Result<T, GpioControlError> {
    timeout(limit, request)
        .await
        .map_err(|_| GpioControlError::Timeout(limit))?
}
