//! Central dispatch engine
//!
//! Sole writer of [`AppState`]. Updates are handled one at a time to
//! completion, including any fetch a reducer awaits, so no two updates ever
//! see the state half-written. Snapshots leave the engine behind `Arc` and
//! are never mutated afterwards: the next update copies on write.
//!
//! Lifecycle: [`DispatchEngine::init`] → [`DispatchEngine::handle`]* →
//! [`DispatchEngine::teardown`], or all three via [`DispatchEngine::run`].

use heddwch_common::config::{FinalAnswerPolicy, TomlConfig};
use heddwch_common::events::{Broadcast, InternalMessage, MessageBus, Update};
use heddwch_common::state::{ActivePage, AppState, DebuggingInfo, PageId};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::debug_log::{DebugLogStore, DebugRecorder};
use crate::feed::ClaimFeed;
use crate::history::{HistoryStack, NavigationHistory};
use crate::reducers::{
    self, fact_or_fiction, headlines, index, social_media_post_reviewer, Effect,
    ReducerContext, RenderAction, UpdateResponse,
};

/// Engine tunables taken from the configuration file
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub final_answer: FinalAnswerPolicy,
    pub debug_log_max_entries: usize,
    pub history_max_entries: usize,
    /// Page made active by `init`
    pub initial_page: PageId,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from(&TomlConfig::default())
    }
}

impl From<&TomlConfig> for EngineSettings {
    fn from(config: &TomlConfig) -> Self {
        Self {
            final_answer: config.final_answer,
            debug_log_max_entries: config.debug_log_max_entries,
            history_max_entries: config.history_max_entries,
            initial_page: config.initial_page,
        }
    }
}

/// What became of one update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// State snapshot broadcast to renderers
    Rerendered,
    /// Handled (state may have changed) without a broadcast
    Silent,
    /// Addressed to a page that is not active; nothing happened
    Dropped,
}

pub struct DispatchEngine {
    state: Arc<AppState>,
    recorder: DebugRecorder,
    feed: Arc<dyn ClaimFeed>,
    rng: Box<dyn RngCore + Send>,
    history: Box<dyn NavigationHistory>,
    debug_store: Arc<dyn DebugLogStore>,
    broadcasts: MessageBus<Broadcast>,
    settings: EngineSettings,
    /// Last fire-and-forget save of the debug log
    pending_persist: Option<JoinHandle<()>>,
}

impl DispatchEngine {
    pub fn new(
        feed: Arc<dyn ClaimFeed>,
        debug_store: Arc<dyn DebugLogStore>,
        broadcasts: MessageBus<Broadcast>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            state: Arc::new(AppState::default()),
            recorder: DebugRecorder::new(settings.debug_log_max_entries),
            feed,
            rng: Box::new(StdRng::from_entropy()),
            history: Box::new(HistoryStack::with_max_entries(settings.history_max_entries)),
            debug_store,
            broadcasts,
            settings,
            pending_persist: None,
        }
    }

    /// Replace the random source (claim sampling, headline scores)
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn with_history(mut self, history: impl NavigationHistory + 'static) -> Self {
        self.history = Box::new(history);
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn active_page(&self) -> &ActivePage {
        &self.state.active_page
    }

    pub fn debugging_info(&self) -> Arc<DebuggingInfo> {
        self.recorder.snapshot()
    }

    /// Restore the persisted log, load the initial page and announce readiness
    pub async fn init(&mut self) {
        if let Some(restored) = self.debug_store.load().await {
            info!(
                "Restored {} debug log entries",
                restored.event_log.len()
            );
            self.recorder.merge_restored(restored);
        }

        let initial = self.settings.initial_page;
        if initial != self.state.active_page.kind() {
            let loaded = {
                let mut ctx = self.reducer_context();
                reducers::initial_page(initial, &mut ctx).await
            };
            match loaded {
                Ok(page) => Arc::make_mut(&mut self.state).active_page = page,
                Err(e) => warn!(
                    "Could not load initial page {}, staying on {}: {}",
                    initial,
                    self.state.active_page.kind(),
                    e
                ),
            }
        }

        self.history.replace(self.state.active_page.clone());
        self.broadcasts.publish_lossy(Broadcast::ReadyToRender);
        info!("Dispatch engine ready on page {}", self.state.active_page.kind());
    }

    /// Process one update to completion
    pub async fn handle(&mut self, update: Update) -> DispatchOutcome {
        let entry = update.log_entry();
        debug!("Dispatching {}", entry);
        if let Err(e) = self.recorder.append(entry) {
            warn!("Debug log append failed, continuing: {}", e);
        }

        match update {
            Update::Internal(message) => self.handle_internal(message).await,
            update => self.handle_page(update).await,
        }
    }

    async fn handle_page(&mut self, update: Update) -> DispatchOutcome {
        let current = self.state.active_page.clone();
        let mut ctx = self.reducer_context();

        let response: UpdateResponse<ActivePage> = match (update, current) {
            (Update::FactOrFiction(message), ActivePage::FactOrFiction(state)) => {
                fact_or_fiction::update(message, state, &mut ctx)
                    .await
                    .map(ActivePage::FactOrFiction)
            }
            (Update::Headlines(message), ActivePage::Headlines(state)) => {
                headlines::update(message, state).map(ActivePage::Headlines)
            }
            (Update::Index(message), ActivePage::Index(state)) => {
                index::update(message, state).map(ActivePage::Index)
            }
            (
                Update::SocialMediaPostReviewer(message),
                ActivePage::SocialMediaPostReviewer(state),
            ) => social_media_post_reviewer::update(message, state)
                .map(ActivePage::SocialMediaPostReviewer),
            (update, active) => {
                debug!(
                    "Dropping stale {} message: active page is {}",
                    update.page(),
                    active.kind()
                );
                return DispatchOutcome::Dropped;
            }
        };

        for effect in response.effects {
            self.apply_effect(effect);
        }
        Arc::make_mut(&mut self.state).active_page = response.state;

        match response.render_action {
            RenderAction::Rerender => {
                self.rebroadcast();
                DispatchOutcome::Rerendered
            }
            RenderAction::DoNotRerender => DispatchOutcome::Silent,
        }
    }

    async fn handle_internal(&mut self, message: InternalMessage) -> DispatchOutcome {
        match message {
            InternalMessage::ReadyToRender | InternalMessage::Noop => {}
            InternalMessage::SetDebuggingInfo { info } => {
                match serde_json::from_value::<DebuggingInfo>(info) {
                    Ok(info) => self.recorder.replace(info),
                    Err(e) => warn!("Ignoring malformed debugging info: {}", e),
                }
            }
            InternalMessage::AddOpenGraphData {
                review_url,
                open_graph_data,
            } => {
                Arc::make_mut(&mut self.state)
                    .claims_open_graph_data
                    .insert(review_url, open_graph_data);
                return DispatchOutcome::Silent;
            }
            InternalMessage::MergeOpenGraphData { open_graph_data } => {
                debug!("Merging OpenGraph data for {} reviews", open_graph_data.len());
                Arc::make_mut(&mut self.state)
                    .claims_open_graph_data
                    .extend(open_graph_data);
                return DispatchOutcome::Silent;
            }
            InternalMessage::LoadPage { page } => {
                let loaded = {
                    let mut ctx = self.reducer_context();
                    reducers::initial_page(page, &mut ctx).await
                };
                match loaded {
                    Ok(active) => {
                        self.history.push(active.clone());
                        Arc::make_mut(&mut self.state).active_page = active;
                    }
                    Err(e) => {
                        error!("Could not load page {}: {}", page, e);
                        return DispatchOutcome::Silent;
                    }
                }
            }
            InternalMessage::NavigateBack => {
                if let Some(page) = self.history.back() {
                    Arc::make_mut(&mut self.state).active_page = page;
                }
            }
            InternalMessage::NavigateForward => {
                if let Some(page) = self.history.forward() {
                    Arc::make_mut(&mut self.state).active_page = page;
                }
            }
        }

        self.rebroadcast();
        DispatchOutcome::Rerendered
    }

    fn reducer_context(&mut self) -> ReducerContext<'_> {
        ReducerContext {
            feed: self.feed.as_ref(),
            rng: &mut *self.rng,
            final_answer: self.settings.final_answer,
        }
    }

    fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::PushHistory(page) => self.history.push(page),
            Effect::ReplaceHistory(page) => self.history.replace(page),
        }
    }

    /// Broadcast the current snapshot, then persist the log in the background
    fn rebroadcast(&mut self) {
        let debugging_info = self.recorder.snapshot();
        self.broadcasts.publish_lossy(Broadcast::Rerender {
            state: Arc::clone(&self.state),
            debugging_info: Arc::clone(&debugging_info),
        });
        self.persist(debugging_info);
    }

    fn persist(&mut self, info: Arc<DebuggingInfo>) {
        let store = Arc::clone(&self.debug_store);
        let previous = self.pending_persist.take();
        // Saves are chained so an older snapshot never lands after a newer one
        self.pending_persist = Some(tokio::spawn(async move {
            if let Some(previous) = previous {
                if let Err(e) = previous.await {
                    warn!("Debug log save task failed: {}", e);
                }
            }
            if let Err(e) = store.save(&info).await {
                warn!("Could not persist debug log: {}", e);
            }
        }));
    }

    /// Wait for outstanding saves and persist the final log
    pub async fn teardown(&mut self) {
        if let Some(pending) = self.pending_persist.take() {
            if let Err(e) = pending.await {
                warn!("Debug log save task failed: {}", e);
            }
        }
        if let Err(e) = self.debug_store.save(&self.recorder.snapshot()).await {
            warn!("Could not persist final debug log: {}", e);
        }
        info!(
            "Dispatch engine stopped with {} debug log entries",
            self.recorder.len()
        );
    }

    /// Handle updates from `updates` until `shutdown` fires or the bus closes
    pub async fn run(
        mut self,
        mut updates: broadcast::Receiver<Update>,
        shutdown: CancellationToken,
    ) -> Self {
        self.init().await;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Dispatch engine shutting down");
                    break;
                }
                received = updates.recv() => match received {
                    Ok(update) => {
                        self.handle(update).await;
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Dispatch engine lagged, {} updates dropped", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        info!("Updates bus closed");
                        break;
                    }
                }
            }
        }

        self.teardown().await;
        self
    }
}
