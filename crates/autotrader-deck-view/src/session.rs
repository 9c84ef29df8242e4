/*
[INPUT]:  Backend handle, configuration, push feed, operator commands, shutdown token
[OUTPUT]: Published DashboardState snapshots and action results
[POS]:    Session layer - the single owner of the state tree and its event loop
[UPDATE]: When a new event source or operator command is added
*/

use autotrader_deck_adapter::{
    ConnectionState, DeckBackend, HistoryWindow, PushMessage, TraderAction,
};
use chrono::{Local, Timelike};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::clock::countdown;
use crate::config::{DeckConfig, MetricsConfig};
use crate::derive::{ChartPoint, DerivedCache, TradeExtremes};
use crate::error::{ActionError, ExportError};
use crate::export::export_trades;
use crate::filter::TradeFilter;
use crate::live::updates_from_push;
use crate::model::Trade;
use crate::orchestrator::{BatchKind, BatchTicket, FetchPlan, PullBatch, run_batch};
use crate::state::{ApplyReport, DashboardState, Slice};

const BATCH_CHANNEL_CAPACITY: usize = 16;
const COMMAND_CHANNEL_CAPACITY: usize = 32;
const TICK_INTERVAL: Duration = Duration::from_secs(1);

type ActionReply = oneshot::Sender<Result<(), ActionError>>;

/// How a spawned pull batch ended
#[derive(Debug)]
pub enum BatchEvent {
    Completed(PullBatch),
    /// The batch task itself died; nothing from it is applied
    Crashed { ticket: BatchTicket, reason: String },
}

/// Operator requests accepted by a running session
#[derive(Debug)]
pub enum SessionCommand {
    Refresh,
    SetWindow(HistoryWindow),
    LoadMarketContext,
    ToggleStrategy {
        id: String,
        enabled: bool,
        reply: ActionReply,
    },
    ExecuteCycle { reply: ActionReply },
    Start { reply: ActionReply },
    Stop { reply: ActionReply },
}

/// Push client outputs consumed by the session loop
#[derive(Debug)]
pub struct PushFeed {
    pub messages: mpsc::Receiver<PushMessage>,
    pub connection: watch::Receiver<ConnectionState>,
}

/// Cloneable front door to a running session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    snapshots: watch::Receiver<DashboardState>,
}

impl SessionHandle {
    /// Latest published snapshot
    pub fn snapshot(&self) -> DashboardState {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.snapshots.clone()
    }

    pub async fn refresh(&self) {
        self.send(SessionCommand::Refresh).await;
    }

    pub async fn set_window(&self, window: HistoryWindow) {
        self.send(SessionCommand::SetWindow(window)).await;
    }

    pub async fn load_market_context(&self) {
        self.send(SessionCommand::LoadMarketContext).await;
    }

    pub async fn toggle_strategy(&self, id: &str, enabled: bool) -> Result<(), ActionError> {
        let id = id.to_string();
        self.request(|reply| SessionCommand::ToggleStrategy { id, enabled, reply })
            .await
    }

    pub async fn execute_cycle(&self) -> Result<(), ActionError> {
        self.request(|reply| SessionCommand::ExecuteCycle { reply }).await
    }

    pub async fn start(&self) -> Result<(), ActionError> {
        self.request(|reply| SessionCommand::Start { reply }).await
    }

    pub async fn stop(&self) -> Result<(), ActionError> {
        self.request(|reply| SessionCommand::Stop { reply }).await
    }

    async fn send(&self, command: SessionCommand) {
        if self.commands.send(command).await.is_err() {
            debug!("session stopped, command dropped");
        }
    }

    async fn request(
        &self,
        command: impl FnOnce(ActionReply) -> SessionCommand,
    ) -> Result<(), ActionError> {
        let (reply, response) = oneshot::channel();
        self.send(command(reply)).await;
        response.await.unwrap_or_else(|_| {
            Err(ActionError::Network {
                message: "session stopped before the action completed".to_string(),
            })
        })
    }
}

/// One dashboard session: owns the state tree, the derived-value cache and
/// every in-flight batch's return path.
///
/// All state mutation happens on the task that drives [`DashboardSession::run`]
/// (or the caller's task, for the direct methods), never inside batch tasks.
pub struct DashboardSession {
    backend: Arc<dyn DeckBackend>,
    plan: FetchPlan,
    scan_interval_minutes: u32,
    state: DashboardState,
    derived: DerivedCache,
    batch_tx: mpsc::Sender<BatchEvent>,
    batch_rx: mpsc::Receiver<BatchEvent>,
    in_flight: usize,
    command_tx: mpsc::Sender<SessionCommand>,
    command_rx: mpsc::Receiver<SessionCommand>,
    snapshot_tx: watch::Sender<DashboardState>,
    shutdown: CancellationToken,
}

impl DashboardSession {
    pub fn new(backend: Arc<dyn DeckBackend>, config: &DeckConfig) -> Self {
        let (batch_tx, batch_rx) = mpsc::channel(BATCH_CHANNEL_CAPACITY);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let state = DashboardState::new();
        let (snapshot_tx, _snapshot_rx) = watch::channel(state.clone());

        Self {
            backend,
            plan: FetchPlan::from(&config.fetch),
            scan_interval_minutes: config.schedule.scan_interval_minutes,
            state,
            derived: DerivedCache::new(config.metrics.clone()),
            batch_tx,
            batch_rx,
            in_flight: 0,
            command_tx,
            command_rx,
            snapshot_tx,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn plan(&self) -> &FetchPlan {
        &self.plan
    }

    pub fn metrics(&self) -> &MetricsConfig {
        self.derived.metrics()
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            commands: self.command_tx.clone(),
            snapshots: self.snapshot_tx.subscribe(),
        }
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Batches spawned but not yet applied or discarded
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn equity_curve(&mut self) -> &[ChartPoint] {
        self.derived.equity_curve(&self.state)
    }

    pub fn trade_extremes(&mut self) -> TradeExtremes {
        self.derived.extremes(&self.state)
    }

    pub fn filtered_trades(&mut self, filter: &TradeFilter) -> &[Trade] {
        self.derived.filtered_trades(&self.state, filter)
    }

    pub fn export(&self) -> Result<Vec<u8>, ExportError> {
        export_trades(
            self.state.positions.get(),
            self.state.activity_log.get(),
            self.derived.metrics().contract_multiplier,
        )
    }

    /// Start a main batch with the current plan
    pub fn refresh(&mut self) -> BatchTicket {
        self.spawn_batch(BatchKind::Main)
    }

    /// Switch the history window and start a new main batch.
    ///
    /// In-flight batches keep running; their results are discarded on arrival.
    pub fn set_window(&mut self, window: HistoryWindow) -> BatchTicket {
        info!(window = %window, "history window changed");
        self.plan = self.plan.clone().with_window(window);
        self.refresh()
    }

    pub fn load_market_context(&mut self) -> BatchTicket {
        self.spawn_batch(BatchKind::OnDemand)
    }

    fn spawn_batch(&mut self, kind: BatchKind) -> BatchTicket {
        let ticket = self.state.begin_batch(kind);
        let backend = Arc::clone(&self.backend);
        let plan = self.plan.clone();
        let events = self.batch_tx.clone();
        self.in_flight += 1;

        let batch = tokio::spawn(async move { run_batch(backend.as_ref(), &plan, ticket).await });
        tokio::spawn(async move {
            let event = match batch.await {
                Ok(batch) => BatchEvent::Completed(batch),
                Err(join_err) => BatchEvent::Crashed {
                    ticket,
                    reason: join_err.to_string(),
                },
            };
            if events.send(event).await.is_err() {
                debug!(batch = kind.name(), "session gone, batch result dropped");
            }
        });
        ticket
    }

    /// Apply one finished batch. A landed main batch starts the secondary one.
    pub fn apply_batch_event(&mut self, event: BatchEvent) -> Option<ApplyReport> {
        self.in_flight = self.in_flight.saturating_sub(1);
        let batch = match event {
            BatchEvent::Completed(batch) => batch,
            BatchEvent::Crashed { ticket, reason } => {
                error!(
                    batch = ticket.kind.name(),
                    generation = ticket.generation,
                    reason = %reason,
                    "pull batch task failed, keeping last known state"
                );
                return None;
            }
        };

        let kind = batch.ticket.kind;
        let report = self.state.apply_pull_batch(batch);
        if !report.discarded {
            for (endpoint, reason) in &report.unavailable {
                debug!(endpoint, reason = %reason, "slice left stale");
            }
            if kind == BatchKind::Main {
                self.spawn_batch(BatchKind::Secondary);
            }
            self.publish();
        }
        Some(report)
    }

    /// Wait for every in-flight batch, including follow-ups they trigger
    pub async fn settle(&mut self) -> Vec<ApplyReport> {
        let mut reports = Vec::new();
        while self.in_flight > 0 {
            let Some(event) = self.batch_rx.recv().await else {
                break;
            };
            reports.extend(self.apply_batch_event(event));
        }
        reports
    }

    pub fn apply_push_message(&mut self, message: &PushMessage) -> Vec<Slice> {
        let updates = updates_from_push(message);
        if updates.is_empty() {
            return Vec::new();
        }
        let slices = self.state.apply_push(updates);
        debug!(kind = message.kind(), slices = ?slices, "push applied");
        self.publish();
        slices
    }

    pub fn set_connection(&mut self, connection: ConnectionState) {
        if self.state.connection != connection {
            info!(state = ?connection, "push connection state changed");
            self.state.connection = connection;
            self.publish();
        }
    }

    /// Re-evaluate the countdown; publishes only when the text changed
    pub fn tick<T: Timelike>(&mut self, now: &T) {
        let next = countdown(now, self.scan_interval_minutes);
        if next != self.state.countdown {
            self.state.countdown = next;
            self.publish();
        }
    }

    /// Enable or disable a strategy; local rows change only on acknowledgment
    pub async fn toggle_strategy(&mut self, id: &str, enabled: bool) -> Result<(), ActionError> {
        self.perform(TraderAction::ToggleStrategy {
            id: id.to_string(),
            enabled,
        })
        .await?;
        if !self.state.set_strategy_enabled(id, enabled) {
            debug!(strategy = id, "toggled strategy not in local rows");
        }
        self.publish();
        Ok(())
    }

    /// Run one decision cycle, then refresh everything
    pub async fn execute_cycle(&mut self) -> Result<(), ActionError> {
        self.perform(TraderAction::ExecuteCycle).await?;
        self.refresh();
        Ok(())
    }

    pub async fn start(&mut self) -> Result<(), ActionError> {
        self.perform(TraderAction::Start).await?;
        self.state.set_trader_active(true);
        self.publish();
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<(), ActionError> {
        self.perform(TraderAction::Stop).await?;
        self.state.set_trader_active(false);
        self.publish();
        Ok(())
    }

    async fn perform(&self, action: TraderAction) -> Result<(), ActionError> {
        match self.backend.perform(&action).await {
            Ok(ack) if ack.success => {
                info!(action = action.name(), "action acknowledged");
                Ok(())
            }
            Ok(ack) => {
                let err = ActionError::rejected(&ack);
                warn!(action = action.name(), error = %err, "action rejected");
                Err(err)
            }
            Err(err) => {
                warn!(action = action.name(), error = %err, "action failed");
                Err(err.into())
            }
        }
    }

    async fn handle_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Refresh => {
                self.refresh();
            }
            SessionCommand::SetWindow(window) => {
                self.set_window(window);
            }
            SessionCommand::LoadMarketContext => {
                self.load_market_context();
            }
            SessionCommand::ToggleStrategy { id, enabled, reply } => {
                let _ = reply.send(self.toggle_strategy(&id, enabled).await);
            }
            SessionCommand::ExecuteCycle { reply } => {
                let _ = reply.send(self.execute_cycle().await);
            }
            SessionCommand::Start { reply } => {
                let _ = reply.send(self.start().await);
            }
            SessionCommand::Stop { reply } => {
                let _ = reply.send(self.stop().await);
            }
        }
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.state.clone());
    }

    /// Drive the session until the shutdown token is cancelled.
    ///
    /// Starts the first main batch immediately. There is no polling: new
    /// batches start only on an explicit command.
    pub async fn run(mut self, push: Option<PushFeed>) -> DashboardState {
        let (mut push_rx, mut connection_rx) = match push {
            Some(feed) => (Some(feed.messages), Some(feed.connection)),
            None => (None, None),
        };
        if let Some(connection) = connection_rx.as_ref() {
            let current = *connection.borrow();
            self.set_connection(current);
        }

        let mut ticker = tokio::time::interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.refresh();
        info!("dashboard session started");

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!(in_flight = self.in_flight, "dashboard session stopping");
                    break;
                }
                Some(event) = self.batch_rx.recv() => {
                    self.apply_batch_event(event);
                }
                message = next_push(&mut push_rx) => {
                    match message {
                        Some(message) => {
                            self.apply_push_message(&message);
                        }
                        None => {
                            debug!("push feed closed");
                            push_rx = None;
                        }
                    }
                }
                changed = next_connection(&mut connection_rx) => {
                    match changed {
                        Some(connection) => self.set_connection(connection),
                        None => {
                            connection_rx = None;
                            self.set_connection(ConnectionState::Disconnected);
                        }
                    }
                }
                Some(command) = self.command_rx.recv() => {
                    self.handle_command(command).await;
                }
                _ = ticker.tick() => {
                    self.tick(&Local::now());
                }
            }
        }

        self.state
    }
}

async fn next_push(rx: &mut Option<mpsc::Receiver<PushMessage>>) -> Option<PushMessage> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

async fn next_connection(
    rx: &mut Option<watch::Receiver<ConnectionState>>,
) -> Option<ConnectionState> {
    match rx {
        Some(rx) => match rx.changed().await {
            Ok(()) => Some(*rx.borrow_and_update()),
            Err(_) => None,
        },
        None => std::future::pending().await,
    }
}
