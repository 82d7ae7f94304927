//! Per-context match sessions: a reducer-driven copy of the document kept in
//! step with its peers over a [`Transport`].
//!
//! The controller context runs an [`AuthoritativeSession`], the only session
//! allowed to originate actions, advance the clock and broadcast full-state
//! syncs. Overlay contexts run an [`ObserverSession`], which only applies what
//! it receives.
//!
//! Every change to a session's document, and the publish that follows it,
//! happens under that session's command lock. Peers therefore see actions
//! and syncs in the order the document went through them.

use std::{
    mem,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use dashmap::DashMap;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval_at, sleep},
};
use tracing::{debug, info};

use crate::{
    state::{
        match_state::{MatchEvent, MatchState},
        reducer::{Action, reduce},
    },
    sync::{
        clock::{ClearDelays, next_tick},
        transport::{EndpointId, Envelope, Subscription, Transport},
    },
};

/// Timing knobs of an authoritative session.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Period of the match clock.
    pub tick_period: Duration,
    /// Period of the full-state broadcast.
    pub sync_period: Duration,
    /// How long each kind of event stays on screen.
    pub clear_delays: ClearDelays,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_secs(1),
            sync_period: Duration::from_secs(1),
            clear_delays: ClearDelays::default(),
        }
    }
}

/// Capability shared by both session roles.
pub trait MatchSession: Send + Sync {
    /// Apply an action to the local document only.
    fn apply(&self, action: Action);

    /// Copy of the current local document.
    fn snapshot(&self) -> MatchState;

    /// Receiver notified every time the local document changes.
    fn watch(&self) -> watch::Receiver<MatchState>;
}

/// Local document plus the bookkeeping needed to apply remote envelopes.
struct SessionCore {
    state: watch::Sender<MatchState>,
    last_sync: DashMap<EndpointId, u64>,
    commands: Mutex<()>,
}

impl SessionCore {
    fn new(initial: MatchState) -> Self {
        let (state, _rx) = watch::channel(initial);
        Self {
            state,
            last_sync: DashMap::new(),
            commands: Mutex::new(()),
        }
    }

    /// Serialise a read-modify-write of the document. Never held across an `.await`.
    fn lock(&self) -> MutexGuard<'_, ()> {
        self.commands.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply(&self, action: Action) {
        let _guard = self.lock();
        self.reduce_in_place(action);
    }

    /// Caller holds the command lock.
    fn reduce_in_place(&self, action: Action) {
        self.state.send_if_modified(|current| {
            let next = reduce(current.clone(), action);
            if next == *current {
                return false;
            }
            *current = next;
            true
        });
    }

    /// Apply an envelope received from a peer, dropping syncs older than one already applied.
    fn receive(&self, envelope: Envelope) {
        let Envelope {
            origin,
            seq,
            action,
        } = envelope;
        let _guard = self.lock();

        if matches!(action, Action::SyncState(_)) {
            let mut last = self.last_sync.entry(origin).or_insert(0);
            if seq <= *last {
                debug!(%origin, seq, last = *last, "ignoring out-of-order sync");
                return;
            }
            *last = seq;
        }

        self.reduce_in_place(action);
    }

    fn snapshot(&self) -> MatchState {
        self.state.borrow().clone()
    }

    fn active_event_id(&self) -> Option<String> {
        self.state
            .borrow()
            .overlay
            .active_event
            .as_ref()
            .map(|event| event.id.clone())
    }
}

/// Applies locally, then publishes. Cloned into every task the controller spawns.
#[derive(Clone)]
struct Dispatcher {
    core: Arc<SessionCore>,
    transport: Arc<dyn Transport>,
}

impl Dispatcher {
    /// Caller holds the command lock, so publish order follows the order of local changes.
    fn apply_and_publish(&self, action: Action) {
        self.core.reduce_in_place(action.clone());
        self.transport.publish(action);
    }

    fn broadcast_snapshot(&self) {
        let _guard = self.core.lock();
        let snapshot = self.core.snapshot();
        self.transport.publish(Action::SyncState(Box::new(snapshot)));
    }

    /// Advance a running clock by one second.
    fn tick(&self) {
        let _guard = self.core.lock();
        let timer = self.core.state.borrow().timer.clone();
        if timer.is_running {
            self.apply_and_publish(Action::UpdateTimer(next_tick(&timer)));
        }
    }

    fn clear_if_active(&self, event_id: &str) {
        let _guard = self.core.lock();
        if self.core.active_event_id().as_deref() == Some(event_id) {
            debug!(event_id, "auto-clearing active event");
            self.apply_and_publish(Action::ClearEvent);
        }
    }
}

/// Session of the controller context: sole authority over the clock and the sync source.
pub struct AuthoritativeSession {
    dispatcher: Dispatcher,
    clear_delays: ClearDelays,
    tasks: Vec<JoinHandle<()>>,
    pending_clear: Mutex<Option<JoinHandle<()>>>,
}

impl AuthoritativeSession {
    /// Subscribe to the transport and start the listener, clock and sync loops.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(
        initial: MatchState,
        transport: Arc<dyn Transport>,
        settings: SessionSettings,
    ) -> Self {
        let core = Arc::new(SessionCore::new(initial));
        let subscription = transport.subscribe();
        let dispatcher = Dispatcher { core, transport };

        let tasks = vec![
            tokio::spawn(run_listener(dispatcher.core.clone(), subscription)),
            tokio::spawn(run_clock(dispatcher.clone(), settings.tick_period)),
            tokio::spawn(run_sync(dispatcher.clone(), settings.sync_period)),
        ];

        info!(
            endpoint = %dispatcher.transport.endpoint_id(),
            "authoritative session started"
        );

        Self {
            dispatcher,
            clear_delays: settings.clear_delays,
            tasks,
            pending_clear: Mutex::new(None),
        }
    }

    /// Take exclusive access to the document for a read-then-dispatch sequence.
    ///
    /// The clock, the sync loop, auto-clears and other commands wait until the
    /// returned [`Command`] is dropped.
    pub fn command(&self) -> Command<'_> {
        Command {
            session: self,
            _guard: self.dispatcher.core.lock(),
        }
    }

    /// Apply `action` locally, then publish it to every peer.
    pub fn dispatch(&self, action: Action) {
        self.command().dispatch(action);
    }

    /// Show `event` and schedule its automatic removal.
    pub fn trigger_event(&self, event: MatchEvent) {
        self.command().trigger_event(event);
    }

    /// Hide the active event now, cancelling any scheduled removal.
    pub fn clear_event(&self) {
        self.command().clear_event();
    }

    /// Stop every background task. The session keeps answering reads.
    pub fn shutdown(&self) {
        for task in &self.tasks {
            task.abort();
        }
        if let Some(pending) = self.replace_pending_clear(None) {
            pending.abort();
        }
    }

    fn replace_pending_clear(&self, next: Option<JoinHandle<()>>) -> Option<JoinHandle<()>> {
        let mut slot = self
            .pending_clear
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        mem::replace(&mut *slot, next)
    }
}

impl MatchSession for AuthoritativeSession {
    fn apply(&self, action: Action) {
        self.dispatcher.core.apply(action);
    }

    fn snapshot(&self) -> MatchState {
        self.dispatcher.core.snapshot()
    }

    fn watch(&self) -> watch::Receiver<MatchState> {
        self.dispatcher.core.state.subscribe()
    }
}

impl Drop for AuthoritativeSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Exclusive hold on the controller document.
///
/// Actions built from [`Command::state`] are dispatched before anything else
/// can change the document. Keep it to synchronous work: the guard must not
/// live across an `.await`.
pub struct Command<'a> {
    session: &'a AuthoritativeSession,
    _guard: MutexGuard<'a, ()>,
}

impl Command<'_> {
    /// Copy of the document as this command sees it.
    pub fn state(&self) -> MatchState {
        self.session.dispatcher.core.snapshot()
    }

    /// Apply `action` locally, then publish it to every peer.
    pub fn dispatch(&self, action: Action) {
        self.session.dispatcher.apply_and_publish(action);
    }

    /// Show `event` and schedule its automatic removal.
    ///
    /// A pending removal for a previous event is cancelled, so an older timer
    /// can never clear a newer event.
    pub fn trigger_event(&self, event: MatchEvent) {
        let session = self.session;
        let delay = session.clear_delays.delay_for(&event);
        let event_id = event.id.clone();
        self.dispatch(Action::TriggerEvent(event));

        if session.dispatcher.core.active_event_id().as_deref() != Some(event_id.as_str()) {
            return;
        }

        let dispatcher = session.dispatcher.clone();
        let handle = tokio::spawn(async move {
            sleep(delay).await;
            dispatcher.clear_if_active(&event_id);
        });

        if let Some(previous) = session.replace_pending_clear(Some(handle)) {
            previous.abort();
        }
    }

    /// Hide the active event now, cancelling any scheduled removal.
    pub fn clear_event(&self) {
        if let Some(previous) = self.session.replace_pending_clear(None) {
            previous.abort();
        }
        self.dispatch(Action::ClearEvent);
    }
}

/// Session of an overlay context. It has no way to publish.
pub struct ObserverSession {
    core: Arc<SessionCore>,
    listener: JoinHandle<()>,
}

impl ObserverSession {
    /// Subscribe to the transport and start applying whatever peers publish.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn join(initial: MatchState, transport: &dyn Transport) -> Self {
        let core = Arc::new(SessionCore::new(initial));
        let subscription = transport.subscribe();
        let listener = tokio::spawn(run_listener(core.clone(), subscription));
        debug!(endpoint = %transport.endpoint_id(), "observer session joined");
        Self { core, listener }
    }
}

impl MatchSession for ObserverSession {
    fn apply(&self, action: Action) {
        self.core.apply(action);
    }

    fn snapshot(&self) -> MatchState {
        self.core.snapshot()
    }

    fn watch(&self) -> watch::Receiver<MatchState> {
        self.core.state.subscribe()
    }
}

impl Drop for ObserverSession {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

async fn run_listener(core: Arc<SessionCore>, mut subscription: Subscription) {
    while let Some(envelope) = subscription.recv().await {
        core.receive(envelope);
    }
    debug!("match channel closed; listener stopped");
}

/// Advance the clock once per period while it is running. Restarting the
/// clock restarts the period, so the first second is a full second.
async fn run_clock(dispatcher: Dispatcher, period: Duration) {
    let mut changes = dispatcher.core.state.subscribe();
    let mut running = changes.borrow_and_update().timer.is_running;
    let mut ticks = interval_at(Instant::now() + period, period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticks.tick(), if running => dispatcher.tick(),
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                let now_running = changes.borrow_and_update().timer.is_running;
                if now_running && !running {
                    ticks.reset();
                }
                running = now_running;
            }
        }
    }
}

async fn run_sync(dispatcher: Dispatcher, period: Duration) {
    let mut ticks = interval_at(Instant::now() + period, period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticks.tick().await;
        dispatcher.broadcast_snapshot();
    }
}
