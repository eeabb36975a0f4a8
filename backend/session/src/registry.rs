//! Active Editing Session Registry.
//!
//! Opens sessions, serializes activations per session, performs delivery on
//! commit and expires idle sessions.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use embedtool_core::{Delivery, EmbedDraft, Rgb, SessionMode, UserIdentity};
use embedtool_logging::{SessionEvent, SessionEventLogger};
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{info, warn};

use crate::error::SessionError;
use crate::machine::{Commit, Session, SessionContext, Step};
use crate::render::{RenderInstruction, Reply, TerminationResult};
use crate::sink::PresentationSink;
use crate::types::{ControlActivation, SessionId};

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(180);

#[derive(Debug, Clone)]
pub struct RegistrySettings {
    pub idle_timeout: Duration,
    /// Color of starter drafts and of edit sessions whose message has no embed.
    pub default_color: Rgb,
    pub max_sessions: Option<usize>,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            default_color: Rgb::new(0x5865F2),
            max_sessions: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenRequest {
    pub mode: SessionMode,
    pub invoker: UserIdentity,
}

#[derive(Debug, Clone)]
pub struct SessionHandle {
    pub id: SessionId,
    pub render: RenderInstruction,
}

struct SessionEntry {
    session: Mutex<Session>,
    /// Set once by whoever ends the session first: commit, cancel or timeout.
    closed: AtomicBool,
    /// Milliseconds since the registry epoch of the last activation.
    last_activity: AtomicU64,
    last_render: Mutex<RenderInstruction>,
}

impl SessionEntry {
    fn close(&self) -> bool {
        !self.closed.swap(true, Ordering::AcqRel)
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

struct Inner {
    sessions: RwLock<HashMap<SessionId, Arc<SessionEntry>>>,
    delivery: Arc<dyn Delivery>,
    sink: Arc<dyn PresentationSink>,
    context: SessionContext,
    settings: RegistrySettings,
    epoch: Instant,
}

impl Inner {
    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    fn touch(&self, entry: &SessionEntry) {
        entry.last_activity.store(self.now_ms(), Ordering::Release);
    }

    fn idle_for(&self, entry: &SessionEntry) -> Duration {
        let last = entry.last_activity.load(Ordering::Acquire);
        Duration::from_millis(self.now_ms().saturating_sub(last))
    }
}

/// Manages every live editing session.
#[derive(Clone)]
pub struct SessionRegistry {
    inner: Arc<Inner>,
}

impl SessionRegistry {
    pub fn new(
        context: SessionContext,
        delivery: Arc<dyn Delivery>,
        sink: Arc<dyn PresentationSink>,
        settings: RegistrySettings,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                sessions: RwLock::new(HashMap::new()),
                delivery,
                sink,
                context,
                settings,
                epoch: Instant::now(),
            }),
        }
    }

    pub fn settings(&self) -> &RegistrySettings {
        &self.inner.settings
    }

    pub async fn len(&self) -> usize {
        self.inner.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn contains(&self, id: SessionId) -> bool {
        self.inner.sessions.read().await.contains_key(&id)
    }

    /// Open a session. Edit sessions are refused with `Permission` unless the
    /// target message was authored by the bot; no session exists afterwards.
    pub async fn open(&self, request: OpenRequest) -> Result<SessionHandle, SessionError> {
        if let Some(limit) = self.inner.settings.max_sessions {
            if self.len().await >= limit {
                return Err(SessionError::TooManySessions { limit });
            }
        }

        let draft = self.seed_draft(&request.mode).await?;
        let id = SessionId::new();
        let session = Session::new(id, request.mode, draft, request.invoker.clone(), &self.inner.context);
        let render = session.render();
        let entry = Arc::new(SessionEntry {
            session: Mutex::new(session),
            closed: AtomicBool::new(false),
            last_activity: AtomicU64::new(self.inner.now_ms()),
            last_render: Mutex::new(render.clone()),
        });

        self.inner.sessions.write().await.insert(id, entry.clone());
        info!("[Sessions] Opened {} ({}) for user {}", id, request.mode, request.invoker.id);
        SessionEventLogger::log_event(
            &id.to_string(),
            SessionEvent::Opened { mode: request.mode.to_string(), invoker_id: request.invoker.id },
        );
        self.spawn_watchdog(id, entry);

        Ok(SessionHandle { id, render })
    }

    async fn seed_draft(&self, mode: &SessionMode) -> Result<EmbedDraft, SessionError> {
        let color = self.inner.settings.default_color;
        match mode {
            SessionMode::NewSend { .. } => Ok(EmbedDraft::starter(color)),
            SessionMode::EditExisting { message } => {
                let existing = self.inner.delivery.fetch_message(message).await?;
                if existing.author_id != self.inner.delivery.self_id() {
                    warn!("[Sessions] Refusing to edit {} authored by {}", message, existing.author_id);
                    return Err(SessionError::Permission);
                }
                Ok(existing.embed.unwrap_or_else(|| EmbedDraft::empty(color)))
            }
        }
    }

    /// Route one activation to its session and return what to show.
    pub async fn activate(&self, id: SessionId, activation: ControlActivation) -> Result<Reply, SessionError> {
        let entry = self
            .inner
            .sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(SessionError::Terminated)?;

        let control = activation.control;
        let mut session = entry.session.lock().await;
        if entry.is_closed() {
            session.expire();
        }
        self.inner.touch(&entry);
        let step = session.handle_control_activation(activation)?;
        let sid = id.to_string();

        match step {
            Step::Commit(commit) => {
                if !entry.close() {
                    return Err(SessionError::Expired);
                }
                drop(session);
                self.release(id).await;
                self.deliver(id, commit).await
            }
            Step::Reply(Reply::Discarded) => {
                if !entry.close() {
                    return Err(SessionError::Expired);
                }
                drop(session);
                self.release(id).await;
                info!("[Sessions] {} cancelled", id);
                SessionEventLogger::log_event(&sid, SessionEvent::Cancelled);
                Ok(Reply::Discarded)
            }
            Step::Reply(reply) => {
                match &reply {
                    Reply::Render(render) => *entry.last_render.lock().await = render.clone(),
                    Reply::Rejected(rejection) => {
                        SessionEventLogger::log_event(
                            &sid,
                            SessionEvent::Rejected { control: control.to_string(), error: rejection.message.clone() },
                        );
                    }
                    _ => {}
                }
                // The timeout may have fired while this activation was running.
                if entry.is_closed() {
                    session.expire();
                    return Err(SessionError::Expired);
                }
                SessionEventLogger::log_event(&sid, SessionEvent::Activated { control: control.to_string() });
                Ok(reply)
            }
        }
    }

    async fn deliver(&self, id: SessionId, commit: Commit) -> Result<Reply, SessionError> {
        let delivery = &self.inner.delivery;
        let result = match &commit.mode {
            SessionMode::NewSend { channel } => delivery
                .deliver_new(channel, &commit.draft)
                .await
                .map(|message| TerminationResult { message, edited: false }),
            SessionMode::EditExisting { message } => delivery
                .deliver_edit(message, &commit.draft)
                .await
                .map(|message| TerminationResult { message, edited: true }),
        };

        let sid = id.to_string();
        match result {
            Ok(outcome) => {
                info!("[Sessions] {} delivered to {}", id, outcome.message);
                SessionEventLogger::log_event(
                    &sid,
                    SessionEvent::Committed { mode: commit.mode.to_string(), jump_url: outcome.jump_url() },
                );
                Ok(Reply::Terminated(outcome))
            }
            Err(err) => {
                warn!("[Sessions] {} delivery failed: {}", id, err);
                SessionEventLogger::log_event(
                    &sid,
                    SessionEvent::DeliveryFailed { mode: commit.mode.to_string(), error: err.to_string() },
                );
                Err(SessionError::Delivery(err))
            }
        }
    }

    async fn release(&self, id: SessionId) -> Option<Arc<SessionEntry>> {
        self.inner.sessions.write().await.remove(&id)
    }

    /// End a session for inactivity. Never waits for the session lock, so it
    /// also works while an activation is in flight. Returns `false` when the
    /// session had already ended.
    pub async fn expire(&self, id: SessionId) -> bool {
        let Some(entry) = self.release(id).await else {
            return false;
        };
        if !entry.close() {
            return false;
        }

        let mut last = entry.last_render.lock().await.clone();
        last.controls.disable_all();
        info!("[Sessions] {} expired", id);
        SessionEventLogger::log_event(&id.to_string(), SessionEvent::Expired);
        if let Err(e) = self.inner.sink.controls_expired(id, &last).await {
            warn!("[Sessions] Could not disable controls of {}: {:#}", id, e);
        }
        true
    }

    fn spawn_watchdog(&self, id: SessionId, entry: Arc<SessionEntry>) {
        let registry = self.clone();
        let timeout = self.inner.settings.idle_timeout;
        tokio::spawn(async move {
            loop {
                if entry.is_closed() {
                    return;
                }
                let idle = registry.inner.idle_for(&entry);
                if idle >= timeout {
                    registry.expire(id).await;
                    return;
                }
                tokio::time::sleep(timeout - idle).await;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::PanelButton;
    use crate::types::{ControlId, FormValues};
    use async_trait::async_trait;
    use embedtool_core::{
        ChannelRef, DeliveryError, ExistingMessage, Field, MessageRef, TutorialImages, TutorialOverlay,
    };
    use std::sync::Mutex as StdMutex;

    const BOT_ID: u64 = 999;

    #[derive(Default)]
    struct FakeDelivery {
        sent: StdMutex<Vec<(ChannelRef, EmbedDraft)>>,
        edited: StdMutex<Vec<(MessageRef, EmbedDraft)>>,
        existing: StdMutex<HashMap<u64, ExistingMessage>>,
        fail: AtomicBool,
    }

    impl FakeDelivery {
        fn with_message(self, existing: ExistingMessage) -> Self {
            self.existing.lock().unwrap().insert(existing.reference.message_id, existing);
            self
        }
    }

    #[async_trait]
    impl Delivery for FakeDelivery {
        fn self_id(&self) -> u64 {
            BOT_ID
        }

        async fn deliver_new(&self, channel: &ChannelRef, embed: &EmbedDraft) -> Result<MessageRef, DeliveryError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(DeliveryError::Forbidden("no send permission".into()));
            }
            self.sent.lock().unwrap().push((*channel, embed.clone()));
            Ok(MessageRef { guild_id: channel.guild_id, channel_id: channel.channel_id, message_id: 4242 })
        }

        async fn deliver_edit(&self, message: &MessageRef, embed: &EmbedDraft) -> Result<MessageRef, DeliveryError> {
            self.edited.lock().unwrap().push((*message, embed.clone()));
            Ok(*message)
        }

        async fn fetch_message(&self, message: &MessageRef) -> Result<ExistingMessage, DeliveryError> {
            self.existing
                .lock()
                .unwrap()
                .get(&message.message_id)
                .cloned()
                .ok_or_else(|| DeliveryError::NotFound(message.to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        expired: StdMutex<Vec<(SessionId, RenderInstruction)>>,
    }

    #[async_trait]
    impl PresentationSink for RecordingSink {
        async fn controls_expired(&self, session: SessionId, last: &RenderInstruction) -> anyhow::Result<()> {
            self.expired.lock().unwrap().push((session, last.clone()));
            Ok(())
        }
    }

    fn channel() -> ChannelRef {
        ChannelRef { guild_id: Some(1), channel_id: 10 }
    }

    fn registry(delivery: Arc<FakeDelivery>, sink: Arc<RecordingSink>) -> SessionRegistry {
        let context = SessionContext::new(TutorialOverlay::new(Rgb::new(0x5865F2), &TutorialImages::default()));
        SessionRegistry::new(context, delivery, sink, RegistrySettings::default())
    }

    fn new_send() -> OpenRequest {
        OpenRequest { mode: SessionMode::NewSend { channel: channel() }, invoker: UserIdentity::new(7, "Ada") }
    }

    fn edit(message_id: u64) -> OpenRequest {
        let message = MessageRef { guild_id: Some(1), channel_id: 10, message_id };
        OpenRequest { mode: SessionMode::EditExisting { message }, invoker: UserIdentity::new(7, "Ada") }
    }

    fn existing(message_id: u64, author_id: u64, embed: Option<EmbedDraft>) -> ExistingMessage {
        ExistingMessage {
            reference: MessageRef { guild_id: Some(1), channel_id: 10, message_id },
            author_id,
            embed,
        }
    }

    #[tokio::test]
    async fn hello_field_send_delivers_once() {
        let delivery = Arc::new(FakeDelivery::default());
        let registry = registry(delivery.clone(), Arc::new(RecordingSink::default()));
        let handle = registry.open(new_send()).await.unwrap();
        assert_eq!(handle.render.primary.title.as_deref(), Some("Embed Tool"));

        let title = FormValues::new().with("title", "Hello");
        registry.activate(handle.id, ControlActivation::form(ControlId::Title, title)).await.unwrap();
        let field = FormValues::new().with("name", "A").with("value", "B").with("inline", "true");
        registry.activate(handle.id, ControlActivation::form(ControlId::AddField, field)).await.unwrap();

        let reply = registry.activate(handle.id, ControlActivation::press(ControlId::Send)).await.unwrap();
        let Reply::Terminated(outcome) = reply else { panic!("send must terminate") };
        assert!(!outcome.edited);
        assert_eq!(outcome.jump_url(), "https://discord.com/channels/1/10/4242");

        let sent = delivery.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1.title.as_deref(), Some("Hello"));
        assert_eq!(sent[0].1.fields, vec![Field::new("A", "B", true).unwrap()]);

        let err = registry.activate(handle.id, ControlActivation::press(ControlId::Title)).await.unwrap_err();
        assert_eq!(err, SessionError::Terminated);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn foreign_message_is_refused_without_session() {
        let delivery = Arc::new(FakeDelivery::default().with_message(existing(5, 12345, None)));
        let registry = registry(delivery.clone(), Arc::new(RecordingSink::default()));
        let err = registry.open(edit(5)).await.unwrap_err();
        assert_eq!(err, SessionError::Permission);
        assert!(registry.is_empty().await);
        assert!(delivery.edited.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_message_reports_delivery_error() {
        let registry = registry(Arc::new(FakeDelivery::default()), Arc::new(RecordingSink::default()));
        let err = registry.open(edit(77)).await.unwrap_err();
        assert!(matches!(err, SessionError::Delivery(DeliveryError::NotFound(_))));
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn edit_session_is_seeded_and_edits_in_place() {
        let mut seeded = EmbedDraft::empty(Rgb::new(0xFF0000));
        seeded.title = Some("Old".into());
        let delivery = Arc::new(FakeDelivery::default().with_message(existing(5, BOT_ID, Some(seeded))));
        let registry = registry(delivery.clone(), Arc::new(RecordingSink::default()));

        let handle = registry.open(edit(5)).await.unwrap();
        assert_eq!(handle.render.primary.title.as_deref(), Some("Old"));
        assert_eq!(handle.render.primary.color, Rgb::new(0xFF0000));

        let reply = registry.activate(handle.id, ControlActivation::press(ControlId::Send)).await.unwrap();
        assert!(matches!(reply, Reply::Terminated(TerminationResult { edited: true, .. })));
        let edited = delivery.edited.lock().unwrap().clone();
        assert_eq!(edited.len(), 1);
        assert_eq!(edited[0].0.message_id, 5);
        assert!(delivery.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn message_without_embed_starts_empty() {
        let delivery = Arc::new(FakeDelivery::default().with_message(existing(5, BOT_ID, None)));
        let registry = registry(delivery, Arc::new(RecordingSink::default()));
        let handle = registry.open(edit(5)).await.unwrap();
        assert_eq!(handle.render.primary, EmbedDraft::empty(RegistrySettings::default().default_color));
    }

    #[tokio::test]
    async fn confirmed_cancel_delivers_nothing() {
        let delivery = Arc::new(FakeDelivery::default());
        let registry = registry(delivery.clone(), Arc::new(RecordingSink::default()));
        let handle = registry.open(new_send()).await.unwrap();

        let first = registry.activate(handle.id, ControlActivation::press(ControlId::Cancel)).await.unwrap();
        assert!(matches!(first, Reply::Render(_)));
        let second = registry.activate(handle.id, ControlActivation::press(ControlId::Cancel)).await.unwrap();
        assert_eq!(second, Reply::Discarded);

        assert!(delivery.sent.lock().unwrap().is_empty());
        assert!(!registry.contains(handle.id).await);
    }

    #[tokio::test]
    async fn delivery_failure_ends_session() {
        let delivery = Arc::new(FakeDelivery::default());
        delivery.fail.store(true, Ordering::SeqCst);
        let registry = registry(delivery, Arc::new(RecordingSink::default()));
        let handle = registry.open(new_send()).await.unwrap();

        let err = registry.activate(handle.id, ControlActivation::press(ControlId::Send)).await.unwrap_err();
        assert!(matches!(err, SessionError::Delivery(DeliveryError::Forbidden(_))));
        assert!(err.is_terminal());
        let err = registry.activate(handle.id, ControlActivation::press(ControlId::Send)).await.unwrap_err();
        assert_eq!(err, SessionError::Terminated);
    }

    #[tokio::test]
    async fn rejection_keeps_session_active() {
        let registry = registry(Arc::new(FakeDelivery::default()), Arc::new(RecordingSink::default()));
        let handle = registry.open(new_send()).await.unwrap();
        let bad = FormValues::new().with("color", "notacolor");
        let reply = registry.activate(handle.id, ControlActivation::form(ControlId::Color, bad)).await.unwrap();
        assert!(matches!(reply, Reply::Rejected(ref r) if r.heading == "Invalid Color"));
        assert!(registry.contains(handle.id).await);
    }

    #[tokio::test]
    async fn expiry_fires_while_an_activation_is_in_flight() {
        let sink = Arc::new(RecordingSink::default());
        let registry = registry(Arc::new(FakeDelivery::default()), sink.clone());
        let handle = registry.open(new_send()).await.unwrap();

        let entry = registry.inner.sessions.read().await.get(&handle.id).cloned().unwrap();
        let held = entry.session.lock().await;

        let in_flight = tokio::spawn({
            let registry = registry.clone();
            async move { registry.activate(handle.id, ControlActivation::press(ControlId::ToggleTimestamp)).await }
        });
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }

        let expired = tokio::time::timeout(Duration::from_secs(1), registry.expire(handle.id))
            .await
            .expect("expire must not wait for the session lock");
        assert!(expired);
        assert_eq!(sink.expired.lock().unwrap().len(), 1);

        drop(held);
        let result = in_flight.await.unwrap();
        assert_eq!(result, Err(SessionError::Expired));
        assert!(!registry.contains(handle.id).await);
        assert!(!registry.expire(handle.id).await);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_session_expires_and_disables_controls() {
        let sink = Arc::new(RecordingSink::default());
        let registry = registry(Arc::new(FakeDelivery::default()), sink.clone());
        let handle = registry.open(new_send()).await.unwrap();
        registry.activate(handle.id, ControlActivation::press(ControlId::ToggleTutorial)).await.unwrap();

        tokio::time::sleep(DEFAULT_IDLE_TIMEOUT + Duration::from_secs(5)).await;

        let expired = sink.expired.lock().unwrap().clone();
        assert_eq!(expired.len(), 1);
        let (id, last) = &expired[0];
        assert_eq!(*id, handle.id);
        assert!(last.tutorial.is_some(), "last rendered content stays visible");
        assert!(last.controls.rows.iter().flatten().all(PanelButton::is_disabled));

        let err = registry.activate(handle.id, ControlActivation::press(ControlId::Send)).await.unwrap_err();
        assert_eq!(err, SessionError::Terminated);
    }

    #[tokio::test(start_paused = true)]
    async fn activity_postpones_expiry() {
        let sink = Arc::new(RecordingSink::default());
        let registry = registry(Arc::new(FakeDelivery::default()), sink.clone());
        let handle = registry.open(new_send()).await.unwrap();

        tokio::time::sleep(Duration::from_secs(120)).await;
        registry.activate(handle.id, ControlActivation::press(ControlId::ToggleTimestamp)).await.unwrap();
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(registry.contains(handle.id).await);
        assert!(sink.expired.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert!(!registry.contains(handle.id).await);
    }

    #[tokio::test]
    async fn expiry_is_idempotent_and_skips_terminated_sessions() {
        let sink = Arc::new(RecordingSink::default());
        let registry = registry(Arc::new(FakeDelivery::default()), sink.clone());

        let open = registry.open(new_send()).await.unwrap();
        assert!(registry.expire(open.id).await);
        assert!(!registry.expire(open.id).await);

        let sent = registry.open(new_send()).await.unwrap();
        registry.activate(sent.id, ControlActivation::press(ControlId::Send)).await.unwrap();
        assert!(!registry.expire(sent.id).await);

        assert_eq!(sink.expired.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let delivery = Arc::new(FakeDelivery::default());
        let registry = registry(delivery.clone(), Arc::new(RecordingSink::default()));
        let a = registry.open(new_send()).await.unwrap();
        let b = registry.open(new_send()).await.unwrap();

        let title = FormValues::new().with("title", "Only A");
        registry.activate(a.id, ControlActivation::form(ControlId::Title, title)).await.unwrap();
        registry.activate(b.id, ControlActivation::press(ControlId::Send)).await.unwrap();
        registry.activate(a.id, ControlActivation::press(ControlId::Send)).await.unwrap();

        let sent = delivery.sent.lock().unwrap().clone();
        assert_eq!(sent[0].1.title.as_deref(), Some("Embed Tool"));
        assert_eq!(sent[1].1.title.as_deref(), Some("Only A"));
    }

    #[tokio::test]
    async fn session_limit_is_enforced() {
        let context = SessionContext::new(TutorialOverlay::new(Rgb::new(0), &TutorialImages::default()));
        let settings = RegistrySettings { max_sessions: Some(1), ..Default::default() };
        let registry = SessionRegistry::new(
            context,
            Arc::new(FakeDelivery::default()),
            Arc::new(RecordingSink::default()),
            settings,
        );
        registry.open(new_send()).await.unwrap();
        let err = registry.open(new_send()).await.unwrap_err();
        assert_eq!(err, SessionError::TooManySessions { limit: 1 });
    }
}
