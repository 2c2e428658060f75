//! Pull-based synchronization of one chat thread.
//!
//! A [`ConversationPoller`] owns no timer. Whoever drives it calls
//! [`ConversationPoller::tick`] on a schedule and [`ConversationPoller::stop`]
//! on teardown; every fetched sequence is handed to the delivery callback.

use crate::api::Backend;
use crate::error::ApiError;
use crate::session::Session;
use crate::state::{Message, OutgoingMessage, ThreadKey};
use leptos::logging::{log, warn};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    ResolvingIdentity,
    Polling,
    Disposed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Sent,
    Received,
}

/// One message as rendered: the record plus who wrote it relative to us.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadEntry {
    pub message: Message,
    pub direction: Direction,
}

/// Classifies `messages` against the current user, keeping the fetched order.
pub fn classify(messages: Vec<Message>, me: Option<&str>) -> Vec<ThreadEntry> {
    messages
        .into_iter()
        .map(|message| {
            let direction = if me == Some(message.sender_id.as_str()) {
                Direction::Sent
            } else {
                Direction::Received
            };
            ThreadEntry { message, direction }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input, nothing was sent.
    Skipped,
    Sent,
}

struct Inner<B> {
    backend: B,
    session: Session,
    key: ThreadKey,
    state: Cell<PollerState>,
    token: RefCell<Option<String>>,
    me: RefCell<Option<String>>,
    issued: Cell<u64>,
    applied: Cell<u64>,
    deliver: Box<dyn Fn(Vec<ThreadEntry>)>,
}

/// Cancellable subscription to a thread. Cheap to clone; clones share state.
pub struct ConversationPoller<B> {
    inner: Rc<Inner<B>>,
}

impl<B> Clone for ConversationPoller<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<B: Backend> ConversationPoller<B> {
    pub fn new(
        backend: B,
        session: Session,
        key: ThreadKey,
        deliver: impl Fn(Vec<ThreadEntry>) + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                backend,
                session,
                key,
                state: Cell::new(PollerState::Idle),
                token: RefCell::new(None),
                me: RefCell::new(None),
                issued: Cell::new(0),
                applied: Cell::new(0),
                deliver: Box::new(deliver),
            }),
        }
    }

    pub fn state(&self) -> PollerState {
        self.inner.state.get()
    }

    /// Id the sent/received split is computed against, once resolved.
    pub fn current_user(&self) -> Option<String> {
        self.inner.me.borrow().clone()
    }

    /// Resolves who we are, then runs the first tick.
    ///
    /// The token is captured before resolution: a failed lookup discards the
    /// stored token but only costs us the sent/received split. Only valid from
    /// `Idle`; later calls are ignored.
    pub async fn activate(&self) {
        if self.state() != PollerState::Idle {
            return;
        }
        self.inner.state.set(PollerState::ResolvingIdentity);
        *self.inner.token.borrow_mut() = self.inner.session.token();
        let me = self
            .inner
            .session
            .restore(&self.inner.backend)
            .await
            .map(|user| user.id);
        *self.inner.me.borrow_mut() = me;
        if self.state() == PollerState::Disposed {
            return;
        }
        self.inner.state.set(PollerState::Polling);
        self.tick().await;
    }

    /// Fetches the whole thread and delivers it, unless a newer fetch already
    /// landed or the poller was stopped meanwhile. Failures are only logged.
    pub async fn tick(&self) {
        if self.state() != PollerState::Polling {
            return;
        }
        let Ok(token) = self.token() else {
            warn!("No session token, skipping thread fetch");
            return;
        };
        let seq = self.inner.issued.get() + 1;
        self.inner.issued.set(seq);

        let result = self.inner.backend.thread(&token, &self.inner.key).await;
        if self.state() == PollerState::Disposed {
            return;
        }
        match result {
            Ok(messages) => {
                if seq < self.inner.applied.get() {
                    log!("Dropping stale thread response #{seq}");
                    return;
                }
                self.inner.applied.set(seq);
                let me = self.current_user();
                (self.inner.deliver)(classify(messages, me.as_deref()));
            }
            Err(err) => log!("Failed to fetch messages: {err}"),
        }
    }

    /// Posts `text` to the counterpart. Resolves as soon as the server
    /// acknowledges; the caller then runs an out-of-band [`tick`](Self::tick)
    /// so the new message shows without waiting for the interval.
    ///
    /// Blank text sends nothing. On failure nothing local changes.
    pub async fn send(&self, text: &str) -> Result<SendOutcome, ApiError> {
        if text.trim().is_empty() {
            return Ok(SendOutcome::Skipped);
        }
        let token = self.token()?;
        let outgoing = OutgoingMessage {
            item_id: self.inner.key.item_id.clone(),
            receiver_id: self.inner.key.counterpart_id.clone(),
            message: text.to_string(),
        };
        self.inner.backend.send_message(&token, &outgoing).await?;
        Ok(SendOutcome::Sent)
    }

    fn token(&self) -> Result<String, ApiError> {
        self.inner.token.borrow().clone().ok_or(ApiError::MissingToken)
    }

    /// Ends the subscription. Nothing is delivered afterwards.
    pub fn stop(&self) {
        self.inner.state.set(PollerState::Disposed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStore;
    use crate::testing::{message, user, FakeBackend};
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;

    type Deliveries = Rc<RefCell<Vec<Vec<ThreadEntry>>>>;

    fn poller(backend: &FakeBackend, token: &str) -> (ConversationPoller<FakeBackend>, Deliveries) {
        let deliveries: Deliveries = Rc::default();
        let sink = Rc::clone(&deliveries);
        let poller = ConversationPoller::new(
            backend.clone(),
            Session::new(MemoryStore::with_token(token)),
            ThreadKey::new("42", "b"),
            move |entries| sink.borrow_mut().push(entries),
        );
        (poller, deliveries)
    }

    fn texts(entries: &[ThreadEntry]) -> Vec<&str> {
        entries.iter().map(|entry| entry.message.message.as_str()).collect()
    }

    #[test]
    fn activation_resolves_identity_then_fetches() {
        let backend = FakeBackend::default();
        backend.accept_token("tok-a", user("a", "Asha"));
        backend.set_thread(vec![message("1", "a", "hi", 0), message("2", "b", "hello", 1)]);
        let (poller, deliveries) = poller(&backend, "tok-a");
        assert_eq!(poller.state(), PollerState::Idle);

        block_on(poller.activate());

        assert_eq!(poller.state(), PollerState::Polling);
        assert_eq!(poller.current_user().as_deref(), Some("a"));
        assert_eq!(backend.calls(), vec!["me tok-a", "thread 42/b"]);
        let delivered = &deliveries.borrow()[0];
        assert_eq!(texts(delivered), vec!["hi", "hello"]);
        assert_eq!(delivered[0].direction, Direction::Sent);
        assert_eq!(delivered[1].direction, Direction::Received);
    }

    #[test]
    fn failed_identity_still_polls_but_drops_token() {
        let backend = FakeBackend::default();
        backend.set_thread(vec![message("1", "a", "hi", 0)]);
        let session = Session::new(MemoryStore::with_token("stale"));
        let deliveries: Deliveries = Rc::default();
        let sink = Rc::clone(&deliveries);
        let poller = ConversationPoller::new(
            backend.clone(),
            session.clone(),
            ThreadKey::new("42", "b"),
            move |entries| sink.borrow_mut().push(entries),
        );

        block_on(poller.activate());

        assert_eq!(session.token(), None);
        assert_eq!(poller.current_user(), None);
        assert_eq!(poller.state(), PollerState::Polling);
        assert_eq!(backend.calls(), vec!["me stale", "thread 42/b"]);
        assert_eq!(deliveries.borrow()[0][0].direction, Direction::Received);
    }

    #[test]
    fn classify_keeps_server_order() {
        let entries = classify(
            vec![message("2", "b", "later", 5), message("1", "a", "earlier", 1)],
            Some("a"),
        );
        assert_eq!(texts(&entries), vec!["later", "earlier"]);
        assert_eq!(entries[0].direction, Direction::Received);
        assert_eq!(entries[1].direction, Direction::Sent);

        let anonymous = classify(vec![message("1", "a", "hi", 0)], None);
        assert_eq!(anonymous[0].direction, Direction::Received);
    }

    #[test]
    fn each_tick_replaces_the_whole_sequence() {
        let backend = FakeBackend::default();
        backend.accept_token("tok-a", user("a", "Asha"));
        backend.set_thread(vec![message("1", "a", "hi", 0)]);
        let (poller, deliveries) = poller(&backend, "tok-a");
        block_on(poller.activate());

        backend.push_message(message("2", "b", "hello", 1));
        block_on(poller.tick());

        let deliveries = deliveries.borrow();
        assert_eq!(deliveries.len(), 2);
        assert_eq!(texts(&deliveries[1]), vec!["hi", "hello"]);
    }

    #[test]
    fn fetch_errors_are_swallowed() {
        let backend = FakeBackend::default();
        backend.accept_token("tok-a", user("a", "Asha"));
        let (poller, deliveries) = poller(&backend, "tok-a");
        block_on(poller.activate());

        backend.fail_next("Internal Server Error");
        block_on(poller.tick());

        assert_eq!(poller.state(), PollerState::Polling);
        assert_eq!(deliveries.borrow().len(), 1);
    }

    #[test]
    fn blank_send_issues_no_request() {
        let backend = FakeBackend::default();
        backend.accept_token("tok-a", user("a", "Asha"));
        let (poller, _) = poller(&backend, "tok-a");
        block_on(poller.activate());
        let before = backend.calls().len();

        assert_eq!(block_on(poller.send("   \n\t")).unwrap(), SendOutcome::Skipped);
        assert_eq!(block_on(poller.send("")).unwrap(), SendOutcome::Skipped);
        assert_eq!(backend.calls().len(), before);
    }

    #[test]
    fn send_then_tick_shows_own_message() {
        let backend = FakeBackend::default();
        backend.accept_token("tok-a", user("a", "Asha"));
        let (poller, deliveries) = poller(&backend, "tok-a");
        block_on(poller.activate());

        assert_eq!(block_on(poller.send("is it still there?")).unwrap(), SendOutcome::Sent);
        assert_eq!(deliveries.borrow().len(), 1);
        block_on(poller.tick());

        let calls = backend.calls();
        assert_eq!(&calls[calls.len() - 2..], ["send is it still there?", "thread 42/b"]);
        let latest = deliveries.borrow().last().cloned().unwrap();
        assert_eq!(texts(&latest), vec!["is it still there?"]);
        assert_eq!(latest[0].direction, Direction::Sent);
        assert_eq!(latest[0].message.receiver_id.as_deref(), Some("b"));
    }

    #[test]
    fn send_resolves_before_the_refetch_lands() {
        let backend = FakeBackend::default();
        backend.accept_token("tok-a", user("a", "Asha"));
        let (poller, deliveries) = poller(&backend, "tok-a");
        block_on(poller.activate());

        let release = backend.hold_next_fetch();
        let sent = Rc::new(Cell::new(false));
        let mut pool = LocalPool::new();
        let spawner = pool.spawner();
        let sender = poller.clone();
        let done = Rc::clone(&sent);
        let refetch = spawner.clone();
        spawner
            .spawn_local(async move {
                if let Ok(SendOutcome::Sent) = sender.send("hello").await {
                    done.set(true);
                    let ticker = sender.clone();
                    refetch.spawn_local(async move { ticker.tick().await }).unwrap();
                }
            })
            .unwrap();
        pool.run_until_stalled();

        assert!(sent.get());
        assert_eq!(backend.calls(), vec!["me tok-a", "thread 42/b", "send hello", "thread 42/b"]);
        assert_eq!(deliveries.borrow().len(), 1);

        release.send(()).unwrap();
        pool.run_until_stalled();
        assert_eq!(texts(deliveries.borrow().last().unwrap()), vec!["hello"]);
    }

    #[test]
    fn failed_send_changes_nothing() {
        let backend = FakeBackend::default();
        backend.accept_token("tok-a", user("a", "Asha"));
        let (poller, deliveries) = poller(&backend, "tok-a");
        block_on(poller.activate());

        backend.fail_next("Token expired");
        let err = block_on(poller.send("hello")).unwrap_err();

        assert_eq!(err.notice("Failed to send message"), "Token expired");
        assert_eq!(deliveries.borrow().len(), 1);
        assert_eq!(backend.calls().last().map(String::as_str), Some("send hello"));
    }

    #[test]
    fn no_tick_after_stop() {
        let backend = FakeBackend::default();
        backend.accept_token("tok-a", user("a", "Asha"));
        let (poller, deliveries) = poller(&backend, "tok-a");
        block_on(poller.activate());
        let before = backend.calls().len();

        poller.stop();
        block_on(poller.tick());
        block_on(poller.tick());

        assert_eq!(poller.state(), PollerState::Disposed);
        assert_eq!(backend.calls().len(), before);
        assert_eq!(deliveries.borrow().len(), 1);
    }

    #[test]
    fn late_response_after_stop_is_ignored() {
        let backend = FakeBackend::default();
        backend.accept_token("tok-a", user("a", "Asha"));
        backend.set_thread(vec![message("1", "a", "hi", 0)]);
        let (poller, deliveries) = poller(&backend, "tok-a");
        block_on(poller.activate());

        let release = backend.hold_next_fetch();
        let mut pool = LocalPool::new();
        let ticking = poller.clone();
        pool.spawner()
            .spawn_local(async move { ticking.tick().await })
            .unwrap();
        pool.run_until_stalled();

        poller.stop();
        release.send(()).unwrap();
        pool.run_until_stalled();

        assert_eq!(deliveries.borrow().len(), 1);
    }

    #[test]
    fn stale_response_never_overwrites_newer_one() {
        let backend = FakeBackend::default();
        backend.accept_token("tok-a", user("a", "Asha"));
        backend.set_thread(vec![message("1", "a", "hi", 0)]);
        let (poller, deliveries) = poller(&backend, "tok-a");
        block_on(poller.activate());

        let mut pool = LocalPool::new();
        let spawner = pool.spawner();

        let release_old = backend.hold_next_fetch();
        let old = poller.clone();
        spawner.spawn_local(async move { old.tick().await }).unwrap();
        pool.run_until_stalled();

        backend.push_message(message("2", "b", "hello", 1));
        let release_new = backend.hold_next_fetch();
        let new = poller.clone();
        spawner.spawn_local(async move { new.tick().await }).unwrap();
        pool.run_until_stalled();

        release_new.send(()).unwrap();
        pool.run_until_stalled();
        release_old.send(()).unwrap();
        pool.run_until_stalled();

        let deliveries = deliveries.borrow();
        assert_eq!(deliveries.len(), 2);
        assert_eq!(texts(deliveries.last().unwrap()), vec!["hi", "hello"]);
    }

    #[test]
    fn stop_during_identity_resolution_prevents_polling() {
        let backend = FakeBackend::default();
        backend.accept_token("tok-a", user("a", "Asha"));
        let (poller, deliveries) = poller(&backend, "tok-a");
        poller.stop();

        block_on(poller.activate());

        assert_eq!(poller.state(), PollerState::Disposed);
        assert!(backend.calls().is_empty());
        assert!(deliveries.borrow().is_empty());
    }
}
