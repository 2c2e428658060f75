//! In-memory [`Backend`] for the unit tests.

use crate::api::Backend;
use crate::error::ApiError;
use crate::items::NewItem;
use crate::state::{
    AuthGrant, ConversationSummary, Credentials, Item, ItemStatus, Message, OutgoingMessage,
    Signup, ThreadKey, User,
};
use chrono::{DateTime, TimeZone, Utc};
use futures::channel::oneshot;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

pub fn user(id: &str, name: &str) -> User {
    User {
        id: id.into(),
        name: name.into(),
        email: format!("{}@cmrcet.ac.in", name.to_lowercase()),
        phone: "9999999999".into(),
    }
}

pub fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 10, minute, 0).unwrap()
}

pub fn item(id: &str, title: &str, description: &str, category: &str, status: ItemStatus) -> Item {
    Item {
        id: id.into(),
        title: title.into(),
        description: description.into(),
        category: category.into(),
        image_url: format!("https://img.example/{id}.png"),
        location: "Library".into(),
        contact_name: "Asha".into(),
        contact_email: "asha@cmrcet.ac.in".into(),
        contact_phone: "9999999999".into(),
        user_id: "u-1".into(),
        status,
        created_at: at(0),
    }
}

pub fn message(id: &str, sender_id: &str, text: &str, minute: u32) -> Message {
    Message {
        id: id.into(),
        item_id: None,
        sender_id: sender_id.into(),
        sender_name: sender_id.to_uppercase(),
        receiver_id: None,
        message: text.into(),
        created_at: at(minute),
    }
}

#[derive(Default)]
struct Inner {
    calls: RefCell<Vec<String>>,
    tokens: RefCell<HashMap<String, User>>,
    failure: RefCell<Option<String>>,
    items: RefCell<Vec<Item>>,
    thread: RefCell<Vec<Message>>,
    conversations: RefCell<Vec<ConversationSummary>>,
    gates: RefCell<VecDeque<oneshot::Receiver<()>>>,
}

/// Records every call as a short line and answers from shared in-memory state.
#[derive(Clone, Default)]
pub struct FakeBackend {
    inner: Rc<Inner>,
}

impl FakeBackend {
    pub fn calls(&self) -> Vec<String> {
        self.inner.calls.borrow().clone()
    }

    pub fn accept_token(&self, token: &str, user: User) {
        self.inner.tokens.borrow_mut().insert(token.into(), user);
    }

    /// The next call of any kind fails with a 400 carrying `detail`.
    pub fn fail_next(&self, detail: &str) {
        *self.inner.failure.borrow_mut() = Some(detail.into());
    }

    pub fn set_items(&self, items: Vec<Item>) {
        *self.inner.items.borrow_mut() = items;
    }

    pub fn set_thread(&self, messages: Vec<Message>) {
        *self.inner.thread.borrow_mut() = messages;
    }

    pub fn push_message(&self, message: Message) {
        self.inner.thread.borrow_mut().push(message);
    }

    pub fn set_conversations(&self, conversations: Vec<ConversationSummary>) {
        *self.inner.conversations.borrow_mut() = conversations;
    }

    /// Holds the next thread fetch until the returned sender fires.
    ///
    /// The fetch snapshots the thread when issued, not when released.
    pub fn hold_next_fetch(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.inner.gates.borrow_mut().push_back(rx);
        tx
    }

    fn record(&self, call: String) -> Result<(), ApiError> {
        self.inner.calls.borrow_mut().push(call);
        match self.inner.failure.borrow_mut().take() {
            Some(detail) => Err(ApiError::Server { status: 400, detail }),
            None => Ok(()),
        }
    }

    fn grant(email: &str, name: &str) -> AuthGrant {
        AuthGrant {
            token: format!("token-for-{email}"),
            user: User {
                id: format!("id-{email}"),
                name: name.into(),
                email: email.into(),
                phone: String::new(),
            },
        }
    }
}

impl Backend for FakeBackend {
    async fn me(&self, token: &str) -> Result<User, ApiError> {
        self.record(format!("me {token}"))?;
        self.inner
            .tokens
            .borrow()
            .get(token)
            .cloned()
            .ok_or_else(|| ApiError::Server {
                status: 401,
                detail: "Invalid token".into(),
            })
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthGrant, ApiError> {
        self.record(format!("login {}", credentials.email))?;
        Ok(Self::grant(&credentials.email, "Asha"))
    }

    async fn signup(&self, signup: &Signup) -> Result<AuthGrant, ApiError> {
        self.record(format!("signup {}", signup.email))?;
        Ok(Self::grant(&signup.email, &signup.name))
    }

    async fn items(&self) -> Result<Vec<Item>, ApiError> {
        self.record("items".into())?;
        Ok(self.inner.items.borrow().clone())
    }

    async fn item(&self, item_id: &str) -> Result<Item, ApiError> {
        self.record(format!("item {item_id}"))?;
        self.inner
            .items
            .borrow()
            .iter()
            .find(|item| item.id == item_id)
            .cloned()
            .ok_or_else(|| ApiError::Server {
                status: 404,
                detail: "Item not found".into(),
            })
    }

    async fn user_items(&self, user_id: &str) -> Result<Vec<Item>, ApiError> {
        self.record(format!("user_items {user_id}"))?;
        Ok(self
            .inner
            .items
            .borrow()
            .iter()
            .filter(|item| item.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_item(&self, _token: &str, new: NewItem) -> Result<Item, ApiError> {
        self.record(format!("create {}", new.title))?;
        let id = (self.inner.items.borrow().len() + 1).to_string();
        let mut created = item(&id, &new.title, &new.description, new.category.as_str(), ItemStatus::Available);
        created.location = new.location;
        created.contact_phone = new.contact_phone;
        self.inner.items.borrow_mut().push(created.clone());
        Ok(created)
    }

    async fn update_status(
        &self,
        _token: &str,
        item_id: &str,
        status: ItemStatus,
    ) -> Result<(), ApiError> {
        self.record(format!("status {item_id} {status}"))?;
        if let Some(item) = self
            .inner
            .items
            .borrow_mut()
            .iter_mut()
            .find(|item| item.id == item_id)
        {
            item.status = status;
        }
        Ok(())
    }

    async fn conversations(&self, _token: &str) -> Result<Vec<ConversationSummary>, ApiError> {
        self.record("conversations".into())?;
        Ok(self.inner.conversations.borrow().clone())
    }

    async fn thread(&self, _token: &str, key: &ThreadKey) -> Result<Vec<Message>, ApiError> {
        self.record(format!("thread {}/{}", key.item_id, key.counterpart_id))?;
        let snapshot = self.inner.thread.borrow().clone();
        let gate = self.inner.gates.borrow_mut().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        Ok(snapshot)
    }

    async fn send_message(
        &self,
        token: &str,
        outgoing: &OutgoingMessage,
    ) -> Result<Message, ApiError> {
        self.record(format!("send {}", outgoing.message))?;
        let sender = self
            .inner
            .tokens
            .borrow()
            .get(token)
            .map(|user| user.id.clone())
            .unwrap_or_else(|| "me".into());
        let minute = self.inner.thread.borrow().len() as u32;
        let mut sent = message(&format!("m{}", minute + 1), &sender, &outgoing.message, minute);
        sent.item_id = Some(outgoing.item_id.clone());
        sent.receiver_id = Some(outgoing.receiver_id.clone());
        self.inner.thread.borrow_mut().push(sent.clone());
        Ok(sent)
    }
}
