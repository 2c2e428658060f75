use crate::api::Backend;
use crate::config::TOKEN_KEY;
use crate::error::ApiError;
use crate::state::{Credentials, Signup, User};
use leptos::logging::{error, warn};
use std::cell::RefCell;
use std::rc::Rc;

/// Durable home of the session token.
pub trait TokenStore {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn clear(&self);
}

/// Browser `localStorage`.
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    pub fn open() -> Option<Self> {
        let storage = leptos::window().local_storage().ok().flatten()?;
        Some(Self { storage })
    }
}

impl TokenStore for LocalStorage {
    fn load(&self) -> Option<String> {
        self.storage.get_item(TOKEN_KEY).ok().flatten()
    }

    fn save(&self, token: &str) {
        if let Err(err) = self.storage.set_item(TOKEN_KEY, token) {
            error!("Could not persist token: {err:?}");
        }
    }

    fn clear(&self) {
        if let Err(err) = self.storage.remove_item(TOKEN_KEY) {
            error!("Could not remove token: {err:?}");
        }
    }
}

/// Token kept for the lifetime of the page only.
#[derive(Default)]
pub struct MemoryStore {
    token: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: RefCell::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryStore {
    fn load(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn save(&self, token: &str) {
        *self.token.borrow_mut() = Some(token.to_string());
    }

    fn clear(&self) {
        self.token.borrow_mut().take();
    }
}

/// The only place that writes the session token.
///
/// Set on login and signup, cleared on logout or when the backend refuses to
/// resolve it. Everyone else only reads it.
#[derive(Clone)]
pub struct Session {
    store: Rc<dyn TokenStore>,
}

impl Session {
    pub fn new(store: impl TokenStore + 'static) -> Self {
        Self {
            store: Rc::new(store),
        }
    }

    pub fn browser() -> Self {
        match LocalStorage::open() {
            Some(storage) => Self::new(storage),
            None => {
                warn!("localStorage unavailable, session will not survive a reload");
                Self::new(MemoryStore::default())
            }
        }
    }

    pub fn token(&self) -> Option<String> {
        self.store.load()
    }

    pub fn require_token(&self) -> Result<String, ApiError> {
        self.token().ok_or(ApiError::MissingToken)
    }

    /// Resolves the stored token to a user, discarding it if that fails.
    pub async fn restore<B: Backend>(&self, backend: &B) -> Option<User> {
        let token = self.token()?;
        match backend.me(&token).await {
            Ok(user) => Some(user),
            Err(err) => {
                warn!("Discarding stored token: {err}");
                self.store.clear();
                None
            }
        }
    }

    pub async fn login<B: Backend>(
        &self,
        backend: &B,
        credentials: &Credentials,
    ) -> Result<User, ApiError> {
        let grant = backend.login(credentials).await?;
        self.store.save(&grant.token);
        Ok(grant.user)
    }

    pub async fn signup<B: Backend>(&self, backend: &B, signup: &Signup) -> Result<User, ApiError> {
        let grant = backend.signup(signup).await?;
        self.store.save(&grant.token);
        Ok(grant.user)
    }

    pub fn logout(&self) {
        self.store.clear();
    }
}
