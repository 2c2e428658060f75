use leptos::logging::error;

/// The views of the app, addressed by the location hash (`#/item/42`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Auth,
    Home,
    Item(String),
    MyItems,
    Messages,
}

impl Route {
    /// Unknown paths land on the home view.
    pub fn from_hash(hash: &str) -> Self {
        let path = hash.trim_start_matches('#').trim_matches('/');
        let mut segments = path.split('/').filter(|segment| !segment.is_empty());
        match (segments.next(), segments.next(), segments.next()) {
            (Some("auth"), None, _) => Route::Auth,
            (Some("item"), Some(id), None) => Route::Item(id.to_string()),
            (Some("my-items"), None, _) => Route::MyItems,
            (Some("messages"), None, _) => Route::Messages,
            _ => Route::Home,
        }
    }

    pub fn to_hash(&self) -> String {
        match self {
            Route::Auth => "#/auth".to_string(),
            Route::Home => "#/".to_string(),
            Route::Item(id) => format!("#/item/{id}"),
            Route::MyItems => "#/my-items".to_string(),
            Route::Messages => "#/messages".to_string(),
        }
    }

    /// Where a visitor actually ends up: every view but `Auth` needs a user,
    /// and a signed-in user has no business on `Auth`.
    pub fn guard(self, signed_in: bool) -> Self {
        match (self, signed_in) {
            (Route::Auth, true) => Route::Home,
            (_, false) => Route::Auth,
            (route, true) => route,
        }
    }
}

/// Moves the browser to `route`; the hash listener picks it up from there.
pub fn navigate(route: &Route) {
    if let Err(err) = leptos::window().location().set_hash(&route.to_hash()) {
        error!("Could not navigate to {route:?}: {err:?}");
    }
}
