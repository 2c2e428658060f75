use crate::api::HttpBackend;
use crate::config::ApiConfig;
use crate::home::Home;
use crate::item_detail::ItemDetail;
use crate::loading::Loading;
use crate::login::Login;
use crate::messages::Messages;
use crate::my_items::MyItems;
use crate::route::{navigate, Route};
use crate::session::Session;
use crate::state::User;
use crate::toast::{Toaster, Toasts};
use leptos::logging::log;
use leptos::*;

/// Signed-in user, `None` while signed out.
#[derive(Clone, Copy)]
pub struct CurrentUser(pub RwSignal<Option<User>>);

pub fn use_backend() -> HttpBackend {
    expect_context::<HttpBackend>()
}

pub fn use_session() -> Session {
    expect_context::<Session>()
}

pub fn use_user() -> RwSignal<Option<User>> {
    expect_context::<CurrentUser>().0
}

fn current_route() -> Route {
    Route::from_hash(&window().location().hash().unwrap_or_default())
}

#[component]
pub fn App(config: ApiConfig) -> impl IntoView {
    let backend = HttpBackend::new(config);
    let session = Session::browser();
    let user = create_rw_signal(None::<User>);
    provide_context(backend.clone());
    provide_context(session.clone());
    provide_context(Toasts::new());
    provide_context(CurrentUser(user));

    let location = create_rw_signal(current_route());
    window_event_listener(ev::hashchange, move |_| location.set(current_route()));

    let (ready, set_ready) = create_signal(false);
    spawn_local(async move {
        let restored = session.restore(&backend).await;
        log!("Session restored: {}", restored.is_some());
        user.set(restored);
        set_ready.set(true);
    });

    // Keep the address bar in line with what the guard actually shows.
    create_effect(move |_| {
        if !ready.get() {
            return;
        }
        let requested = location.get();
        let shown = requested.clone().guard(user.with(Option::is_some));
        if shown != requested {
            navigate(&shown);
        }
    });

    let page = move || {
        if !ready.get() {
            return view! { <Loading /> }.into_view();
        }
        match (location.get(), user.get()) {
            (Route::Auth, _) | (_, None) => view! { <Login /> }.into_view(),
            (Route::Home, Some(me)) => view! { <Home me /> }.into_view(),
            (Route::Item(item_id), Some(me)) => view! { <ItemDetail item_id me /> }.into_view(),
            (Route::MyItems, Some(me)) => view! { <MyItems me /> }.into_view(),
            (Route::Messages, Some(_)) => view! { <Messages /> }.into_view(),
        }
    };

    view! {
        <Toaster />
        <div class="min-h-screen bg-gray-50 dark:bg-gray-900">{page}</div>
    }
}
