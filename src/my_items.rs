use crate::api::Backend;
use crate::app::{use_backend, use_session};
use crate::item_detail::status_badge;
use crate::items::toggle_status;
use crate::loading::Loading;
use crate::nav::BackButton;
use crate::route::{navigate, Route};
use crate::state::{Item, User};
use crate::toast::use_toasts;
use leptos::logging::error;
use leptos::*;

#[component]
fn OwnItemCard(item: Item, #[prop(into)] on_toggle: Callback<Item>) -> impl IntoView {
    let item_id = item.id.clone();
    let label = item.status.toggle_label();
    let toggled = item.clone();
    view! {
        <div class="flex flex-col bg-white border border-gray-200 rounded-lg shadow dark:bg-gray-800 dark:border-gray-700">
            <img class="w-full h-48 rounded-t-lg object-cover" src=item.image_url alt=item.title.clone() />
            <div class="flex flex-col flex-1 gap-2 p-4">
                <div class="flex items-center justify-between">
                    <h3 class="text-lg font-semibold text-gray-900 dark:text-white">{item.title}</h3>
                    {status_badge(item.status)}
                </div>
                <p class="text-sm text-gray-500">{item.category}</p>
                <div class="flex gap-2 mt-auto">
                    <button
                        type="button"
                        class="flex-1 px-3 py-2 text-sm text-gray-900 bg-white border border-gray-200 rounded-lg hover:bg-gray-100"
                        on:click=move |_| navigate(&Route::Item(item_id.clone()))
                    >
                        "View Details"
                    </button>
                    <button
                        type="button"
                        class="flex-1 px-3 py-2 text-sm text-white bg-blue-700 rounded-lg hover:bg-blue-800"
                        on:click=move |_| on_toggle.call(toggled.clone())
                    >
                        {label}
                    </button>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn MyItems(me: User) -> impl IntoView {
    let backend = use_backend();
    let session = use_session();
    let toasts = use_toasts();

    let loader = backend.clone();
    let items = create_resource(
        move || me.id.clone(),
        move |user_id| {
            let backend = loader.clone();
            async move { backend.user_items(&user_id).await.map_err(|err| err.to_string()) }
        },
    );
    create_effect(move |_| {
        if let Some(Err(err)) = items.get() {
            error!("Failed to load your items: {err}");
            toasts.error("Failed to load your items");
        }
    });

    let toggle = Callback::new(move |item: Item| {
        let backend = backend.clone();
        let session = session.clone();
        spawn_local(async move {
            match toggle_status(&backend, &session, &item.id, item.status).await {
                Ok(next) => {
                    toasts.success(format!("Item marked as {next}"));
                    items.refetch();
                }
                Err(err) => {
                    error!("Failed to update {}: {err}", item.id);
                    toasts.error("Failed to update item status");
                }
            }
        });
    });

    let listing = move || {
        items.get().map(|loaded| {
            let items = loaded.unwrap_or_default();
            if items.is_empty() {
                return view! {
                    <div class="flex flex-col items-center gap-4 mt-16 text-gray-500">
                        <p>"You haven't posted any items yet"</p>
                        <button
                            type="button"
                            class="px-4 py-2 text-sm text-white bg-blue-700 rounded-lg hover:bg-blue-800"
                            on:click=move |_| navigate(&Route::Home)
                        >
                            "Post Your First Item"
                        </button>
                    </div>
                }
                .into_view();
            }
            view! {
                <div class="grid gap-4 sm:grid-cols-2 lg:grid-cols-3">
                    {items
                        .into_iter()
                        .map(|item| view! { <OwnItemCard item on_toggle=toggle /> })
                        .collect_view()}
                </div>
            }
            .into_view()
        })
    };

    view! {
        <div class="max-w-6xl mx-auto p-4">
            <div class="flex items-center gap-4 mb-6">
                <BackButton />
                <h1 class="text-2xl font-bold text-gray-900 dark:text-white">"My Items"</h1>
            </div>
            <Suspense fallback=move || view! { <Loading /> }>{listing}</Suspense>
        </div>
    }
}
