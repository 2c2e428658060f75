use crate::api::Backend;
use crate::app::use_backend;
use crate::item_detail::status_badge;
use crate::listing::{CategoryFilter, ListingFilter};
use crate::loading::Loading;
use crate::nav::Nav;
use crate::post_item::PostItem;
use crate::route::{navigate, Route};
use crate::state::{Item, User};
use crate::toast::use_toasts;
use leptos::logging::error;
use leptos::*;

const EXCERPT_CHARS: usize = 80;

#[component]
fn ItemCard(item: Item) -> impl IntoView {
    let route = Route::Item(item.id.clone());
    let excerpt = item.excerpt(EXCERPT_CHARS);
    view! {
        <div
            class="flex flex-col cursor-pointer bg-white border border-gray-200 rounded-lg shadow hover:shadow-lg dark:bg-gray-800 dark:border-gray-700"
            on:click=move |_| navigate(&route)
        >
            <img class="w-full h-48 rounded-t-lg object-cover" src=item.image_url alt=item.title.clone() />
            <div class="flex flex-col gap-2 p-4">
                <div class="flex items-center justify-between">
                    <h3 class="text-lg font-semibold text-gray-900 dark:text-white">{item.title}</h3>
                    {status_badge(item.status)}
                </div>
                <p class="text-sm text-blue-600">{item.category}</p>
                <p class="text-sm text-gray-600 dark:text-gray-400">{excerpt}</p>
                <p class="text-xs text-gray-500">{item.location}</p>
            </div>
        </div>
    }
}

#[component]
pub fn Home(me: User) -> impl IntoView {
    let backend = use_backend();
    let toasts = use_toasts();

    let items = create_resource(
        || (),
        move |_| {
            let backend = backend.clone();
            async move { backend.items().await.map_err(|err| err.to_string()) }
        },
    );
    create_effect(move |_| {
        if let Some(Err(err)) = items.get() {
            error!("Failed to load items: {err}");
            toasts.error("Failed to load items");
        }
    });

    let filter = create_rw_signal(ListingFilter::default());
    let shown = create_memo(move |_| {
        items.with(|loaded| match loaded {
            Some(Ok(items)) => filter.with(|filter| filter.apply(items)),
            _ => vec![],
        })
    });
    let (posting, set_posting) = create_signal(false);

    view! {
        <Nav me />
        <div class="max-w-6xl mx-auto p-4">
            <section class="py-8 text-center">
                <h1 class="text-4xl font-bold text-gray-900 dark:text-white">"Exchange, Borrow & Share"</h1>
                <p class="mt-2 text-gray-500">"Connect with fellow CMRCET students"</p>
            </section>
            <div class="flex flex-wrap items-center gap-3 mb-6">
                <input
                    type="search"
                    class="flex-1 p-2.5 text-sm text-gray-900 bg-white border border-gray-300 rounded-lg dark:bg-gray-700 dark:border-gray-600 dark:text-white"
                    placeholder="Search items..."
                    prop:value=move || filter.with(|filter| filter.query.clone())
                    on:input=move |ev| filter.update(|filter| filter.query = event_target_value(&ev))
                />
                <select
                    class="p-2.5 text-sm text-gray-900 bg-white border border-gray-300 rounded-lg dark:bg-gray-700 dark:border-gray-600 dark:text-white"
                    on:change=move |ev| {
                        let category = CategoryFilter::from_label(&event_target_value(&ev));
                        filter.update(|filter| filter.category = category);
                    }
                >
                    {CategoryFilter::options()
                        .map(|option| {
                            view! {
                                <option
                                    value=option.label()
                                    selected=move || filter.with(|filter| filter.category == option)
                                >
                                    {option.label()}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
                <button
                    type="button"
                    class="px-4 py-2.5 text-sm text-white bg-blue-700 rounded-lg hover:bg-blue-800"
                    on:click=move |_| set_posting.set(true)
                >
                    "Post Item"
                </button>
            </div>
            <Suspense fallback=move || view! { <Loading /> }>
                {move || {
                    items
                        .get()
                        .map(|_| {
                            view! {
                                <Show
                                    when=move || shown.with(|shown| !shown.is_empty())
                                    fallback=|| view! { <p class="mt-16 text-center text-gray-500">"No items found"</p> }
                                >
                                    <div class="grid gap-4 sm:grid-cols-2 lg:grid-cols-3">
                                        <For
                                            each=move || shown.get()
                                            key=|item| item.id.clone()
                                            children=move |item| view! { <ItemCard item /> }
                                        />
                                    </div>
                                </Show>
                            }
                        })
                }}
            </Suspense>
            <Show when=move || posting.get()>
                <PostItem on_close=move |_| set_posting.set(false) on_posted=move |_| items.refetch() />
            </Show>
        </div>
    }
}
