use crate::api::Backend;
use crate::app::use_backend;
use crate::conversation::ChatBox;
use crate::loading::Loading;
use crate::message::render_markdown;
use crate::nav::BackButton;
use crate::state::{Item, ItemStatus, User};
use crate::toast::use_toasts;
use leptos::logging::error;
use leptos::*;

pub fn status_badge(status: ItemStatus) -> impl IntoView {
    let class = match status {
        ItemStatus::Available => "px-2 py-1 text-xs font-semibold rounded bg-green-100 text-green-800",
        ItemStatus::Taken => "px-2 py-1 text-xs font-semibold rounded bg-red-100 text-red-800",
    };
    view! { <span class=class>{status.to_string()}</span> }
}

#[component]
fn ContactCard(item: Item) -> impl IntoView {
    let (chatting, set_chatting) = create_signal(false);
    let mail = format!("mailto:{}", item.contact_email);
    let call = format!("tel:{}", item.contact_phone);
    let owner_name = item.contact_name.clone();
    view! {
        <div class="p-4 mt-6 bg-gray-50 rounded-lg border border-gray-200 dark:bg-gray-700 dark:border-gray-600">
            <h3 class="mb-2 text-sm font-semibold text-gray-900 dark:text-white">"Contact Information"</h3>
            <p class="text-sm text-gray-700 dark:text-gray-300">{item.contact_name.clone()}</p>
            <a class="block text-sm text-blue-600 hover:underline" href=mail>{item.contact_email.clone()}</a>
            <a class="block text-sm text-blue-600 hover:underline" href=call>{item.contact_phone.clone()}</a>
            <button
                type="button"
                class="w-full mt-4 px-4 py-2 text-sm text-white bg-blue-700 rounded-lg hover:bg-blue-800"
                on:click=move |_| set_chatting.set(true)
            >
                "Message " {owner_name}
            </button>
        </div>
        <Show when=move || chatting.get()>
            <div class="fixed bottom-4 right-4">
                <ChatBox
                    item_id=item.id.clone()
                    other_user_id=item.user_id.clone()
                    other_user_name=item.contact_name.clone()
                    on_close=move |_| set_chatting.set(false)
                />
            </div>
        </Show>
    }
}

#[component]
pub fn ItemDetail(item_id: String, me: User) -> impl IntoView {
    let backend = use_backend();
    let toasts = use_toasts();
    let me_id = store_value(me.id);

    let item = create_resource(
        move || item_id.clone(),
        move |item_id| {
            let backend = backend.clone();
            async move { backend.item(&item_id).await.map_err(|err| err.to_string()) }
        },
    );
    create_effect(move |_| {
        if let Some(Err(err)) = item.get() {
            error!("Failed to load item: {err}");
            toasts.error("Failed to load item");
        }
    });

    let details = move || {
        item.get().map(|loaded| match loaded {
            Err(_) => view! {
                <p class="mt-16 text-center text-gray-500">"Item not found"</p>
            }
            .into_view(),
            Ok(item) => {
                let owned = me_id.with_value(|id| item.user_id == *id);
                let description = render_markdown(&item.description);
                let posted = item.created_at.format("%d %b %Y").to_string();
                view! {
                    <div class="grid gap-6 md:grid-cols-2">
                        <img class="w-full rounded-lg object-cover" src=item.image_url.clone() alt=item.title.clone() />
                        <div>
                            {status_badge(item.status)}
                            <h1 class="mt-2 text-3xl font-bold text-gray-900 dark:text-white">{item.title.clone()}</h1>
                            <p class="text-sm text-blue-600">{item.category.clone()}</p>
                            <div class="mt-4 text-gray-700 dark:text-gray-300" inner_html=description />
                            <p class="mt-4 text-sm text-gray-600 dark:text-gray-400">
                                "Meeting location: " {item.location.clone()}
                            </p>
                            <p class="text-sm text-gray-500">"Posted on " {posted}</p>
                            {if owned {
                                view! {
                                    <p class="p-4 mt-6 text-sm text-blue-800 bg-blue-50 rounded-lg">
                                        "This is your item. Others can see your contact information."
                                    </p>
                                }
                                    .into_view()
                            } else {
                                view! { <ContactCard item /> }.into_view()
                            }}
                        </div>
                    </div>
                }
                .into_view()
            }
        })
    };

    view! {
        <div class="max-w-6xl mx-auto p-4">
            <div class="mb-6">
                <BackButton />
            </div>
            <Suspense fallback=move || view! { <Loading /> }>{details}</Suspense>
        </div>
    }
}
