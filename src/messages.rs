use crate::api::Backend;
use crate::app::{use_backend, use_session};
use crate::conversation::ChatBox;
use crate::error::ApiError;
use crate::loading::Loading;
use crate::message::clock_time;
use crate::nav::BackButton;
use crate::session::Session;
use crate::route::{navigate, Route};
use crate::state::ConversationSummary;
use crate::toast::use_toasts;
use leptos::logging::error;
use leptos::*;

/// Threads the signed-in user takes part in, as summarized by the server.
pub async fn load_conversations<B: Backend>(
    backend: &B,
    session: &Session,
) -> Result<Vec<ConversationSummary>, ApiError> {
    let token = session.require_token()?;
    backend.conversations(&token).await
}

#[component]
fn ConversationRow(
    conversation: ConversationSummary,
    #[prop(into)] on_select: Callback<ConversationSummary>,
) -> impl IntoView {
    let unread = conversation.unread_count;
    let selected = conversation.clone();
    view! {
        <li
            class="flex items-center gap-3 p-3 cursor-pointer hover:bg-gray-100 dark:hover:bg-gray-700"
            on:click=move |_| on_select.call(selected.clone())
        >
            <img
                class="w-12 h-12 rounded object-cover"
                src=conversation.item.image_url
                alt=conversation.item.title.clone()
            />
            <div class="flex-1 min-w-0">
                <div class="flex items-center justify-between">
                    <span class="text-sm font-semibold text-gray-900 truncate dark:text-white">
                        {conversation.item.title}
                    </span>
                    <span class="text-xs text-gray-500">{clock_time(conversation.last_message_at)}</span>
                </div>
                <p class="text-xs text-gray-600 dark:text-gray-300">{conversation.other_user.name}</p>
                <p class="text-sm text-gray-500 truncate">{conversation.last_message}</p>
            </div>
            <Show when=move || { unread > 0 }>
                <span class="inline-flex items-center justify-center w-6 h-6 text-xs font-semibold text-white bg-blue-600 rounded-full">
                    {unread}
                </span>
            </Show>
        </li>
    }
}

#[component]
pub fn Messages() -> impl IntoView {
    let backend = use_backend();
    let session = use_session();
    let toasts = use_toasts();

    let conversations = create_resource(
        || (),
        move |_| {
            let backend = backend.clone();
            let session = session.clone();
            async move {
                load_conversations(&backend, &session)
                    .await
                    .map_err(|err| err.to_string())
            }
        },
    );
    create_effect(move |_| {
        if let Some(Err(err)) = conversations.get() {
            error!("Failed to load conversations: {err}");
            toasts.error("Failed to load conversations");
        }
    });

    let (selected, set_selected) = create_signal(None::<ConversationSummary>);

    view! {
        <div class="max-w-6xl mx-auto p-4">
            <div class="flex items-center gap-4 mb-6">
                <BackButton />
                <h1 class="text-2xl font-bold text-gray-900 dark:text-white">"Messages"</h1>
            </div>
            <Suspense fallback=move || view! { <Loading /> }>
                {move || {
                    conversations
                        .get()
                        .map(|loaded| {
                            let conversations = loaded.unwrap_or_default();
                            if conversations.is_empty() {
                                view! {
                                    <div class="flex flex-col items-center gap-4 mt-16 text-gray-500">
                                        <p>"No messages yet"</p>
                                        <button
                                            type="button"
                                            class="px-4 py-2 text-sm text-white bg-blue-700 rounded-lg hover:bg-blue-800"
                                            on:click=move |_| navigate(&Route::Home)
                                        >
                                            "Browse Items"
                                        </button>
                                    </div>
                                }
                                    .into_view()
                            } else {
                                view! {
                                    <ul class="divide-y divide-gray-200 bg-white rounded-lg border border-gray-200 dark:bg-gray-800 dark:border-gray-700 dark:divide-gray-700">
                                        {conversations
                                            .into_iter()
                                            .map(|conversation| {
                                                view! {
                                                    <ConversationRow
                                                        conversation
                                                        on_select=move |chosen: ConversationSummary| set_selected.set(Some(chosen))
                                                    />
                                                }
                                            })
                                            .collect_view()}
                                    </ul>
                                }
                                    .into_view()
                            }
                        })
                }}
            </Suspense>
            <div class="fixed bottom-4 right-4">
                {move || {
                    selected
                        .get()
                        .map(|chat| {
                            view! {
                                <ChatBox
                                    item_id=chat.item.id
                                    other_user_id=chat.other_user.id
                                    other_user_name=chat.other_user.name
                                    on_close=move |_| {
                                        set_selected.set(None);
                                        conversations.refetch();
                                    }
                                />
                            }
                        })
                }}
            </div>
        </div>
    }
}
