use crate::app::{use_backend, use_session};
use crate::config::POLL_INTERVAL;
use crate::message::Message;
use crate::poller::{ConversationPoller, SendOutcome, ThreadEntry};
use crate::state::ThreadKey;
use crate::toast::use_toasts;
use leptos::ev::SubmitEvent;
use leptos::logging::error;
use leptos::*;

/// Live chat about one item with one other user.
///
/// Polls while mounted; unmounting stops the poller and clears the interval.
#[component]
pub fn ChatBox(
    item_id: String,
    other_user_id: String,
    other_user_name: String,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    let toasts = use_toasts();
    let (entries, set_entries) = create_signal(Vec::<ThreadEntry>::new());
    let (draft, set_draft) = create_signal(String::new());
    let (sending, set_sending) = create_signal(false);

    let poller = ConversationPoller::new(
        use_backend(),
        use_session(),
        ThreadKey::new(item_id, other_user_id),
        move |fetched| set_entries.set(fetched),
    );

    let ticker = poller.clone();
    let interval = set_interval_with_handle(
        move || {
            let ticker = ticker.clone();
            spawn_local(async move { ticker.tick().await });
        },
        POLL_INTERVAL,
    );
    let first = poller.clone();
    spawn_local(async move { first.activate().await });

    let teardown = poller.clone();
    on_cleanup(move || {
        teardown.stop();
        match interval {
            Ok(handle) => handle.clear(),
            Err(err) => error!("Poll interval was never set: {err:?}"),
        }
    });

    let scroller = create_node_ref::<html::Div>();
    create_effect(move |_| {
        entries.track();
        if let Some(list) = scroller.get() {
            list.set_scroll_top(list.scroll_height());
        }
    });

    let send = move |ev: SubmitEvent| {
        ev.prevent_default();
        let text = draft.get_untracked();
        let sender = poller.clone();
        set_sending.set(true);
        spawn_local(async move {
            let outcome = sender.send(&text).await;
            set_sending.set(false);
            match outcome {
                Ok(SendOutcome::Sent) => {
                    set_draft.set(String::new());
                    sender.tick().await;
                }
                Ok(SendOutcome::Skipped) => {}
                Err(err) => {
                    error!("Failed to send message: {err}");
                    toasts.error("Failed to send message");
                }
            }
        });
    };

    view! {
        <div class="flex flex-col w-full max-w-md h-[28rem] bg-white border border-gray-200 rounded-lg shadow dark:bg-gray-800 dark:border-gray-700">
            <div class="flex items-center justify-between px-4 py-3 border-b border-gray-200 dark:border-gray-700">
                <h3 class="text-sm font-semibold text-gray-900 dark:text-white">
                    "Chat with " {other_user_name}
                </h3>
                <button
                    type="button"
                    class="p-1 text-gray-500 rounded hover:bg-gray-100 dark:hover:bg-gray-700"
                    on:click=move |_| on_close.call(())
                >
                    <svg viewBox="0 0 10 10" width="14">
                        <path
                            d="M1 1L9 9M1 9L9 1"
                            stroke="currentColor"
                            fill="currentColor"
                            stroke-width="2"
                            stroke-linecap="round"
                        />
                    </svg>
                </button>
            </div>
            <div class="flex-1 overflow-y-auto px-4" node_ref=scroller>
                <Show
                    when=move || entries.with(|entries| !entries.is_empty())
                    fallback=|| {
                        view! {
                            <p class="mt-8 text-sm text-center text-gray-500">
                                "No messages yet. Start the conversation!"
                            </p>
                        }
                    }
                >
                    <For
                        each=move || entries.get()
                        key=|entry| entry.message.id.clone()
                        children=move |entry| view! { <Message entry /> }
                    />
                </Show>
            </div>
            <form class="flex items-center gap-2 p-3 border-t border-gray-200 dark:border-gray-700" on:submit=send>
                <input
                    class="block w-full p-2.5 text-sm text-gray-900 bg-white rounded-lg border border-gray-300 dark:bg-gray-700 dark:border-gray-600 dark:text-white"
                    placeholder="Type a message..."
                    disabled=sending
                    on:input=move |ev| set_draft.set(event_target_value(&ev))
                    prop:value=draft
                />
                <button
                    type="submit"
                    class="inline-flex justify-center p-2 text-blue-600 rounded-full cursor-pointer hover:bg-blue-100 disabled:opacity-50 dark:text-blue-500"
                    disabled=move || sending.get() || draft.with(|draft| draft.trim().is_empty())
                >
                    <svg
                        aria-hidden="true"
                        class="w-5 h-5 rotate-90 rtl:-rotate-90"
                        xmlns="http://www.w3.org/2000/svg"
                        fill="currentColor"
                        viewBox="0 0 18 20"
                    >
                        <path d="m17.914 18.594-8-18a1 1 0 0 0-1.828 0l-8 18a1 1 0 0 0 1.157 1.376L8 18.281V9a1 1 0 0 1 2 0v9.281l6.758 1.689a1 1 0 0 0 1.156-1.376Z" />
                    </svg>
                    <span class="sr-only">"Send message"</span>
                </button>
            </form>
        </div>
    }
}
