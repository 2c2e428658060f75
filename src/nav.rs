use crate::app::{use_session, use_user};
use crate::route::{navigate, Route};
use crate::state::User;
use leptos::*;

const NAV_BUTTON: &str = "inline-flex items-center px-3 py-2 text-sm font-medium text-gray-900 bg-white border border-gray-200 rounded-lg hover:bg-gray-100 dark:bg-gray-800 dark:text-white dark:border-gray-600";

#[component]
pub fn Nav(me: User) -> impl IntoView {
    let session = use_session();
    let user = use_user();
    let logout = move |_| {
        session.logout();
        user.set(None);
        navigate(&Route::Auth);
    };
    view! {
        <nav class="bg-white border-b border-gray-200 dark:bg-gray-800 dark:border-gray-700">
            <div class="flex flex-wrap items-center justify-between max-w-6xl mx-auto p-4">
                <a href=Route::Home.to_hash() class="text-2xl font-semibold text-gray-900 dark:text-white">
                    "Lend A Hand"
                </a>
                <div class="flex items-center gap-3">
                    <button type="button" class=NAV_BUTTON on:click=move |_| navigate(&Route::Messages)>
                        "Messages"
                    </button>
                    <button type="button" class=NAV_BUTTON on:click=move |_| navigate(&Route::MyItems)>
                        "My Items"
                    </button>
                    <span class="text-sm text-gray-700 dark:text-gray-300" title=me.email>
                        {me.name}
                    </span>
                    <button
                        type="button"
                        class="p-2 text-gray-500 rounded-lg hover:bg-gray-100 dark:hover:bg-gray-700"
                        title="Log out"
                        on:click=logout
                    >
                        <svg viewBox="0 0 10 10" width="16">
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
            </div>
        </nav>
    }
}

/// Back link used by every page below the home view.
#[component]
pub fn BackButton() -> impl IntoView {
    view! {
        <button
            type="button"
            class="inline-flex items-center gap-1 text-sm font-medium text-gray-600 hover:text-gray-900 dark:text-gray-300"
            on:click=move |_| navigate(&Route::Home)
        >
            "← Back"
        </button>
    }
}
