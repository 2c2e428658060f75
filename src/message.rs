use crate::poller::{Direction, ThreadEntry};
use chrono::{DateTime, Local, Utc};
use leptos::*;
use pulldown_cmark::{Event, Parser};

/// Markdown to HTML with any raw HTML in the source shown as text.
pub fn render_markdown(source: &str) -> String {
    let parser = Parser::new(source).map(|event| match event {
        Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
        event => event,
    });
    let mut parsed = String::new();
    pulldown_cmark::html::push_html(&mut parsed, parser);
    parsed
}

pub fn clock_time(at: DateTime<Utc>) -> String {
    DateTime::<Local>::from(at).format("%H:%M").to_string()
}

#[component]
pub fn Message(entry: ThreadEntry) -> impl IntoView {
    let is_me = entry.direction == Direction::Sent;
    let message = entry.message;
    let parsed = render_markdown(&message.message);
    let datemsg = clock_time(message.created_at);
    let bubble = if is_me {
        "px-3 py-2 rounded-xl text-sm bg-blue-600 text-white"
    } else {
        "px-3 py-2 rounded-xl text-sm bg-gray-100 text-gray-900 dark:bg-gray-700 dark:text-white"
    };
    view! {
        <div class="flex items-start my-2 gap-2.5" class:flex-row-reverse=is_me data-message-id=message.id>
            <div class="flex flex-col gap-1 max-w-[80%]">
                <Show when=move || !is_me>
                    <span class="text-xs font-semibold text-gray-900 dark:text-white">
                        {message.sender_name.clone()}
                    </span>
                </Show>
                <div class=bubble inner_html=parsed />
                <span class="text-xs font-normal text-gray-500 dark:text-gray-400" class:text-right=is_me>
                    {datemsg}
                </span>
            </div>
        </div>
    }
}
