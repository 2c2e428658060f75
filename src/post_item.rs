use crate::app::{use_backend, use_session};
use crate::items::{submit_item, ImageAttachment, ItemDraft};
use crate::state::Category;
use crate::toast::use_toasts;
use leptos::ev::SubmitEvent;
use leptos::logging::{error, log};
use leptos::*;
use wasm_bindgen_futures::JsFuture;

const INPUT: &str = "bg-gray-50 border border-gray-300 text-gray-900 text-sm rounded-lg block w-full p-2.5 dark:bg-gray-700 dark:border-gray-600 dark:text-white";

async fn read_image(file: web_sys::File) -> Option<ImageAttachment> {
    let buffer = match JsFuture::from(file.array_buffer()).await {
        Ok(buffer) => buffer,
        Err(err) => {
            error!("Could not read {}: {err:?}", file.name());
            return None;
        }
    };
    let mime = match file.type_() {
        mime if mime.is_empty() => "application/octet-stream".to_string(),
        mime => mime,
    };
    Some(ImageAttachment {
        name: file.name(),
        mime,
        bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
    })
}

fn text_field(
    draft: RwSignal<ItemDraft>,
    label: &'static str,
    placeholder: &'static str,
    get: fn(&ItemDraft) -> &String,
    set: fn(&mut ItemDraft, String),
) -> impl IntoView {
    view! {
        <label class="block mb-4">
            <span class="block mb-2 text-sm font-medium text-gray-900 dark:text-white">{label}</span>
            <input
                class=INPUT
                placeholder=placeholder
                required
                prop:value=move || draft.with(|draft| get(draft).clone())
                on:input=move |ev| draft.update(|draft| set(draft, event_target_value(&ev)))
            />
        </label>
    }
}

/// Shows `next` as the preview and hands the replaced object URL to `revoke`.
fn swap_preview(preview: RwSignal<Option<String>>, next: Option<String>, revoke: impl FnOnce(&str)) {
    if let Some(old) = preview.get_untracked() {
        revoke(&old);
    }
    preview.set(next);
}

fn revoke_object_url(url: &str) {
    if let Err(err) = web_sys::Url::revoke_object_url(url) {
        error!("Could not revoke {url}: {err:?}");
    }
}

/// Dialog for posting a new item. Closes itself only after a successful post.
#[component]
pub fn PostItem(
    #[prop(into)] on_close: Callback<()>,
    #[prop(into)] on_posted: Callback<()>,
) -> impl IntoView {
    let backend = use_backend();
    let session = use_session();
    let toasts = use_toasts();
    let draft = create_rw_signal(ItemDraft::default());
    let preview = create_rw_signal(None::<String>);
    let (posting, set_posting) = create_signal(false);
    let picks = store_value(0u64);

    on_cleanup(move || {
        if let Some(Some(url)) = preview.try_get_untracked() {
            revoke_object_url(&url);
        }
    });

    let pick_image = move |ev: ev::Event| {
        let Some(file) = event_target::<web_sys::HtmlInputElement>(&ev)
            .files()
            .and_then(|files| files.get(0))
        else {
            return;
        };
        let url = match web_sys::Url::create_object_url_with_blob(&file) {
            Ok(url) => Some(url),
            Err(err) => {
                error!("No preview for {}: {err:?}", file.name());
                None
            }
        };
        swap_preview(preview, url, revoke_object_url);

        let pick = picks.get_value() + 1;
        picks.set_value(pick);
        draft.update(|draft| {
            draft.image = None;
            draft.image_loading = true;
        });
        spawn_local(async move {
            let image = read_image(file).await;
            // A newer pick owns the draft now.
            if picks.get_value() != pick {
                return;
            }
            draft.update(|draft| {
                draft.image = image;
                draft.image_loading = false;
            });
        });
    };

    let submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let backend = backend.clone();
        let session = session.clone();
        let current = draft.get_untracked();
        set_posting.set(true);
        spawn_local(async move {
            match submit_item(&backend, &session, &current).await {
                Ok(item) => {
                    log!("Posted item {}", item.id);
                    toasts.success("Item posted successfully!");
                    draft.set(ItemDraft::default());
                    swap_preview(preview, None, revoke_object_url);
                    on_posted.call(());
                    on_close.call(());
                }
                Err(err) => toasts.error(err.notice("Failed to post item")),
            }
            set_posting.set(false);
        });
    };

    view! {
        <div class="fixed inset-0 z-40 flex items-center justify-center bg-black/50">
            <div class="w-full max-w-lg max-h-[90vh] overflow-y-auto p-6 bg-white rounded-lg shadow dark:bg-gray-800">
                <div class="flex items-center justify-between mb-4">
                    <h2 class="text-xl font-semibold text-gray-900 dark:text-white">"Post an Item"</h2>
                    <button
                        type="button"
                        class="p-1 text-gray-500 rounded hover:bg-gray-100 dark:hover:bg-gray-700"
                        on:click=move |_| on_close.call(())
                    >
                        "✕"
                    </button>
                </div>
                <form on:submit=submit>
                    <label class="block mb-4">
                        <span class="block mb-2 text-sm font-medium text-gray-900 dark:text-white">"Image"</span>
                        <input type="file" accept="image/*" class=INPUT on:change=pick_image />
                    </label>
                    {move || {
                        preview
                            .get()
                            .map(|url| view! { <img class="w-full h-48 mb-4 rounded-lg object-cover" src=url /> })
                    }}
                    {text_field(draft, "Title", "What are you offering?", |d| &d.title, |d, v| d.title = v)}
                    <label class="block mb-4">
                        <span class="block mb-2 text-sm font-medium text-gray-900 dark:text-white">"Description"</span>
                        <textarea
                            class=INPUT
                            rows="4"
                            placeholder="Condition, edition, anything useful"
                            required
                            prop:value=move || draft.with(|draft| draft.description.clone())
                            on:input=move |ev| draft.update(|draft| draft.description = event_target_value(&ev))
                        />
                    </label>
                    <label class="block mb-4">
                        <span class="block mb-2 text-sm font-medium text-gray-900 dark:text-white">"Category"</span>
                        <select
                            class=INPUT
                            on:change=move |ev| {
                                match event_target_value(&ev).parse::<Category>() {
                                    Ok(category) => draft.update(|draft| draft.category = category),
                                    Err(err) => error!("{err}"),
                                }
                            }
                        >
                            {Category::ALL
                                .into_iter()
                                .map(|category| {
                                    view! {
                                        <option
                                            value=category.as_str()
                                            selected=move || draft.with(|draft| draft.category == category)
                                        >
                                            {category.as_str()}
                                        </option>
                                    }
                                })
                                .collect_view()}
                        </select>
                    </label>
                    {text_field(draft, "Meeting Location", "e.g. Library, Block A", |d| &d.location, |d, v| d.location = v)}
                    {text_field(draft, "Contact Phone", "Your phone number", |d| &d.contact_phone, |d, v| d.contact_phone = v)}
                    <button
                        type="submit"
                        class="w-full text-white bg-blue-700 hover:bg-blue-800 font-medium rounded-lg text-sm px-5 py-2.5 disabled:cursor-not-allowed"
                        disabled=move || posting.get() || draft.with(|draft| draft.image_loading)
                    >
                        {move || {
                            if posting.get() {
                                "Posting..."
                            } else if draft.with(|draft| draft.image_loading) {
                                "Reading image..."
                            } else {
                                "Post Item"
                            }
                        }}
                    </button>
                </form>
            </div>
        </div>
    }
}
