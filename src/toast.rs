use crate::config::TOAST_LIFETIME;
use leptos::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    id: u64,
    tone: Tone,
    text: String,
}

/// Transient notifications, shared through context.
#[derive(Clone, Copy)]
pub struct Toasts {
    entries: RwSignal<Vec<Toast>>,
    next_id: StoredValue<u64>,
}

impl Toasts {
    pub fn new() -> Self {
        Self {
            entries: create_rw_signal(vec![]),
            next_id: store_value(0),
        }
    }

    pub fn success(&self, text: impl Into<String>) {
        self.push(Tone::Success, text.into());
    }

    pub fn error(&self, text: impl Into<String>) {
        self.push(Tone::Error, text.into());
    }

    fn push(&self, tone: Tone, text: String) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);
        self.entries.update(|entries| entries.push(Toast { id, tone, text }));
        let entries = self.entries;
        set_timeout(
            move || entries.update(|entries| entries.retain(|toast| toast.id != id)),
            TOAST_LIFETIME,
        );
    }
}

pub fn use_toasts() -> Toasts {
    expect_context::<Toasts>()
}

#[component]
pub fn Toaster() -> impl IntoView {
    let toasts = use_toasts();
    view! {
        <div class="fixed top-4 right-4 z-50 flex flex-col gap-2">
            <For
                each=move || toasts.entries.get()
                key=|toast| toast.id
                children=move |toast| {
                    let class = match toast.tone {
                        Tone::Success => "px-4 py-2 rounded-lg shadow text-sm text-white bg-green-600",
                        Tone::Error => "px-4 py-2 rounded-lg shadow text-sm text-white bg-red-600",
                    };
                    view! {
                        <div class=class role="status">
                            {toast.text}
                        </div>
                    }
                }
            />
        </div>
    }
}
