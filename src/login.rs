use crate::app::{use_backend, use_session, use_user};
use crate::route::{navigate, Route};
use crate::state::{Credentials, Signup};
use crate::toast::use_toasts;
use leptos::ev::SubmitEvent;
use leptos::logging::log;
use leptos::*;

const INPUT: &str = "bg-gray-50 border border-gray-300 text-gray-900 text-sm rounded-lg focus:ring-blue-500 focus:border-blue-500 block w-full p-2.5 dark:bg-gray-700 dark:border-gray-600 dark:text-white";

fn field(
    form: RwSignal<Signup>,
    name: &'static str,
    label: &'static str,
    kind: &'static str,
    placeholder: &'static str,
    get: fn(&Signup) -> &String,
    set: fn(&mut Signup, String),
) -> impl IntoView {
    view! {
        <div class="mb-4">
            <label for=name class="block mb-2 text-sm font-medium text-gray-900 dark:text-white">
                {label}
            </label>
            <input
                id=name
                name=name
                type=kind
                class=INPUT
                placeholder=placeholder
                required
                prop:value=move || form.with(|form| get(form).clone())
                on:input=move |ev| form.update(|form| set(form, event_target_value(&ev)))
            />
        </div>
    }
}

#[component]
pub fn Login() -> impl IntoView {
    let backend = use_backend();
    let session = use_session();
    let user = use_user();
    let toasts = use_toasts();

    let (is_login, set_is_login) = create_signal(true);
    let (busy, set_busy) = create_signal(false);
    let form = create_rw_signal(Signup::default());

    let submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let backend = backend.clone();
        let session = session.clone();
        let fields = form.get_untracked();
        let login = is_login.get_untracked();
        set_busy.set(true);
        spawn_local(async move {
            let result = if login {
                let credentials = Credentials {
                    email: fields.email,
                    password: fields.password,
                };
                session.login(&backend, &credentials).await
            } else {
                session.signup(&backend, &fields).await
            };
            match result {
                Ok(me) => {
                    log!("Signed in as {}", me.id);
                    toasts.success(if login {
                        "Login successful!"
                    } else {
                        "Account created successfully!"
                    });
                    user.set(Some(me));
                    navigate(&Route::Home);
                }
                Err(err) => toasts.error(err.notice("Something went wrong")),
            }
            set_busy.set(false);
        });
    };

    view! {
        <div class="flex items-center justify-center w-full h-screen">
            <div class="w-full max-w-sm p-6 bg-white border border-gray-200 rounded-lg shadow dark:bg-gray-800 dark:border-gray-700">
                <h1 class="text-2xl font-bold text-gray-900 dark:text-white">"Lend A Hand"</h1>
                <p class="mb-6 text-sm text-gray-500">"CMRCET Student Exchange Platform"</p>
                <form on:submit=submit>
                    <Show when=move || !is_login.get()>
                        {field(form, "name", "Full Name", "text", "Enter your name", |f| &f.name, |f, v| f.name = v)}
                    </Show>
                    {field(form, "email", "College Email", "email", "rollno@cmrcet.ac.in", |f| &f.email, |f, v| f.email = v)}
                    {field(form, "password", "Password", "password", "Enter your password", |f| &f.password, |f, v| f.password = v)}
                    <Show when=move || !is_login.get()>
                        {field(form, "phone", "Phone Number", "tel", "Enter your phone number", |f| &f.phone, |f, v| f.phone = v)}
                    </Show>
                    <button
                        type="submit"
                        class="w-full text-white bg-blue-700 hover:bg-blue-800 font-medium rounded-lg text-sm px-5 py-2.5 disabled:cursor-not-allowed"
                        disabled=busy
                    >
                        {move || {
                            if busy.get() {
                                "Please wait..."
                            } else if is_login.get() {
                                "Login"
                            } else {
                                "Sign Up"
                            }
                        }}
                    </button>
                </form>
                <p class="mt-4 text-sm text-gray-500">
                    {move || if is_login.get() { "Don't have an account? " } else { "Already have an account? " }}
                    <button
                        type="button"
                        class="font-medium text-blue-600 hover:underline"
                        on:click=move |_| set_is_login.update(|login| *login = !*login)
                    >
                        {move || if is_login.get() { "Sign Up" } else { "Login" }}
                    </button>
                </p>
            </div>
        </div>
    }
}
