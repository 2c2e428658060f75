mod api;
mod app;
mod config;
mod conversation;
mod error;
mod home;
mod item_detail;
mod items;
mod listing;
mod loading;
mod login;
mod message;
mod messages;
mod my_items;
mod nav;
mod poller;
mod post_item;
mod route;
mod session;
mod state;
#[cfg(test)]
mod testing;
mod toast;

use app::*;
use config::ApiConfig;
use leptos::logging::error;
use leptos::*;

fn main() {
    console_error_panic_hook::set_once();
    match ApiConfig::from_env() {
        Ok(config) => mount_to_body(move || {
            view! { <App config /> }
        }),
        Err(err) => error!("Invalid API url: {err}"),
    }
}
