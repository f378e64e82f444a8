mod api;
mod components;
mod dom;
mod models;
mod state;
mod transcript;

use leptos::mount::mount_to_body;
use leptos::prelude::*;

use components::chat::ChatPanel;
use state::ChatState;

/// Root application component.
#[component]
fn App() -> impl IntoView {
    let state = ChatState::provide();

    // Acquire a session as soon as the page loads
    state.start_session_on_load();

    view! {
        <div class="app-container">
            <ChatPanel />
        </div>
    }
}

fn main() {
    console_log::init_with_level(log::Level::Debug).expect("Failed to init logger");
    mount_to_body(App);
}
