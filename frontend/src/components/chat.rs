use leptos::ev;
use leptos::html::Div;
use leptos::prelude::*;

use crate::dom;
use crate::state::ChatState;

/// The chat widget: scrolling transcript, typing indicator, input row.
#[component]
pub fn ChatPanel() -> impl IntoView {
    let state = expect_context::<ChatState>();
    let chat_box = NodeRef::<Div>::new();

    // After every transcript change: enforce video styling on freshly
    // rendered bot markup, then pin the panel to the bottom.
    Effect::new(move |_| {
        state.transcript.track();
        if let Some(el) = chat_box.get() {
            dom::fix_video_elements(&el);
            dom::scroll_to_bottom(&el);
        }
    });

    view! {
        <div class="chat-widget">
            <div class="chat-box" node_ref=chat_box>
                <For
                    each=move || state.transcript.get().entries().to_vec()
                    key=|m| m.id
                    let:msg
                >
                    <div class=msg.role.css_class() inner_html=msg.markup></div>
                </For>
                {move || {
                    state.transcript.get().is_typing().then(|| {
                        view! {
                            <div class="chat-message bot typing-indicator">
                                <span></span>
                                <span></span>
                                <span></span>
                            </div>
                        }
                    })
                }}
            </div>
            <ChatInput />
        </div>
    }
}

/// Input row: text field with Enter-to-send plus a send button.
#[component]
fn ChatInput() -> impl IntoView {
    let state = expect_context::<ChatState>();

    let on_keydown = move |ev: ev::KeyboardEvent| {
        if ev.key() == "Enter" {
            state.send_message();
        }
    };

    view! {
        <div class="input-row">
            <input
                type="text"
                placeholder="Skriv en melding…"
                prop:value=state.input
                on:input=move |ev| {
                    state.set_input.set(event_target_value(&ev));
                }
                on:keydown=on_keydown
            />
            <button class="send-btn" on:click=move |_| state.send_message()>
                "Send"
            </button>
        </div>
    }
}
