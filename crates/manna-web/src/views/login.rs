//! Login screen
//!
//! Delegates to the identity provider through the backend. On failure the
//! credentials stay in the form so the operator can correct and resubmit.

use dioxus::prelude::*;

use crate::state::{AppState, Screen};

/// Admin sign-in screen
#[component]
pub fn LoginScreen() -> Element {
    let mut state = use_context::<AppState>();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    let submit = move |_| {
        if busy() {
            return;
        }
        busy.set(true);
        error.set(None);
        let backend = (state.backend)();
        spawn(async move {
            match backend.sign_in(email().trim(), &password()).await {
                Ok(identity) => {
                    tracing::info!("Signed in as {:?}", identity.email);
                    state.identity.set(Some(identity));
                    state.screen.set(Screen::Admin);
                    password.set(String::new());
                }
                Err(sign_in_error) => error.set(Some(sign_in_error.to_string())),
            }
            busy.set(false);
        });
    };

    rsx! {
        section {
            class: "login-screen",
            style: "max-width: 360px; margin: 48px auto; padding: 32px; background: #ffffff; border: 1px solid #e8e2d8; border-radius: 8px;",

            h2 {
                style: "margin: 0 0 16px; font-size: 20px;",
                "Admin sign in"
            }

            if let Some(message) = error() {
                div {
                    class: "form-error",
                    style: "margin-bottom: 12px; padding: 8px 12px; background: #f7e8e4; color: #8c3b2e; border-radius: 6px; font-size: 14px;",
                    "{message}"
                }
            }

            label {
                style: "display: block; font-size: 13px; color: #8a8378; margin-bottom: 4px;",
                "Email"
            }
            input {
                r#type: "email",
                value: "{email}",
                oninput: move |event| email.set(event.value()),
                style: "width: 100%; padding: 8px 12px; margin-bottom: 12px; border: 1px solid #d8d0c2; border-radius: 6px; font: inherit;",
            }

            label {
                style: "display: block; font-size: 13px; color: #8a8378; margin-bottom: 4px;",
                "Password"
            }
            input {
                r#type: "password",
                value: "{password}",
                oninput: move |event| password.set(event.value()),
                style: "width: 100%; padding: 8px 12px; margin-bottom: 20px; border: 1px solid #d8d0c2; border-radius: 6px; font: inherit;",
            }

            button {
                class: "sign-in-button",
                disabled: busy(),
                onclick: submit,
                style: "width: 100%; padding: 10px; background: #7a6a4f; color: #faf7f2; border: none; border-radius: 6px; cursor: pointer; font: inherit;",
                if busy() { "Signing in..." } else { "Sign in" }
            }
        }
    }
}
