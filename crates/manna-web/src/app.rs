//! Main application component

use dioxus::prelude::*;

use manna_core::selection::Selection;

use crate::bootstrap_config::BootstrapConfig;
use crate::components::ReaderModal;
use crate::services::Backend;
use crate::state::{AppState, Screen};
use crate::views::{AdminDashboard, LoginScreen, ReadingFeed};

/// Root application component
#[component]
pub fn App() -> Element {
    let backend = use_signal(|| Backend::from_bootstrap(&BootstrapConfig::from_build_env()));
    let mut screen = use_signal(|| Screen::Reading);
    let mut identity = use_signal(|| None);
    let selection = use_signal(Selection::new);
    let mut selection_revision = use_signal(|| 0u64);
    let mut status_line = use_signal(|| None::<String>);

    // Re-render readers whenever the selection container changes.
    use_future(move || async move {
        let mut revisions = selection().subscribe();
        loop {
            if revisions.changed().await.is_err() {
                break;
            }
            selection_revision.set(*revisions.borrow());
        }
    });

    use_context_provider(|| AppState {
        backend,
        screen,
        identity,
        selection,
        selection_revision,
        status_line,
    });

    // While the reader is open the page behind it must not scroll.
    let _ = selection_revision();
    let overflow = if selection().scroll_locked() {
        "hidden"
    } else {
        "visible"
    };
    let current_screen = screen();
    let signed_in = identity().is_some();

    let sign_out = move |_| {
        let backend = backend();
        spawn(async move {
            backend.sign_out().await;
        });
        identity.set(None);
        screen.set(Screen::Reading);
    };

    rsx! {
        div {
            class: "app-shell",
            style: "min-height: 100vh; overflow-y: {overflow}; background: #faf7f2; color: #2d2a26; font-family: Georgia, 'Times New Roman', serif;",

            header {
                class: "site-header",
                style: "display: flex; align-items: baseline; gap: 16px; padding: 20px 24px; border-bottom: 1px solid #e8e2d8;",

                h1 {
                    style: "margin: 0; font-size: 26px; letter-spacing: 0.02em;",
                    "Manna"
                }
                span {
                    class: "tagline",
                    style: "color: #8a8378; font-size: 14px;",
                    "daily bread for the day's walk"
                }

                nav {
                    style: "margin-left: auto; display: flex; gap: 12px; align-items: center;",

                    button {
                        class: "nav-link",
                        style: "background: none; border: none; cursor: pointer; font: inherit; color: #2d2a26;",
                        onclick: move |_| screen.set(Screen::Reading),
                        "Read"
                    }
                    if signed_in {
                        button {
                            class: "nav-link",
                            style: "background: none; border: none; cursor: pointer; font: inherit; color: #2d2a26;",
                            onclick: move |_| screen.set(Screen::Admin),
                            "Dashboard"
                        }
                        button {
                            class: "nav-link",
                            style: "background: none; border: none; cursor: pointer; font: inherit; color: #8a8378;",
                            onclick: sign_out,
                            "Sign out"
                        }
                    } else {
                        button {
                            class: "nav-link",
                            style: "background: none; border: none; cursor: pointer; font: inherit; color: #8a8378;",
                            onclick: move |_| screen.set(Screen::Login),
                            "Admin"
                        }
                    }
                }
            }

            if let Some(message) = status_line() {
                div {
                    class: "status-banner",
                    style: "display: flex; gap: 12px; align-items: center; padding: 10px 24px; background: #f7e8e4; color: #8c3b2e; font-size: 14px;",

                    span { "{message}" }
                    button {
                        style: "margin-left: auto; background: none; border: none; cursor: pointer; color: inherit; font: inherit;",
                        onclick: move |_| status_line.set(None),
                        "Dismiss"
                    }
                }
            }

            main {
                {
                    match current_screen {
                        Screen::Reading => rsx! { ReadingFeed {} },
                        // The dashboard is gated on a signed-in operator.
                        Screen::Admin if !signed_in => rsx! { LoginScreen {} },
                        Screen::Admin => rsx! { AdminDashboard {} },
                        Screen::Login => rsx! { LoginScreen {} },
                    }
                }
            }

            ReaderModal {}
        }
    }
}
