//! Reader modal component

use dioxus::prelude::*;

use crate::state::AppState;

/// Full reading view for the selected devotion.
///
/// Rendered above whichever screen is active. While a devotion is open the
/// page behind the modal is scroll-locked (see the app shell).
#[component]
pub fn ReaderModal() -> Element {
    let state = use_context::<AppState>();
    let _ = (state.selection_revision)();
    let selection = (state.selection)();
    let Some(devotion) = selection.current() else {
        return rsx! {};
    };

    let published = devotion.published_on.format("%B %d, %Y").to_string();
    let reference = devotion.verse.reference().to_string();
    let verse_text = devotion.verse.text().to_string();
    let backdrop_selection = selection.clone();
    let close_selection = selection.clone();

    rsx! {
        div {
            class: "reader-backdrop",
            style: "position: fixed; inset: 0; background: rgba(45, 42, 38, 0.55); display: flex; align-items: center; justify-content: center; padding: 24px; z-index: 10;",
            onclick: move |_| backdrop_selection.close(),

            article {
                class: "reader-modal",
                style: "background: #faf7f2; border-radius: 12px; max-width: 560px; width: 100%; max-height: 85vh; overflow-y: auto; padding: 32px;",
                onclick: move |event| event.stop_propagation(),

                div {
                    class: "devotion-date",
                    style: "font-size: 12px; letter-spacing: 0.08em; text-transform: uppercase; color: #8a8378; margin-bottom: 8px;",
                    "{published}"
                }
                h2 {
                    style: "margin: 0 0 16px; font-size: 24px;",
                    "{devotion.title}"
                }
                blockquote {
                    class: "memory-verse",
                    style: "border-left: 3px solid #b59a68; margin: 0 0 20px; padding: 8px 16px; background: #f3ede2;",

                    if !verse_text.is_empty() {
                        p {
                            style: "margin: 0 0 4px; font-style: italic;",
                            "{verse_text}"
                        }
                    }
                    footer {
                        style: "font-size: 13px; color: #7a6a4f;",
                        "{reference}"
                    }
                }
                // Rich text authored in the dashboard; rendering semantics
                // live with the editor widget, not here.
                div {
                    class: "devotion-content",
                    style: "line-height: 1.6;",
                    dangerous_inner_html: "{devotion.content}",
                }
                button {
                    class: "reader-close",
                    style: "margin-top: 24px; background: none; border: 1px solid #d8d0c2; border-radius: 6px; padding: 8px 16px; cursor: pointer; font: inherit; color: #7a6a4f;",
                    onclick: move |_| close_selection.close(),
                    "Close"
                }
            }
        }
    }
}
