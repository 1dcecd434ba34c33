//! Rich-text editor widget
//!
//! Opaque HTML-producing widget: the form reads and writes the content
//! through the value signal and never interprets what is inside. Toolbar
//! commands and sanitization belong behind this boundary.

use dioxus::prelude::*;

/// Editor for a devotion's rich-text body
#[component]
pub fn RichTextEditor(mut value: Signal<String>) -> Element {
    rsx! {
        textarea {
            class: "rich-text-editor",
            style: "width: 100%; min-height: 180px; box-sizing: border-box; font-family: inherit; font-size: 14px; border: 1px solid #d8d0c2; border-radius: 6px; padding: 12px; background: #ffffff;",
            placeholder: "<p>Write today's devotion...</p>",
            value: "{value}",
            oninput: move |event| value.set(event.value()),
        }
    }
}
