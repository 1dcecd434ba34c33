//! Devotion card component

use dioxus::prelude::*;

use manna_core::Devotion;

/// A single devotion teaser in the reading feed
#[component]
pub fn DevotionCard(devotion: Devotion, onopen: EventHandler<Devotion>) -> Element {
    let published = devotion.published_on.format("%B %d, %Y").to_string();
    let reference = devotion.verse.reference().to_string();
    let open = devotion.clone();

    rsx! {
        article {
            class: "devotion-card",
            style: "background: #ffffff; border: 1px solid #e8e2d8; border-radius: 8px; padding: 20px 24px; margin-bottom: 16px; cursor: pointer; box-shadow: 0 1px 2px rgba(45, 42, 38, 0.06);",
            onclick: move |_| onopen.call(open.clone()),

            div {
                class: "devotion-date",
                style: "font-size: 12px; letter-spacing: 0.08em; text-transform: uppercase; color: #8a8378; margin-bottom: 6px;",
                "{published}"
            }
            h2 {
                class: "devotion-title",
                style: "margin: 0 0 8px; font-size: 22px; font-weight: 600;",
                "{devotion.title}"
            }
            div {
                class: "devotion-reference",
                style: "font-size: 14px; font-style: italic; color: #7a6a4f;",
                "{reference}"
            }
        }
    }
}
