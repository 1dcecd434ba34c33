//! Devotion feed list with infinite scroll

use dioxus::prelude::*;

use manna_core::feed::{DevotionFeed, FeedPhase};
use manna_core::Devotion;

use super::DevotionCard;
use crate::state::AppState;

/// Scrolling list of loaded devotions followed by the load-more sentinel.
///
/// `revision` is the feed container's revision counter; taking it as a
/// prop re-renders the list whenever the container reports a change.
#[component]
pub fn FeedList(feed: DevotionFeed, revision: u64) -> Element {
    let mut state = use_context::<AppState>();
    let snapshot = feed.snapshot();
    let is_empty = snapshot.devotions.is_empty();
    let sentinel_feed = feed.clone();

    rsx! {
        div {
            class: "devotion-feed",

            if is_empty && snapshot.phase == FeedPhase::Exhausted {
                div {
                    class: "feed-empty",
                    style: "padding: 48px 0; text-align: center; color: #8a8378;",
                    "No devotions published yet."
                }
            }

            for devotion in snapshot.devotions {
                DevotionCard {
                    key: "{devotion.id}",
                    devotion: devotion.clone(),
                    onopen: move |devotion: Devotion| state.open_reader(devotion),
                }
            }

            {
                match snapshot.phase {
                    FeedPhase::Fetching => rsx! {
                        div {
                            class: "feed-loading",
                            style: "padding: 16px 0; text-align: center; color: #8a8378;",
                            "Loading..."
                        }
                    },
                    FeedPhase::Exhausted => rsx! {
                        if !is_empty {
                            div {
                                class: "feed-end",
                                style: "padding: 24px 0; text-align: center; color: #8a8378; font-style: italic;",
                                "You have reached the beginning."
                            }
                        }
                    },
                    FeedPhase::Idle => rsx! {
                        // Off-screen marker; its visibility asks for the next page.
                        div {
                            class: "feed-sentinel",
                            style: "height: 1px;",
                            onvisible: move |event| {
                                if event.data().is_intersecting().unwrap_or(false) {
                                    let feed = sentinel_feed.clone();
                                    spawn(async move {
                                        if let Err(error) = feed.load_next().await {
                                            state.report_error(&error);
                                        }
                                    });
                                }
                            },
                        }
                    },
                }
            }
        }
    }
}
