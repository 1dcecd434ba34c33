//! Public reading view
//!
//! Owns its feed instance for the lifetime of the view; page zero is
//! loaded explicitly on mount and the sentinel drives everything after.

use dioxus::prelude::*;

use manna_core::feed::DevotionFeed;

use crate::components::FeedList;
use crate::state::{AppState, FEED_PAGE_SIZE};

/// Public reading screen with the infinitely scrolling devotion list
#[component]
pub fn ReadingFeed() -> Element {
    let mut state = use_context::<AppState>();
    let feed = use_hook(|| DevotionFeed::new((state.backend)().content_store(), FEED_PAGE_SIZE));
    let mut revision = use_signal(|| 0u64);

    // Re-render whenever the feed container reports a change.
    use_future({
        let feed = feed.clone();
        move || {
            let feed = feed.clone();
            async move {
                let mut revisions = feed.subscribe();
                loop {
                    if revisions.changed().await.is_err() {
                        break;
                    }
                    revision.set(*revisions.borrow());
                }
            }
        }
    });

    use_future({
        let feed = feed.clone();
        move || {
            let feed = feed.clone();
            async move {
                if let Err(error) = feed.load_initial().await {
                    state.report_error(&error);
                }
            }
        }
    });

    // A fetch settling after unmount must be discarded, not applied.
    use_drop({
        let feed = feed.clone();
        move || feed.detach()
    });

    rsx! {
        section {
            class: "reading-feed",
            style: "max-width: 640px; margin: 0 auto; padding: 24px 16px 64px;",

            FeedList { feed: feed.clone(), revision: revision() }
        }
    }
}
