//! Admin dashboard view
//!
//! Lists devotions from the dashboard's own feed instance and hosts the
//! create/edit form. Mutations go through the feed so the store and the
//! local cache stay consistent without a full reload (create excepted,
//! which reloads to restore ordering).

use dioxus::prelude::*;

use manna_core::feed::{DevotionFeed, FeedPhase};
use manna_core::Devotion;

use crate::components::{DevotionDraft, DevotionForm};
use crate::state::{AppState, FEED_PAGE_SIZE};

#[derive(Clone, PartialEq)]
enum EditorMode {
    Closed,
    Create,
    Edit(Devotion),
}

/// Admin dashboard screen
#[component]
pub fn AdminDashboard() -> Element {
    let mut state = use_context::<AppState>();
    let feed = use_hook(|| DevotionFeed::new((state.backend)().content_store(), FEED_PAGE_SIZE));
    let mut revision = use_signal(|| 0u64);
    let mut editor = use_signal(|| EditorMode::Closed);
    let mut editor_error = use_signal(|| None::<String>);

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

    use_drop({
        let feed = feed.clone();
        move || feed.detach()
    });

    let _ = revision();
    let snapshot = feed.snapshot();
    let list_is_empty = snapshot.devotions.is_empty();
    let operator_label = state
        .identity
        .read()
        .as_ref()
        .map(|operator| operator.email.clone().unwrap_or_else(|| operator.id.clone()));
    let create_feed = feed.clone();
    let update_feed = feed.clone();
    let load_more_feed = feed.clone();

    rsx! {
        section {
            class: "admin-dashboard",
            style: "max-width: 760px; margin: 0 auto; padding: 24px 16px 64px;",

            header {
                style: "display: flex; align-items: baseline; gap: 12px; margin-bottom: 20px;",

                h2 {
                    style: "margin: 0; font-size: 20px;",
                    "Dashboard"
                }
                if let Some(label) = operator_label {
                    span {
                        style: "color: #8a8378; font-size: 13px;",
                        "signed in as {label}"
                    }
                }
                button {
                    class: "new-devotion",
                    style: "margin-left: auto; padding: 8px 14px; background: #7a6a4f; color: #faf7f2; border: none; border-radius: 6px; cursor: pointer; font: inherit;",
                    onclick: move |_| {
                        editor.set(EditorMode::Create);
                        editor_error.set(None);
                    },
                    "New devotion"
                }
            }

            {
                match editor() {
                    EditorMode::Closed => rsx! {},
                    EditorMode::Create => rsx! {
                        DevotionForm {
                            initial: None,
                            error: editor_error(),
                            on_submit: move |draft: DevotionDraft| {
                                let feed = create_feed.clone();
                                spawn(async move {
                                    match feed.apply_create(draft.into_new()).await {
                                        Ok(created) => {
                                            tracing::info!(id = %created.id, "devotion created");
                                            editor.set(EditorMode::Closed);
                                            editor_error.set(None);
                                        }
                                        Err(error) => editor_error.set(Some(error.to_string())),
                                    }
                                });
                            },
                            on_cancel: move |()| {
                                editor.set(EditorMode::Closed);
                                editor_error.set(None);
                            },
                        }
                    },
                    EditorMode::Edit(devotion) => {
                        let id = devotion.id;
                        rsx! {
                            DevotionForm {
                                initial: Some(devotion.clone()),
                                error: editor_error(),
                                on_submit: move |draft: DevotionDraft| {
                                    let feed = update_feed.clone();
                                    spawn(async move {
                                        match feed.apply_update(id, draft.into_patch()).await {
                                            Ok(_) => {
                                                editor.set(EditorMode::Closed);
                                                editor_error.set(None);
                                            }
                                            Err(error) => editor_error.set(Some(error.to_string())),
                                        }
                                    });
                                },
                                on_cancel: move |()| {
                                    editor.set(EditorMode::Closed);
                                    editor_error.set(None);
                                },
                            }
                        }
                    }
                }
            }

            div {
                class: "admin-list",

                if list_is_empty && snapshot.phase == FeedPhase::Exhausted {
                    div {
                        style: "padding: 48px 0; text-align: center; color: #8a8378;",
                        "Nothing published yet."
                    }
                }

                for devotion in snapshot.devotions {
                    {
                        let id = devotion.id;
                        let row = devotion.clone();
                        let delete_feed = feed.clone();
                        let published = devotion.published_on.format("%B %d, %Y").to_string();
                        let reference = devotion.verse.reference().to_string();

                        rsx! {
                            div {
                                key: "{id}",
                                class: "admin-row",
                                style: "display: flex; align-items: center; gap: 12px; padding: 12px 16px; background: #ffffff; border: 1px solid #e8e2d8; border-radius: 8px; margin-bottom: 8px;",

                                div {
                                    style: "min-width: 0;",

                                    div {
                                        style: "font-weight: 600; overflow: hidden; text-overflow: ellipsis; white-space: nowrap;",
                                        "{devotion.title}"
                                    }
                                    div {
                                        style: "font-size: 13px; color: #8a8378;",
                                        "{published} · {reference}"
                                    }
                                }

                                button {
                                    class: "row-edit",
                                    style: "margin-left: auto; background: none; border: 1px solid #d8d0c2; border-radius: 6px; padding: 6px 12px; cursor: pointer; font: inherit;",
                                    onclick: move |_| {
                                        editor.set(EditorMode::Edit(row.clone()));
                                        editor_error.set(None);
                                    },
                                    "Edit"
                                }
                                button {
                                    class: "row-delete",
                                    style: "background: none; border: 1px solid #d8b5ac; color: #8c3b2e; border-radius: 6px; padding: 6px 12px; cursor: pointer; font: inherit;",
                                    onclick: move |_| {
                                        let feed = delete_feed.clone();
                                        spawn(async move {
                                            match feed.apply_delete(id).await {
                                                Ok(()) => {
                                                    // Never leave the reader open on a removed record.
                                                    (state.selection)().drop_if(id);
                                                }
                                                Err(error) => state.report_error(&error),
                                            }
                                        });
                                    },
                                    "Delete"
                                }
                            }
                        }
                    }
                }
            }

            {
                match snapshot.phase {
                    FeedPhase::Fetching => rsx! {
                        div {
                            style: "padding: 16px 0; text-align: center; color: #8a8378;",
                            "Loading..."
                        }
                    },
                    FeedPhase::Exhausted => rsx! {},
                    FeedPhase::Idle => rsx! {
                        button {
                            class: "load-more",
                            style: "display: block; margin: 16px auto 0; background: none; border: 1px solid #d8d0c2; border-radius: 6px; padding: 8px 16px; cursor: pointer; font: inherit; color: #7a6a4f;",
                            onclick: move |_| {
                                let feed = load_more_feed.clone();
                                spawn(async move {
                                    if let Err(error) = feed.load_next().await {
                                        state.report_error(&error);
                                    }
                                });
                            },
                            "Load more"
                        }
                    },
                }
            }
        }
    }
}
