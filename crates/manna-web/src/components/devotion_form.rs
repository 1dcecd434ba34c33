//! Devotion form component
//!
//! Create/edit form for the dashboard. Field state lives in signals so a
//! rejected submit preserves exactly what the operator typed.

use chrono::NaiveDate;
use dioxus::prelude::*;

use manna_core::models::{DevotionPatch, NewDevotion, Verse};
use manna_core::Devotion;

use super::RichTextEditor;

/// What the form hands back on submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevotionDraft {
    pub title: String,
    pub reference: String,
    pub verse_text: String,
    pub content: String,
    pub published_on: NaiveDate,
}

impl DevotionDraft {
    #[must_use]
    pub fn into_new(self) -> NewDevotion {
        NewDevotion {
            title: self.title.trim().to_string(),
            verse: Verse::from_parts(&self.reference, &self.verse_text),
            content: self.content,
            published_on: self.published_on,
        }
    }

    #[must_use]
    pub fn into_patch(self) -> DevotionPatch {
        DevotionPatch {
            title: self.title.trim().to_string(),
            verse: Verse::from_parts(&self.reference, &self.verse_text),
            content: self.content,
            published_on: self.published_on,
        }
    }
}

/// Create/edit form; `initial` seeds the fields for an edit
#[component]
pub fn DevotionForm(
    initial: Option<Devotion>,
    error: Option<String>,
    on_submit: EventHandler<DevotionDraft>,
    on_cancel: EventHandler<()>,
) -> Element {
    let is_edit = initial.is_some();
    let seed_title = initial
        .as_ref()
        .map(|devotion| devotion.title.clone())
        .unwrap_or_default();
    let seed_reference = initial
        .as_ref()
        .map(|devotion| devotion.verse.reference().to_string())
        .unwrap_or_default();
    let seed_verse_text = initial
        .as_ref()
        .map(|devotion| devotion.verse.text().to_string())
        .unwrap_or_default();
    let seed_content = initial
        .as_ref()
        .map(|devotion| devotion.content.clone())
        .unwrap_or_default();
    let seed_date = initial.as_ref().map_or_else(
        || chrono::Utc::now().date_naive(),
        |devotion| devotion.published_on,
    );

    let mut title = use_signal(move || seed_title);
    let mut reference = use_signal(move || seed_reference);
    let mut verse_text = use_signal(move || seed_verse_text);
    let content = use_signal(move || seed_content);
    let mut published_on = use_signal(move || seed_date.format("%Y-%m-%d").to_string());
    let mut form_error = use_signal(|| None::<String>);

    let submit = move |_| {
        let raw_date = published_on();
        let Ok(date) = NaiveDate::parse_from_str(raw_date.trim(), "%Y-%m-%d") else {
            form_error.set(Some("Publication date must be YYYY-MM-DD".to_string()));
            return;
        };
        form_error.set(None);
        on_submit.call(DevotionDraft {
            title: title(),
            reference: reference(),
            verse_text: verse_text(),
            content: content(),
            published_on: date,
        });
    };

    let message = error.or_else(|| form_error());
    let field_style = "width: 100%; box-sizing: border-box; padding: 8px 12px; margin-bottom: 12px; border: 1px solid #d8d0c2; border-radius: 6px; font: inherit;";
    let label_style = "display: block; font-size: 13px; color: #8a8378; margin-bottom: 4px;";

    rsx! {
        div {
            class: "devotion-form",
            style: "background: #ffffff; border: 1px solid #e8e2d8; border-radius: 8px; padding: 24px; margin-bottom: 24px;",

            h3 {
                style: "margin: 0 0 16px; font-size: 17px;",
                if is_edit { "Edit devotion" } else { "New devotion" }
            }

            if let Some(message) = message {
                div {
                    class: "form-error",
                    style: "margin-bottom: 12px; padding: 8px 12px; background: #f7e8e4; color: #8c3b2e; border-radius: 6px; font-size: 14px;",
                    "{message}"
                }
            }

            label { style: "{label_style}", "Title" }
            input {
                r#type: "text",
                value: "{title}",
                oninput: move |event| title.set(event.value()),
                style: "{field_style}",
            }

            label { style: "{label_style}", "Verse reference" }
            input {
                r#type: "text",
                placeholder: "John 6:35",
                value: "{reference}",
                oninput: move |event| reference.set(event.value()),
                style: "{field_style}",
            }

            label { style: "{label_style}", "Verse text" }
            input {
                r#type: "text",
                placeholder: "I am the bread of life.",
                value: "{verse_text}",
                oninput: move |event| verse_text.set(event.value()),
                style: "{field_style}",
            }

            label { style: "{label_style}", "Publication date" }
            input {
                r#type: "date",
                value: "{published_on}",
                oninput: move |event| published_on.set(event.value()),
                style: "{field_style}",
            }

            label { style: "{label_style}", "Content" }
            RichTextEditor { value: content }

            div {
                class: "form-actions",
                style: "display: flex; justify-content: flex-end; gap: 12px; margin-top: 16px;",

                button {
                    style: "background: none; border: 1px solid #d8d0c2; border-radius: 6px; padding: 8px 16px; cursor: pointer; font: inherit; color: #7a6a4f;",
                    onclick: move |_| on_cancel.call(()),
                    "Cancel"
                }
                button {
                    style: "background: #7a6a4f; color: #faf7f2; border: none; border-radius: 6px; padding: 8px 16px; cursor: pointer; font: inherit;",
                    onclick: submit,
                    if is_edit { "Save changes" } else { "Publish" }
                }
            }
        }
    }
}
