//! Supabase-backed content store
//!
//! Talks to the `devotions` table through PostgREST. Reads use range
//! queries ordered by creation timestamp descending; mutations ask for the
//! row representation back so callers get the authoritative record.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::{Devotion, DevotionId, DevotionPatch, NewDevotion};

use super::{ContentStore, Identity};

const DEVOTIONS_TABLE: &str = "devotions";
const DEVOTION_COLUMNS: &str = "id,title,verse,content,published_on,created_at";
const FEED_ORDER: &str = "created_at.desc";

#[derive(Debug, Clone)]
struct StoreSession {
    access_token: String,
    identity: Option<Identity>,
}

/// [`ContentStore`] implementation over Supabase PostgREST
pub struct SupabaseContentStore {
    rest_url: String,
    anon_key: String,
    client: Client,
    session: Mutex<Option<StoreSession>>,
}

impl SupabaseContentStore {
    /// Build a store for the project at `url` with the public anon key.
    ///
    /// Requests carry the anon key until a session token is attached.
    pub fn new(url: impl AsRef<str>, anon_key: impl Into<String>) -> Result<Self> {
        let rest_url = normalize_rest_url(url.as_ref())?;
        let anon_key = anon_key.into().trim().to_string();
        if anon_key.is_empty() {
            return Err(Error::Validation(
                "Supabase anon key must not be empty".to_string(),
            ));
        }

        Ok(Self {
            rest_url,
            anon_key,
            client: Client::builder()
                .build()
                .map_err(|error| Error::Connectivity(error.to_string()))?,
            session: Mutex::new(None),
        })
    }

    /// Attach a bearer token without a known operator (service contexts)
    pub fn attach_access_token(&self, access_token: impl Into<String>) {
        *self.lock_session() = Some(StoreSession {
            access_token: access_token.into(),
            identity: None,
        });
    }

    /// Attach a signed-in operator's session token
    pub fn attach_identity(&self, identity: Identity, access_token: impl Into<String>) {
        *self.lock_session() = Some(StoreSession {
            access_token: access_token.into(),
            identity: Some(identity),
        });
    }

    /// Drop the session; subsequent requests fall back to the anon key
    pub fn clear_session(&self) {
        *self.lock_session() = None;
    }

    /// The bearer token currently attached, if any
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.lock_session()
            .as_ref()
            .map(|session| session.access_token.clone())
    }

    fn lock_session(&self) -> std::sync::MutexGuard<'_, Option<StoreSession>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn table_url(&self) -> String {
        format!("{}/{}", self.rest_url, DEVOTIONS_TABLE)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .lock_session()
            .as_ref()
            .map_or_else(|| self.anon_key.clone(), |s| s.access_token.clone());
        request
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {bearer}"))
    }

    async fn fetch_rows(&self, request: RequestBuilder) -> Result<Vec<Devotion>> {
        let response = request.send().await.map_err(request_failed)?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(classify_response(status, &body));
        }
        response.json::<Vec<Devotion>>().await.map_err(request_failed)
    }
}

#[async_trait]
impl ContentStore for SupabaseContentStore {
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<Vec<Devotion>> {
        let offset_value = offset.to_string();
        let limit_value = limit.to_string();
        let request = self.authed(self.client.get(self.table_url()).query(&[
            ("select", DEVOTION_COLUMNS),
            ("order", FEED_ORDER),
            ("offset", offset_value.as_str()),
            ("limit", limit_value.as_str()),
        ]));
        let rows = self.fetch_rows(request).await?;
        tracing::debug!(offset, limit, received = rows.len(), "fetched devotion page");
        Ok(rows)
    }

    async fn insert(&self, new: NewDevotion) -> Result<Devotion> {
        let request = self.authed(
            self.client
                .post(self.table_url())
                .header("Prefer", "return=representation")
                .query(&[("select", DEVOTION_COLUMNS)])
                .json(&new),
        );
        let rows = self.fetch_rows(request).await?;
        rows.into_iter().next().ok_or_else(|| {
            Error::Query("Insert response did not include the created row".to_string())
        })
    }

    async fn update_by_id(&self, id: DevotionId, patch: DevotionPatch) -> Result<Devotion> {
        let id_filter = format!("eq.{id}");
        let request = self.authed(
            self.client
                .patch(self.table_url())
                .header("Prefer", "return=representation")
                .query(&[("id", id_filter.as_str()), ("select", DEVOTION_COLUMNS)])
                .json(&patch),
        );
        let rows = self.fetch_rows(request).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    async fn delete_by_id(&self, id: DevotionId) -> Result<()> {
        let id_filter = format!("eq.{id}");
        let request = self.authed(
            self.client
                .delete(self.table_url())
                .header("Prefer", "return=representation")
                .query(&[("id", id_filter.as_str()), ("select", DEVOTION_COLUMNS)]),
        );
        let rows = self.fetch_rows(request).await?;
        if rows.is_empty() {
            return Err(Error::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn current_identity(&self) -> Option<Identity> {
        self.lock_session()
            .as_ref()
            .and_then(|session| session.identity.clone())
    }
}

/// Normalize a Supabase project URL into its PostgREST base.
///
/// Accepts the bare project URL or one already ending in `/rest/v1`.
pub fn normalize_rest_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::Validation(
            "Supabase URL must not be empty".to_string(),
        ));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(Error::Validation(
            "Supabase URL must include http:// or https://".to_string(),
        ));
    }
    if trimmed.ends_with("/rest/v1") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{trimmed}/rest/v1"))
    }
}

fn request_failed(error: reqwest::Error) -> Error {
    if error.is_decode() {
        Error::Query(format!("Malformed store response: {error}"))
    } else {
        Error::Connectivity(error.to_string())
    }
}

/// Map a non-success PostgREST response onto the store error taxonomy.
///
/// Server-side failures are treated as transient; 4xx splits into
/// validation rejections, missing rows, and everything else as query
/// failures.
fn classify_response(status: StatusCode, body: &str) -> Error {
    let message = parse_api_error(status, body);
    if status.is_server_error() {
        Error::Connectivity(message)
    } else if status == StatusCode::NOT_FOUND {
        Error::NotFound(message)
    } else if matches!(status.as_u16(), 400 | 409 | 422) {
        Error::Validation(message)
    } else {
        Error::Query(message)
    }
}

#[derive(Debug, Deserialize)]
struct PostgrestErrorResponse {
    message: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<PostgrestErrorResponse>(body) {
        if let Some(message) = payload.message.or(payload.details).or(payload.hint) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        let compact: String = trimmed.chars().take(180).collect();
        format!("{} ({})", compact, status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalize_rest_url_appends_rest_path() {
        let normalized = normalize_rest_url("https://demo.supabase.co").unwrap();
        assert_eq!(normalized, "https://demo.supabase.co/rest/v1");
    }

    #[test]
    fn normalize_rest_url_keeps_existing_rest_path() {
        let normalized = normalize_rest_url("https://demo.supabase.co/rest/v1/").unwrap();
        assert_eq!(normalized, "https://demo.supabase.co/rest/v1");
    }

    #[test]
    fn normalize_rest_url_rejects_missing_scheme() {
        assert!(normalize_rest_url("demo.supabase.co").is_err());
        assert!(normalize_rest_url("   ").is_err());
    }

    #[test]
    fn new_rejects_empty_anon_key() {
        assert!(SupabaseContentStore::new("https://demo.supabase.co", "  ").is_err());
    }

    #[test]
    fn parse_api_error_prefers_postgrest_message() {
        let body = r#"{"message":"new row violates row-level security policy","code":"42501"}"#;
        let rendered = parse_api_error(StatusCode::FORBIDDEN, body);
        assert_eq!(
            rendered,
            "new row violates row-level security policy (403)"
        );
    }

    #[test]
    fn parse_api_error_falls_back_to_body_then_status() {
        assert_eq!(
            parse_api_error(StatusCode::BAD_GATEWAY, "upstream unavailable"),
            "upstream unavailable (502)"
        );
        assert_eq!(parse_api_error(StatusCode::BAD_GATEWAY, "  "), "HTTP 502");
    }

    #[test]
    fn classify_response_maps_status_families() {
        assert!(matches!(
            classify_response(StatusCode::SERVICE_UNAVAILABLE, ""),
            Error::Connectivity(_)
        ));
        assert!(matches!(
            classify_response(StatusCode::NOT_FOUND, ""),
            Error::NotFound(_)
        ));
        assert!(matches!(
            classify_response(StatusCode::UNPROCESSABLE_ENTITY, ""),
            Error::Validation(_)
        ));
        assert!(matches!(
            classify_response(StatusCode::UNAUTHORIZED, ""),
            Error::Query(_)
        ));
    }

    #[test]
    fn session_controls_current_identity() {
        let store =
            SupabaseContentStore::new("https://demo.supabase.co", "anon-key").unwrap();
        assert!(store.current_identity().is_none());

        store.attach_access_token("service-token");
        assert!(store.current_identity().is_none());

        store.attach_identity(
            Identity {
                id: "operator".to_string(),
                email: Some("admin@example.com".to_string()),
            },
            "user-token",
        );
        assert_eq!(store.current_identity().unwrap().id, "operator");

        store.clear_session();
        assert!(store.current_identity().is_none());
    }

    #[test]
    fn devotion_rows_deserialize_from_postgrest_payload() {
        let payload = r#"[{
            "id": "0191c2f6-2f74-7d33-b2ac-111111111111",
            "title": "Still Waters",
            "verse": "Psalm 23:2 | He leads me beside still waters.",
            "content": "<p>Rest.</p>",
            "published_on": "2024-06-01",
            "created_at": 1717200000000
        }]"#;
        let rows: Vec<Devotion> = serde_json::from_str(payload).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Still Waters");
        assert_eq!(rows[0].verse.reference(), "Psalm 23:2");
        assert_eq!(rows[0].created_at, 1_717_200_000_000);
    }
}
