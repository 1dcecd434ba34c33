//! Backend construction
//!
//! The backend is built once at startup from the bootstrap config and
//! passed down explicitly; views receive the content store as a trait
//! object and never reach for a global handle.

use std::sync::Arc;

use chrono::NaiveDate;

use manna_core::models::{NewDevotion, Verse};
use manna_core::store::{ContentStore, Identity, MemoryContentStore, SupabaseContentStore};

use crate::bootstrap_config::BootstrapConfig;

use super::identity::{validate_credentials, IdentityError, IdentityResult, IdentityService};

/// The backend this build talks to: a Supabase project, or the in-memory
/// demo store when no project is provisioned.
#[derive(Clone)]
pub enum Backend {
    Supabase {
        store: Arc<SupabaseContentStore>,
        identity: Arc<IdentityService>,
    },
    Demo(Arc<MemoryContentStore>),
}

impl Backend {
    /// Build the backend for this bundle.
    ///
    /// A misconfigured Supabase pair degrades to demo mode rather than
    /// shipping a build that fails every request.
    #[must_use]
    pub fn from_bootstrap(config: &BootstrapConfig) -> Self {
        if let Some((url, anon_key)) = config.supabase() {
            match Self::supabase(&url, &anon_key) {
                Ok(backend) => {
                    tracing::info!("Using Supabase backend at {url}");
                    return backend;
                }
                Err(error) => {
                    tracing::error!("Invalid Supabase configuration: {error}; using demo backend");
                }
            }
        } else {
            tracing::info!("No Supabase configuration; using demo backend");
        }
        Self::demo()
    }

    /// Backend over a Supabase project
    pub fn supabase(url: &str, anon_key: &str) -> IdentityResult<Self> {
        let store = SupabaseContentStore::new(url, anon_key)
            .map_err(|_| IdentityError::InvalidConfiguration("Invalid Supabase URL or key"))?;
        Ok(Self::Supabase {
            store: Arc::new(store),
            identity: Arc::new(IdentityService::new(url, anon_key)?),
        })
    }

    /// In-memory backend with sample content
    #[must_use]
    pub fn demo() -> Self {
        let store = MemoryContentStore::new();
        store.preload(sample_devotions());
        Self::Demo(Arc::new(store))
    }

    /// The content store as the query interface the feed consumes
    #[must_use]
    pub fn content_store(&self) -> Arc<dyn ContentStore> {
        match self {
            Self::Supabase { store, .. } => store.clone(),
            Self::Demo(store) => store.clone(),
        }
    }

    /// Sign the operator in and attach the session to the content store
    pub async fn sign_in(&self, email: &str, password: &str) -> IdentityResult<Identity> {
        match self {
            Self::Supabase { store, identity } => {
                let session = identity.sign_in(email, password).await?;
                store.attach_identity(session.identity.clone(), session.access_token);
                Ok(session.identity)
            }
            Self::Demo(store) => {
                validate_credentials(email, password)?;
                let identity = Identity {
                    id: "demo-operator".to_string(),
                    email: Some(email.trim().to_string()),
                };
                store.sign_in_as(identity.clone());
                Ok(identity)
            }
        }
    }

    /// Sign out and detach the session from the content store
    pub async fn sign_out(&self) {
        match self {
            Self::Supabase { store, identity } => {
                if let Some(token) = store.access_token() {
                    if let Err(error) = identity.sign_out(&token).await {
                        tracing::warn!("Sign-out request failed: {error}");
                    }
                }
                store.clear_session();
            }
            Self::Demo(store) => store.sign_out(),
        }
    }

    /// Who is signed in, if anyone
    #[must_use]
    pub fn current_identity(&self) -> Option<Identity> {
        self.content_store().current_identity()
    }
}

fn sample_devotions() -> Vec<NewDevotion> {
    const SAMPLES: &[(&str, &str, &str)] = &[
        (
            "Bread for Today",
            "Matthew 6:11 | Give us this day our daily bread.",
            "<p>Manna never kept overnight. Provision is a daily appointment, not a pantry.</p>",
        ),
        (
            "Still Waters",
            "Psalm 23:2 | He leads me beside still waters.",
            "<p>Rest is led, not earned. The shepherd chooses the pace.</p>",
        ),
        (
            "Light for the Path",
            "Psalm 119:105 | Your word is a lamp to my feet and a light to my path.",
            "<p>A lamp for the next step, not a floodlight for the decade.</p>",
        ),
        (
            "New Every Morning",
            "Lamentations 3:23 | They are new every morning; great is your faithfulness.",
            "<p>Yesterday's mercy was spent on yesterday. Today arrives provisioned.</p>",
        ),
        (
            "The True Vine",
            "John 15:5 | I am the vine; you are the branches.",
            "<p>Fruit is a byproduct of staying attached, never of straining.</p>",
        ),
        (
            "Be Still",
            "Psalm 46:10 | Be still, and know that I am God.",
            "<p>Stillness is not emptiness. It is making room.</p>",
        ),
        (
            "Strength Renewed",
            "Isaiah 40:31 | They who wait for the Lord shall renew their strength.",
            "<p>Waiting is not wasted time. It is where wings are grown.</p>",
        ),
        (
            "Perfect Peace",
            "Isaiah 26:3 | You keep him in perfect peace whose mind is stayed on you.",
            "<p>Peace follows attention. Where the mind stays, the heart settles.</p>",
        ),
        (
            "Cast Your Cares",
            "1 Peter 5:7 | Casting all your anxieties on him, because he cares for you.",
            "<p>Anxiety is a load rated for other shoulders.</p>",
        ),
        (
            "A New Creation",
            "2 Corinthians 5:17 | If anyone is in Christ, he is a new creation.",
            "<p>The old account is closed, not merely paid down.</p>",
        ),
        (
            "Walk by Faith",
            "2 Corinthians 5:7 | For we walk by faith, not by sight.",
            "<p>Sight reports the terrain. Faith reports the destination.</p>",
        ),
        (
            "The Good Work",
            "Philippians 1:6 | He who began a good work in you will bring it to completion.",
            "<p>The builder does not abandon a house at the framing stage.</p>",
        ),
    ];

    SAMPLES
        .iter()
        .enumerate()
        .map(|(index, (title, verse, content))| NewDevotion {
            title: (*title).to_string(),
            verse: Verse::new(*verse),
            content: (*content).to_string(),
            published_on: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap_or_default()
                + chrono::Days::new(index as u64),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unconfigured_bootstrap_falls_back_to_demo() {
        let backend = Backend::from_bootstrap(&BootstrapConfig::default());
        assert!(matches!(backend, Backend::Demo(_)));
        assert!(backend.current_identity().is_none());
    }

    #[tokio::test]
    async fn demo_backend_serves_sample_content_newest_first() {
        let backend = Backend::demo();
        let store = backend.content_store();
        let page = store.fetch_page(0, 50).await.unwrap();
        assert_eq!(page.len(), sample_devotions().len());
        assert!(page
            .windows(2)
            .all(|pair| pair[0].created_at > pair[1].created_at));
    }

    #[tokio::test]
    async fn demo_sign_in_round_trip() {
        let backend = Backend::demo();
        assert!(backend.sign_in("admin@example.com", "").await.is_err());
        assert!(backend.current_identity().is_none());

        let identity = backend.sign_in("admin@example.com", "secret").await.unwrap();
        assert_eq!(identity.email.as_deref(), Some("admin@example.com"));
        assert!(backend.current_identity().is_some());

        backend.sign_out().await;
        assert!(backend.current_identity().is_none());
    }
}
