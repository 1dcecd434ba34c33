//! Build-provisioned client configuration
//!
//! The web bundle ships only safe public endpoints: the Supabase project
//! URL and anon key. Secret credentials never belong here. When neither is
//! provisioned the app falls back to the in-memory demo backend.

/// Public endpoints compiled into the bundle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapConfig {
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
}

impl BootstrapConfig {
    /// Read the values provided at compile time via
    /// `MANNA_SUPABASE_URL` / `MANNA_SUPABASE_ANON_KEY`.
    #[must_use]
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("MANNA_SUPABASE_URL").map(str::to_string),
            option_env!("MANNA_SUPABASE_ANON_KEY").map(str::to_string),
        )
    }

    #[must_use]
    pub fn from_values(supabase_url: Option<String>, supabase_anon_key: Option<String>) -> Self {
        Self {
            supabase_url: normalize_text_option(supabase_url),
            supabase_anon_key: normalize_text_option(supabase_anon_key),
        }
    }

    /// The Supabase endpoint pair, when both halves are provisioned.
    ///
    /// A half-configured pair is treated as unconfigured so a partial build
    /// degrades to demo mode instead of failing requests at runtime.
    #[must_use]
    pub fn supabase(&self) -> Option<(String, String)> {
        match (&self.supabase_url, &self.supabase_anon_key) {
            (Some(url), Some(key)) => Some((url.clone(), key.clone())),
            _ => None,
        }
    }
}

fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blank_values_are_dropped() {
        let config = BootstrapConfig::from_values(Some("   ".to_string()), None);
        assert_eq!(config, BootstrapConfig::default());
        assert!(config.supabase().is_none());
    }

    #[test]
    fn half_configured_pair_is_unconfigured() {
        let config =
            BootstrapConfig::from_values(Some("https://demo.supabase.co".to_string()), None);
        assert!(config.supabase().is_none());
    }

    #[test]
    fn complete_pair_is_returned_trimmed() {
        let config = BootstrapConfig::from_values(
            Some(" https://demo.supabase.co ".to_string()),
            Some("anon-key".to_string()),
        );
        assert_eq!(
            config.supabase(),
            Some(("https://demo.supabase.co".to_string(), "anon-key".to_string()))
        );
    }
}
