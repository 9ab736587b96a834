//! Credential gating for paid video jobs.

use async_trait::async_trait;
use tracing::warn;

/// Decides whether a usable credential is present and asks for one when not.
#[async_trait]
pub trait CredentialGate: Send + Sync {
    async fn has_credential(&self) -> bool;

    /// Ask the operator to (re)select a credential.
    ///
    /// Called before a job when no credential is present and after any
    /// failure classified as a credential error. Never retries the request.
    async fn prompt_for_credential(&self);
}

/// Gate backed by process environment variables.
#[derive(Debug, Clone)]
pub struct EnvCredentialGate {
    vars: Vec<String>,
}

impl Default for EnvCredentialGate {
    fn default() -> Self {
        Self::new(["GEMINI_API_KEY", "API_KEY"])
    }
}

impl EnvCredentialGate {
    pub fn new<I, S>(vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(Into::into).collect(),
        }
    }

    pub fn vars(&self) -> &[String] {
        &self.vars
    }
}

#[async_trait]
impl CredentialGate for EnvCredentialGate {
    async fn has_credential(&self) -> bool {
        self.vars.iter().any(|var| {
            std::env::var(var)
                .map(|v| !v.trim().is_empty())
                .unwrap_or(false)
        })
    }

    async fn prompt_for_credential(&self) {
        warn!(
            vars = %self.vars.join(", "),
            "No usable API key. Set one of the listed variables to a key from a project with billing enabled"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn test_env_gate_detects_key() {
        let gate = EnvCredentialGate::new(["VSTUDIO_TEST_KEY"]);

        std::env::remove_var("VSTUDIO_TEST_KEY");
        assert!(!gate.has_credential().await);

        std::env::set_var("VSTUDIO_TEST_KEY", "   ");
        assert!(!gate.has_credential().await);

        std::env::set_var("VSTUDIO_TEST_KEY", "abc");
        assert!(gate.has_credential().await);

        std::env::remove_var("VSTUDIO_TEST_KEY");
    }

    #[test]
    fn test_default_vars() {
        let gate = EnvCredentialGate::default();
        assert_eq!(gate.vars(), ["GEMINI_API_KEY", "API_KEY"]);
    }
}
