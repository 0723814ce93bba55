//! Cookie credential check.
//!
//! Issuing credentials belongs to an external login component. This crate
//! only checks a presented credential: an Argon2 PHC hash of the server
//! secret.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

use crate::server::Ctx;

/// Name of the cookie carrying the credential.
pub const CREDENTIAL_COOKIE: &str = "api_token";

#[derive(Clone)]
pub struct TokenGate {
    secret: Option<String>,
}

impl std::fmt::Debug for TokenGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenGate")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl TokenGate {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    /// Hash the secret into a fresh credential.
    pub fn issue(&self) -> Result<String, anyhow::Error> {
        let Some(secret) = &self.secret else {
            anyhow::bail!("no secret configured");
        };

        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(secret.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| anyhow::anyhow!("failed to hash secret: {e}"))
    }

    /// Returns true if `credential` is a valid hash of the secret.
    ///
    /// Malformed credentials simply fail to verify.
    pub fn verify(&self, credential: &str) -> bool {
        let Some(secret) = &self.secret else {
            return false;
        };

        let Ok(hash) = PasswordHash::new(credential) else {
            tracing::debug!("ignoring malformed credential");
            return false;
        };

        Argon2::default()
            .verify_password(secret.as_bytes(), &hash)
            .is_ok()
    }
}

/// What the caller's request unlocks in rendered views.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Viewer {
    /// The verified credential, forwarded to client-side scripts.
    pub token: Option<String>,
}

impl Viewer {
    pub fn from_cookies(gate: &TokenGate, jar: &CookieJar) -> Self {
        let token = jar
            .get(CREDENTIAL_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|credential| gate.verify(credential));

        Self { token }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

#[async_trait::async_trait]
impl FromRequestParts<Ctx> for Viewer {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, ctx: &Ctx) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(Viewer::from_cookies(&ctx.gate, &jar))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify() {
        let gate = TokenGate::new(Some("correct-horse".into()));
        let credential = gate.issue().unwrap();

        assert!(credential.starts_with("$argon2"));
        assert!(gate.verify(&credential));

        let other = TokenGate::new(Some("wrong-horse".into()));
        assert!(!other.verify(&credential));
    }

    #[test]
    fn test_verify_without_secret() {
        let gate = TokenGate::new(None);
        assert!(gate.issue().is_err());

        let credential = TokenGate::new(Some("s".into())).issue().unwrap();
        assert!(!gate.verify(&credential));

        // An empty secret counts as unset.
        assert!(!TokenGate::new(Some(String::new())).verify(&credential));
    }

    #[test]
    fn test_verify_malformed_credential() {
        let gate = TokenGate::new(Some("s".into()));
        assert!(!gate.verify("not-a-valid-hash"));
        assert!(!gate.verify(""));
    }

    #[test]
    fn test_viewer_from_cookies() {
        let gate = TokenGate::new(Some("s".into()));
        let credential = gate.issue().unwrap();

        let mut headers = axum::http::HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            format!("theme=dark; {CREDENTIAL_COOKIE}={credential}")
                .parse()
                .unwrap(),
        );
        let viewer = Viewer::from_cookies(&gate, &CookieJar::from_headers(&headers));
        assert_eq!(viewer.token.as_deref(), Some(credential.as_str()));
        assert!(viewer.is_authenticated());

        let viewer = Viewer::from_cookies(&gate, &CookieJar::new());
        assert_eq!(viewer, Viewer::default());
    }
}
