// ABOUTME: Signed session cookie issuing and verification
// ABOUTME: Binds random session identifiers to the server secret with HMAC-SHA256
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use axum::http::HeaderMap;
use ring::hmac;
use tracing::debug;

use super::cookies::{get_cookie_value, SameSite, SecureCookieConfig};
use crate::config::environment::SessionConfig;
use crate::constants::session::COOKIE_NAME;
use crate::session::SessionId;

/// Issues and verifies `eva_session` cookies
///
/// The cookie value is `<session-id>.<hex hmac>`; a value whose tag does not verify is
/// treated as if no cookie was sent.
pub struct SessionCookies {
    key: hmac::Key,
    max_age_secs: u64,
    secure: bool,
}

impl SessionCookies {
    /// Build from the session settings
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, config.secret.as_bytes()),
            max_age_secs: config.ttl.as_secs(),
            secure: config.cookie_secure,
        }
    }

    /// Signed cookie value for `session`
    #[must_use]
    pub fn sign(&self, session: &SessionId) -> String {
        let id = session.to_string();
        let tag = hmac::sign(&self.key, id.as_bytes());
        format!("{id}.{}", hex::encode(tag.as_ref()))
    }

    /// Session carried by a signed cookie value
    #[must_use]
    pub fn verify(&self, value: &str) -> Option<SessionId> {
        let (id, tag) = value.split_once('.')?;
        let tag = hex::decode(tag).ok()?;
        if hmac::verify(&self.key, id.as_bytes(), &tag).is_err() {
            debug!("Rejected session cookie with an invalid signature");
            return None;
        }
        id.parse().ok()
    }

    /// Start a new session, returning it with its `Set-Cookie` value
    #[must_use]
    pub fn issue(&self) -> (SessionId, SecureCookieConfig) {
        let session = SessionId::generate();
        let cookie = SecureCookieConfig::new(
            COOKIE_NAME.to_owned(),
            self.sign(&session),
            self.max_age_secs,
        )
        .secure(self.secure)
        .same_site(SameSite::Lax);
        (session, cookie)
    }

    /// Verified session of a request, if any
    #[must_use]
    pub fn session_from_headers(&self, headers: &HeaderMap) -> Option<SessionId> {
        get_cookie_value(headers, COOKIE_NAME).and_then(|value| self.verify(&value))
    }
}
