//! Session guard for protected inventory pages.
//!
//! The guard owns the persisted token and the in-memory session identity.
//! It is passed explicitly to the pages that need it rather than living in
//! ambient global state, and it checks expiry against wall-clock time on
//! every decode, failing closed.

use crate::{
    session::store::TokenStore,
    token::{self, Claims},
};
use tracing::{debug, warn};

/// Decoded claims held in client memory for the lifetime of the page session.
pub type SessionIdentity = Claims;

/// Auth state as seen by protected pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Initial state, persisted session not loaded yet.
    Unknown,
    /// A valid decoded identity is held.
    Authenticated(SessionIdentity),
    /// No token, or decode/expiry check failed.
    Unauthenticated,
}

/// What a protected page should do on this render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderDecision {
    /// Withhold protected content and show the loading indicator.
    Loading,
    /// Navigate to the login entry point and withhold protected content.
    RedirectToLogin,
    /// Redirect already fired, keep withholding protected content.
    Withhold,
    /// Render the wrapped content.
    Render,
}

pub struct SessionGuard {
    store: TokenStore,
    state: AuthState,
    redirected: bool,
}

impl SessionGuard {
    #[must_use]
    pub fn new(store: TokenStore) -> Self {
        Self {
            store,
            state: AuthState::Unknown,
            redirected: false,
        }
    }

    #[must_use]
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    #[must_use]
    pub fn identity(&self) -> Option<&SessionIdentity> {
        match &self.state {
            AuthState::Authenticated(identity) => Some(identity),
            AuthState::Unknown | AuthState::Unauthenticated => None,
        }
    }

    /// Load the persisted session once on mount.
    ///
    /// A missing token resolves to `Unauthenticated`. A token that fails to
    /// decode, or whose expiry has elapsed, is discarded from the store
    /// before resolving to `Unauthenticated`.
    pub fn mount(&mut self) -> &AuthState {
        match self.store.read() {
            None => self.enter_unauthenticated(),
            Some(stored) => match token::decode_unverified(&stored) {
                Ok(claims) => {
                    if claims.is_expired_at(token::now_unix_seconds()) {
                        debug!("Stored session token expired, discarding");
                        self.discard_stored();
                        self.enter_unauthenticated();
                    } else {
                        self.state = AuthState::Authenticated(claims);
                        self.redirected = false;
                    }
                }
                Err(e) => {
                    warn!("Failed to decode stored session token: {e}");
                    self.discard_stored();
                    self.enter_unauthenticated();
                }
            },
        }

        &self.state
    }

    /// Accept a freshly issued token: decode it, persist it and enter
    /// `Authenticated`.
    ///
    /// # Errors
    ///
    /// Returns an error and resolves to `Unauthenticated` when the token does
    /// not decode or is already expired. Nothing is persisted in that case.
    pub fn login(&mut self, token_str: &str) -> Result<(), token::Error> {
        let claims = match token::decode_unverified(token_str) {
            Ok(claims) if !claims.is_expired_at(token::now_unix_seconds()) => claims,
            Ok(_) => {
                self.enter_unauthenticated();
                return Err(token::Error::Expired);
            }
            Err(e) => {
                self.enter_unauthenticated();
                return Err(e);
            }
        };

        if let Err(e) = self.store.write(token_str) {
            // the in-memory session continues, the next mount starts signed out
            warn!("Failed to persist session token: {e}");
        }

        self.state = AuthState::Authenticated(claims);
        self.redirected = false;

        Ok(())
    }

    /// Discard the stored token and clear the identity. Safe to call in any
    /// state, repeated logouts stay `Unauthenticated`.
    pub fn logout(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!("Failed to discard stored token: {e}");
        }
        self.enter_unauthenticated();
    }

    /// Decide what a protected page should do on this render pass. The
    /// redirect fires exactly once per unauthenticated episode.
    pub fn check(&mut self) -> RenderDecision {
        match self.state {
            AuthState::Unknown => RenderDecision::Loading,
            AuthState::Authenticated(_) => RenderDecision::Render,
            AuthState::Unauthenticated => {
                if self.redirected {
                    RenderDecision::Withhold
                } else {
                    self.redirected = true;
                    RenderDecision::RedirectToLogin
                }
            }
        }
    }

    fn enter_unauthenticated(&mut self) {
        self.state = AuthState::Unauthenticated;
        self.redirected = false;
    }

    fn discard_stored(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!("Failed to discard stored token: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{sign, SESSION_TTL_SECONDS};

    const SECRET: &str = "test-session-secret";

    fn claims_for(sub: &str) -> Claims {
        let now = token::now_unix_seconds();
        Claims {
            sub: sub.to_string(),
            email: "a@b.com".to_string(),
            role: "admin".to_string(),
            iat: now,
            exp: now + SESSION_TTL_SECONDS,
        }
    }

    fn guard_in(dir: &tempfile::TempDir) -> SessionGuard {
        SessionGuard::new(TokenStore::new(dir.path()))
    }

    #[test]
    fn mount_without_token_redirects_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut guard = guard_in(&dir);

        assert_eq!(guard.state(), &AuthState::Unknown);
        assert_eq!(guard.check(), RenderDecision::Loading);

        guard.mount();
        assert_eq!(guard.state(), &AuthState::Unauthenticated);
        assert_eq!(guard.check(), RenderDecision::RedirectToLogin);
        assert_eq!(guard.check(), RenderDecision::Withhold);
        assert_eq!(guard.check(), RenderDecision::Withhold);
    }

    #[test]
    fn mount_with_stored_token_authenticates() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path());
        let token = sign(SECRET, &claims_for("42")).unwrap();
        store.write(&token).unwrap();

        let mut guard = guard_in(&dir);
        guard.mount();

        assert_eq!(guard.identity().map(|c| c.sub.as_str()), Some("42"));
        assert_eq!(guard.check(), RenderDecision::Render);
    }

    #[test]
    fn mount_with_corrupt_token_discards_it() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path());
        store.write("not-a-token").unwrap();

        let mut guard = guard_in(&dir);
        guard.mount();

        assert_eq!(guard.state(), &AuthState::Unauthenticated);
        assert_eq!(store.read(), None);
    }

    #[test]
    fn mount_with_expired_token_fails_closed() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path());
        let mut claims = claims_for("42");
        claims.iat -= SESSION_TTL_SECONDS + 60;
        claims.exp = claims.iat + SESSION_TTL_SECONDS;
        store.write(&sign(SECRET, &claims).unwrap()).unwrap();

        let mut guard = guard_in(&dir);
        guard.mount();

        assert_eq!(guard.state(), &AuthState::Unauthenticated);
        assert_eq!(store.read(), None);
    }

    #[test]
    fn login_persists_token_across_mounts() {
        let dir = tempfile::tempdir().unwrap();
        let token = sign(SECRET, &claims_for("42")).unwrap();

        let mut guard = guard_in(&dir);
        guard.login(&token).unwrap();
        assert_eq!(guard.check(), RenderDecision::Render);

        // A fresh guard over the same store picks the session back up.
        let mut next = guard_in(&dir);
        next.mount();
        assert_eq!(next.identity().map(|c| c.sub.as_str()), Some("42"));
    }

    #[test]
    fn login_with_corrupt_token_stores_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path());

        let mut guard = guard_in(&dir);
        assert!(guard.login("garbage").is_err());
        assert_eq!(guard.state(), &AuthState::Unauthenticated);
        assert_eq!(store.read(), None);
    }

    #[test]
    fn logout_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let token = sign(SECRET, &claims_for("42")).unwrap();

        let mut guard = guard_in(&dir);
        guard.login(&token).unwrap();

        guard.logout();
        assert_eq!(guard.state(), &AuthState::Unauthenticated);

        guard.logout();
        guard.logout();
        assert_eq!(guard.state(), &AuthState::Unauthenticated);
        assert_eq!(guard.identity(), None);
    }
}
