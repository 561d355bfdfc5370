//! # Hornada (Bakery Inventory Access Management)
//!
//! `hornada` is the authentication core of a small bakery inventory
//! application. It issues and verifies signed session tokens for the
//! inventory API and ships the client-side session guard used by the
//! admin pages.
//!
//! ## Sessions
//!
//! Sessions are self-contained signed tokens (JWT, HS256) carrying the
//! subject id, email and role, valid for a fixed seven-day window. There is
//! no server-side session table and no revocation list; a session ends when
//! the client discards the token or the expiry elapses.
//!
//! ## Credentials
//!
//! Credential records live in Postgres (`users` table). Passwords are stored
//! as salted scrypt hashes in PHC string format. Login responds with the same
//! `401` for an unknown email and for a wrong password, so account existence
//! cannot be probed through the login endpoint.

pub mod api;
pub mod cli;
pub mod password;
pub mod session;
pub mod token;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        // Should be a hex string (full SHA-1 is 40 chars, but could be short)
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
