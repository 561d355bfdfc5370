use crate::{api, cli::actions::Action, cli::globals::GlobalArgs};
use anyhow::Result;
use secrecy::SecretString;

/// Handle the server action
/// # Errors
/// Returns an error if the server fails to start
pub async fn handle(action: Action) -> Result<()> {
    let Action::Server {
        port,
        dsn,
        session_secret,
        frontend_url,
    } = action;

    let mut globals = GlobalArgs::new(frontend_url);
    globals.set_secret(SecretString::from(session_secret));

    api::new(port, dsn, &globals).await
}
