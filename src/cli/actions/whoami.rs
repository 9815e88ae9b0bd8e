use crate::{
    cli::{actions::runtime, globals::GlobalArgs},
    consent::{self, GateState},
    error::AuthError,
    identity::IdentityResolver,
};
use anyhow::Result;
use tracing::warn;

/// Handle the whoami action: show the canonical profile when reachable,
/// fall back to the cached copy when offline.
pub async fn handle(globals: &GlobalArgs) -> Result<()> {
    let rt = runtime(globals)?;

    if !rt.store.snapshot().is_authenticated() {
        println!("Not signed in.");
        return Ok(());
    }

    let resolver = IdentityResolver::new(rt.client.clone(), rt.store.clone());
    let profile = match resolver.refresh().await {
        Ok(profile) => Some(profile),
        Err(AuthError::ProfileFetchFailed(e) | AuthError::NetworkUnavailable(e)) => {
            warn!("Backend unreachable, showing the cached profile: {e}");
            rt.store.snapshot().user
        }
        Err(AuthError::MalformedToken(e)) => {
            // An undecodable token means "not signed in", not a crash.
            warn!("Stored token is unusable: {e}");
            None
        }
        Err(e) => return Err(e.into()),
    };

    match profile {
        Some(profile) => {
            println!("{}", serde_json::to_string_pretty(&profile)?);
            match consent::evaluate(Some(&profile)) {
                GateState::Allowed => println!("Consent: acknowledged"),
                GateState::Blocked => {
                    println!("Consent: pending, run: beema consent");
                }
            }
        }
        None => println!("Not signed in."),
    }

    Ok(())
}
