use crate::{
    auth::{types::NewUser, Directive, OtpOrchestrator},
    cli::{
        actions::{prompt, runtime},
        globals::GlobalArgs,
    },
    consent::{self, GateState},
    identity::IdentityResolver,
};
use anyhow::Result;
use tracing::warn;

/// Handle the login action: request a code, verify it, and follow the
/// directive the server returns.
pub async fn handle(mobile: &str, globals: &GlobalArgs) -> Result<()> {
    let rt = runtime(globals)?;
    let orchestrator = OtpOrchestrator::new(rt.client.clone(), rt.store.clone());

    match orchestrator.request_code(mobile).await? {
        Some(message) => println!("{message}"),
        None => println!("A one-time code was sent to {mobile}"),
    }

    let code = prompt("One-time code: ")?;
    match orchestrator.verify_code(mobile, &code).await? {
        Directive::Register => {
            println!("New account, a few details to finish up.");
            let name = prompt("Name: ")?;
            let state = prompt("State: ")?;
            orchestrator
                .complete_registration(NewUser { name, state })
                .await?;
            println!("Registration complete.");
        }
        Directive::LoginVerify | Directive::Home => println!("Signed in."),
    }

    let resolver = IdentityResolver::new(rt.client.clone(), rt.store.clone());
    match resolver.refresh().await {
        Ok(profile) => {
            if consent::evaluate(Some(&profile)) == GateState::Blocked {
                println!("Current terms are pending acknowledgment, run: beema consent");
            }
        }
        // Signing in succeeded; a profile refresh failure is not fatal here.
        Err(e) => warn!("Could not refresh the profile: {e}"),
    }

    Ok(())
}
