use crate::{
    cli::{actions::runtime, globals::GlobalArgs},
    consent::{ConsentGate, GateState},
    identity::IdentityResolver,
};
use anyhow::Result;

/// Handle the consent action.
pub async fn handle(text: &str, globals: &GlobalArgs) -> Result<()> {
    let rt = runtime(globals)?;

    if rt.store.snapshot().user.is_none() {
        // No cached profile yet; resolve it so the gate has something to
        // evaluate and the acknowledgment has a user id.
        let resolver = IdentityResolver::new(rt.client.clone(), rt.store.clone());
        resolver.refresh().await?;
    }

    let gate = ConsentGate::new(rt.client.clone(), rt.store.clone());
    match gate.acknowledge(text).await? {
        GateState::Allowed => println!("Terms acknowledged."),
        GateState::Blocked => println!("Consent is still pending."),
    }

    Ok(())
}
