use crate::cli::{actions::runtime, globals::GlobalArgs};
use anyhow::Result;
use reqwest::Method;
use tracing::warn;

/// Handle the logout action. The local session always clears, even when the
/// best-effort server-side invalidation fails.
pub async fn handle(globals: &GlobalArgs) -> Result<()> {
    let rt = runtime(globals)?;

    if rt.store.snapshot().is_authenticated() {
        let invalidation = rt
            .client
            .send(rt.client.request(Method::POST, "/auth/logout"))
            .await;
        if let Err(e) = invalidation {
            warn!("Server-side session invalidation failed: {e}");
        }
    }

    rt.store.logout();
    rt.client.reset_cookies();
    println!("Signed out.");

    Ok(())
}
