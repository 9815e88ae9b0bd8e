use crate::{
    auth::{agent::register_agent, types::AgentApplication},
    cli::{actions::runtime, globals::GlobalArgs},
};
use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Handle the agent-register action.
pub async fn handle(application: AgentApplication, photo: &Path, globals: &GlobalArgs) -> Result<()> {
    let rt = runtime(globals)?;

    let file_name = photo
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("aadhaar.jpg")
        .to_string();
    let bytes =
        fs::read(photo).with_context(|| format!("reading photo {}", photo.display()))?;

    register_agent(&rt.client, &rt.store, application, file_name, bytes).await?;
    println!("Agent registration complete, you are signed in.");

    Ok(())
}
