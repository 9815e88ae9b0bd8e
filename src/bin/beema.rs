use anyhow::Result;
use beema::cli::{actions, actions::Action, start};

// Main function
#[tokio::main]
async fn main() -> Result<()> {
    // Start the program
    let (action, globals) = start()?;

    // Handle the action
    match action {
        Action::Login { mobile } => actions::login::handle(&mobile, &globals).await?,
        Action::AgentRegister { application, photo } => {
            actions::agent::handle(application, &photo, &globals).await?;
        }
        Action::Whoami => actions::whoami::handle(&globals).await?,
        Action::Consent { text } => actions::consent::handle(&text, &globals).await?,
        Action::Logout => actions::logout::handle(&globals).await?,
    }

    Ok(())
}
