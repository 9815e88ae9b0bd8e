use crate::{
    auth::types::AgentApplication,
    cli::globals::GlobalArgs,
    client::ApiClient,
    session::{persist::FileSessionStore, SessionStore},
};
use anyhow::{Context, Result};
use std::{
    io::{stdin, stdout, Write},
    path::PathBuf,
    sync::Arc,
};

pub mod agent;
pub mod consent;
pub mod login;
pub mod logout;
pub mod whoami;

#[derive(Debug)]
pub enum Action {
    Login {
        mobile: String,
    },
    AgentRegister {
        application: AgentApplication,
        photo: PathBuf,
    },
    Whoami,
    Consent {
        text: String,
    },
    Logout,
}

/// Shared wiring for every action: a hydrated session store and the API
/// client attached to it.
pub(crate) struct Runtime {
    pub client: Arc<ApiClient>,
    pub store: Arc<SessionStore>,
}

pub(crate) fn runtime(globals: &GlobalArgs) -> Result<Runtime> {
    let persistence = FileSessionStore::new(globals.session_file.clone());
    let store = Arc::new(SessionStore::new(Box::new(persistence)));
    // Restore a previous session before anything talks to the backend.
    store.hydrate();
    let client = Arc::new(ApiClient::new(&globals.api_url, store.clone())?);
    Ok(Runtime { client, store })
}

pub(crate) fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    stdout().flush().context("flushing prompt")?;
    let mut line = String::new();
    stdin().read_line(&mut line).context("reading input")?;
    Ok(line.trim().to_string())
}
