use crate::{
    auth::types::AgentApplication,
    cli::{actions::Action, globals::GlobalArgs},
};
use anyhow::{Context, Result};
use std::path::PathBuf;

pub fn handler(matches: &clap::ArgMatches) -> Result<(Action, GlobalArgs)> {
    let globals = GlobalArgs::new(
        matches
            .get_one("api-url")
            .map(|s: &String| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --api-url"))?,
        matches
            .get_one("session-file")
            .map(|s: &String| PathBuf::from(s))
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --session-file"))?,
    );

    // Closure to return subcommand matches
    let sub_m = |subcommand| -> Result<&clap::ArgMatches> {
        matches
            .subcommand_matches(subcommand)
            .context("arguments not found")
    };

    let get = |m: &clap::ArgMatches, name: &str| -> Result<String> {
        m.get_one::<String>(name)
            .map(String::to_string)
            .with_context(|| format!("missing required argument: --{name}"))
    };

    let action = match matches.subcommand_name() {
        Some("login") => Action::Login {
            mobile: get(sub_m("login")?, "mobile")?,
        },
        Some("agent-register") => {
            let m = sub_m("agent-register")?;
            Action::AgentRegister {
                application: AgentApplication {
                    agent_name: get(m, "name")?,
                    phone_number: get(m, "phone")?,
                    state: get(m, "state")?,
                    mandi_name: get(m, "mandi")?,
                    aadhaar_number: get(m, "aadhaar-number")?,
                },
                photo: PathBuf::from(get(m, "photo")?),
            }
        }
        Some("whoami") => Action::Whoami,
        Some("consent") => Action::Consent {
            text: get(sub_m("consent")?, "text")?,
        },
        Some("logout") => Action::Logout,
        _ => return Err(anyhow::anyhow!("no command provided")),
    };

    Ok((action, globals))
}
