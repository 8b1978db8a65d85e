//! Map validated command-line arguments to an action.

use crate::cli::{
    actions::{plan::Args, Action},
    commands::{ARG_CONFIG, ARG_SESSION, ARG_TRUSTED_USER},
};
use anyhow::{Context, Result};
use std::path::PathBuf;
use uuid::Uuid;

/// Map validated CLI matches to a plan action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let session = matches
        .get_one::<String>(ARG_SESSION)
        .map(PathBuf::from)
        .context("missing required argument: --session")?;

    Ok(Action::Plan(Args {
        config: matches.get_one::<String>(ARG_CONFIG).map(PathBuf::from),
        session,
        trusted_users: matches
            .get_many::<Uuid>(ARG_TRUSTED_USER)
            .map(|users| users.copied().collect())
            .unwrap_or_default(),
    }))
}
