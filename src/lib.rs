//! # Onboarding Policy
//!
//! Decides which additional steps a user must go through after a successful
//! login before the session is complete: MFA verification, password recovery,
//! profile details (username, email), credential creation (password, passkey)
//! and device trust.
//!
//! ## Inputs
//!
//! - **Policy configuration:** per-tenant toggles loaded once
//!   ([`onboarding::PolicyConfig`]).
//! - **Session stash:** the host runtime's per-login key-value store
//!   ([`onboarding::Stash`]). The engine reads the user's credential and
//!   profile state from it and writes only the idempotency flag.
//!
//! ## Outputs
//!
//! An ordered list of [`onboarding::Step`]s appended to the host's scheduler
//! and, for unusable security keys, a terminal flow error code. The engine never
//! executes or renders steps.

pub mod cli;
pub mod onboarding;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
