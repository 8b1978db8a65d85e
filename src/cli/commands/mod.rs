pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ArgAction, ColorChoice, Command,
};
use uuid::Uuid;

pub const ARG_CONFIG: &str = "config";
pub const ARG_SESSION: &str = "session";
pub const ARG_TRUSTED_USER: &str = "trusted-user";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let command = Command::new("onboarding-policy")
        .about("Plan the onboarding steps that follow a successful login")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_CONFIG)
                .short('c')
                .long("config")
                .help("Tenant policy configuration (JSON); built-in defaults when omitted")
                .env("ONBOARDING_POLICY_CONFIG"),
        )
        .arg(
            Arg::new(ARG_SESSION)
                .short('s')
                .long("session")
                .help("Session stash snapshot (JSON object)")
                .env("ONBOARDING_POLICY_SESSION")
                .required(true),
        )
        .arg(
            Arg::new(ARG_TRUSTED_USER)
                .long("trusted-user")
                .help("User id whose current device is trusted, repeatable or comma separated")
                .env("ONBOARDING_POLICY_TRUSTED_USERS")
                .value_delimiter(',')
                .action(ArgAction::Append)
                .value_parser(clap::value_parser!(Uuid)),
        );

    logging::with_args(command)
}
