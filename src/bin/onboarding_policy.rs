use anyhow::Result;
use onboarding_policy::cli::{actions, actions::Action, start};

fn main() -> Result<()> {
    // Start the program
    let action = start()?;

    // Handle the action
    match action {
        Action::Plan(args) => actions::plan::execute(args)?,
    }

    Ok(())
}
