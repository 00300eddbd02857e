use anyhow::Context;
use loadramp_core::{RetryController, Settings};
use loadramp_harness::HarnessCommand;
use std::path::Path;

pub fn run(root: &Path, command: Option<&str>, max_cycles: Option<u32>) -> anyhow::Result<()> {
    let mut settings = Settings::load_or_default(root).context("failed to load settings")?;
    if let Some(cmd) = command {
        settings.harness_command = cmd.to_string();
    }
    if let Some(cap) = max_cycles {
        settings.max_cycles = cap;
    }

    let harness = HarnessCommand::from_command_line(
        &settings.harness_command,
        root,
        &settings.log_path(root),
    )
    .context("invalid harness command")?;

    // An empty seed log never satisfies the predicate, so the first
    // iteration always mutates and runs the harness once.
    let outcome = RetryController::new(root, &settings, harness).run(Vec::new())?;
    println!("{}", outcome.state.as_str());
    Ok(())
}
