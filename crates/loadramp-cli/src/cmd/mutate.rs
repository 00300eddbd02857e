use anyhow::Context;
use loadramp_core::{retry, Settings};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let settings = Settings::load_or_default(root).context("failed to load settings")?;
    retry::mutate_cycle(root, &settings).context("mutation pipeline failed")?;
    println!("Ramp-up heights doubled; archive rebuilt.");
    Ok(())
}
