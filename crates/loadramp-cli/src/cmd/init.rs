use anyhow::Context;
use loadramp_core::{paths, Settings};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let path = paths::settings_path(root);
    if path.exists() {
        println!("{} already exists.", paths::SETTINGS_FILE);
        return Ok(());
    }
    Settings::default()
        .save(root)
        .context("failed to write settings")?;
    println!("Wrote {}.", path.display());
    Ok(())
}
