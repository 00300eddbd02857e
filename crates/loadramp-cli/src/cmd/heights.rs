use anyhow::Context;
use loadramp_core::{scenario, Settings};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let settings = Settings::load_or_default(root).context("failed to load settings")?;
    let map = scenario::ramp_up_heights(&settings.scenario_path(root))
        .context("failed to read ramp-up heights")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&map)?);
    } else if map.is_empty() {
        println!("No ramp-up heights in {}.", settings.scenario_file);
    } else {
        for (name, height) in &map {
            println!("{name:<20} {height}");
        }
    }
    Ok(())
}
