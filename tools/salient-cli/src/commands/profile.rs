//! Print built-in detector profiles.

use salient_region_model::{DetectorConfig, PROFILE_NAMES};

pub fn run(name: Option<String>) -> anyhow::Result<()> {
    match name {
        Some(name) => {
            let config = DetectorConfig::profile(&name)?;
            println!("{}", config.to_json_pretty()?);
        }
        None => {
            println!("Available profiles:");
            for name in PROFILE_NAMES {
                println!("  {name}");
            }
        }
    }
    Ok(())
}
