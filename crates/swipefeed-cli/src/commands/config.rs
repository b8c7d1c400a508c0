use anyhow::{bail, Result};
use swipefeed_core::AppConfig;

/// Print the effective configuration as TOML
pub fn show(config: &AppConfig) -> Result<()> {
    println!("# {}", AppConfig::config_path().display());
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Write the default configuration file
pub fn init(force: bool) -> Result<()> {
    let path = AppConfig::config_path();
    if path.exists() && !force {
        bail!(
            "Config file already exists at {}\nUse --force to overwrite it.",
            path.display()
        );
    }
    AppConfig::default().save()?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
