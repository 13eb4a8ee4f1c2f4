use anyhow::{bail, Result};

use cepcheck_core::AppConfig;

pub fn path() -> Result<()> {
    println!("{}", AppConfig::config_path().display());
    Ok(())
}

pub fn init(force: bool) -> Result<()> {
    let config_path = AppConfig::config_path();

    if config_path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    AppConfig::default().save()?;
    println!("Wrote default configuration to {}", config_path.display());
    tracing::info!("Initialized config at {}", config_path.display());

    Ok(())
}
