use std::path::Path;

use anyhow::{bail, Result};

use roller_core::AppConfig;

pub fn show(config: &AppConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}

pub fn init(path: Option<&Path>, force: bool) -> Result<()> {
    let default_path = AppConfig::config_path();
    let path = path.unwrap_or(&default_path);

    if path.exists() && !force {
        bail!(
            "Config already exists at {}\nUse --force to overwrite it.",
            path.display()
        );
    }

    AppConfig::default().save_to(path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

pub fn path(path: Option<&Path>) {
    match path {
        Some(p) => println!("{}", p.display()),
        None => println!("{}", AppConfig::config_path().display()),
    }
}
