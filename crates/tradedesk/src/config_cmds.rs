use std::path::Path;

use anyhow::{Result, bail};
use tdk_config::{GlobalConfig, validate_config};
use tdk_core::OutputFormat;

pub(crate) fn handle_config_show(format: OutputFormat) -> Result<()> {
    let config = GlobalConfig::load()?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        OutputFormat::Text => print!("{}", toml::to_string_pretty(&config)?),
    }
    Ok(())
}

pub(crate) fn handle_config_init(force: bool) -> Result<()> {
    let path = GlobalConfig::config_path()?;
    init_at(&path, force)?;
    eprintln!("Wrote configuration template to: {}", path.display());
    Ok(())
}

fn init_at(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite",
            path.display()
        );
    }
    GlobalConfig::save_default_template_to(path)
}

pub(crate) fn handle_config_validate() -> Result<()> {
    let path = GlobalConfig::config_path()?;
    let config = if path.exists() {
        GlobalConfig::load_from_path(&path)?
    } else {
        eprintln!("No config file at {}; checking defaults", path.display());
        GlobalConfig::default()
    };
    validate_config(&config)?;
    eprintln!("Configuration is valid");
    Ok(())
}
