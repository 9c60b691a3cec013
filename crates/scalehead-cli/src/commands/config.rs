use anyhow::Result;

use scalehead_core::AppConfig;

pub fn run(config: &AppConfig, write: bool) -> Result<()> {
    print!("{}", config.to_toml()?);

    if write {
        config.save()?;
        tracing::info!(path = %AppConfig::config_path().display(), "Configuration written");
        println!("\nWritten to {}", AppConfig::config_path().display());
    }

    Ok(())
}
