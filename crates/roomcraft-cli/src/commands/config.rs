use anyhow::{Context, Result};
use roomcraft_core::config::DesignConfig;
use roomcraft_infrastructure::ConfigService;

pub async fn show(service: &ConfigService) -> Result<()> {
    let config = service.load().await?;
    println!("# {}", service.path().display());
    print!(
        "{}",
        toml::to_string_pretty(&config).context("Failed to render config as TOML")?
    );
    Ok(())
}

pub async fn init(service: &ConfigService, force: bool) -> Result<()> {
    let path = service.path();
    if !force && tokio::fs::try_exists(path).await.unwrap_or(false) {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        );
    }

    service.save(&DesignConfig::default()).await?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
