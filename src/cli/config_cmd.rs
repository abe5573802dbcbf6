use anyhow::Result;

use crate::core::config::AppConfig;

pub fn init() -> Result<()> {
    let path = AppConfig::config_path();
    if path.exists() {
        eprintln!("Config file already exists at {}", path.display());
        eprintln!("Remove it first if you want to regenerate.");
        return Ok(());
    }

    match AppConfig::default().save() {
        Ok(path) => {
            println!("Generated config at {}", path.display());
            println!("  Set notifier.endpoint_url (or SLACK_WEBHOOK_URL) to enable delivery.");
        }
        Err(e) => {
            eprintln!("Failed to generate config: {}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}

pub fn check() -> Result<()> {
    let path = AppConfig::config_path();
    let config = match AppConfig::load() {
        Ok(c) => c.with_env_overrides(),
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    let issues = config.validate();
    if issues.is_empty() {
        if path.exists() {
            println!("Config OK ({})", path.display());
        } else {
            println!("No config file at {}, defaults are valid", path.display());
        }
        println!("  Region    {}", config.cost_explorer.region);
        println!(
            "  Endpoint  {}",
            if config.notifier.endpoint_url.is_some() {
                "configured"
            } else {
                "not set"
            }
        );
        return Ok(());
    }

    eprintln!(
        "Config has {} issue{}:",
        issues.len(),
        if issues.len() == 1 { "" } else { "s" }
    );
    for issue in &issues {
        eprintln!("  - {}", issue);
    }
    std::process::exit(1);
}
