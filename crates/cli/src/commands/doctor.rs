//! `doctor` — diagnose configuration and collaborator health.

use deepbrief_config::AppConfig;
use deepbrief_core::{CompletionProvider, SearchProvider};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    println!("Config: {config:#?}");

    match config.validate() {
        Ok(()) => println!("✓ Config valid"),
        Err(e) => {
            println!("✗ Config invalid: {e}");
            return Ok(());
        }
    }

    match deepbrief_providers::from_config(&config) {
        Ok(provider) => match provider.health_check().await {
            Ok(true) => println!("✓ Completion provider '{}' reachable", provider.name()),
            Ok(false) => println!("✗ Completion provider '{}' unhealthy", provider.name()),
            Err(e) => println!("✗ Completion provider '{}': {e}", provider.name()),
        },
        Err(e) => println!("✗ Completion provider not configured: {e}"),
    }

    match deepbrief_search::from_config(&config) {
        Ok(search) => match search.health_check().await {
            Ok(true) => println!("✓ Search service '{}' reachable", search.name()),
            Ok(false) => println!("✗ Search service '{}' credentials rejected", search.name()),
            Err(e) => println!("✗ Search service '{}': {e}", search.name()),
        },
        Err(e) => println!("✗ Search service not configured: {e}"),
    }

    Ok(())
}
