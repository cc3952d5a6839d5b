//! List command implementation.
//!
//! This module lists catalog instruments with optional filtering.

use anyhow::Result;
use barvault_lib::prelude::*;

/// List catalog instruments filtered by provider and/or search pattern.
pub(crate) fn list_instruments(provider: Option<Provider>, search: Option<&str>) -> Result<()> {
    let catalog = Catalog::global();

    let entries: Vec<&CatalogEntry> = search
        .map_or_else(|| catalog.entries().iter().collect(), |pattern| catalog.search(pattern))
        .into_iter()
        .filter(|entry| provider.is_none_or(|p| entry.has_provider(p)))
        .collect();

    if entries.is_empty() {
        println!("No instruments found.");
        return Ok(());
    }

    println!("{:<8} {:<10} {:<18} {:<30}", "SYMBOL", "NAME", "CATEGORY", "PROVIDERS");
    println!("{}", "-".repeat(70));

    for entry in &entries {
        let providers: Vec<&str> = entry.providers().iter().map(Provider::as_str).collect();
        println!(
            "{:<8} {:<10} {:<18} {:<30}",
            entry.symbol(),
            entry.name(),
            entry.category(),
            providers.join(", ")
        );
    }

    println!("\nTotal: {} instruments", entries.len());
    Ok(())
}
