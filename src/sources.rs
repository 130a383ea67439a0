use anyhow::Result;

use crate::config::Config;

/// List configured catalog sources and the matcher reference root with a
/// basic health check (does the path exist).
pub fn list_sources(config: &Config) -> Result<()> {
    println!("{:<32} {:<10} {}", "SOURCE", "FORMAT", "STATUS");

    for source in &config.catalog.sources {
        let status = if source.path.exists() { "OK" } else { "MISSING" };
        println!(
            "{:<32} {:<10} {}",
            source.path.display(),
            format!("{:?}", source.format).to_lowercase(),
            status
        );
    }

    match &config.matcher {
        Some(matcher) => {
            let status = if matcher.reference_root.exists() {
                "OK"
            } else {
                "MISSING"
            };
            println!(
                "{:<32} {:<10} {}",
                matcher.reference_root.display(),
                "images",
                status
            );
        }
        None => {
            println!("{:<32} {:<10} {}", "(matcher)", "images", "NOT CONFIGURED");
        }
    }

    Ok(())
}
