//! Configuration management commands.

use anyhow::Result;

/// Show the merged configuration with user secrets redacted.
pub fn show(project: &str, format: &str) -> Result<()> {
    let config = super::load_config(project, false)?.redacted();

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        "toml" => {
            let toml_str = toml::to_string_pretty(&config)?;
            println!("{toml_str}");
        }
        "text" => {
            println!("Warden Configuration");
            println!("====================\n");

            println!("Session:");
            println!(
                "  Max age: {}",
                config
                    .session
                    .max_age_secs
                    .map_or("none".to_string(), |s| format!("{s}s"))
            );
            println!();

            println!("Users ({}):", config.users.len());
            for user in &config.users {
                println!(
                    "  {} ({}, {}, clearance {}, seniority {})",
                    user.identity, user.department, user.role, user.clearance, user.seniority
                );
            }
            println!();

            println!("Policies ({} configured):", config.policies.len());
            for policy in &config.policies {
                println!("  {}: {}", policy.name, policy.condition);
            }
            println!();

            println!("Resources ({}):", config.resources.len());
            for resource in &config.resources {
                println!("  {} -> {}", resource.path, resource.policy);
            }
        }
        other => anyhow::bail!("Unknown format '{other}'. Use text, json, or toml."),
    }

    Ok(())
}
