//! Check command - validates configuration by building the service.

use anyhow::Result;

pub fn run(project: &str, demo: bool) -> Result<()> {
    let service = super::build_service(project, demo)?;

    println!("Configuration OK");
    println!("  Policies:  {}", service.policies().len());
    println!("  Resources: {}", service.resources().count());
    match service.sessions().max_age() {
        Some(max_age) => println!("  Session max age: {}s", max_age.num_seconds()),
        None => println!("  Session max age: none"),
    }
    Ok(())
}
