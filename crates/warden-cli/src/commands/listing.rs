//! Policy and resource listings.

use anyhow::Result;
use warden_abac::Predicate;

use crate::table::table;

pub fn policies(project: &str) -> Result<()> {
    let service = super::build_service(project, false)?;
    let registry = service.policies();

    let rows: Vec<Vec<String>> = registry
        .names()
        .into_iter()
        .filter_map(|name| registry.get(name))
        .map(|policy| {
            let rule = match policy.predicate() {
                Predicate::Condition(condition) => condition.to_string(),
                Predicate::Function(_) => "(built-in function)".to_string(),
            };
            vec![policy.name().to_string(), rule]
        })
        .collect();

    println!("{}", table(&["Policy", "Rule"], &rows));
    Ok(())
}

pub fn resources(project: &str) -> Result<()> {
    let service = super::build_service(project, false)?;

    let rows: Vec<Vec<String>> = service
        .resources()
        .map(|resource| {
            vec![
                resource.path().to_string(),
                resource.policy().name().to_string(),
                resource.message().unwrap_or_default().to_string(),
            ]
        })
        .collect();

    println!("{}", table(&["Path", "Policy", "Message"], &rows));
    Ok(())
}
