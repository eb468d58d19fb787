//! Simulate command - one login followed by one access check.

use anyhow::{Context, Result};
use warden::Admission;

/// What to check after logging in.
pub enum Target {
    Policy(String),
    Path(String),
}

pub fn run(project: &str, demo: bool, identity: &str, secret: &str, target: &Target) -> Result<()> {
    let service = super::build_service(project, demo)?;

    // Bind before logging in so an unknown policy is reported as such.
    let admission = match target {
        Target::Policy(name) => {
            let policy = service.policy(name).context("Cannot check policy")?;
            let handle = service
                .login(identity, secret)
                .context("Login failed")?;
            let admission = service.authorize(Some(&handle), &policy);
            service.logout(&handle);
            admission
        }
        Target::Path(path) => {
            let handle = service
                .login(identity, secret)
                .context("Login failed")?;
            let admission = service.authorize_resource(Some(&handle), path);
            service.logout(&handle);
            admission
        }
    };

    match admission {
        Admission::Admit(principal) => {
            println!("admitted: {}", principal.identity());
            if let Target::Path(path) = target
                && let Some(message) = service.resource(path).and_then(|r| r.message())
            {
                println!("{message}");
            }
            Ok(())
        }
        Admission::Denied(denial) => anyhow::bail!("denied: {}", denial.reason()),
        Admission::Unauthenticated => anyhow::bail!("unauthenticated"),
    }
}
