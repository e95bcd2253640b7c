use std::path::Path;
use uplift_core::version::{self, ProjectVersion};

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let classification = version::classify(root)?;

    if json {
        let declared = match &classification {
            ProjectVersion::Upgradable(v) | ProjectVersion::Unsupported(v) => Some(v.as_str()),
            _ => None,
        };
        let payload = serde_json::json!({
            "root": root.display().to_string(),
            "status": classification.as_str(),
            "version": declared,
            "migratable": version::is_migratable(&classification),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    match classification {
        ProjectVersion::Upgradable(v) => {
            println!("Project is on schema {v} and can be upgraded. Run 'uplift upgrade'.")
        }
        ProjectVersion::Current => println!("Project is already on the current layout."),
        ProjectVersion::Unversioned => {
            println!("Project configuration carries no version marker; cannot upgrade.")
        }
        ProjectVersion::Unsupported(v) => {
            println!("Project is on schema {v}, which this tool does not support.")
        }
    }
    Ok(())
}
