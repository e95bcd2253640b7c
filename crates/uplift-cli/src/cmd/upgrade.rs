use std::path::Path;
use uplift_core::{migrate, MigrationOutcome};

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let outcome = migrate(root)?;

    if json {
        let payload = serde_json::json!({
            "root": root.display().to_string(),
            "outcome": match &outcome {
                MigrationOutcome::Migrated => "migrated",
                MigrationOutcome::NotNeeded(_) => "not_needed",
            },
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    match outcome {
        MigrationOutcome::Migrated => {
            println!("Project upgraded to the v3 layout.");
            println!("  created: appkit/settings.json");
            println!("  created: appkit/app.yml");
            println!("  backup:  .backup/ (safe to delete once verified)");
        }
        MigrationOutcome::NotNeeded(v) => {
            println!("Nothing to do: project is {}.", v.as_str());
        }
    }
    Ok(())
}
