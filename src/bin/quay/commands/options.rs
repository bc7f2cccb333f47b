//! `quay options` command

use anyhow::Result;

use quay::core::recipe::{PACKAGE_NAME, SETTINGS};
use quay::core::RevisionSchema;

use crate::commands::GlobalArgs;

pub fn execute(global: &GlobalArgs) -> Result<()> {
    let schema = RevisionSchema::for_revision(global.revision());

    println!("{} revision {}", PACKAGE_NAME, schema.revision);
    println!("settings: {}", SETTINGS.join(", "));

    let minimums: Vec<String> = schema
        .minimum_versions
        .iter()
        .map(|(family, version)| format!("{} {}", family, version.major))
        .collect();
    println!("minimum compilers: {}", minimums.join(", "));

    if schema.features.is_empty() {
        println!("revision {} declares no options", schema.revision);
        return Ok(());
    }

    println!("options for revision {}:", schema.revision);
    for decl in schema.features {
        let default = if decl.default { "True" } else { "False" };
        println!("  {:<22} {:<6} {}", decl.name, default, decl.description);
    }

    if !schema.implications.is_empty() {
        println!("implications:");
        for rule in schema.implications {
            println!("  {}", rule);
        }
    }

    Ok(())
}
