//! The `quizflow list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::Table;

use quizflow_core::catalog::Catalog;

pub fn execute(dir: PathBuf) -> Result<()> {
    let catalog = Catalog::from_directory(&dir)?;

    if catalog.entries().is_empty() {
        println!("No questionnaires found in {}.", dir.display());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Category", "Questions", "Minutes"]);
    for entry in catalog.entries() {
        table.add_row(vec![
            entry.id.clone(),
            entry.title.clone(),
            entry.category.clone(),
            entry.question_count.to_string(),
            entry
                .estimated_minutes
                .map(|m| m.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    println!("{table}");

    let stats = catalog.stats();
    println!(
        "{} questionnaire(s) in {} categor{}.",
        stats.total,
        stats.categories.len(),
        if stats.categories.len() == 1 { "y" } else { "ies" }
    );

    Ok(())
}
