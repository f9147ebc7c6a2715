//! The `quizflow history` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use comfy_table::Table;

use quizflow_core::traits::ResultSink;
use quizflow_storage::{JsonFileBackend, ResultStore, StorageBackend};

pub async fn execute(
    user: String,
    questionnaire: Option<String>,
    data_dir: PathBuf,
) -> Result<()> {
    let store = ResultStore::new(Arc::new(JsonFileBackend::new(&data_dir)) as Arc<dyn StorageBackend>);
    let results = store.load_results(&user, questionnaire.as_deref()).await?;

    if results.is_empty() {
        println!("No saved results for user '{user}'.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Completed", "Questionnaire", "Score", "Result"]);
    for result in &results {
        table.add_row(vec![
            result.completed_at.format("%Y-%m-%d %H:%M").to_string(),
            result.questionnaire_id.clone(),
            result.score.to_string(),
            result.interpretation.label.clone(),
        ]);
    }
    println!("{table}");

    let stats = store.user_stats(&user).await?;
    println!(
        "{} run(s), average score {}.",
        stats.total_runs, stats.average_score
    );

    Ok(())
}
