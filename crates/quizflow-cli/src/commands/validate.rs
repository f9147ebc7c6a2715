//! The `quizflow validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(definition_path: PathBuf) -> Result<()> {
    let definitions = if definition_path.is_dir() {
        quizflow_core::parser::load_definition_directory(&definition_path)?
    } else {
        vec![quizflow_core::parser::parse_definition(&definition_path)?]
    };

    let mut total_warnings = 0;

    for definition in &definitions {
        println!(
            "Questionnaire: {} ({} initial questions, {} flows)",
            definition.title,
            definition.initial_questions.len(),
            definition.question_flows.len()
        );

        let warnings = quizflow_core::parser::validate_definition(definition);
        for warning in &warnings {
            let prefix = warning
                .question_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", warning.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All definitions valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
