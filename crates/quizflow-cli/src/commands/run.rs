//! The `quizflow run` command: an interactive questionnaire session.
//!
//! Reads answers from stdin one line at a time, branches according to the
//! definition, and prints the scored, interpreted result at the end.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use comfy_table::Table;

use quizflow_core::catalog::Catalog;
use quizflow_core::demographics::UserProfile;
use quizflow_core::engine::QuizEngine;
use quizflow_core::model::{Question, QuestionKind};
use quizflow_core::results::{AnswerValue, CompletedResult};
use quizflow_core::session::StepOutcome;
use quizflow_interpret::StandardInterpreter;
use quizflow_storage::{BackendChain, JsonFileBackend, MemoryBackend, ResultStore, StorageBackend};

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    definition: PathBuf,
    user: String,
    age: Option<u32>,
    gender: Option<String>,
    occupation: Option<String>,
    data_dir: PathBuf,
    json: bool,
) -> Result<()> {
    let parsed = quizflow_core::parser::parse_definition(&definition)?;
    for warning in quizflow_core::parser::validate_definition(&parsed) {
        tracing::warn!(
            question = warning.question_id.as_deref().unwrap_or("-"),
            "{}",
            warning.message
        );
    }
    let questionnaire_id = parsed.id.clone();
    let catalog = Catalog::from_definitions(vec![parsed]);

    // File storage first, an in-memory fallback so a full disk never loses
    // a finished run outright.
    let chain = BackendChain::new(vec![
        Arc::new(JsonFileBackend::new(&data_dir)) as Arc<dyn StorageBackend>,
        Arc::new(MemoryBackend::new()) as Arc<dyn StorageBackend>,
    ]);
    let store = ResultStore::new(Arc::new(chain));
    let engine = QuizEngine::new(
        Arc::new(catalog),
        Arc::new(store),
        Arc::new(StandardInterpreter),
    );

    let profile = UserProfile {
        name: None,
        age,
        gender,
        occupation,
    };
    let mut run = engine.start(&questionnaire_id, &user, Some(&profile)).await?;

    if !json {
        println!("{}", run.definition().title);
        if !run.definition().description.is_empty() {
            println!("{}", run.definition().description);
        }
        println!();
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let Some(question) = run.current_question().cloned() else {
            break;
        };
        if !json {
            print_question(&question, run.progress_percent());
        }

        let answer = loop {
            if !json {
                print!("> ");
                io::stdout().flush()?;
            }
            let line = lines
                .next()
                .context("input ended before the questionnaire was complete")??;
            match parse_answer(&question, line.trim()) {
                Ok(answer) => break answer,
                Err(e) => {
                    if json {
                        return Err(e);
                    }
                    println!("  {e}");
                }
            }
        };

        run.submit_answer(answer).await?;
        if run.go_next()? == StepOutcome::Completed {
            break;
        }
    }

    let Some(result) = run.finish().await? else {
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}

fn print_question(question: &Question, progress: u8) {
    println!("[{progress}%] {}", question.prompt);
    match question.kind {
        QuestionKind::Single | QuestionKind::Multiple => {
            for (index, opt) in question.options.iter().enumerate() {
                println!("  {}. {}", index + 1, opt.label);
            }
            if question.kind == QuestionKind::Multiple {
                println!("  (choose one or more, comma-separated)");
            }
        }
        QuestionKind::Scale => {
            if let Some(scale) = &question.scale {
                let low = scale
                    .labels
                    .get(&scale.min.to_string())
                    .map(|label| format!(" ({label})"))
                    .unwrap_or_default();
                let high = scale
                    .labels
                    .get(&scale.max.to_string())
                    .map(|label| format!(" ({label})"))
                    .unwrap_or_default();
                println!("  Enter a number from {}{low} to {}{high}", scale.min, scale.max);
            }
        }
    }
}

fn parse_answer(question: &Question, input: &str) -> Result<AnswerValue> {
    if input.is_empty() {
        anyhow::bail!("an answer is required");
    }
    match question.kind {
        QuestionKind::Scale => {
            let value: f64 = input
                .parse()
                .map_err(|_| anyhow::anyhow!("enter a number"))?;
            if let Some(scale) = &question.scale {
                if value < scale.min as f64 || value > scale.max as f64 {
                    anyhow::bail!("enter a number between {} and {}", scale.min, scale.max);
                }
            }
            Ok(AnswerValue::Scale(value))
        }
        QuestionKind::Single => Ok(AnswerValue::Single(resolve_option(question, input)?)),
        QuestionKind::Multiple => {
            let values = input
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| resolve_option(question, part))
                .collect::<Result<Vec<_>>>()?;
            if values.is_empty() {
                anyhow::bail!("choose at least one option");
            }
            Ok(AnswerValue::Multiple(values))
        }
    }
}

/// Accept either a 1-based option number or an option value.
fn resolve_option(question: &Question, input: &str) -> Result<String> {
    if let Ok(index) = input.parse::<usize>() {
        if index >= 1 && index <= question.options.len() {
            return Ok(question.options[index - 1].value.clone());
        }
    }
    question
        .options
        .iter()
        .find(|opt| opt.value == input)
        .map(|opt| opt.value.clone())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "choose 1-{} or an option value",
                question.options.len().max(1)
            )
        })
}

fn print_result(result: &CompletedResult) {
    println!();
    let mut table = Table::new();
    table.add_row(vec!["Result".to_string(), result.interpretation.label.clone()]);
    table.add_row(vec!["Score".to_string(), result.score.to_string()]);
    if let Some(probability) = result.interpretation.probability {
        table.add_row(vec!["Probability".to_string(), format!("{probability}%")]);
    }
    let range = match result.interpretation.range_max {
        Some(max) => format!("{}-{}", result.interpretation.range_min, max),
        None => format!("{}+", result.interpretation.range_min),
    };
    table.add_row(vec!["Range".to_string(), range]);
    println!("{table}");

    if !result.interpretation.description.is_empty() {
        println!("\n{}", result.interpretation.description);
    }

    if !result.interpretation.recommendations.is_empty() {
        println!("\nRecommendations:");
        for recommendation in &result.interpretation.recommendations {
            println!("  - {recommendation}");
        }
    }

    if !result.personalized_notes.is_empty() {
        println!("\nNotes:");
        for note in &result.personalized_notes {
            println!("  - {note}");
        }
    }
}
