//! The questionnaire catalog: an explicitly constructed registry.
//!
//! Built by a factory from a directory scan or an in-memory definition
//! list — no process-wide state, so tests construct a fresh instance each
//! time. Parsed definitions are cached per instance and served through the
//! `DefinitionLoader` trait.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DefinitionError;
use crate::model::QuestionnaireDefinition;
use crate::parser;
use crate::traits::DefinitionLoader;

/// Catalog metadata for one questionnaire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub estimated_minutes: Option<u32>,
    pub question_count: usize,
    /// Announced questionnaires may be listed before they can be run.
    pub available: bool,
}

impl CatalogEntry {
    fn from_definition(definition: &QuestionnaireDefinition) -> Self {
        Self {
            id: definition.id.clone(),
            title: definition.title.clone(),
            description: definition.description.clone(),
            category: definition.category.clone(),
            tags: definition.tags.clone(),
            estimated_minutes: definition.estimated_minutes,
            question_count: definition.question_count(),
            available: true,
        }
    }
}

/// Aggregate catalog numbers.
#[derive(Debug, Clone)]
pub struct CatalogStats {
    pub total: usize,
    pub available: usize,
    pub categories: Vec<String>,
}

/// A constructed registry of questionnaires.
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    definitions: RwLock<HashMap<String, Arc<QuestionnaireDefinition>>>,
}

impl Catalog {
    /// Scan a directory (recursively) for `.toml` questionnaire
    /// definitions. Files that fail to parse are skipped with a warning;
    /// validation warnings for the rest are logged.
    pub fn from_directory(dir: &Path) -> anyhow::Result<Self> {
        let definitions = parser::load_definition_directory(dir)?;
        for definition in &definitions {
            for warning in parser::validate_definition(definition) {
                tracing::warn!(
                    questionnaire = %definition.id,
                    question = warning.question_id.as_deref().unwrap_or("-"),
                    "{}",
                    warning.message
                );
            }
        }
        Ok(Self::from_definitions(definitions))
    }

    /// Build a catalog directly from definitions.
    pub fn from_definitions(definitions: Vec<QuestionnaireDefinition>) -> Self {
        let entries = definitions.iter().map(CatalogEntry::from_definition).collect();
        let definitions = definitions
            .into_iter()
            .map(|definition| (definition.id.clone(), Arc::new(definition)))
            .collect();
        Self {
            entries,
            definitions: RwLock::new(definitions),
        }
    }

    /// List a questionnaire that is announced but cannot be run yet.
    pub fn announce(&mut self, entry: CatalogEntry) {
        self.entries.push(CatalogEntry {
            available: false,
            ..entry
        });
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn entry(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn by_category(&self, category: &str) -> Vec<&CatalogEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.category == category)
            .collect()
    }

    /// Case-insensitive search over title, description, and tags.
    pub fn search(&self, query: &str) -> Vec<&CatalogEntry> {
        let query = query.to_lowercase();
        let query = query.trim();
        self.entries
            .iter()
            .filter(|entry| {
                entry.title.to_lowercase().contains(query)
                    || entry.description.to_lowercase().contains(query)
                    || entry
                        .tags
                        .iter()
                        .any(|tag| tag.to_lowercase().contains(query))
            })
            .collect()
    }

    pub fn stats(&self) -> CatalogStats {
        let mut categories: Vec<String> = self
            .entries
            .iter()
            .map(|entry| entry.category.clone())
            .filter(|category| !category.is_empty())
            .collect();
        categories.sort();
        categories.dedup();

        CatalogStats {
            total: self.entries.len(),
            available: self.entries.iter().filter(|entry| entry.available).count(),
            categories,
        }
    }
}

#[async_trait]
impl DefinitionLoader for Catalog {
    async fn load(
        &self,
        questionnaire_id: &str,
    ) -> Result<Arc<QuestionnaireDefinition>, DefinitionError> {
        let cached = self
            .definitions
            .read()
            .expect("catalog cache lock poisoned")
            .get(questionnaire_id)
            .cloned();
        cached.ok_or_else(|| DefinitionError::NotFound(questionnaire_id.to_string()))
    }
}
