//! Read → normalize → persist

use colored::*;

use super::error::ImportError;
use super::normalize::{NormalizationReport, normalize_all};
use super::source::read_source;
use super::store::QuestionStore;
use super::types::{CommitMode, NormalizedQuestion, RawQuestion};
use crate::config::ImporterConfig;

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub rows_read: usize,
    /// Rows written; zero for dry runs
    pub inserted: usize,
    pub report: NormalizationReport,
}

/// Imports one spreadsheet into one question store
#[derive(Debug, Clone)]
pub struct Importer {
    config: ImporterConfig,
}

impl Importer {
    pub fn new(config: ImporterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ImporterConfig {
        &self.config
    }

    /// Load every row of the configured source
    pub fn read_source(&self) -> Result<Vec<RawQuestion>, ImportError> {
        read_source(&self.config.source_path, self.config.sheet.as_deref())
    }

    /// Open the configured store
    pub async fn connect(&self) -> Result<QuestionStore, ImportError> {
        QuestionStore::connect(&self.config.store_path, &self.config.question_type_column).await
    }

    /// Normalize `rows` and insert them all into `store`.
    ///
    /// Returns the number of rows persisted.
    pub async fn import_all(
        &self,
        store: &QuestionStore,
        rows: &[RawQuestion],
    ) -> Result<usize, ImportError> {
        let (questions, _) = normalize_all(rows, self.config.difficulty_policy);
        self.persist(store, &questions).await
    }

    async fn persist(
        &self,
        store: &QuestionStore,
        questions: &[NormalizedQuestion],
    ) -> Result<usize, ImportError> {
        let quiet = self.config.quiet;
        store
            .insert_all(
                questions,
                self.config.commit_mode,
                self.config.batch_size,
                |done, total| {
                    log::info!("Inserted {}/{} questions", done, total);
                    if !quiet {
                        println!("Inserted {} questions...", done.to_string().cyan());
                    }
                },
            )
            .await
    }

    /// Full run: read the source, then (unless dry-run) write to the store.
    ///
    /// The source is read completely before the store is opened, so a bad
    /// source never touches the store.
    pub async fn run(&self) -> Result<ImportSummary, ImportError> {
        let rows = self.read_source()?;
        log::info!(
            "Loaded {} questions from {}",
            rows.len(),
            self.config.source_path.display()
        );

        let (questions, report) = normalize_all(&rows, self.config.difficulty_policy);

        if self.config.dry_run {
            return Ok(ImportSummary {
                rows_read: rows.len(),
                inserted: 0,
                report,
            });
        }

        if self.config.commit_mode == CommitMode::PerBatch {
            log::warn!(
                "Per-batch commit: a failure keeps batches committed before it (batch size {})",
                self.config.batch_size
            );
        }

        let store = self.connect().await?;
        let result = self.persist(&store, &questions).await;
        if result.is_ok() {
            match store.count().await {
                Ok(count) => log::info!("Store now holds {} questions", count),
                Err(e) => log::warn!("Failed to count stored questions: {}", e),
            }
        }
        store.close().await;

        Ok(ImportSummary {
            rows_read: rows.len(),
            inserted: result?,
            report,
        })
    }
}
