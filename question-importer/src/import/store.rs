//! SQLite question store
//!
//! The `questions` table is created by the web application; this module only
//! checks that it is there and appends rows to it.

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};

use super::error::ImportError;
use super::types::{Column, CommitMode, NormalizedQuestion};

pub const TABLE_NAME: &str = "questions";

/// Column name used by the web application's schema for Question Type
pub const DEFAULT_QUESTION_TYPE_COLUMN: &str = "Question_Type";

/// Append-only handle on the `questions` table
#[derive(Debug, Clone)]
pub struct QuestionStore {
    pool: SqlitePool,
    columns: Vec<String>,
}

impl QuestionStore {
    /// Open an existing store file and verify its schema.
    ///
    /// The file is never created.
    pub async fn connect(path: &Path, question_type_column: &str) -> Result<Self, ImportError> {
        if !path.is_file() {
            return Err(ImportError::store_connection(path, "database file does not exist"));
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| ImportError::store_connection(path, e))?;

        let store = Self {
            pool,
            columns: store_columns(question_type_column),
        };
        store.verify_schema(path).await?;

        log::debug!("Connected to question store {}", path.display());
        Ok(store)
    }

    async fn verify_schema(&self, path: &Path) -> Result<(), ImportError> {
        let rows = sqlx::query(&format!("PRAGMA table_info({})", quote_ident(TABLE_NAME)))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ImportError::store_connection(path, e))?;

        if rows.is_empty() {
            return Err(ImportError::store_connection(
                path,
                format!("table '{}' not found", TABLE_NAME),
            ));
        }

        let mut existing = Vec::with_capacity(rows.len());
        for row in rows {
            let name: String = row
                .try_get("name")
                .map_err(|e| ImportError::store_connection(path, e))?;
            existing.push(name);
        }

        let missing: Vec<&str> = self
            .columns
            .iter()
            .filter(|c| !existing.iter().any(|e| e.eq_ignore_ascii_case(c)))
            .map(|c| c.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(ImportError::store_connection(
                path,
                format!(
                    "table '{}' is missing column(s): {}",
                    TABLE_NAME,
                    missing.join(", ")
                ),
            ));
        }

        Ok(())
    }

    /// Insert every question, committing according to `mode`.
    ///
    /// `progress` is called after each batch with (rows inserted, total).
    /// In [`CommitMode::Atomic`] a failure leaves the table as it was before
    /// the call; in [`CommitMode::PerBatch`] only the failing batch is rolled
    /// back.
    pub async fn insert_all<F>(
        &self,
        questions: &[NormalizedQuestion],
        mode: CommitMode,
        batch_size: usize,
        mut progress: F,
    ) -> Result<usize, ImportError>
    where
        F: FnMut(usize, usize),
    {
        let sql = insert_sql(&self.columns);
        let batch_size = batch_size.max(1);
        let total = questions.len();

        let mut tx = self.pool.begin().await.map_err(|e| transaction_error(e, 0))?;
        let mut inserted = 0;
        let mut committed = 0;

        for batch in questions.chunks(batch_size) {
            for question in batch {
                let result = sqlx::query(&sql)
                    .bind(question.question.as_deref())
                    .bind(question.answer.as_deref())
                    .bind(question.explanation.as_deref())
                    .bind(question.subject.as_deref())
                    .bind(question.module_number.as_deref())
                    .bind(question.module_name.as_deref())
                    .bind(question.topic.as_deref())
                    .bind(question.sub_topic.as_deref())
                    .bind(question.micro_topic.as_deref())
                    .bind(question.faculty_approved)
                    .bind(question.difficulty_level.map(|d| d.as_str()))
                    .bind(question.nature_of_question.as_deref())
                    .bind(question.question_type.as_str())
                    .execute(&mut *tx)
                    .await;

                if let Err(e) = result {
                    if let Err(rollback_err) = tx.rollback().await {
                        log::warn!("Rollback failed: {}", rollback_err);
                    }
                    return Err(ImportError::Insert {
                        row: Some(question.row_number),
                        committed,
                        source: e,
                    });
                }
                inserted += 1;
            }

            if mode == CommitMode::PerBatch {
                tx.commit().await.map_err(|e| transaction_error(e, committed))?;
                committed = inserted;
                log::debug!("Committed batch, {} rows durable", committed);
                tx = self
                    .pool
                    .begin()
                    .await
                    .map_err(|e| transaction_error(e, committed))?;
            }

            progress(inserted, total);
        }

        tx.commit().await.map_err(|e| transaction_error(e, committed))?;
        Ok(inserted)
    }

    /// Number of rows currently in the table
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", quote_ident(TABLE_NAME)))
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

fn transaction_error(source: sqlx::Error, committed: usize) -> ImportError {
    ImportError::Insert {
        row: None,
        committed,
        source,
    }
}

/// Store column names in insert order
fn store_columns(question_type_column: &str) -> Vec<String> {
    Column::ALL
        .iter()
        .map(|c| match c {
            Column::QuestionType => question_type_column.to_string(),
            other => other.header().to_string(),
        })
        .collect()
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn insert_sql(columns: &[String]) -> String {
    let names: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
    let placeholders = vec!["?"; columns.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(TABLE_NAME),
        names.join(", "),
        placeholders
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::import::types::{DifficultyLevel, QuestionType};
    use sqlx::ConnectOptions;
    use sqlx::Executor;

    pub(crate) const SCHEMA: &str = r#"
        CREATE TABLE questions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            Question TEXT NOT NULL,
            Answer TEXT NOT NULL,
            Explanation TEXT,
            Subject TEXT NOT NULL,
            "Module Number" TEXT,
            "Module Name" TEXT,
            Topic TEXT,
            "Sub Topic" TEXT,
            "Micro Topic" TEXT,
            "Faculty Approved" BOOLEAN DEFAULT 0,
            "Difficulty Level" TEXT CHECK("Difficulty Level" IN ('easy', 'medium', 'hard')),
            "Nature of Question" TEXT,
            Objective TEXT,
            Question_Type TEXT CHECK(Question_Type IN ('Objective', 'Subjective'))
        )
    "#;

    /// Create a store file with the web application's schema
    pub(crate) async fn create_store(path: &Path) {
        let mut conn = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .connect()
            .await
            .unwrap();
        conn.execute(SCHEMA).await.unwrap();
    }

    pub(crate) fn question(row_number: usize, text: &str) -> NormalizedQuestion {
        NormalizedQuestion {
            row_number,
            question: Some(text.to_string()),
            answer: Some("answer".into()),
            explanation: None,
            subject: Some("General".into()),
            module_number: Some("1".into()),
            module_name: None,
            topic: Some("Basics".into()),
            sub_topic: None,
            micro_topic: None,
            faculty_approved: Some(true),
            difficulty_level: Some(DifficultyLevel::Hard),
            nature_of_question: None,
            question_type: QuestionType::Subjective,
        }
    }

    #[test]
    fn test_insert_sql() {
        let sql = insert_sql(&store_columns(DEFAULT_QUESTION_TYPE_COLUMN));
        assert_eq!(
            sql,
            "INSERT INTO \"questions\" (\"Question\", \"Answer\", \"Explanation\", \"Subject\", \
             \"Module Number\", \"Module Name\", \"Topic\", \"Sub Topic\", \"Micro Topic\", \
             \"Faculty Approved\", \"Difficulty Level\", \"Nature of Question\", \"Question_Type\") \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        );
    }

    #[test]
    fn test_quote_ident_escapes() {
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }

    #[tokio::test]
    async fn test_connect_missing_file_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.db");

        let err = QuestionStore::connect(&path, DEFAULT_QUESTION_TYPE_COLUMN)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "StoreConnectionError");
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_connect_without_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.db");
        let mut conn = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .connect()
            .await
            .unwrap();
        conn.execute("CREATE TABLE other (id INTEGER)").await.unwrap();

        let err = QuestionStore::connect(&path, DEFAULT_QUESTION_TYPE_COLUMN)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("table 'questions' not found"));
    }

    #[tokio::test]
    async fn test_connect_wrong_question_type_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.db");
        create_store(&path).await;

        let err = QuestionStore::connect(&path, "Question Type").await.unwrap_err();
        assert!(err.to_string().contains("missing column(s): Question Type"));
    }

    #[tokio::test]
    async fn test_insert_all_atomic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.db");
        create_store(&path).await;
        let store = QuestionStore::connect(&path, DEFAULT_QUESTION_TYPE_COLUMN)
            .await
            .unwrap();

        let questions: Vec<_> = (0..5).map(|i| question(i + 2, &format!("Q{}", i))).collect();
        let mut calls = Vec::new();
        let inserted = store
            .insert_all(&questions, CommitMode::Atomic, 2, |done, total| {
                calls.push((done, total))
            })
            .await
            .unwrap();

        assert_eq!(inserted, 5);
        assert_eq!(calls, vec![(2, 5), (4, 5), (5, 5)]);
        assert_eq!(store.count().await.unwrap(), 5);

        let row = sqlx::query(
            r#"SELECT "Difficulty Level", Question_Type, "Faculty Approved", Explanation
               FROM questions ORDER BY id LIMIT 1"#,
        )
        .fetch_one(store.pool())
        .await
        .unwrap();
        assert_eq!(row.get::<String, _>(0), "hard");
        assert_eq!(row.get::<String, _>(1), "Subjective");
        assert!(row.get::<bool, _>(2));
        assert_eq!(row.get::<Option<String>, _>(3), None);
    }

    #[tokio::test]
    async fn test_insert_all_atomic_rollback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.db");
        create_store(&path).await;
        let store = QuestionStore::connect(&path, DEFAULT_QUESTION_TYPE_COLUMN)
            .await
            .unwrap();

        let mut questions: Vec<_> = (0..6).map(|i| question(i + 2, &format!("Q{}", i))).collect();
        questions[4].answer = None;

        let err = store
            .insert_all(&questions, CommitMode::Atomic, 2, |_, _| {})
            .await
            .unwrap_err();

        match err {
            ImportError::Insert { row, committed, .. } => {
                assert_eq!(row, Some(6));
                assert_eq!(committed, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insert_all_per_batch_keeps_earlier_batches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.db");
        create_store(&path).await;
        let store = QuestionStore::connect(&path, DEFAULT_QUESTION_TYPE_COLUMN)
            .await
            .unwrap();

        let mut questions: Vec<_> = (0..6).map(|i| question(i + 2, &format!("Q{}", i))).collect();
        questions[4].subject = None;

        let err = store
            .insert_all(&questions, CommitMode::PerBatch, 2, |_, _| {})
            .await
            .unwrap_err();

        match err {
            ImportError::Insert { row, committed, .. } => {
                assert_eq!(row, Some(6));
                assert_eq!(committed, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(store.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_insert_all_per_batch_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.db");
        create_store(&path).await;
        let store = QuestionStore::connect(&path, DEFAULT_QUESTION_TYPE_COLUMN)
            .await
            .unwrap();

        let questions: Vec<_> = (0..5).map(|i| question(i + 2, &format!("Q{}", i))).collect();
        let inserted = store
            .insert_all(&questions, CommitMode::PerBatch, 2, |_, _| {})
            .await
            .unwrap();

        assert_eq!(inserted, 5);
        assert_eq!(store.count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_insert_all_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.db");
        create_store(&path).await;
        let store = QuestionStore::connect(&path, DEFAULT_QUESTION_TYPE_COLUMN)
            .await
            .unwrap();

        let inserted = store
            .insert_all(&[], CommitMode::PerBatch, 100, |_, _| {})
            .await
            .unwrap();
        assert_eq!(inserted, 0);
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
