//! `words` table operations.

use crate::models::{NewWord, WordRow};
use crate::{DbError, DbPool};

/// Insert all `words` in a single transaction.
///
/// Returns the number of rows inserted.  Either every row lands or none do.
pub async fn insert_words(pool: &DbPool, words: &[NewWord<'_>]) -> Result<u64, DbError> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0;

    for word in words {
        let result = sqlx::query("INSERT INTO words (japanese, romaji, english) VALUES (?1, ?2, ?3)")
            .bind(word.japanese)
            .bind(word.romaji)
            .bind(word.english)
            .execute(&mut *tx)
            .await?;
        inserted += result.rows_affected();
    }

    tx.commit().await?;
    Ok(inserted)
}

/// Number of rows in `words`.
pub async fn count_words(pool: &DbPool) -> Result<i64, DbError> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM words")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Every word, ordered by id.
pub async fn list_words(pool: &DbPool) -> Result<Vec<WordRow>, DbError> {
    let rows = sqlx::query_as::<_, WordRow>(
        "SELECT id, japanese, romaji, english FROM words ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
