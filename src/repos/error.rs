/**
 * Responsibility
 * - repo が上位に伝える意味の定義
 * - drinks.title の UNIQUE 違反だけは Conflict として区別する
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("a drink with this title already exists")]
    Conflict,
}

/// Postgres `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";

impl RepoError {
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(dbe) = &e
            && dbe.code().as_deref() == Some(UNIQUE_VIOLATION)
        {
            return RepoError::Conflict;
        }
        RepoError::Db(e)
    }
}
