/*
 * Responsibility
 * - drinks CRUD
 * - recipe は JSONB (ingredient の配列) として保存する
 * - title は UNIQUE。重複は RepoError::Conflict
 */
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use sqlx::types::Json;

use super::error::RepoError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drink {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

#[async_trait]
pub trait DrinkRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<Drink>, RepoError>;

    async fn create(&self, title: &str, recipe: &[Ingredient]) -> Result<Drink, RepoError>;

    /// `None` fields are left unchanged. Returns `None` when `id` is unknown.
    async fn update(
        &self,
        id: i32,
        title: Option<&str>,
        recipe: Option<&[Ingredient]>,
    ) -> Result<Option<Drink>, RepoError>;

    async fn delete(&self, id: i32) -> Result<bool, RepoError>;
}

#[derive(Debug, sqlx::FromRow)]
struct DrinkRow {
    id: i32,
    title: String,
    recipe: Json<Vec<Ingredient>>,
}

impl From<DrinkRow> for Drink {
    fn from(row: DrinkRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            recipe: row.recipe.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgDrinkRepo {
    pool: PgPool,
}

impl PgDrinkRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DrinkRepo for PgDrinkRepo {
    async fn list(&self) -> Result<Vec<Drink>, RepoError> {
        let rows = sqlx::query_as::<_, DrinkRow>(
            r#"
            SELECT id, title, recipe
            FROM drinks
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(rows.into_iter().map(Drink::from).collect())
    }

    async fn create(&self, title: &str, recipe: &[Ingredient]) -> Result<Drink, RepoError> {
        let row = sqlx::query_as::<_, DrinkRow>(
            r#"
            INSERT INTO drinks (title, recipe)
            VALUES ($1, $2)
            RETURNING id, title, recipe
            "#,
        )
        .bind(title)
        .bind(Json(recipe))
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row.into())
    }

    async fn update(
        &self,
        id: i32,
        title: Option<&str>,
        recipe: Option<&[Ingredient]>,
    ) -> Result<Option<Drink>, RepoError> {
        let row = sqlx::query_as::<_, DrinkRow>(
            r#"
            UPDATE drinks
            SET
                title = COALESCE($2, title),
                recipe = COALESCE($3, recipe)
            WHERE id = $1
            RETURNING id, title, recipe
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(recipe.map(Json))
        .fetch_optional(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row.map(Drink::from))
    }

    async fn delete(&self, id: i32) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            DELETE FROM drinks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(result.rows_affected() > 0)
    }
}
