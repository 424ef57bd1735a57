/*
 * Responsibility
 * - Drinks の request/response DTO
 * - short 表現 (公開 list): recipe は color/parts のみ
 * - long 表現 (permission 付き): recipe 全体
 */
use serde::{Deserialize, Serialize};

use crate::repos::{Drink, Ingredient};

/// `recipe` may be sent as one ingredient or as a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecipeInput {
    One(Ingredient),
    Many(Vec<Ingredient>),
}

impl RecipeInput {
    pub fn into_ingredients(self) -> Vec<Ingredient> {
        match self {
            Self::One(ingredient) => vec![ingredient],
            Self::Many(ingredients) => ingredients,
        }
    }
}

fn validate_title(title: &str) -> Result<(), &'static str> {
    if title.trim().is_empty() {
        return Err("title cannot be empty");
    }
    Ok(())
}

fn validate_recipe(recipe: &[Ingredient]) -> Result<(), &'static str> {
    if recipe.is_empty() {
        return Err("recipe needs at least one ingredient");
    }
    if recipe.iter().any(|i| i.name.trim().is_empty()) {
        return Err("ingredient name cannot be empty");
    }
    if recipe.iter().any(|i| i.parts == 0) {
        return Err("ingredient parts must be positive");
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct CreateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}

impl CreateDrinkRequest {
    pub fn validate(self) -> Result<(String, Vec<Ingredient>), &'static str> {
        let title = self.title.ok_or("title is required")?;
        validate_title(&title)?;

        let recipe = self.recipe.ok_or("recipe is required")?.into_ingredients();
        validate_recipe(&recipe)?;

        Ok((title, recipe))
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}

impl UpdateDrinkRequest {
    pub fn validate(self) -> Result<(Option<String>, Option<Vec<Ingredient>>), &'static str> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }

        let recipe = self.recipe.map(RecipeInput::into_ingredients);
        if let Some(recipe) = &recipe {
            validate_recipe(recipe)?;
        }

        Ok((self.title, recipe))
    }
}

#[derive(Debug, Serialize)]
pub struct ShortIngredient {
    pub color: String,
    pub parts: u32,
}

#[derive(Debug, Serialize)]
pub struct DrinkShort {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<ShortIngredient>,
}

impl From<&Drink> for DrinkShort {
    fn from(drink: &Drink) -> Self {
        Self {
            id: drink.id,
            title: drink.title.clone(),
            recipe: drink
                .recipe
                .iter()
                .map(|i| ShortIngredient {
                    color: i.color.clone(),
                    parts: i.parts,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DrinkLong {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl From<Drink> for DrinkLong {
    fn from(drink: Drink) -> Self {
        Self {
            id: drink.id,
            title: drink.title,
            recipe: drink.recipe,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

impl<T> DrinksResponse<T> {
    pub fn new(drinks: Vec<T>) -> Self {
        Self {
            success: true,
            drinks,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub delete: i32,
}
