pub mod drink_repo;
pub mod error;

pub use drink_repo::{Drink, DrinkRepo, Ingredient, PgDrinkRepo};
pub use error::RepoError;
