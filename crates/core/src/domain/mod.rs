pub mod catalog;
pub mod inventory;
pub mod product;
pub mod recipe;
