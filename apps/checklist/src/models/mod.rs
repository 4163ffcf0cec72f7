pub mod checklist;

pub use checklist::{Category, CategoryCollection};
