//! Data models for stepbook.
//!
//! This module contains the domain models:
//! - Category
//! - Step

pub mod category;
pub mod step;

pub use category::Category;
pub use step::{Step, StepSection, UNCATEGORIZED};
