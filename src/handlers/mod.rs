// src/handlers/mod.rs

pub mod assessments;
pub mod results;
