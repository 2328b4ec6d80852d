// src/models/mod.rs

pub mod assessment;
pub mod result;
pub mod student;
