// src/scoring/mod.rs
//
// The evaluation results pipeline: answer key building, CSV ingestion,
// scoring, the grading curve, class statistics, readiness classification
// and CSV export. Everything here is pure; persistence lives in `store`.

pub mod answer_key;
pub mod export;
pub mod grade;
pub mod ingest;
pub mod readiness;
pub mod scorer;
pub mod stats;
