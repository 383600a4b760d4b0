//! Shared data types for sea cucumber growth and condition analysis.
//!
//! Everything in this crate is plain data: field measurements, per-species
//! reference parameters, life-stage classification rules, and the wrappers
//! used to store the reference tables on disk.

pub mod classification;
pub mod file_formats;
pub mod measurement;
pub mod mode;
pub mod species;
