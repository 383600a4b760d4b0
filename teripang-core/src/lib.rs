//! Growth and condition analysis for sea cucumber field measurements.
//!
//! Three fixed analysis modes are supported:
//!
//! - **age**: age-at-length from the Von Bertalanffy growth model
//! - **lwr**: the length-weight relationship `W = a * L^b` with Fulton's
//!   condition factor
//! - **multispecies**: both of the above, per species, for a mixed sample
//!
//! Input text flows through [`pipeline::run`] (parse, validate, analyze), or
//! through an [`session::AnalysisSession`] when records and results need to
//! be held between calls.
//!
//! ```
//! use teripang_core::{analysis::{AnalysisParams, AnalysisResult}, pipeline};
//! use teripang_schemas::mode::AnalysisMode;
//!
//! let params = AnalysisParams::new().with_lwr_parameters(0.01, 3.0);
//! let result = pipeline::run("20,96\n25,180\n", AnalysisMode::Lwr, &params, &Default::default()).unwrap();
//! let AnalysisResult::Lwr(lwr) = result else { unreachable!() };
//! assert_eq!(lwr.records.len(), 2);
//! ```

pub mod analysis;
pub mod error;
pub mod export;
pub mod parser;
pub mod pipeline;
pub mod regression;
pub mod session;
pub mod stats;

pub use error::{ErrorKind, TeripangError};
