#![forbid(unsafe_code)]
//! tversky-core library.
//!
//! Computes the Tversky similarity index between two element sets and
//! produces an ordered, structured trace of every step of the computation,
//! plus an area-proportional two-circle overlap diagram.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums at library seams ([`error::TverskyError`],
//!   [`diagram::RenderError`]); `anyhow::Result` for configuration loading.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//!
//! # Example
//!
//! ```
//! use tversky_core::{ElementSet, Weights, engine};
//!
//! let a = ElementSet::parse("x, y, z");
//! let b = ElementSet::parse("y, z, w");
//! let outcome = engine::compute(&a, &b, Weights::jaccard());
//! assert!((outcome.score - 0.5).abs() < 1e-12);
//! assert_eq!(outcome.trace.len(), 13);
//! ```

pub mod api;
pub mod config;
pub mod diagram;
pub mod engine;
pub mod error;
pub mod event;
pub mod narrate;
pub mod partition;
pub mod set;

pub use engine::{TverskyOutcome, Weights, compute, tversky_index};
pub use event::{Trace, TraceEvent};
pub use narrate::Locale;
pub use partition::Partition;
pub use set::ElementSet;
