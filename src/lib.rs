//! Vigil: runtime invariant enforcement and usage telemetry.
//!
//! - [`enforce!`] and friends return a typed [`EnforceError`] when a
//!   condition fails, carrying file, line and condition text.
//! - [`enforce_eq!`], [`enforce_lt!`] and the rest of the comparison family
//!   evaluate each operand once and report both values on failure.
//! - [`log_api_usage_once!`] reports an event to a pluggable sink at most
//!   once per call site.

pub mod compare;
pub mod config;
pub mod enforce;
pub mod error;
pub mod location;
pub mod message;
pub mod rate;
pub mod registry;
pub mod usage;

pub use compare::{compare, CompareOp, Comparison};
pub use config::{init_logging, update_logging_levels_from_config, LoggingConfig};
pub use enforce::{enforce, enforce_finite, throw_always};
pub use error::{CallerId, EnforceError, EnforceKind};
pub use location::SourceLocation;
pub use registry::{set_api_usage_logger, set_ddp_usage_logger, set_stack_trace_fetcher};
pub use usage::{log_api_usage, log_ddp_usage, DdpLoggingData, UsageFlag};

#[doc(hidden)]
pub use log as __log;
