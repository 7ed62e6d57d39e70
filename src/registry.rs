//! Process-wide logger slots.
//!
//! Each slot holds one sink and starts out as a no-op. Slots are meant to
//! be set during initialization and read from many threads afterwards;
//! setting a slot again replaces the previous sink. A sink is invoked
//! after the slot lock is released, so a sink may itself replace a slot.

use crate::usage::DdpLoggingData;
use lazy_static::lazy_static;
use log::debug;
use parking_lot::RwLock;
use std::sync::Arc;

/// Sink for generic API-usage events.
pub type ApiUsageLogger = Arc<dyn Fn(&str) + Send + Sync>;
/// Sink for structured distributed-training usage records.
pub type DdpUsageLogger = Arc<dyn Fn(&DdpLoggingData) + Send + Sync>;
/// Symbolizer used when rendering enforcement errors.
pub type StackTraceFetcher = Arc<dyn Fn() -> String + Send + Sync>;

fn noop_api_usage() -> ApiUsageLogger {
    Arc::new(|_: &str| {})
}

fn noop_ddp_usage() -> DdpUsageLogger {
    Arc::new(|_: &DdpLoggingData| {})
}

lazy_static! {
    static ref API_USAGE_LOGGER: RwLock<ApiUsageLogger> = RwLock::new(noop_api_usage());
    static ref DDP_USAGE_LOGGER: RwLock<DdpUsageLogger> = RwLock::new(noop_ddp_usage());
    static ref STACK_TRACE_FETCHER: RwLock<Option<StackTraceFetcher>> = RwLock::new(None);
}

/// Install the API-usage sink.
pub fn set_api_usage_logger<F>(logger: F)
where
    F: Fn(&str) + Send + Sync + 'static,
{
    *API_USAGE_LOGGER.write() = Arc::new(logger);
    debug!("api usage logger replaced");
}

/// Current API-usage sink.
pub fn api_usage_logger() -> ApiUsageLogger {
    API_USAGE_LOGGER.read().clone()
}

/// Install the distributed-training usage sink.
pub fn set_ddp_usage_logger<F>(logger: F)
where
    F: Fn(&DdpLoggingData) + Send + Sync + 'static,
{
    *DDP_USAGE_LOGGER.write() = Arc::new(logger);
    debug!("ddp usage logger replaced");
}

/// Current distributed-training usage sink.
pub fn ddp_usage_logger() -> DdpUsageLogger {
    DDP_USAGE_LOGGER.read().clone()
}

/// Install a stack-trace fetcher consulted whenever an
/// [`EnforceError`](crate::EnforceError) is built.
pub fn set_stack_trace_fetcher<F>(fetcher: F)
where
    F: Fn() -> String + Send + Sync + 'static,
{
    *STACK_TRACE_FETCHER.write() = Some(Arc::new(fetcher));
    debug!("stack trace fetcher replaced");
}

/// Remove the stack-trace fetcher; errors carry no trace afterwards.
pub fn clear_stack_trace_fetcher() {
    *STACK_TRACE_FETCHER.write() = None;
}

/// Run the registered fetcher, if any.
pub fn fetch_stack_trace() -> Option<String> {
    let fetcher = STACK_TRACE_FETCHER.read().clone();
    fetcher.map(|f| f())
}

/// Restore every slot to its no-op default.
pub fn reset_loggers() {
    *API_USAGE_LOGGER.write() = noop_api_usage();
    *DDP_USAGE_LOGGER.write() = noop_ddp_usage();
    clear_stack_trace_fetcher();
}
