//! One-shot API usage telemetry.
//!
//! [`log_api_usage_once!`](crate::log_api_usage_once) owns a `static`
//! [`UsageFlag`] per expansion, so every call site fires its event at most
//! once for the life of the process. Once fired, a call site costs one
//! atomic load.

use crate::registry;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

/// Send `context` to the registered API-usage sink.
pub fn log_api_usage(context: &str) {
    let logger = registry::api_usage_logger();
    logger(context);
}

/// Fire-once guard for a single call site.
#[derive(Debug)]
pub struct UsageFlag {
    fired: AtomicBool,
}

impl UsageFlag {
    /// A flag that has not fired.
    pub const fn new() -> Self {
        Self {
            fired: AtomicBool::new(false),
        }
    }

    /// Whether the event went out already.
    #[inline]
    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    /// Claim the flag. Exactly one caller ever sees `true`.
    #[inline]
    pub fn try_fire(&self) -> bool {
        !self.has_fired()
            && self
                .fired
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
    }

    /// Send `context` to the usage sink unless this flag already fired.
    ///
    /// Callers that lose a first-time race return without waiting for the
    /// winner's sink call.
    #[inline]
    pub fn log_once(&self, context: &str) {
        if !self.has_fired() {
            self.fire_slow(context);
        }
    }

    #[cold]
    #[inline(never)]
    fn fire_slow(&self, context: &str) {
        if self.try_fire() {
            log_api_usage(context);
        }
    }
}

impl Default for UsageFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Report API usage at most once from this call site.
///
/// The context expression is evaluated only on the firing call. It may be
/// anything implementing `AsRef<str>`.
///
/// ```
/// fn entry_point() {
///     vigil::log_api_usage_once!("vigil.docs.entry_point");
/// }
/// entry_point();
/// entry_point();
/// ```
#[macro_export]
macro_rules! log_api_usage_once {
    ($context:expr $(,)?) => {{
        static __VIGIL_USAGE_FLAG: $crate::usage::UsageFlag = $crate::usage::UsageFlag::new();
        if !__VIGIL_USAGE_FLAG.has_fired() {
            __VIGIL_USAGE_FLAG.log_once(::std::convert::AsRef::<str>::as_ref(&$context));
        }
    }};
}

/// Iterations always sampled at the start of training.
pub const DDP_INITIAL_SAMPLED_ITERATIONS: i64 = 10;
/// After the initial window, runtime stats are sampled every this many iterations.
pub const DDP_RUNTIME_LOGGING_SAMPLE_RATE: i64 = 100;

/// Distributed data-parallel configuration and runtime statistics.
///
/// Plain record; every field is set independently by the training
/// coordinator. Sizes and ranks default to `-1` meaning "not recorded".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DdpLoggingData {
    // Construction time
    pub world_size: i32,
    pub rank: i32,
    pub module_name: String,
    pub device_ids: Vec<i32>,
    pub output_device: i32,
    pub backend_name: String,
    /// Parameter dtype.
    pub dtype: String,
    /// Total parameter size in bytes.
    pub total_parameter_size_bytes: i64,
    pub num_parameter_tensors: i32,
    /// Bucket sizes in bytes computed at construction.
    pub bucket_sizes: Vec<i32>,

    // Environment
    pub master_port: String,
    pub master_addr: String,
    pub cuda_visible_devices: String,
    pub gloo_socket_ifname: String,
    pub gloo_device_transport: String,
    pub nccl_socket_ifname: String,
    pub nccl_blocking_wait: String,
    pub nccl_debug: String,
    pub nccl_nthreads: String,
    pub nccl_ib_timeout: String,

    // Constructor inputs
    pub broadcast_buffers: bool,
    pub bucket_cap_mb: f32,
    pub find_unused_parameters: bool,
    pub gradient_as_bucket_view: bool,

    // Runtime, refreshed on sampled iterations
    /// Training iteration the record was taken at; 0 before the loop starts.
    pub iteration: i64,
    /// Unused parameter size in bytes.
    pub unused_parameter_size: i64,
    pub has_rebuilt_buckets: bool,
    pub rebuilt_bucket_sizes: Vec<i32>,
    /// Averages over sampled iterations, in nanoseconds.
    pub avg_forward_compute_time: i64,
    pub avg_backward_compute_time: i64,
    pub avg_backward_comm_time: i64,
    pub avg_backward_compute_comm_overlap_time: i64,
}

impl Default for DdpLoggingData {
    fn default() -> Self {
        Self {
            world_size: -1,
            rank: -1,
            module_name: String::new(),
            device_ids: Vec::new(),
            output_device: -1,
            backend_name: String::new(),
            dtype: String::new(),
            total_parameter_size_bytes: -1,
            num_parameter_tensors: -1,
            bucket_sizes: Vec::new(),
            master_port: String::new(),
            master_addr: String::new(),
            cuda_visible_devices: String::new(),
            gloo_socket_ifname: String::new(),
            gloo_device_transport: String::new(),
            nccl_socket_ifname: String::new(),
            nccl_blocking_wait: String::new(),
            nccl_debug: String::new(),
            nccl_nthreads: String::new(),
            nccl_ib_timeout: String::new(),
            broadcast_buffers: false,
            bucket_cap_mb: -1.0,
            find_unused_parameters: false,
            gradient_as_bucket_view: false,
            iteration: -1,
            unused_parameter_size: 0,
            has_rebuilt_buckets: false,
            rebuilt_bucket_sizes: Vec::new(),
            avg_forward_compute_time: 0,
            avg_backward_compute_time: 0,
            avg_backward_comm_time: 0,
            avg_backward_compute_comm_overlap_time: 0,
        }
    }
}

impl DdpLoggingData {
    /// Whether runtime stats are collected on `iteration` (1-based).
    pub fn is_sampled_iteration(iteration: i64) -> bool {
        iteration > 0
            && (iteration <= DDP_INITIAL_SAMPLED_ITERATIONS
                || iteration % DDP_RUNTIME_LOGGING_SAMPLE_RATE == 0)
    }
}

/// Send `data` to the registered distributed-training sink. Not one-shot.
pub fn log_ddp_usage(data: &DdpLoggingData) {
    let logger = registry::ddp_usage_logger();
    logger(data);
}
