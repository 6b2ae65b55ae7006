mod metrics_handle;

pub use metrics_handle::*;
