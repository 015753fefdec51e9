mod metrics;
mod tracing;

pub use self::metrics::{counters, render_metrics};
pub use self::tracing::{init_tracing, TracingConfig};
