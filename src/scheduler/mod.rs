mod pipeline;
mod poller;

pub use pipeline::{TickOutcome, TickPipeline};
pub use poller::MetricsPoller;
