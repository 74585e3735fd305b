mod model;
mod source;
mod timestamp;

pub use model::{MetricSample, MetricSeries};
pub use source::MetricsSource;
pub use timestamp::{TimestampKey, parse_timestamp};

#[cfg(test)]
pub(crate) use source::MockMetricsSource;
