mod chart;
mod snapshot;
mod table;

pub use snapshot::{DashboardPublisher, DashboardSnapshot};
