mod backend;
mod model;
mod store;

pub use backend::AnomalyBackend;
pub use model::{AnomalyEvent, RawAnomalyRecord};
pub use store::{AnomalyStore, AppendOutcome};

#[cfg(test)]
pub(crate) use backend::MockAnomalyBackend;
