mod client;
mod dispatcher;
mod model;

pub use client::InferenceClient;
pub use dispatcher::InferenceDispatcher;
pub use model::{InferenceVerdict, Prediction, SampleFeatures};

#[cfg(test)]
pub(crate) use client::MockInferenceClient;
