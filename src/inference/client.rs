use async_trait::async_trait;

use crate::error::PipelineError;

use super::model::{InferenceVerdict, SampleFeatures};

#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn predict(&self, features: &SampleFeatures) -> Result<InferenceVerdict, PipelineError>;
}

#[cfg(test)]
pub(crate) use mock::MockInferenceClient;
