use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CollaboratorError;

use super::{Classifier, LlmClient};

/// [`Classifier`] backed by any completion client.
///
/// Asks the model to answer with exactly one of the allowed labels and returns its raw reply.
pub struct LlmClassifier {
    llm: Arc<dyn LlmClient>,
}

impl LlmClassifier {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    fn prompt(text: &str, allowed_labels: &[&str]) -> String {
        format!(
            "You are a medical assistant that categorizes user queries into one of the \
             following types: {}.\n\
             symptom: queries about medical symptoms, diseases, or health issues.\n\
             preventive: queries about prevention, tips, remedies, or staying healthy.\n\
             general: all other queries.\n\
             Respond only with one of these words.\n\n\
             Categorize this query:\n{}",
            allowed_labels.join(", "),
            text
        )
    }
}

#[async_trait]
impl Classifier for LlmClassifier {
    async fn classify(
        &self,
        text: &str,
        allowed_labels: &[&str],
    ) -> Result<String, CollaboratorError> {
        self.llm
            .complete(&Self::prompt(text, allowed_labels), None)
            .await
            .map_err(|e| CollaboratorError::Classification(e.to_string()))
    }
}
