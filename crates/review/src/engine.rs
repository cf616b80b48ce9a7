//! Prompt building and orchestrator calls for the review pipeline.

use log::info;
use std::sync::Arc;

use litrev_llm::{CallRequest, Orchestrator, RetryPolicy};

use crate::error::ReviewError;
use crate::summary::PaperSummary;

const SUMMARY_SYSTEM_MESSAGE: &str = "You are a helpful assistant that provides comprehensive \
academic summaries in JSON format. Respond with valid JSON only, no markdown code blocks.";

const SYNTHESIS_SYSTEM_MESSAGE: &str =
    "You are a helpful assistant that creates comprehensive, well-structured literature reviews.";

// ============================================================================
// Review Engine
// ============================================================================

/// Review engine: carries the orchestrator plus the call policy shared by
/// every generation in one run (retry policy, provider preference).
pub struct ReviewEngine {
    orchestrator: Arc<Orchestrator>,
    policy: RetryPolicy,
    preference: Option<Vec<String>>,
}

impl ReviewEngine {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            orchestrator,
            policy: RetryPolicy::default(),
            preference: None,
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Prefer these providers, in order, for every call this engine makes.
    pub fn with_preference(mut self, preference: Option<Vec<String>>) -> Self {
        self.preference = preference;
        self
    }

    /// Summarize one paper's text into the structured schema.
    ///
    /// `text_limit` bounds how many characters of the paper are sent.
    pub async fn summarize_paper(
        &self,
        text: &str,
        filename: &str,
        text_limit: usize,
    ) -> Result<PaperSummary, ReviewError> {
        let excerpt: String = text.chars().take(text_limit).collect();
        let prompt = format!(
            "Analyze the following academic paper and provide a detailed summary in JSON format:\n\n\
             Filename: {filename}\n\
             Text: {excerpt}\n\n\
             Provide the summary in a structured JSON format with the following fields:\n\
             - title: string\n\
             - authors: array of strings\n\
             - year: integer\n\
             - research_question: string\n\
             - theoretical_framework: string\n\
             - methodology: string\n\
             - main_arguments: array of strings\n\
             - findings: string\n\
             - significance: string\n\
             - limitations: string\n\
             - future_research: string"
        );

        let request = CallRequest::new(prompt)
            .with_system_message(SUMMARY_SYSTEM_MESSAGE)
            .with_max_tokens(1000)
            .with_structured_output(true);
        let result = self
            .orchestrator
            .call_with_retry(&request, self.preference.as_deref(), &self.policy)
            .await?;
        info!(
            "Analysis of {} completed using {} with model {}",
            filename, result.provider_name, result.model_name
        );
        PaperSummary::parse(&result.content)
    }

    /// Synthesize all paper summaries into one literature review.
    pub async fn synthesize_review(
        &self,
        summaries: &[PaperSummary],
        word_limit: usize,
    ) -> Result<String, ReviewError> {
        let summaries_json = serde_json::to_string(summaries)
            .map_err(|e| ReviewError::ParseSummary(e.to_string()))?;
        let prompt = format!(
            "Create a comprehensive literature review based on the following paper summaries.\n\
             Focus on synthesizing information, comparing and contrasting key arguments, \
             methodologies, and significance of findings.\n\
             Highlight any contradictions, agreements, or trends between authors.\n\
             Discuss the evolution of ideas and methodologies in the field.\n\
             Identify gaps in the current research and suggest future research directions.\n\
             Keep the review under {word_limit} words.\n\n\
             Summaries: {summaries_json}\n\n\
             Structure the review as follows:\n\
             1. Introduction\n\
             2. Theoretical Frameworks\n\
             3. Methodological Approaches\n\
             4. Synthesis of Main Arguments and Findings\n\
             5. Significance and Implications\n\
             6. Gaps and Future Research Directions\n\
             7. Conclusion"
        );

        let request = CallRequest::new(prompt)
            .with_system_message(SYNTHESIS_SYSTEM_MESSAGE)
            .with_max_tokens(3000);
        let result = self
            .orchestrator
            .call_with_retry(&request, self.preference.as_deref(), &self.policy)
            .await?;
        info!(
            "Literature review synthesis completed using {} with model {}",
            result.provider_name, result.model_name
        );
        Ok(result.content)
    }
}
