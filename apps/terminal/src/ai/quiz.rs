//! Quiz distractor and session summary requests.

use flashmaster_core::{DistractorRequest, SummaryRequest};

use super::prompts::{distractors_for, SESSION_SUMMARY};
use super::CompletionClient;
use crate::error::{AiError, Result};

fn require(client: Option<&dyn CompletionClient>) -> Result<&dyn CompletionClient> {
    client.ok_or_else(|| AiError::Config("Missing API Key".to_string()))
}

/// Ask for three wrong answers, returned as the raw pipe-delimited reply.
pub async fn fetch_distractors(
    client: Option<&dyn CompletionClient>,
    request: &DistractorRequest,
) -> Result<String> {
    let client = require(client)?;
    let reply = client
        .complete(distractors_for(request.direction), &request.user_prompt())
        .await?;
    Ok(reply.trim().to_string())
}

/// Ask for a tutoring summary of the session report.
pub async fn fetch_summary(
    client: Option<&dyn CompletionClient>,
    request: &SummaryRequest,
) -> Result<String> {
    let client = require(client)?;
    client.complete(SESSION_SUMMARY, &request.report).await
}
