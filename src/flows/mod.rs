//! Single-shot, schema-validated request/response operations against the
//! language model.
//!
//! Every flow follows the same sequence: validate the input, render the
//! prompt, ask the model for a reply shaped by a JSON schema, then parse and
//! check that reply. Any failure is returned to the caller as-is; nothing is
//! retried and no partial result is produced.

pub mod class_summary;
mod data_uri;
pub mod face_match;

pub use class_summary::{
    ClassSummary, ClassSummaryFlow, ClassSummaryRequest, generate_class_summary,
};
pub use data_uri::DataUri;
pub use face_match::{
    FaceMatchFlow, FaceMatchRequest, FaceMatchSuggestion, resolve_ambiguous_match,
};

use crate::{
    Error, Result,
    llm::{ChatCompletionRequest, ChatMessage, LlmClient, ResponseSchema},
};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

pub trait Flow {
    const NAME: &'static str;

    type Input: Sync;
    type Output: DeserializeOwned;

    /// Rejects structurally invalid input. Runs before any model call.
    fn validate(input: &Self::Input) -> Result<()>;

    fn messages(input: &Self::Input) -> Vec<ChatMessage>;

    fn output_schema() -> ResponseSchema;

    /// Checks constraints on the parsed reply that the JSON schema alone
    /// cannot express.
    fn check_output(_input: &Self::Input, output: Self::Output) -> Result<Self::Output> {
        Ok(output)
    }
}

pub async fn run_flow<F: Flow>(client: &dyn LlmClient, input: &F::Input) -> Result<F::Output> {
    if let Err(e) = F::validate(input) {
        warn!("{} rejected input: {}", F::NAME, e);
        return Err(e);
    }

    let request = ChatCompletionRequest {
        messages: F::messages(input),
        response_schema: Some(F::output_schema()),
        max_tokens: None,
        temperature: None,
    };

    debug!(
        "{} sending {} messages to the model",
        F::NAME,
        request.messages.len()
    );

    let response = client.create_chat_completion(request).await?;

    if let Some(ref usage) = response.usage {
        debug!(
            "{} used {} prompt + {} completion tokens",
            F::NAME,
            usage.prompt_tokens,
            usage.completion_tokens
        );
    }

    let content = response
        .first_content()
        .ok_or_else(|| Error::response_parse(format!("{} received an empty reply", F::NAME)))?;

    let output: F::Output = serde_json::from_str(strip_code_fence(content)).map_err(|e| {
        warn!("{} could not parse model reply: {}", F::NAME, e);
        Error::response_parse(format!("{} reply does not match its schema: {}", F::NAME, e))
    })?;

    let output = F::check_output(input, output)?;
    info!("{} completed", F::NAME);
    Ok(output)
}

/// Some models wrap JSON replies in a Markdown fence even when asked not to.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        // Single-line fence: drop a language tag glued to the opening ticks.
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Splits a comma separated roster into trimmed, non-empty names.
pub fn roster_names(roster: &str) -> Vec<&str> {
    roster
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}
