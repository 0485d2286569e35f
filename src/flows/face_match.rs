//! Resolves a face the recogniser could not place with confidence by asking
//! the model to pick among candidate names, falling back to the roster.

use super::{DataUri, Flow, roster_names, run_flow};
use crate::{
    Error, Result,
    llm::{ChatMessage, LlmClient, ResponseSchema},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

const SYSTEM_PROMPT: &str =
    "You are an assistant that helps teachers identify students during classroom face recognition.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceMatchRequest {
    /// `data:<mimetype>;base64,<encoded_data>`
    pub photo_data_uri: String,
    pub possible_matches: Vec<String>,
    /// All student names in the class, comma separated.
    pub class_roster: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceMatchSuggestion {
    /// `None` means the model could not decide with confidence.
    pub suggested_match: Option<String>,
    pub confidence: f64,
    pub reasoning: String,
}

pub struct FaceMatchFlow;

impl Flow for FaceMatchFlow {
    const NAME: &'static str = "face_match";

    type Input = FaceMatchRequest;
    type Output = FaceMatchSuggestion;

    fn validate(input: &FaceMatchRequest) -> Result<()> {
        let photo = DataUri::parse(&input.photo_data_uri)?;
        if !photo.is_image() {
            return Err(Error::validation(format!(
                "photo_data_uri must hold an image, got '{}'",
                photo.mime_type
            )));
        }

        if input.possible_matches.is_empty() {
            return Err(Error::validation("possible_matches must not be empty"));
        }
        if input.possible_matches.iter().any(|name| name.trim().is_empty()) {
            return Err(Error::validation("possible_matches contains a blank name"));
        }

        if roster_names(&input.class_roster).is_empty() {
            return Err(Error::validation("class_roster must list at least one student"));
        }

        Ok(())
    }

    fn messages(input: &FaceMatchRequest) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(render_prompt(input)).with_image(input.photo_data_uri.clone()),
        ]
    }

    fn output_schema() -> ResponseSchema {
        ResponseSchema {
            name: "face_match_suggestion".to_string(),
            description: Some("Best guess for an ambiguously recognised student".to_string()),
            schema: json!({
                "type": "object",
                "properties": {
                    "suggested_match": {
                        "type": ["string", "null"],
                        "description": "Name of the most likely student, or null if no confident match"
                    },
                    "confidence": {
                        "type": "number",
                        "description": "Certainty of the suggestion between 0 and 1"
                    },
                    "reasoning": {
                        "type": "string",
                        "description": "Why this student was (or was not) picked"
                    }
                },
                "required": ["suggested_match", "confidence", "reasoning"],
                "additionalProperties": false
            }),
            strict: true,
        }
    }

    fn check_output(
        input: &FaceMatchRequest,
        mut output: FaceMatchSuggestion,
    ) -> Result<FaceMatchSuggestion> {
        if !output.confidence.is_finite() || !(0.0..=1.0).contains(&output.confidence) {
            return Err(Error::response_parse(format!(
                "confidence must lie in [0, 1], got {}",
                output.confidence
            )));
        }

        if output.reasoning.trim().is_empty() {
            return Err(Error::response_parse("reasoning must not be empty"));
        }

        output.suggested_match = output
            .suggested_match
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        if let Some(name) = output.suggested_match.take() {
            // Report the name as the caller spelled it, not as the model did.
            let known = input
                .possible_matches
                .iter()
                .map(|candidate| candidate.trim())
                .chain(roster_names(&input.class_roster))
                .find(|candidate| candidate.eq_ignore_ascii_case(&name));
            match known {
                Some(candidate) => output.suggested_match = Some(candidate.to_string()),
                None => {
                    return Err(Error::response_parse(format!(
                        "suggested match '{name}' is neither a candidate nor on the class roster"
                    )));
                }
            }
        }

        Ok(output)
    }
}

fn render_prompt(input: &FaceMatchRequest) -> String {
    format!(
        "A student's face has been detected, but the recogniser is not confident about the match.\n\
         Possible matches: {candidates}\n\
         Class roster: {roster}\n\
         \n\
         Look at the attached photo and decide which student it most likely shows. \
         Prefer one of the possible matches and justify your choice.\n\
         If none of the possible matches fit, pick another name from the class roster instead.\n\
         If you cannot decide with confidence, set suggested_match to null and explain why.\n\
         \n\
         Return the student's name exactly as written on the roster in suggested_match, \
         a confidence between 0 and 1 in confidence, and your justification in reasoning.",
        candidates = input.possible_matches.join(", "),
        roster = input.class_roster.trim(),
    )
}

pub async fn resolve_ambiguous_match(
    client: &dyn LlmClient,
    request: &FaceMatchRequest,
) -> Result<FaceMatchSuggestion> {
    run_flow::<FaceMatchFlow>(client, request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn request() -> FaceMatchRequest {
        FaceMatchRequest {
            photo_data_uri: "data:image/jpeg;base64,/9j/4AAQ".to_string(),
            possible_matches: vec!["Alice Johnson".to_string(), "Diana Miller".to_string()],
            class_roster: "Alice Johnson, Bob Williams, Charlie Brown, Diana Miller".to_string(),
        }
    }

    fn suggestion(name: Option<&str>, confidence: f64) -> FaceMatchSuggestion {
        FaceMatchSuggestion {
            suggested_match: name.map(str::to_string),
            confidence,
            reasoning: "Hair and glasses match".to_string(),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(FaceMatchFlow::validate(&request()).is_ok());
    }

    #[test]
    fn test_non_image_data_uri_rejected() {
        let mut req = request();
        req.photo_data_uri = "data:application/pdf;base64,JVBERi0=".to_string();

        let err = FaceMatchFlow::validate(&req).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("application/pdf"));
    }

    #[test]
    fn test_blank_roster_rejected() {
        let mut req = request();
        req.class_roster = " , ".to_string();

        assert!(matches!(
            FaceMatchFlow::validate(&req),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_prompt_lists_candidates_and_roster() {
        let messages = FaceMatchFlow::messages(&request());

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
        assert!(messages[1].content.contains("Possible matches: Alice Johnson, Diana Miller"));
        assert!(messages[1].content.contains("Class roster: Alice Johnson, Bob Williams"));
        assert_eq!(messages[1].images, vec!["data:image/jpeg;base64,/9j/4AAQ".to_string()]);
    }

    #[test]
    fn test_schema_requires_all_fields() {
        let schema = FaceMatchFlow::output_schema();

        assert!(schema.strict);
        assert_eq!(
            schema.schema["required"],
            json!(["suggested_match", "confidence", "reasoning"])
        );
    }

    #[test]
    fn test_roster_fallback_accepted() {
        let output =
            FaceMatchFlow::check_output(&request(), suggestion(Some("bob williams"), 0.6)).unwrap();
        assert_eq!(output.suggested_match.as_deref(), Some("Bob Williams"));
    }

    #[test]
    fn test_suggestion_uses_roster_spelling() {
        let output =
            FaceMatchFlow::check_output(&request(), suggestion(Some(" BOB WILLIAMS "), 0.7))
                .unwrap();
        assert_eq!(output.suggested_match.as_deref(), Some("Bob Williams"));
    }

    #[test]
    fn test_blank_suggestion_means_no_match() {
        let output = FaceMatchFlow::check_output(&request(), suggestion(Some("  "), 0.1)).unwrap();
        assert_eq!(output.suggested_match, None);
    }

    #[test]
    fn test_unknown_name_rejected() {
        let err = FaceMatchFlow::check_output(&request(), suggestion(Some("Zed Zulu"), 0.9))
            .unwrap_err();
        assert!(matches!(err, Error::ResponseParse(_)));
    }

    #[test]
    fn test_confidence_out_of_range_rejected() {
        for confidence in [-0.1, 1.01, f64::NAN] {
            let result =
                FaceMatchFlow::check_output(&request(), suggestion(Some("Alice Johnson"), confidence));
            assert!(matches!(result, Err(Error::ResponseParse(_))));
        }
    }

    #[test]
    fn test_empty_reasoning_rejected() {
        let mut output = suggestion(None, 0.0);
        output.reasoning = "".to_string();

        assert!(matches!(
            FaceMatchFlow::check_output(&request(), output),
            Err(Error::ResponseParse(_))
        ));
    }
}
