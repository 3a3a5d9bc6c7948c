//! Opaque AI document-parsing service. Takes raw document bytes plus the
//! original filename and returns a structured training plan, or fails as a
//! whole. The returned data is treated as untrusted input and validated
//! before any rows are built from it.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;

use crate::config::AppConfig;
use crate::error::ApiError;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250114";

/// One week's theme in the parsed plan.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ParsedWeek {
    pub week: i32,
    pub theme: Option<String>,
    pub focus: Option<String>,
}

/// A workout extracted from the document, positioned by week and weekday.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ParsedWorkout {
    pub title: String,
    pub workout_type: Option<String>,
    /// 1-based day within the week (1 = first day).
    pub day_of_week: i32,
    /// 1-based week within the plan.
    pub week: i32,
    pub duration_minutes: Option<i32>,
    pub intensity: Option<String>,
    pub description: Option<String>,
    /// Free-form exercise list; stored verbatim as JSON.
    pub exercises: Option<serde_json::Value>,
}

/// Nutrition guidance extracted from the document.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ParsedNutrition {
    pub category: Option<String>,
    pub recommendation: String,
    pub details: Option<String>,
}

/// A goal extracted from the document.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ParsedGoal {
    pub title: String,
    pub goal_type: Option<String>,
    pub target_value: Option<f64>,
    pub unit: Option<String>,
}

/// Structured output of the document parser. Mirrors the fixed schema the
/// AI service is prompted to produce.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ParsedPlan {
    pub title: String,
    pub description: Option<String>,
    pub duration_weeks: i32,
    #[serde(default)]
    pub weekly_structure: Vec<ParsedWeek>,
    #[serde(default)]
    pub workouts: Vec<ParsedWorkout>,
    #[serde(default)]
    pub nutrition_guidance: Vec<ParsedNutrition>,
    #[serde(default)]
    pub goals: Vec<ParsedGoal>,
}

impl ParsedPlan {
    /// Defensive validation of AI output before it is used to construct
    /// rows. The service is a helper, but its output is untrusted input.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("parsed plan has an empty title".to_string());
        }
        if !(1..=104).contains(&self.duration_weeks) {
            return Err(format!(
                "parsed plan duration_weeks out of range: {}",
                self.duration_weeks
            ));
        }
        for (i, workout) in self.workouts.iter().enumerate() {
            if workout.title.trim().is_empty() {
                return Err(format!("parsed workout {i} has an empty title"));
            }
            if !(1..=7).contains(&workout.day_of_week) {
                return Err(format!(
                    "parsed workout '{}' has day_of_week out of range: {}",
                    workout.title, workout.day_of_week
                ));
            }
            if workout.week < 1 || workout.week > self.duration_weeks {
                return Err(format!(
                    "parsed workout '{}' has week out of range: {}",
                    workout.title, workout.week
                ));
            }
        }
        for (i, goal) in self.goals.iter().enumerate() {
            if goal.title.trim().is_empty() {
                return Err(format!("parsed goal {i} has an empty title"));
            }
        }
        Ok(())
    }
}

/// Client for the AI document-parsing service.
pub struct DocumentParser {
    api_key: Option<String>,
    client: Client,
}

impl DocumentParser {
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ApiError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key: config.anthropic_api_key.clone(),
            client,
        })
    }

    /// Whether the service is configured.
    pub fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    /// Parse a training plan document into structured data. All-or-nothing:
    /// any transport failure or malformed output is a hard error and nothing
    /// is consumed.
    #[instrument(skip(self, content))]
    pub async fn parse_training_plan(
        &self,
        content: &[u8],
        filename: &str,
    ) -> Result<ParsedPlan, ApiError> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            ApiError::ServiceUnavailable(
                "AI service not configured. Please set ANTHROPIC_API_KEY.".to_string(),
            )
        })?;

        debug!("Parsing document {} ({} bytes)", filename, content.len());

        let user_content = build_document_content(content, filename);

        let body = json!({
            "model": ANTHROPIC_MODEL,
            "max_tokens": 4096,
            "messages": [{ "role": "user", "content": user_content }],
        });

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::BadGateway(format!("AI service request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            warn!("AI service returned status {}", status);
            return Err(ApiError::BadGateway(format!(
                "AI service request failed with status {status}"
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ApiError::BadGateway(format!("Failed to read AI response: {e}")))?;

        let text = payload["content"][0]["text"]
            .as_str()
            .ok_or_else(|| ApiError::BadGateway("AI response had no text content".to_string()))?;

        let plan: ParsedPlan = serde_json::from_str(extract_json(text))
            .map_err(|e| ApiError::BadGateway(format!("AI returned malformed plan data: {e}")))?;

        plan.validate()
            .map_err(|e| ApiError::BadGateway(format!("AI returned invalid plan data: {e}")))?;

        info!(
            "Parsed plan '{}': {} weeks, {} workouts, {} goals",
            plan.title,
            plan.duration_weeks,
            plan.workouts.len(),
            plan.goals.len()
        );
        Ok(plan)
    }
}

/// Build the message content for the document: PDFs are attached as base64
/// document blocks, everything else is sent as inline text.
fn build_document_content(content: &[u8], filename: &str) -> serde_json::Value {
    let prompt = parse_prompt();

    if filename.to_lowercase().ends_with(".pdf") {
        json!([
            {
                "type": "document",
                "source": {
                    "type": "base64",
                    "media_type": "application/pdf",
                    "data": STANDARD.encode(content),
                }
            },
            { "type": "text", "text": prompt }
        ])
    } else {
        let text = String::from_utf8_lossy(content);
        json!([
            { "type": "text", "text": format!("Document content:\n{text}\n\n{prompt}") }
        ])
    }
}

fn parse_prompt() -> &'static str {
    r#"Analyze this training plan document and extract structured data.

Return a JSON object with this exact structure:
{
  "title": "Plan title extracted from document",
  "description": "Brief overview of the training plan",
  "duration_weeks": 12,
  "weekly_structure": [{"week": 1, "theme": "Base building", "focus": "Aerobic endurance"}],
  "workouts": [{"title": "Workout name", "workout_type": "cycling", "day_of_week": 1, "week": 1, "duration_minutes": 60, "intensity": "low", "description": "Detailed description", "exercises": [{"name": "Exercise name", "sets": 3, "reps": 12, "duration_minutes": null, "notes": "Any specific instructions"}]}],
  "nutrition_guidance": [{"category": "general", "recommendation": "Nutrition advice", "details": "Additional details"}],
  "goals": [{"title": "Goal name", "goal_type": "endurance", "target_value": 100, "unit": "km"}]
}

Important:
- Only include data actually found in the document
- Use null for missing fields
- workout_type is one of: cycling, strength, running, recovery, hiit, yoga
- intensity is one of: low, medium, high
- Return ONLY valid JSON, no other text"#
}

/// Strip a markdown code fence if the model wrapped its JSON in one.
fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> ParsedPlan {
        ParsedPlan {
            title: "8 Week Base".to_string(),
            description: None,
            duration_weeks: 8,
            weekly_structure: vec![],
            workouts: vec![ParsedWorkout {
                title: "Endurance ride".to_string(),
                workout_type: Some("cycling".to_string()),
                day_of_week: 2,
                week: 1,
                duration_minutes: Some(90),
                intensity: Some("low".to_string()),
                description: None,
                exercises: None,
            }],
            nutrition_guidance: vec![],
            goals: vec![],
        }
    }

    #[test]
    fn test_valid_plan_passes() {
        assert!(sample_plan().validate().is_ok());
    }

    #[test]
    fn test_empty_title_rejected() {
        let mut plan = sample_plan();
        plan.title = "  ".to_string();
        assert!(plan.validate().is_err());
    }

    #[test]
    fn test_duration_out_of_range_rejected() {
        let mut plan = sample_plan();
        plan.duration_weeks = 0;
        assert!(plan.validate().is_err());
        plan.duration_weeks = 200;
        assert!(plan.validate().is_err());
    }

    #[test]
    fn test_workout_week_beyond_duration_rejected() {
        let mut plan = sample_plan();
        plan.workouts[0].week = 9;
        assert!(plan.validate().is_err());
    }

    #[test]
    fn test_workout_day_out_of_range_rejected() {
        let mut plan = sample_plan();
        plan.workouts[0].day_of_week = 8;
        assert!(plan.validate().is_err());
    }

    #[test]
    fn test_extract_json_strips_fences() {
        assert_eq!(extract_json("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(extract_json("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(extract_json("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn test_parsed_plan_deserializes_with_missing_lists() {
        let plan: ParsedPlan =
            serde_json::from_str(r#"{"title": "Plan", "duration_weeks": 4}"#).unwrap();
        assert!(plan.workouts.is_empty());
        assert!(plan.goals.is_empty());
        assert!(plan.validate().is_ok());
    }
}
