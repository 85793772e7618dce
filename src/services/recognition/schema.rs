//! Request body and reply handling for the `generateContent` endpoint.

use crate::error::RecognitionError;
use crate::models::image::SelectedImage;
use crate::models::scan_record::RecognitionResult;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub const INSTRUCTION: &str = "Analyze this image of a vehicle. Identify the license plate \
number, the region (state, province or country) it was issued in, and the vehicle's make, \
model, color and body type. If the plate is partially obscured, give your best reading.";

/// Required reply fields and the hint sent to the model for each.
pub const FIELDS: [(&str, &str); 7] = [
    ("plate_number", "The license plate number exactly as shown on the plate"),
    ("region", "The state, province or country that issued the plate"),
    ("vehicle_make", "Manufacturer of the vehicle, e.g. Toyota"),
    ("vehicle_model", "Model of the vehicle, e.g. Camry"),
    ("vehicle_color", "Primary color of the vehicle"),
    ("vehicle_type", "Body type of the vehicle: Sedan, SUV, Truck, Motorcycle, Van, etc."),
    ("confidence_score", "Confidence level: High, Medium, or Low"),
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: Value,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

/// Response schema: an object whose seven string properties are all required.
pub fn response_schema() -> Value {
    let properties: Map<String, Value> = FIELDS
        .iter()
        .map(|(name, description)| {
            (
                name.to_string(),
                json!({ "type": "STRING", "description": description }),
            )
        })
        .collect();
    let required: Vec<&str> = FIELDS.iter().map(|(name, _)| *name).collect();

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required,
    })
}

pub fn build_request(image: &SelectedImage) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                Part {
                    inline_data: Some(InlineData {
                        mime_type: image.mime_type.clone(),
                        data: image.data.clone(),
                    }),
                    text: None,
                },
                Part {
                    inline_data: None,
                    text: Some(INSTRUCTION.to_string()),
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: response_schema(),
        },
    }
}

/// Concatenated text of the first candidate, if it has any.
pub fn reply_text(response: &GenerateContentResponse) -> Option<String> {
    let content = response.candidates.first()?.content.as_ref()?;
    let text: String = content
        .parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect();

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Parse the model's text payload into a validated [`RecognitionResult`].
pub fn parse_reply(text: &str) -> Result<RecognitionResult, RecognitionError> {
    // Tolerate a markdown fence around the JSON
    let fence = Regex::new(r"(?s)^\s*```[A-Za-z]*\s*(.*?)\s*```\s*$")
        .map_err(|e| RecognitionError::Malformed(format!("Regex error: {}", e)))?;
    let body = match fence.captures(text) {
        Some(caps) => caps.get(1).map_or("", |m| m.as_str()),
        None => text.trim(),
    };
    if body.is_empty() {
        return Err(RecognitionError::EmptyResponse);
    }

    let value: Value =
        serde_json::from_str(body).map_err(|e| RecognitionError::Malformed(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| RecognitionError::Malformed("reply is not a JSON object".to_string()))?;

    let field = |name: &'static str| -> Result<String, RecognitionError> {
        object
            .get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(RecognitionError::MissingField(name))
    };

    Ok(RecognitionResult {
        plate_number: field("plate_number")?,
        region: field("region")?,
        vehicle_make: field("vehicle_make")?,
        vehicle_model: field("vehicle_model")?,
        vehicle_color: field("vehicle_color")?,
        vehicle_type: field("vehicle_type")?,
        confidence_score: field("confidence_score")?,
    })
}
