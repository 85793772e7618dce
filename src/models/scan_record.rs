use serde::{Deserialize, Serialize};

/// Structured reply from the recognition provider.
///
/// Field names match the response schema sent with the request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecognitionResult {
    pub plate_number: String,
    pub region: String,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub vehicle_color: String,
    pub vehicle_type: String,
    pub confidence_score: String,
}

/// Vehicle attributes grouped under a scan record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VehicleDetails {
    pub make: String,
    pub model: String,
    pub color: String,
    #[serde(rename = "type")]
    pub vehicle_type: String,
}

impl VehicleDetails {
    /// One-line description, e.g. "Blue Toyota Camry".
    pub fn summary(&self) -> String {
        [&self.color, &self.make, &self.model]
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// One persisted recognition outcome
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    pub id: String,
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// The scanned image itself, as a data URL
    pub image_url: String,
    pub plate_number: String,
    pub region: String,
    pub vehicle: VehicleDetails,
    pub confidence: String,
}

impl ScanRecord {
    pub fn from_recognition(
        id: String,
        timestamp: i64,
        image_url: String,
        result: RecognitionResult,
    ) -> Self {
        Self {
            id,
            timestamp,
            image_url,
            plate_number: result.plate_number,
            region: result.region,
            vehicle: VehicleDetails {
                make: result.vehicle_make,
                model: result.vehicle_model,
                color: result.vehicle_color,
                vehicle_type: result.vehicle_type,
            },
            confidence: result.confidence_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camry() -> RecognitionResult {
        RecognitionResult {
            plate_number: "ABC123".to_string(),
            region: "CA".to_string(),
            vehicle_make: "Toyota".to_string(),
            vehicle_model: "Camry".to_string(),
            vehicle_color: "Blue".to_string(),
            vehicle_type: "Sedan".to_string(),
            confidence_score: "High".to_string(),
        }
    }

    #[test]
    fn test_record_from_recognition() {
        let record = ScanRecord::from_recognition(
            "1700000000000".to_string(),
            1_700_000_000_000,
            "data:image/png;base64,AAAA".to_string(),
            camry(),
        );

        assert_eq!(record.plate_number, "ABC123");
        assert_eq!(record.region, "CA");
        assert_eq!(
            record.vehicle,
            VehicleDetails {
                make: "Toyota".to_string(),
                model: "Camry".to_string(),
                color: "Blue".to_string(),
                vehicle_type: "Sedan".to_string(),
            }
        );
        assert_eq!(record.confidence, "High");
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = ScanRecord::from_recognition(
            "1".to_string(),
            1,
            "data:image/png;base64,AAAA".to_string(),
            camry(),
        );
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["plateNumber"], "ABC123");
        assert_eq!(value["imageUrl"], "data:image/png;base64,AAAA");
        assert_eq!(value["vehicle"]["type"], "Sedan");
        assert!(value.get("plate_number").is_none());
    }

    #[test]
    fn test_vehicle_summary() {
        let record = ScanRecord::from_recognition("1".into(), 1, String::new(), camry());
        assert_eq!(record.vehicle.summary(), "Blue Toyota Camry");

        let sparse = VehicleDetails {
            make: "Ford".to_string(),
            model: " ".to_string(),
            color: String::new(),
            vehicle_type: "Truck".to_string(),
        };
        assert_eq!(sparse.summary(), "Ford");
    }
}
