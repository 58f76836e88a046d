// src/report/types.rs — The canonical verdict schema
//
// Every field is defaulted on input: the model is free to omit anything and
// the renderer treats a missing list exactly like an empty one. An explicit
// `null` reads the same as an absent field. Scores and weights are passed
// through unvalidated; fractional scores are rounded.

use serde::{Deserialize, Deserializer, Serialize};

/// A parsed evaluation, created fresh per request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Report {
    #[serde(deserialize_with = "score")]
    pub overall_score: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub overall_grade: String,
    #[serde(alias = "criteria_breakdown", deserialize_with = "null_as_default")]
    pub criteria: Vec<Criterion>,
    #[serde(deserialize_with = "null_as_default")]
    pub critical_deficiencies: Vec<Deficiency>,
    #[serde(deserialize_with = "null_as_default")]
    pub strengths_to_build: Vec<Strength>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structural_analysis: Option<StructuralAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision_recommendations: Option<RevisionRecommendations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_justification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readiness_assessment: Option<ReadinessAssessment>,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Set on the simulated verdict used when the provider is unreachable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Leading slice of an unparseable verdict, kept for inspection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

/// Timestamp format used for `Report::timestamp` and the report footer.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl Report {
    /// Fill in `analysis_id` and `timestamp` if the verdict did not carry them.
    /// These are the only fields ever written after construction.
    pub fn stamp(&mut self, now: chrono::DateTime<chrono::Local>) {
        if self.analysis_id.is_none() {
            self.analysis_id = Some(short_id());
        }
        if self.timestamp.is_none() {
            self.timestamp = Some(now.format(TIMESTAMP_FORMAT).to_string());
        }
    }
}

/// `null` becomes the type's default instead of a type error.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Any JSON number, rounded to the nearest integer. `null` is 0.
fn score<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?
        .map(|v| v.round() as i64)
        .unwrap_or_default())
}

/// First 8 characters of a fresh v4 UUID.
pub fn short_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Criterion {
    #[serde(deserialize_with = "null_as_default")]
    pub criterion: String,
    #[serde(deserialize_with = "score")]
    pub score_percentage: i64,
    /// Percentage points; the set of weights is not required to sum to 100.
    #[serde(deserialize_with = "null_as_default")]
    pub weight: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub strengths: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub deficiencies: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub recommendations: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub needs_improvement: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Deficiency {
    #[serde(deserialize_with = "null_as_default")]
    pub issue: String,
    #[serde(deserialize_with = "null_as_default")]
    pub evidence: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(deserialize_with = "null_as_default")]
    pub remediation: String,
}

/// Deficiency priority. Unknown labels are kept verbatim rather than
/// rejected so that one odd value cannot sink the whole verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    High,
    Medium,
    Low,
    Other(String),
}

impl Priority {
    pub fn as_str(&self) -> &str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
            Priority::Other(s) => s,
        }
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            "low" => Priority::Low,
            _ => Priority::Other(s),
        }
    }
}

impl From<Priority> for String {
    fn from(p: Priority) -> Self {
        match p {
            Priority::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Strength {
    #[serde(deserialize_with = "null_as_default")]
    pub strength: String,
    #[serde(deserialize_with = "null_as_default")]
    pub evidence: String,
    #[serde(deserialize_with = "null_as_default")]
    pub reinforcement: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuralAnalysis {
    pub organization: Option<String>,
    pub argument_development: Option<String>,
    pub technical_compliance: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevisionRecommendations {
    #[serde(deserialize_with = "null_as_default")]
    pub high_priority: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub content_improvements: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub structural_changes: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub technical_fixes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessAssessment {
    pub status: Option<String>,
    pub estimated_revision_hours: Option<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub key_barriers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_object_defaults() {
        let r: Report = serde_json::from_str("{}").unwrap();
        assert_eq!(r, Report::default());
        assert!(r.criteria.is_empty());
        assert!(r.structural_analysis.is_none());
    }

    #[test]
    fn test_criteria_breakdown_alias() {
        let r: Report = serde_json::from_str(
            r#"{"criteria_breakdown": [{"criterion": "Clarity", "score_percentage": 64}]}"#,
        )
        .unwrap();
        assert_eq!(r.criteria.len(), 1);
        assert_eq!(r.criteria[0].criterion, "Clarity");
        assert_eq!(r.criteria[0].weight, 0.0);
        assert!(r.criteria[0].strengths.is_empty());
    }

    #[test]
    fn test_out_of_range_scores_pass_through() {
        let r: Report = serde_json::from_str(
            r#"{"overall_score": 140, "criteria": [{"score_percentage": -5, "weight": 250}]}"#,
        )
        .unwrap();
        assert_eq!(r.overall_score, 140);
        assert_eq!(r.criteria[0].score_percentage, -5);
        assert_eq!(r.criteria[0].weight, 250.0);
    }

    #[test]
    fn test_null_fields_read_as_defaults() {
        let r: Report = serde_json::from_str(
            r#"{
                "overall_score": 80,
                "overall_grade": null,
                "summary": null,
                "strengths_to_build": null,
                "critical_deficiencies": [
                    {"issue": "Thin sources", "evidence": null, "priority": null, "remediation": "Cite more"}
                ],
                "criteria": [
                    {"criterion": "Content", "score_percentage": null, "weight": null,
                     "strengths": null, "needs_improvement": null}
                ],
                "revision_recommendations": {"high_priority": null, "technical_fixes": ["Fix refs"]},
                "readiness_assessment": {"status": null, "key_barriers": null}
            }"#,
        )
        .unwrap();
        assert_eq!(r.overall_score, 80);
        assert_eq!(r.overall_grade, "");
        assert!(r.strengths_to_build.is_empty());
        assert_eq!(r.critical_deficiencies[0].issue, "Thin sources");
        assert_eq!(r.critical_deficiencies[0].evidence, "");
        assert!(r.critical_deficiencies[0].priority.is_none());
        assert_eq!(r.criteria[0].score_percentage, 0);
        assert_eq!(r.criteria[0].weight, 0.0);
        assert!(!r.criteria[0].needs_improvement);
        let recs = r.revision_recommendations.unwrap();
        assert!(recs.high_priority.is_empty());
        assert_eq!(recs.technical_fixes, vec!["Fix refs".to_string()]);
        assert!(r.readiness_assessment.unwrap().key_barriers.is_empty());
    }

    #[test]
    fn test_fractional_scores_are_rounded() {
        let r: Report = serde_json::from_str(
            r#"{"overall_score": 84.6, "criteria": [{"criterion": "Content", "score_percentage": 72.5}]}"#,
        )
        .unwrap();
        assert_eq!(r.overall_score, 85);
        assert_eq!(r.criteria[0].score_percentage, 73);
    }

    #[test]
    fn test_non_numeric_score_is_rejected() {
        assert!(serde_json::from_str::<Report>(r#"{"overall_score": "85"}"#).is_err());
    }

    #[test]
    fn test_priority_parsing() {
        assert_eq!(Priority::from("HIGH".to_string()), Priority::High);
        assert_eq!(Priority::from(" medium ".to_string()), Priority::Medium);
        assert_eq!(Priority::from("low".to_string()), Priority::Low);
        assert_eq!(
            Priority::from("urgent".to_string()),
            Priority::Other("urgent".into())
        );
    }

    #[test]
    fn test_priority_serializes_as_string() {
        let d = Deficiency {
            issue: "x".into(),
            priority: Some(Priority::High),
            ..Default::default()
        };
        let v = serde_json::to_value(&d).unwrap();
        assert_eq!(v["priority"], "high");
    }

    #[test]
    fn test_serialize_emits_criteria_key() {
        let r = Report {
            criteria: vec![Criterion::default()],
            ..Default::default()
        };
        let v = serde_json::to_value(&r).unwrap();
        assert!(v.get("criteria").is_some());
        assert!(v.get("criteria_breakdown").is_none());
        assert!(v.get("note").is_none());
    }

    #[test]
    fn test_stamp_fills_missing_only() {
        let now = chrono::Local::now();
        let mut r = Report {
            analysis_id: Some("keepme01".into()),
            ..Default::default()
        };
        r.stamp(now);
        assert_eq!(r.analysis_id.as_deref(), Some("keepme01"));
        assert_eq!(
            r.timestamp.as_deref(),
            Some(now.format(TIMESTAMP_FORMAT).to_string().as_str())
        );
    }

    #[test]
    fn test_short_id_length() {
        let id = short_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
