// src/evaluator/fallback.rs — Canned verdict used when the provider is unreachable

/// A plausible C+ evaluation returned verbatim whenever the provider call
/// fails. The `note` field marks it as simulated.
pub const FALLBACK_VERDICT: &str = r#"{
  "overall_score": 78,
  "overall_grade": "C+",
  "criteria_breakdown": [
    {
      "criterion": "Content Quality",
      "score_percentage": 72,
      "weight": 35,
      "strengths": ["Clear thesis statement in introduction", "Relevant examples provided"],
      "deficiencies": ["Lacks depth in analysis - only surface level coverage", "Missing citations for key claims"],
      "recommendations": ["Add at least 3 scholarly references", "Deepen analysis with counterarguments"],
      "needs_improvement": true
    },
    {
      "criterion": "Organization",
      "score_percentage": 85,
      "weight": 25,
      "strengths": ["Logical paragraph structure", "Clear transitions between sections"],
      "deficiencies": ["Conclusion is abrupt and doesn't synthesize main points", "Introduction could better preview structure"],
      "recommendations": ["Expand conclusion to summarize key findings", "Add roadmap sentence in introduction"],
      "needs_improvement": false
    },
    {
      "criterion": "Critical Thinking",
      "score_percentage": 65,
      "weight": 40,
      "strengths": ["Identifies main issues in the topic"],
      "deficiencies": ["Fails to analyze underlying assumptions", "No synthesis of different perspectives", "Superficial evaluation of evidence"],
      "recommendations": ["Question the assumptions behind each argument", "Compare and contrast at least 3 different viewpoints", "Evaluate the quality of evidence used"],
      "needs_improvement": true
    }
  ],
  "critical_deficiencies": [
    {
      "issue": "Lack of critical analysis depth",
      "evidence": "\"The solution is effective because it helps people.\" (Paragraph 3) - This is descriptive, not analytical",
      "priority": "high",
      "remediation": "Replace descriptive statements with analytical questions: Why is it effective? For whom? Under what conditions? Compared to what alternatives?"
    },
    {
      "issue": "Missing academic citations",
      "evidence": "No references provided for claims about statistics or established theories",
      "priority": "high",
      "remediation": "Add minimum 5 scholarly sources using proper APA/MLA format"
    }
  ],
  "strengths_to_build": [
    {
      "strength": "Clear writing style",
      "evidence": "Sentence structure is varied and readable throughout (e.g., Paragraph 2 uses effective complex sentences)",
      "reinforcement": "Maintain this clarity while adding analytical depth"
    },
    {
      "strength": "Logical organization",
      "evidence": "Each paragraph has clear topic sentences and flows naturally to the next",
      "reinforcement": "Apply same organizational rigor to argument development"
    }
  ],
  "structural_analysis": {
    "organization": "Good basic structure but lacks sophistication in argument development",
    "argument_development": "Linear presentation without enough critical engagement or synthesis",
    "technical_compliance": "Meets basic formatting but lacks citations and proper academic conventions"
  },
  "revision_recommendations": {
    "high_priority": ["Add scholarly citations", "Deepen critical analysis"],
    "content_improvements": ["Include counterarguments", "Add case studies/examples"],
    "structural_changes": ["Expand conclusion", "Add literature review section"],
    "technical_fixes": ["Add reference list", "Fix formatting inconsistencies"]
  },
  "grade_justification": "Score of 78 reflects adequate content presentation but significant deficiencies in critical analysis and academic rigor. While well-organized, the submission lacks the analytical depth and scholarly engagement required for higher grades.",
  "readiness_assessment": {
    "status": "Needs Major Revision",
    "estimated_revision_hours": 6,
    "key_barriers": ["Insufficient critical engagement", "Lack of scholarly references", "Superficial analysis"]
  },
  "summary": "Adequately organized submission that meets basic requirements but requires substantial improvement in analytical depth, scholarly engagement, and critical thinking to achieve higher standards.",
  "note": "Using simulated analysis (OpenRouter unavailable)"
}"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Priority, Report, Tone};

    #[test]
    fn test_fallback_is_valid_json() {
        let v: serde_json::Value = serde_json::from_str(FALLBACK_VERDICT).unwrap();
        assert!(v.is_object());
        assert!(v["note"].is_string());
    }

    #[test]
    fn test_fallback_matches_report_shape() {
        let r: Report = serde_json::from_str(FALLBACK_VERDICT).unwrap();
        assert_eq!(r.overall_score, 78);
        assert_eq!(r.overall_grade, "C+");
        assert_eq!(r.criteria.len(), 3);
        assert_eq!(r.critical_deficiencies.len(), 2);
        assert_eq!(r.critical_deficiencies[0].priority, Some(Priority::High));
        assert_eq!(r.strengths_to_build.len(), 2);
        assert!(r.structural_analysis.is_some());
        assert!(r.revision_recommendations.is_some());
        assert!(r.grade_justification.is_some());
        assert!(r.note.as_deref().unwrap().contains("simulated"));
    }

    #[test]
    fn test_fallback_readiness_is_critical() {
        let r: Report = serde_json::from_str(FALLBACK_VERDICT).unwrap();
        let ra = r.readiness_assessment.unwrap();
        assert_eq!(ra.estimated_revision_hours, Some(6.0));
        let status = ra.status.unwrap();
        assert_eq!(Tone::from_status(&status), Tone::Critical);
    }
}
