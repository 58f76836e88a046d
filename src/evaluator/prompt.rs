// src/evaluator/prompt.rs — Evaluation prompt assembly
//
// Pure string building: the same two inputs always produce the same prompt.

use crate::util::truncate_chars;

/// Rubric text beyond this many characters is dropped.
pub const RUBRIC_CHAR_BUDGET: usize = 4000;

/// Assignment text beyond this many characters is dropped.
pub const ASSIGNMENT_CHAR_BUDGET: usize = 6000;

/// System message sent with every evaluation request.
pub const SYSTEM_PROMPT: &str = "You are an expert teacher and rigorous evaluator. \
Always respond with valid JSON only. Be critical, evidence-based, and uncompromising in your assessment.";

const PREAMBLE: &str = "You are an experienced educator and evaluation specialist tasked with rigorous \
assessment of academic work. Your analysis must be critical, comprehensive, and strictly adhere to \
the rubric criteria.";

const DIRECTIVES: &str = r#"---

## **EVALUATION INSTRUCTIONS:**

### **1. STRICT ADHERENCE TO RUBRIC:**
- Evaluate EXCLUSIVELY based on the provided rubric criteria
- Do NOT introduce external standards or personal preferences
- Map EVERY piece of feedback directly to specific rubric criteria

### **2. REQUIRED ANALYSIS COMPONENTS:**

#### **A. QUANTITATIVE SCORING:**
- Score each rubric criterion separately on a scale of 0-100%
- Provide EXACT percentages, not ranges
- Calculate weighted overall score if rubric includes weightings
- Flag ANY criterion where score is below 70% as "Needs Significant Improvement"

#### **B. QUALITATIVE FEEDBACK (MUST INCLUDE):**
- **Strengths Identified:** List 3-5 specific examples where criteria were met/exceeded
- **Deficiencies Found:** List 5-8 specific, actionable deficiencies with exact evidence from submission
- **Critical Analysis:** Explain WHY each deficiency constitutes a failure to meet rubric standards
- **Evidence-Based Assessment:** Include exact quotes/line numbers to support every claim

#### **C. STRUCTURAL ANALYSIS:**
- **Organization Evaluation:** Assess logical flow, paragraph structure, transitions
- **Argumentation Analysis:** Evaluate thesis clarity, evidence quality, logical consistency
- **Technical Components:** Check formatting, citations, length compliance, technical accuracy

#### **D. CRITICAL THINKING ASSESSMENT:**
- **Depth of Analysis:** Evaluate sophistication of thought, not just surface-level coverage
- **Originality Assessment:** Check for rote repetition vs. genuine insight
- **Synthesis Evaluation:** Assess integration of concepts, critical connections made

### **3. REQUIRED FORMAT FOR RESPONSE:**

Provide your analysis as a JSON object with this EXACT structure:
"#;

/// One-shot example of the verdict shape. Format guidance for the model,
/// not data.
pub const JSON_SHAPE_EXAMPLE: &str = r#"{
    "overall_score": 85,
    "overall_grade": "B",
    "criteria_breakdown": [
        {
            "criterion": "Criterion Name",
            "score_percentage": 80,
            "weight": 25,
            "strengths": ["Specific strength with evidence"],
            "deficiencies": ["Specific deficiency with exact quote"],
            "recommendations": ["Concrete action required"],
            "needs_improvement": true/false
        }
    ],
    "critical_deficiencies": [
        {
            "issue": "Specific critical issue",
            "evidence": "Exact quote/location",
            "priority": "high/medium/low",
            "remediation": "Step-by-step fix"
        }
    ],
    "strengths_to_build": [
        {
            "strength": "Specific strength",
            "evidence": "Exact quote/location",
            "reinforcement": "How to build on this"
        }
    ],
    "structural_analysis": {
        "organization": "Detailed assessment",
        "argument_development": "Specific evaluation",
        "technical_compliance": "Checklist results"
    },
    "revision_recommendations": {
        "high_priority": ["Exactly what to fix first"],
        "content_improvements": ["Specific content changes"],
        "structural_changes": ["Required reorganization"],
        "technical_fixes": ["Exact formatting fixes"]
    },
    "grade_justification": "Concise paragraph explaining score",
    "readiness_assessment": {
        "status": "Needs Major Revision",
        "estimated_revision_hours": 5,
        "key_barriers": ["Fundamental issue 1", "Fundamental issue 2"]
    },
    "summary": "Overall summary with actionable insights"
}"#;

const PRINCIPLES: &str = r#"### **4. EVALUATION PRINCIPLES TO ENFORCE:**

- **Zero Tolerance for:** Plagiarism indicators, major factual errors, ignoring assignment requirements
- **High Standards for:** Critical thinking, original analysis, proper academic conventions
- **Evidence-Required:** Every criticism MUST reference specific submission content
- **Action-Oriented:** All feedback must enable immediate, concrete improvements

### **5. FINAL REQUIREMENTS:**

- Do NOT give participation trophies or inflated scores
- Do NOT hesitate to give low scores when warranted by rubric
- Do NOT provide vague feedback - be brutally specific
- DO highlight both excellence and failure with equal specificity
- DO maintain professional, constructive but uncompromising tone

**BEGIN EVALUATION NOW. Be meticulous, critical, and evidence-based in your assessment.**
"#;

/// Build the user prompt for one evaluation.
///
/// Sections (in order):
///   1. Role preamble
///   2. Rubric, first 4000 characters
///   3. Assignment, first 6000 characters
///   4. Evaluation directives
///   5. JSON shape example
///   6. Evaluation principles
pub fn build_evaluation_prompt(assignment_text: &str, rubric_text: &str) -> String {
    let rubric = truncate_chars(rubric_text, RUBRIC_CHAR_BUDGET);
    let assignment = truncate_chars(assignment_text, ASSIGNMENT_CHAR_BUDGET);

    let mut prompt = String::with_capacity(
        PREAMBLE.len()
            + rubric.len()
            + assignment.len()
            + DIRECTIVES.len()
            + JSON_SHAPE_EXAMPLE.len()
            + PRINCIPLES.len()
            + 256,
    );

    prompt.push_str(PREAMBLE);
    prompt.push_str("\n\n**RUBRIC FOR EVALUATION:**\n");
    prompt.push_str(rubric);
    prompt.push_str("\n\n**ASSIGNMENT SUBMISSION TO EVALUATE:**\n");
    prompt.push_str(assignment);
    prompt.push_str("\n\n");
    prompt.push_str(DIRECTIVES);
    prompt.push_str(JSON_SHAPE_EXAMPLE);
    prompt.push_str("\n\n");
    prompt.push_str(PRINCIPLES);
    prompt
}
