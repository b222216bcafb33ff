use crate::checklist::{SectionChecklist, SectionId};
use serde::{Deserialize, Serialize};

/// Sampling temperature for every evaluation call.
pub const ORACLE_TEMPERATURE: f32 = 0.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationRequest {
    pub section_id: SectionId,
    pub prompt: String,
    pub temperature: f32,
}

pub fn build_evaluation_request(
    checklist: &SectionChecklist,
    policy_text: &str,
    chapter_text: &str,
) -> EvaluationRequest {
    EvaluationRequest {
        section_id: checklist.section_id,
        prompt: render_prompt(checklist, policy_text, chapter_text),
        temperature: ORACLE_TEMPERATURE,
    }
}

const RULE: &str = "==========================================================";

fn render_prompt(checklist: &SectionChecklist, policy_text: &str, chapter_text: &str) -> String {
    let section_label = checklist.section_id.label();
    let mut lines = vec![
        "You are a DPDPA compliance expert. Assess whether an organization's policy complies with the Digital Personal Data Protection Act, 2023 (India), Chapter II, for exactly one section.".to_string(),
        "Read each sentence of the policy and compare it with the checklist of obligations derived from the section under review.".to_string(),
        String::new(),
        RULE.to_string(),
        "ORGANIZATION POLICY:".to_string(),
        format!("\"\"\"{}\"\"\"", policy_text),
        String::new(),
        "DPDPA SECTION UNDER REVIEW:".to_string(),
        format!("\"\"\"{}\"\"\"", section_label),
        String::new(),
    ];

    if !chapter_text.trim().is_empty() {
        lines.push("DPDPA CHAPTER II TEXT (reference only):".to_string());
        lines.push(format!("\"\"\"{}\"\"\"", chapter_text));
        lines.push(String::new());
    }

    lines.extend(
        [
            RULE,
            "INSTRUCTIONS:",
            "",
            "1. Explain the section in plain, layman-friendly language in \"DPDPA Section Meaning\".",
            "2. For each checklist item, in the order given, go through the policy sentence by sentence.",
            "   - Mark the item as matched only if a sentence explicitly and clearly covers it in the correct context.",
            "   - Vague, generic or partial references are unmatched. Do not infer implied meaning. Do not assume.",
            "   - Quote every matching policy sentence verbatim in \"Matched Sentences\"; use an empty list when unmatched.",
            "   - Always give a non-empty \"Justification\".",
            "3. Classification (for information; it is recomputed from your item verdicts):",
            "   - \"Fully Compliant\": every checklist item is covered.",
            "   - \"Partially Compliant\": at least one item is missing and at least one is covered.",
            "   - \"Non-Compliant\": no checklist item is covered.",
            "   - Severity for Partially Compliant only: Minor = 1 missing item, Medium = 2-3 missing items, Major = 4 or more missing items. Otherwise \"None\".",
            "   - Compliance Points: Fully Compliant = 1.0, Minor = 0.75, Medium = 0.5, Major = 0.25, Non-Compliant = 0.0.",
            "4. Suggested Rewrite: for each missing checklist item write exactly one sentence that can be added to the policy to cover it. Use an empty string when nothing is missing.",
            "",
            RULE,
            "OUTPUT FORMAT (one strict JSON object, no prose, no code fences):",
            "{",
            "  \"DPDPA Section\": \"...\",",
            "  \"DPDPA Section Meaning\": \"...\",",
            "  \"Checklist Items\": [",
            "    {",
            "      \"Item\": \"...\",",
            "      \"Matched\": true,",
            "      \"Matched Sentences\": [\"...\"],",
            "      \"Justification\": \"...\"",
            "    }",
            "  ],",
            "  \"Match Level\": \"Fully Compliant | Partially Compliant | Non-Compliant\",",
            "  \"Severity\": \"None | Minor | Medium | Major\",",
            "  \"Compliance Points\": 1.0,",
            "  \"Suggested Rewrite\": \"...\"",
            "}",
            "",
            RULE,
        ]
        .iter()
        .map(|line| line.to_string()),
    );

    lines.push(format!(
        "CHECKLIST TO USE ({}, {} items, one \"Checklist Items\" entry per item in this order):",
        section_label,
        checklist.items.len()
    ));
    for (idx, item) in checklist.items.iter().enumerate() {
        lines.push(format!("{}. {}", idx + 1, item.text));
    }
    lines.push(String::new());
    lines.join("\n")
}
