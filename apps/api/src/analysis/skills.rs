//! Skill-profile analysis: one model call, tolerant extraction.

use serde::Serialize;
use tracing::{debug, warn};

use crate::analysis::extract::Extraction;
use crate::analysis::prompts::{SKILL_ANALYSIS_PROMPT_TEMPLATE, SKILL_EXTRACTION_PROMPT_TEMPLATE};
use crate::ollama::{GenerateOptions, OllamaError, TextGenerator};

const PROFILE_OPTIONS: GenerateOptions = GenerateOptions {
    temperature: 0.3,
    num_predict: 800,
};

const EXTRACTION_OPTIONS: GenerateOptions = GenerateOptions {
    temperature: 0.3,
    num_predict: 600,
};

/// Structured skill profile for one resume. Always well-formed: unparsable
/// completions produce empty fields plus the `error`/`raw_response`
/// annotations rather than a failure.
#[derive(Debug, Clone, Serialize)]
pub struct SkillProfile {
    pub skills: Vec<String>,
    pub years_experience: Option<String>,
    pub role_suggestions: Vec<String>,
    /// Set only when the completion could not be parsed as JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// First 500 characters of the unparsable completion, for diagnostics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

/// Runs the skill-profile call. Backend errors propagate; parse failures
/// degrade to an annotated empty profile.
pub async fn analyze_skills(
    llm: &dyn TextGenerator,
    resume_text: &str,
) -> Result<SkillProfile, OllamaError> {
    let prompt = SKILL_ANALYSIS_PROMPT_TEMPLATE.replace("{resume_text}", resume_text);
    let completion = llm.generate(&prompt, PROFILE_OPTIONS).await?;

    let extraction = Extraction::from_completion(&completion);
    if extraction.is_degraded() {
        warn!("Skill analysis completion was not parsable JSON, returning defaults");
    }

    Ok(SkillProfile {
        skills: extraction.string_list("skills"),
        years_experience: extraction.optional_string("years_experience"),
        role_suggestions: extraction.string_list("role_suggestions"),
        error: extraction
            .is_degraded()
            .then(|| "Failed to parse LLM response as JSON".to_string()),
        raw_response: extraction.raw_snippet().map(str::to_owned),
    })
}

/// Best-effort skill-name extraction used by the gap and task pipelines.
///
/// Degrades to an empty list on ANY failure, backend errors included: a
/// resume the model cannot read is treated as a resume listing no skills,
/// and the pipeline carries on.
pub async fn extract_skill_names(llm: &dyn TextGenerator, resume_text: &str) -> Vec<String> {
    let prompt = SKILL_EXTRACTION_PROMPT_TEMPLATE.replace("{resume_text}", resume_text);
    match llm.generate(&prompt, EXTRACTION_OPTIONS).await {
        Ok(completion) => {
            let skills = Extraction::from_completion(&completion).string_list("skills");
            debug!("Extracted {} skill names", skills.len());
            skills
        }
        Err(e) => {
            warn!("Skill extraction failed, continuing with no skills: {e}");
            Vec::new()
        }
    }
}
