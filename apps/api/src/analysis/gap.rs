//! Skill-gap pipeline: extract the candidate's skills, compare them against
//! a target role, then plan weekly tasks for whatever is missing.
//!
//! Flow: extract_skill_names → missing-skills call → generate_weekly_tasks.
//! The first stage degrades to "no skills" on any failure; the second
//! propagates backend errors but degrades on unparsable completions; the
//! third runs only when something is actually missing.

use serde::Serialize;
use tracing::info;

use crate::analysis::extract::Extraction;
use crate::analysis::prompts::MISSING_SKILLS_PROMPT_TEMPLATE;
use crate::analysis::skills::extract_skill_names;
use crate::analysis::tasks::{generate_weekly_tasks, TaskGroup};
use crate::ollama::{GenerateOptions, OllamaError, TextGenerator};

const GAP_OPTIONS: GenerateOptions = GenerateOptions {
    temperature: 0.3,
    num_predict: 600,
};

/// Final result of the gap pipeline; also the response shape of the
/// standalone weekly-task generator.
#[derive(Debug, Clone, Serialize)]
pub struct SkillGapReport {
    pub extracted_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub weekly_tasks: Vec<TaskGroup>,
}

fn build_gap_prompt(extracted_skills: &[String], target_role: &str) -> String {
    let skills = if extracted_skills.is_empty() {
        "None listed".to_string()
    } else {
        extracted_skills.join(", ")
    };
    MISSING_SKILLS_PROMPT_TEMPLATE
        .replace("{skills}", &skills)
        .replace("{target_role}", target_role)
}

pub async fn analyze_skill_gap(
    llm: &dyn TextGenerator,
    resume_text: &str,
    target_role: &str,
) -> Result<SkillGapReport, OllamaError> {
    let extracted_skills = extract_skill_names(llm, resume_text).await;
    info!("Extracted {} skills from resume", extracted_skills.len());

    let prompt = build_gap_prompt(&extracted_skills, target_role);
    let completion = llm.generate(&prompt, GAP_OPTIONS).await?;
    let missing_skills = Extraction::from_completion(&completion).string_list("missing_skills");
    info!(
        "Identified {} missing skills for target role '{target_role}'",
        missing_skills.len()
    );

    let weekly_tasks = if missing_skills.is_empty() {
        Vec::new()
    } else {
        generate_weekly_tasks(llm, &missing_skills).await?
    };

    Ok(SkillGapReport {
        extracted_skills,
        missing_skills,
        weekly_tasks,
    })
}
