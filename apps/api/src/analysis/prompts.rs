//! Prompt templates for the analysis pipelines.
//!
//! Each template carries `{placeholder}` slots rendered with `str::replace`
//! before sending. The "Return ONLY valid JSON" instruction is advisory —
//! the extractor still assumes the model ignores it.

/// Skill-profile prompt. Replace `{resume_text}` before sending.
pub const SKILL_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze this resume and extract information. Return ONLY valid JSON, no other text.

Resume:
{resume_text}

Return JSON in this exact format:
{
  "skills": ["skill1", "skill2", ...],
  "years_experience": "X years" or null,
  "role_suggestions": ["role1", "role2", ...]
}"#;

/// Skills-only extraction prompt used by the gap and task pipelines.
/// Replace `{resume_text}` before sending.
pub const SKILL_EXTRACTION_PROMPT_TEMPLATE: &str = r#"Analyze this resume and extract skills. Return ONLY valid JSON.

Resume:
{resume_text}

Return JSON:
{
  "skills": ["skill1", "skill2", ...]
}"#;

/// Gap comparison prompt. Replace `{skills}` (comma-joined, or "None listed")
/// and `{target_role}` before sending.
pub const MISSING_SKILLS_PROMPT_TEMPLATE: &str = r#"Compare the candidate's skills against the target role requirements and identify missing skills.

Candidate's Skills: {skills}
Target Role: {target_role}

Return ONLY valid JSON:
{
  "missing_skills": ["skill1", "skill2", ...]
}"#;

/// Weekly-task prompt. Replace `{missing_skills}` (comma-joined) before
/// sending.
pub const WEEKLY_TASKS_PROMPT_TEMPLATE: &str = r#"Generate 5-7 practical weekly learning tasks for each missing skill. Return ONLY valid JSON.

Missing Skills: {missing_skills}

Return JSON:
{
  "weekly_tasks": [
    {"skill": "skill1", "tasks": ["task1", "task2", "task3", "task4", "task5", "task6", "task7"]},
    {"skill": "skill2", "tasks": ["task1", "task2", "task3", "task4", "task5"]}
  ]
}"#;
