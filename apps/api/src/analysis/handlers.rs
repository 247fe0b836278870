//! Axum route handlers for the three analysis endpoints.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::analysis::gap::{analyze_skill_gap, SkillGapReport};
use crate::analysis::skills::{analyze_skills, extract_skill_names, SkillProfile};
use crate::analysis::tasks::generate_weekly_tasks;
use crate::errors::AppError;
use crate::resumes::store::resolve_resume_text;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SkillAnalysisRequest {
    pub resume_text: Option<String>,
    pub resume_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SkillGapRequest {
    pub resume_text: Option<String>,
    pub resume_id: Option<String>,
    pub target_role: String,
}

#[derive(Debug, Deserialize)]
pub struct WeeklyTaskRequest {
    pub resume_text: Option<String>,
    pub resume_id: Option<String>,
    pub missing_skills: Option<Vec<String>>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /analyze_skills
///
/// Extracts a structured skill profile from a resume given inline or by id.
pub async fn handle_analyze_skills(
    State(state): State<AppState>,
    Json(request): Json<SkillAnalysisRequest>,
) -> Result<Json<SkillProfile>, AppError> {
    let resume_text = resolve_resume_text(
        &state.store,
        request.resume_id.as_deref(),
        request.resume_text.as_deref(),
    )
    .await?
    .ok_or_else(|| {
        AppError::Validation("Either resume_text or resume_id is required".to_string())
    })?;

    let profile = analyze_skills(&state.ollama, &resume_text).await?;
    Ok(Json(profile))
}

/// POST /skill_gap_analysis
///
/// Compares the resume's skills against a target role and plans weekly
/// tasks for whatever is missing.
pub async fn handle_skill_gap_analysis(
    State(state): State<AppState>,
    Json(request): Json<SkillGapRequest>,
) -> Result<Json<SkillGapReport>, AppError> {
    let target_role = request.target_role.trim();
    if target_role.is_empty() {
        return Err(AppError::Validation(
            "target_role cannot be empty".to_string(),
        ));
    }

    let resume_text = resolve_resume_text(
        &state.store,
        request.resume_id.as_deref(),
        request.resume_text.as_deref(),
    )
    .await?
    .ok_or_else(|| {
        AppError::Validation("Either resume_text or resume_id is required".to_string())
    })?;

    let report = analyze_skill_gap(&state.ollama, &resume_text, target_role).await?;
    Ok(Json(report))
}

/// POST /weekly_learning_task_generator
///
/// With an explicit missing-skills list, plans tasks directly. Without one,
/// only extracts skills from the resume and returns an empty plan: no gap is
/// computed on this path (that stays exclusive to /skill_gap_analysis), so
/// there is nothing to plan tasks against. This is the current API contract.
pub async fn handle_weekly_tasks(
    State(state): State<AppState>,
    Json(request): Json<WeeklyTaskRequest>,
) -> Result<Json<SkillGapReport>, AppError> {
    let missing_skills = clean_skills(request.missing_skills);

    if !missing_skills.is_empty() {
        let weekly_tasks = generate_weekly_tasks(&state.ollama, &missing_skills).await?;
        return Ok(Json(SkillGapReport {
            extracted_skills: Vec::new(),
            missing_skills,
            weekly_tasks,
        }));
    }

    let resume_text = resolve_resume_text(
        &state.store,
        request.resume_id.as_deref(),
        request.resume_text.as_deref(),
    )
    .await?
    .ok_or_else(|| {
        AppError::Validation(
            "Either resume_text, resume_id, or missing_skills must be provided".to_string(),
        )
    })?;

    let extracted_skills = extract_skill_names(&state.ollama, &resume_text).await;

    Ok(Json(SkillGapReport {
        extracted_skills,
        missing_skills: Vec::new(),
        weekly_tasks: Vec::new(),
    }))
}

/// Trims entries and drops blanks; a list of blanks counts as no list.
fn clean_skills(skills: Option<Vec<String>>) -> Vec<String> {
    skills
        .unwrap_or_default()
        .into_iter()
        .map(|skill| skill.trim().to_string())
        .filter(|skill| !skill.is_empty())
        .collect()
}
