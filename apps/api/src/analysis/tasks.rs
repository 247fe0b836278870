//! Weekly learning-task generation: the shared third stage of the gap
//! pipeline and the standalone generator endpoint.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::analysis::extract::Extraction;
use crate::analysis::prompts::WEEKLY_TASKS_PROMPT_TEMPLATE;
use crate::ollama::{GenerateOptions, OllamaError, TextGenerator};

const TASK_OPTIONS: GenerateOptions = GenerateOptions {
    temperature: 0.5,
    num_predict: 1500,
};

/// Upper bound on tasks per skill. Model output is truncated to this; the
/// fallback plan always fills it exactly.
pub const MAX_TASKS_PER_SKILL: usize = 7;

/// One skill's weekly study plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskGroup {
    pub skill: String,
    pub tasks: Vec<String>,
}

/// Deterministic seven-task study plan for one skill, used whenever the
/// model yields no usable task list for it. Pure, no I/O.
pub fn fallback_tasks(skill: &str) -> Vec<String> {
    vec![
        format!("Study {skill} fundamentals and core concepts"),
        format!("Complete online {skill} tutorial or course"),
        format!("Practice {skill} with hands-on exercises"),
        format!("Build a small project using {skill}"),
        format!("Read {skill} documentation and best practices"),
        format!("Join {skill} community and participate in discussions"),
        format!("Create a portfolio piece showcasing {skill}"),
    ]
}

/// Reads `weekly_tasks` groups out of an extraction, tolerantly: entries
/// must be objects with a string `skill`; non-string tasks are skipped, a
/// missing task array counts as empty.
fn model_task_groups(extraction: &Extraction) -> Vec<TaskGroup> {
    let Some(groups) = extraction.field("weekly_tasks").and_then(Value::as_array) else {
        return Vec::new();
    };

    groups
        .iter()
        .filter_map(|group| {
            let skill = group.get("skill")?.as_str()?.to_string();
            let tasks = group
                .get("tasks")
                .and_then(Value::as_array)
                .map(|tasks| {
                    tasks
                        .iter()
                        .filter_map(|task| task.as_str().map(str::to_owned))
                        .collect()
                })
                .unwrap_or_default();
            Some(TaskGroup { skill, tasks })
        })
        .collect()
}

/// Produces exactly one group per requested skill, in request order.
///
/// The first model group matching the skill (case-insensitive) wins when it
/// carries at least one task, truncated to [`MAX_TASKS_PER_SKILL`]; anything
/// else is backfilled with the fallback plan. Groups for skills nobody asked
/// about are dropped.
pub fn reconcile_task_groups(
    missing_skills: &[String],
    model_groups: Vec<TaskGroup>,
) -> Vec<TaskGroup> {
    missing_skills
        .iter()
        .map(|skill| {
            let matched = model_groups
                .iter()
                .find(|group| group.skill.eq_ignore_ascii_case(skill));
            match matched {
                Some(group) if !group.tasks.is_empty() => TaskGroup {
                    skill: skill.clone(),
                    tasks: group
                        .tasks
                        .iter()
                        .take(MAX_TASKS_PER_SKILL)
                        .cloned()
                        .collect(),
                },
                _ => TaskGroup {
                    skill: skill.clone(),
                    tasks: fallback_tasks(skill),
                },
            }
        })
        .collect()
}

/// Runs the task-generation call and reconciles the result.
///
/// Timeout, unreachable-backend, and other transport errors abort. An error
/// status, unreadable body, or unparsable completion degrades to the
/// fallback plan for every skill, so the stage never returns an empty
/// result for a non-empty request.
pub async fn generate_weekly_tasks(
    llm: &dyn TextGenerator,
    missing_skills: &[String],
) -> Result<Vec<TaskGroup>, OllamaError> {
    let prompt = WEEKLY_TASKS_PROMPT_TEMPLATE.replace("{missing_skills}", &missing_skills.join(", "));

    let model_groups = match llm.generate(&prompt, TASK_OPTIONS).await {
        Ok(completion) => model_task_groups(&Extraction::from_completion(&completion)),
        Err(
            err @ (OllamaError::Timeout
            | OllamaError::Unreachable(_)
            | OllamaError::Transport(_)),
        ) => return Err(err),
        Err(e) => {
            warn!("Task generation failed, falling back to template plans: {e}");
            Vec::new()
        }
    };

    Ok(reconcile_task_groups(missing_skills, model_groups))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::testing::{api_error, ScriptedGenerator};

    fn skills(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn group(skill: &str, tasks: &[&str]) -> TaskGroup {
        TaskGroup {
            skill: skill.to_string(),
            tasks: tasks.iter().map(|t| t.to_string()).collect(),
        }
    }

    // ── fallback_tasks ──────────────────────────────────────────────────────

    #[test]
    fn test_fallback_is_exactly_seven_tasks_naming_the_skill() {
        let tasks = fallback_tasks("Kubernetes");
        assert_eq!(tasks.len(), MAX_TASKS_PER_SKILL);
        assert!(tasks.iter().all(|task| task.contains("Kubernetes")));
    }

    #[test]
    fn test_fallback_is_deterministic() {
        assert_eq!(fallback_tasks("Go"), fallback_tasks("Go"));
    }

    // ── reconcile_task_groups ───────────────────────────────────────────────

    #[test]
    fn test_reconcile_keeps_model_tasks_in_request_order() {
        let groups = vec![group("Go", &["tour"]), group("Rust", &["book"])];
        let result = reconcile_task_groups(&skills(&["Rust", "Go"]), groups);
        assert_eq!(result[0], group("Rust", &["book"]));
        assert_eq!(result[1], group("Go", &["tour"]));
    }

    #[test]
    fn test_reconcile_matches_skill_names_case_insensitively() {
        let groups = vec![group("kubernetes", &["read the docs"])];
        let result = reconcile_task_groups(&skills(&["Kubernetes"]), groups);
        assert_eq!(result[0].skill, "Kubernetes");
        assert_eq!(result[0].tasks, ["read the docs"]);
    }

    #[test]
    fn test_reconcile_truncates_overlong_task_lists() {
        let ten_tasks: Vec<&str> = vec!["t"; 10];
        let groups = vec![group("Go", &ten_tasks)];
        let result = reconcile_task_groups(&skills(&["Go"]), groups);
        assert_eq!(result[0].tasks.len(), MAX_TASKS_PER_SKILL);
    }

    #[test]
    fn test_reconcile_backfills_absent_skill_with_fallback() {
        let groups = vec![group("Go", &["tour"])];
        let result = reconcile_task_groups(&skills(&["Go", "Terraform"]), groups);
        assert_eq!(result[1].skill, "Terraform");
        assert_eq!(result[1].tasks, fallback_tasks("Terraform"));
    }

    #[test]
    fn test_reconcile_backfills_empty_model_group() {
        let groups = vec![group("Go", &[])];
        let result = reconcile_task_groups(&skills(&["Go"]), groups);
        assert_eq!(result[0].tasks, fallback_tasks("Go"));
    }

    #[test]
    fn test_reconcile_drops_extraneous_model_groups() {
        let groups = vec![group("Go", &["tour"]), group("COBOL", &["why"])];
        let result = reconcile_task_groups(&skills(&["Go"]), groups);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].skill, "Go");
    }

    #[test]
    fn test_reconcile_first_matching_group_wins() {
        let groups = vec![group("Go", &["first"]), group("Go", &["second"])];
        let result = reconcile_task_groups(&skills(&["Go"]), groups);
        assert_eq!(result[0].tasks, ["first"]);
    }

    #[test]
    fn test_reconcile_empty_request_is_empty() {
        assert!(reconcile_task_groups(&[], vec![group("Go", &["tour"])]).is_empty());
    }

    // ── generate_weekly_tasks ───────────────────────────────────────────────

    #[tokio::test]
    async fn test_generate_keeps_model_plan_and_backfills_the_rest() {
        let llm = ScriptedGenerator::replying(&[
            r#"{"weekly_tasks": [{"skill": "Go", "tasks": ["Read the Go tour", "Write a CLI"]}]}"#,
        ]);

        let result = generate_weekly_tasks(&llm, &skills(&["Go", "Kubernetes"]))
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].tasks, ["Read the Go tour", "Write a CLI"]);
        assert_eq!(result[1].tasks, fallback_tasks("Kubernetes"));
        assert!(llm.prompts()[0].contains("Go, Kubernetes"));
    }

    #[tokio::test]
    async fn test_generate_falls_back_entirely_on_backend_error_status() {
        let llm = ScriptedGenerator::new(vec![Err(api_error())]);

        let result = generate_weekly_tasks(&llm, &skills(&["Kubernetes"]))
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].skill, "Kubernetes");
        assert_eq!(result[0].tasks, fallback_tasks("Kubernetes"));
    }

    #[tokio::test]
    async fn test_generate_falls_back_on_unparsable_completion() {
        let llm = ScriptedGenerator::replying(&["Sorry, I can't produce JSON today."]);

        let result = generate_weekly_tasks(&llm, &skills(&["Go"])).await.unwrap();

        assert_eq!(result[0].tasks.len(), MAX_TASKS_PER_SKILL);
    }

    #[tokio::test]
    async fn test_generate_tolerates_malformed_groups() {
        let llm = ScriptedGenerator::replying(&[
            r#"{"weekly_tasks": [{"tasks": ["orphan"]}, {"skill": "Go", "tasks": ["tour", 42]}, "junk"]}"#,
        ]);

        let result = generate_weekly_tasks(&llm, &skills(&["Go"])).await.unwrap();

        assert_eq!(result[0].tasks, ["tour"]);
    }

    #[tokio::test]
    async fn test_generate_propagates_timeout() {
        let llm = ScriptedGenerator::new(vec![Err(OllamaError::Timeout)]);
        let result = generate_weekly_tasks(&llm, &skills(&["Go"])).await;
        assert!(matches!(result, Err(OllamaError::Timeout)));
    }

    #[tokio::test]
    async fn test_generate_propagates_unreachable() {
        let llm =
            ScriptedGenerator::new(vec![Err(OllamaError::Unreachable("refused".to_string()))]);
        let result = generate_weekly_tasks(&llm, &skills(&["Go"])).await;
        assert!(matches!(result, Err(OllamaError::Unreachable(_))));
    }

    #[tokio::test]
    async fn test_generate_propagates_transport_errors() {
        // A request-builder error stands in for a transport failure; no
        // network involved.
        let err = reqwest::Client::new()
            .get("not a url")
            .send()
            .await
            .unwrap_err();
        let llm = ScriptedGenerator::new(vec![Err(OllamaError::Transport(err))]);

        let result = generate_weekly_tasks(&llm, &skills(&["Go"])).await;
        assert!(matches!(result, Err(OllamaError::Transport(_))));
    }
}
