use crate::period::{self, Granularity, PeriodKey, PeriodKeyed};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/* ---------- stored records (field names are the persisted shapes) ---------- */

/// `dailyTasks`: up to three task descriptions planned for one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyTasks {
    pub date: String,
    pub tasks: Vec<String>,
}

impl DailyTasks {
    pub const LIMIT: usize = 3;

    /// Appends a task; returns `false` (set unchanged) when the daily cap is
    /// reached. Duplicate text is refused because the execution log keys
    /// completions by task text.
    pub fn try_add(&mut self, task: String) -> bool {
        if self.tasks.len() >= Self::LIMIT || self.tasks.contains(&task) {
            return false;
        }
        self.tasks.push(task);
        true
    }
}

impl PeriodKeyed for DailyTasks {
    const STORAGE_KEY: &'static str = "dailyTasks";
    const GRANULARITY: Granularity = Granularity::Daily;

    fn period_key(&self) -> PeriodKey {
        PeriodKey::Day(self.date.clone())
    }

    fn fresh(today: NaiveDate) -> Self {
        Self {
            date: period::date_key(today),
            tasks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeakTopic {
    pub text: String,
    #[serde(rename = "addedOn")]
    pub added_on: String,
}

/// `weeklyWeak`: up to five weak areas, discarded wholesale each Sunday.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyWeak {
    #[serde(rename = "weekStart")]
    pub week_start: i64,
    pub topics: Vec<WeakTopic>,
}

impl WeeklyWeak {
    pub const LIMIT: usize = 5;

    pub fn try_add(&mut self, text: String, added_on: String) -> bool {
        if self.topics.len() >= Self::LIMIT {
            return false;
        }
        self.topics.push(WeakTopic { text, added_on });
        true
    }
}

impl PeriodKeyed for WeeklyWeak {
    const STORAGE_KEY: &'static str = "weeklyWeak";
    const GRANULARITY: Granularity = Granularity::Weekly;

    fn period_key(&self) -> PeriodKey {
        PeriodKey::WeekStart(self.week_start)
    }

    fn fresh(today: NaiveDate) -> Self {
        Self {
            week_start: period::week_start_millis(today),
            topics: Vec::new(),
        }
    }
}

/// `revisionLog` entry; the log itself is a bare JSON array, append-only,
/// cleared only on explicit request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionEntry {
    pub topic: String,
    pub date: String,
}

pub const REVISION_LOG_KEY: &str = "revisionLog";
pub const RECENT_REVISIONS: usize = 5;

/// Most recent entries first, capped for display.
pub fn recent_revisions(log: &[RevisionEntry]) -> Vec<RevisionEntry> {
    log.iter().rev().take(RECENT_REVISIONS).cloned().collect()
}

/// `lastMock`: the single most recent mock-exam analysis, overwritten on save.
/// Score and accuracy stay strings to match the stored shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockRecord {
    pub score: String,
    pub accuracy: String,
    pub mistakes: String,
    pub fixes: String,
    pub date: String,
}

pub const LAST_MOCK_KEY: &str = "lastMock";
pub const MISTAKES_KEY: &str = "mistakes";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionMark {
    pub time: String,
}

/// `executionLog`: which of today's planned tasks were actually done, keyed by
/// task text. Entries whose task left the plan are orphaned, never rendered
/// and never pruned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionLog {
    pub date: String,
    pub completed: BTreeMap<String, CompletionMark>,
}

impl ExecutionLog {
    pub fn set_done(&mut self, task: &str, done: bool, time: String) {
        if done {
            self.completed
                .insert(task.to_string(), CompletionMark { time });
        } else {
            self.completed.remove(task);
        }
    }

    pub fn mark(&self, task: &str) -> Option<&CompletionMark> {
        self.completed.get(task)
    }
}

impl PeriodKeyed for ExecutionLog {
    const STORAGE_KEY: &'static str = "executionLog";
    const GRANULARITY: Granularity = Granularity::Daily;

    fn period_key(&self) -> PeriodKey {
        PeriodKey::Day(self.date.clone())
    }

    fn fresh(today: NaiveDate) -> Self {
        Self {
            date: period::date_key(today),
            completed: BTreeMap::new(),
        }
    }
}

/// `gate-theme` preference. `Auto` resolves from the local hour: 19:00-05:59
/// is dark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    Auto,
}

impl ThemeMode {
    pub fn resolve(self, hour: u32) -> ThemeMode {
        match self {
            ThemeMode::Auto => {
                if hour >= 19 || hour < 6 {
                    ThemeMode::Dark
                } else {
                    ThemeMode::Light
                }
            }
            fixed => fixed,
        }
    }
}

pub const THEME_KEY: &str = "gate-theme";

pub fn last_video_key(chapter: &str) -> String {
    format!("last-video-{chapter}")
}

/* ---------- request payloads ---------- */

#[derive(Debug, Deserialize)]
pub struct AddTaskRequest {
    pub task: String,
}

#[derive(Debug, Deserialize)]
pub struct AddTopicRequest {
    pub topic: String,
}

#[derive(Debug, Deserialize)]
pub struct AddMistakeRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveMockRequest {
    pub score: String,
    pub accuracy: String,
    #[serde(default)]
    pub mistakes: String,
    #[serde(default)]
    pub fixes: String,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub task: String,
    pub done: bool,
}

#[derive(Debug, Deserialize)]
pub struct ThemeRequest {
    pub mode: String,
}

#[derive(Debug, Deserialize)]
pub struct LastVideoRequest {
    pub video_id: String,
}

/* ---------- responses ---------- */

#[derive(Debug, Serialize, Deserialize)]
pub struct TasksResponse {
    pub date: String,
    pub tasks: Vec<String>,
    pub limit: usize,
}

#[derive(Debug, Serialize)]
pub struct WeakTopicView {
    pub text: String,
    pub added_on: String,
    pub age_days: i64,
    pub status: crate::stats::WeakStatus,
}

#[derive(Debug, Serialize)]
pub struct WeakResponse {
    pub week_start: i64,
    pub days_passed: i64,
    pub days_remaining: i64,
    pub week_status: crate::stats::WeekStatus,
    pub topics: Vec<WeakTopicView>,
    pub limit: usize,
}

#[derive(Debug, Serialize)]
pub struct RevisionsResponse {
    pub total: usize,
    pub recent: Vec<RevisionEntry>,
}

#[derive(Debug, Serialize)]
pub struct MockResponse {
    pub record: Option<MockRecord>,
    pub stale: bool,
}

#[derive(Debug, Serialize)]
pub struct MistakesResponse {
    pub mistakes: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExecutionItem {
    pub task: String,
    pub done: bool,
    pub time: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExecutionResponse {
    pub date: String,
    pub planned: usize,
    pub executed: usize,
    pub items: Vec<ExecutionItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThemeResponse {
    pub mode: ThemeMode,
    pub effective: ThemeMode,
}

#[derive(Debug, Serialize)]
pub struct LastVideoResponse {
    pub chapter: String,
    pub video_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CountdownResponse {
    pub start_date: String,
    pub end_date: String,
    pub total_days: i64,
    pub passed_days: i64,
    pub days_left: i64,
    pub progress_percent: i64,
}
