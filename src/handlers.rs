use crate::errors::AppError;
use crate::models::{
    AddMistakeRequest, AddTaskRequest, AddTopicRequest, CompletionMark, DailyTasks,
    ExecutionItem, ExecutionLog, ExecutionResponse, LastVideoRequest, LastVideoResponse,
    MistakesResponse, MockRecord, MockResponse, RevisionEntry, RevisionsResponse,
    SaveMockRequest, TasksResponse, ThemeMode, ThemeRequest, ThemeResponse, ToggleRequest,
    WeakResponse, WeakTopicView, WeeklyWeak, LAST_MOCK_KEY, MISTAKES_KEY,
    REVISION_LOG_KEY, THEME_KEY,
};
use crate::period::{self, PeriodKeyed};
use crate::state::AppState;
use crate::stats;
use crate::storage::{self, persist_data, StoreData};
use crate::ui::render_index;
use axum::{
    extract::{Path as UrlPath, State},
    response::Html,
    Json,
};
use chrono::{Local, NaiveDate, Timelike};
use std::path::Path;

/// Rollover-aware load: a record from a past period is replaced and the
/// replacement written through before anything reads it.
async fn load_rolled<T: PeriodKeyed>(
    data_path: &Path,
    data: &mut StoreData,
    today: NaiveDate,
) -> Result<T, AppError> {
    let (record, rolled) = period::load_current::<T>(data, today)?;
    if rolled {
        persist_data(data_path, data).await?;
    }
    Ok(record)
}

/* ---------- page ---------- */

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let today = period::today();
    let countdown = stats::exam_countdown(today);
    let mode = {
        let data = state.data.lock().await;
        storage::get_record::<ThemeMode>(&data, THEME_KEY).unwrap_or(ThemeMode::Auto)
    };
    let effective = mode.resolve(Local::now().hour());
    Html(render_index(&countdown, &period::date_key(today), effective))
}

/* ---------- exam countdown ---------- */

pub async fn get_countdown() -> Json<crate::models::CountdownResponse> {
    Json(stats::exam_countdown(period::today()))
}

/* ---------- today's focus ---------- */

fn tasks_response(tasks: DailyTasks) -> TasksResponse {
    TasksResponse {
        date: tasks.date,
        tasks: tasks.tasks,
        limit: DailyTasks::LIMIT,
    }
}

pub async fn get_tasks(State(state): State<AppState>) -> Result<Json<TasksResponse>, AppError> {
    let today = period::today();
    let mut data = state.data.lock().await;
    let tasks: DailyTasks = load_rolled(&state.data_path, &mut data, today).await?;
    Ok(Json(tasks_response(tasks)))
}

pub async fn add_task(
    State(state): State<AppState>,
    Json(payload): Json<AddTaskRequest>,
) -> Result<Json<TasksResponse>, AppError> {
    let task = payload.task.trim().to_string();
    if task.is_empty() {
        return Err(AppError::bad_request("task text must not be empty"));
    }

    let today = period::today();
    let mut data = state.data.lock().await;
    let mut tasks: DailyTasks = load_rolled(&state.data_path, &mut data, today).await?;
    if !tasks.try_add(task) {
        return Err(AppError::bad_request(
            "only 3 distinct tasks allowed per day",
        ));
    }

    storage::put_record(&mut data, DailyTasks::STORAGE_KEY, &tasks)?;
    persist_data(&state.data_path, &data).await?;

    Ok(Json(tasks_response(tasks)))
}

/* ---------- weekly weak areas ---------- */

fn weak_response(today: NaiveDate, weak: WeeklyWeak) -> WeakResponse {
    let days_passed = stats::days_passed_in_week(today, weak.week_start);
    let days_remaining = 7 - days_passed;
    let topics = weak
        .topics
        .into_iter()
        .map(|topic| {
            let age_days = stats::days_since(today, &topic.added_on);
            WeakTopicView {
                text: topic.text,
                added_on: topic.added_on,
                age_days,
                status: stats::classify_weak_age(age_days),
            }
        })
        .collect();

    WeakResponse {
        week_start: weak.week_start,
        days_passed,
        days_remaining,
        week_status: stats::classify_week(days_remaining),
        topics,
        limit: WeeklyWeak::LIMIT,
    }
}

pub async fn get_weak(State(state): State<AppState>) -> Result<Json<WeakResponse>, AppError> {
    let today = period::today();
    let mut data = state.data.lock().await;
    let weak: WeeklyWeak = load_rolled(&state.data_path, &mut data, today).await?;
    Ok(Json(weak_response(today, weak)))
}

pub async fn add_weak(
    State(state): State<AppState>,
    Json(payload): Json<AddTopicRequest>,
) -> Result<Json<WeakResponse>, AppError> {
    let topic = payload.topic.trim().to_string();
    if topic.is_empty() {
        return Err(AppError::bad_request("topic text must not be empty"));
    }

    let today = period::today();
    let mut data = state.data.lock().await;
    let mut weak: WeeklyWeak = load_rolled(&state.data_path, &mut data, today).await?;
    if !weak.try_add(topic, period::date_key(today)) {
        return Err(AppError::bad_request("maximum 5 weak areas per week"));
    }

    storage::put_record(&mut data, WeeklyWeak::STORAGE_KEY, &weak)?;
    persist_data(&state.data_path, &data).await?;

    Ok(Json(weak_response(today, weak)))
}

/* ---------- revision log ---------- */

fn revisions_response(log: Vec<RevisionEntry>) -> RevisionsResponse {
    RevisionsResponse {
        total: log.len(),
        recent: crate::models::recent_revisions(&log),
    }
}

pub async fn get_revisions(
    State(state): State<AppState>,
) -> Result<Json<RevisionsResponse>, AppError> {
    let data = state.data.lock().await;
    let log: Vec<RevisionEntry> =
        storage::get_record(&data, REVISION_LOG_KEY).unwrap_or_default();
    Ok(Json(revisions_response(log)))
}

pub async fn add_revision(
    State(state): State<AppState>,
    Json(payload): Json<AddTopicRequest>,
) -> Result<Json<RevisionsResponse>, AppError> {
    let topic = payload.topic.trim().to_string();
    if topic.is_empty() {
        return Err(AppError::bad_request("topic text must not be empty"));
    }

    let today = period::today();
    let mut data = state.data.lock().await;
    let mut log: Vec<RevisionEntry> =
        storage::get_record(&data, REVISION_LOG_KEY).unwrap_or_default();
    log.push(RevisionEntry {
        topic,
        date: period::date_key(today),
    });

    storage::put_record(&mut data, REVISION_LOG_KEY, &log)?;
    persist_data(&state.data_path, &data).await?;

    Ok(Json(revisions_response(log)))
}

pub async fn clear_revisions(
    State(state): State<AppState>,
) -> Result<Json<RevisionsResponse>, AppError> {
    let mut data = state.data.lock().await;
    storage::remove_record(&mut data, REVISION_LOG_KEY);
    persist_data(&state.data_path, &data).await?;

    Ok(Json(revisions_response(Vec::new())))
}

/* ---------- mock analysis ---------- */

fn mock_response(today: NaiveDate, record: Option<MockRecord>) -> MockResponse {
    let stale = record
        .as_ref()
        .is_some_and(|mock| stats::mock_is_stale(today, &mock.date));
    MockResponse { record, stale }
}

pub async fn get_mock(State(state): State<AppState>) -> Result<Json<MockResponse>, AppError> {
    let data = state.data.lock().await;
    let record: Option<MockRecord> = storage::get_record(&data, LAST_MOCK_KEY);
    Ok(Json(mock_response(period::today(), record)))
}

pub async fn save_mock(
    State(state): State<AppState>,
    Json(payload): Json<SaveMockRequest>,
) -> Result<Json<MockResponse>, AppError> {
    if payload.score.trim().is_empty() || payload.accuracy.trim().is_empty() {
        return Err(AppError::bad_request("score and accuracy are mandatory"));
    }

    let today = period::today();
    let record = MockRecord {
        score: payload.score.trim().to_string(),
        accuracy: payload.accuracy.trim().to_string(),
        mistakes: payload.mistakes.trim().to_string(),
        fixes: payload.fixes.trim().to_string(),
        date: period::date_key(today),
    };

    let mut data = state.data.lock().await;
    storage::put_record(&mut data, LAST_MOCK_KEY, &record)?;
    persist_data(&state.data_path, &data).await?;

    Ok(Json(mock_response(today, Some(record))))
}

/* ---------- mistake log ---------- */

pub async fn get_mistakes(
    State(state): State<AppState>,
) -> Result<Json<MistakesResponse>, AppError> {
    let data = state.data.lock().await;
    let mistakes: Vec<String> = storage::get_record(&data, MISTAKES_KEY).unwrap_or_default();
    Ok(Json(MistakesResponse { mistakes }))
}

pub async fn add_mistake(
    State(state): State<AppState>,
    Json(payload): Json<AddMistakeRequest>,
) -> Result<Json<MistakesResponse>, AppError> {
    let text = payload.text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::bad_request("mistake text must not be empty"));
    }

    let mut data = state.data.lock().await;
    let mut mistakes: Vec<String> =
        storage::get_record(&data, MISTAKES_KEY).unwrap_or_default();
    mistakes.push(text);

    storage::put_record(&mut data, MISTAKES_KEY, &mistakes)?;
    persist_data(&state.data_path, &data).await?;

    Ok(Json(MistakesResponse { mistakes }))
}

/* ---------- execution log (planned vs executed) ---------- */

fn execution_response(tasks: &DailyTasks, log: &ExecutionLog) -> ExecutionResponse {
    // Only today's planned tasks render; orphaned completions stay stored
    // but invisible.
    let items: Vec<ExecutionItem> = tasks
        .tasks
        .iter()
        .map(|task| {
            let mark: Option<&CompletionMark> = log.mark(task);
            ExecutionItem {
                task: task.clone(),
                done: mark.is_some(),
                time: mark.map(|m| m.time.clone()),
            }
        })
        .collect();

    ExecutionResponse {
        date: log.date.clone(),
        planned: items.len(),
        executed: items.iter().filter(|item| item.done).count(),
        items,
    }
}

pub async fn get_execution(
    State(state): State<AppState>,
) -> Result<Json<ExecutionResponse>, AppError> {
    let today = period::today();
    let mut data = state.data.lock().await;
    let tasks: DailyTasks = load_rolled(&state.data_path, &mut data, today).await?;
    let log: ExecutionLog = load_rolled(&state.data_path, &mut data, today).await?;
    Ok(Json(execution_response(&tasks, &log)))
}

pub async fn toggle_execution(
    State(state): State<AppState>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<ExecutionResponse>, AppError> {
    let today = period::today();
    let mut data = state.data.lock().await;
    let tasks: DailyTasks = load_rolled(&state.data_path, &mut data, today).await?;
    let mut log: ExecutionLog = load_rolled(&state.data_path, &mut data, today).await?;

    if payload.done && !tasks.tasks.contains(&payload.task) {
        return Err(AppError::bad_request("task is not in today's plan"));
    }

    let time = Local::now().format("%H:%M:%S").to_string();
    log.set_done(&payload.task, payload.done, time);

    storage::put_record(&mut data, ExecutionLog::STORAGE_KEY, &log)?;
    persist_data(&state.data_path, &data).await?;

    Ok(Json(execution_response(&tasks, &log)))
}

/* ---------- theme ---------- */

fn theme_response(mode: ThemeMode) -> ThemeResponse {
    ThemeResponse {
        mode,
        effective: mode.resolve(Local::now().hour()),
    }
}

pub async fn get_theme(State(state): State<AppState>) -> Result<Json<ThemeResponse>, AppError> {
    let mut data = state.data.lock().await;
    let mode = match storage::get_record::<ThemeMode>(&data, THEME_KEY) {
        Some(mode) => mode,
        None => {
            // First visit defaults to auto and remembers it.
            storage::put_record(&mut data, THEME_KEY, &ThemeMode::Auto)?;
            persist_data(&state.data_path, &data).await?;
            ThemeMode::Auto
        }
    };

    Ok(Json(theme_response(mode)))
}

pub async fn set_theme(
    State(state): State<AppState>,
    Json(payload): Json<ThemeRequest>,
) -> Result<Json<ThemeResponse>, AppError> {
    let mode = match payload.mode.trim() {
        "light" => ThemeMode::Light,
        "dark" => ThemeMode::Dark,
        "auto" => ThemeMode::Auto,
        _ => {
            return Err(AppError::bad_request(
                "mode must be 'light', 'dark' or 'auto'",
            ))
        }
    };

    let mut data = state.data.lock().await;
    storage::put_record(&mut data, THEME_KEY, &mode)?;
    persist_data(&state.data_path, &data).await?;

    Ok(Json(theme_response(mode)))
}

/* ---------- last watched lecture video ---------- */

pub async fn get_last_video(
    State(state): State<AppState>,
    UrlPath(chapter): UrlPath<String>,
) -> Result<Json<LastVideoResponse>, AppError> {
    let data = state.data.lock().await;
    let video_id: Option<String> =
        storage::get_record(&data, &crate::models::last_video_key(&chapter));
    Ok(Json(LastVideoResponse { chapter, video_id }))
}

pub async fn set_last_video(
    State(state): State<AppState>,
    UrlPath(chapter): UrlPath<String>,
    Json(payload): Json<LastVideoRequest>,
) -> Result<Json<LastVideoResponse>, AppError> {
    let video_id = payload.video_id.trim().to_string();
    if video_id.is_empty() {
        return Err(AppError::bad_request("video_id must not be empty"));
    }

    let mut data = state.data.lock().await;
    storage::put_record(&mut data, &crate::models::last_video_key(&chapter), &video_id)?;
    persist_data(&state.data_path, &data).await?;

    Ok(Json(LastVideoResponse {
        chapter,
        video_id: Some(video_id),
    }))
}
