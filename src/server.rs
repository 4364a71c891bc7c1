use std::sync::Arc;
use std::time::Duration;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::{Mutex, mpsc};

use crate::catalog::{CatalogAction, CatalogChange, SkillCatalog};
use crate::coach::{ChatLog, Coach};
use crate::config::Settings;
use crate::detector::{self, GitHubClient};
use crate::error::{ServiceError, ServiceResult, rpc_error};
use crate::goals::{GoalTracker, NewGoal};
use crate::stats::DashboardSummary;
use crate::storage::{self, KeyValueStore};
use crate::timer::{
    RunStatus, SharedTimer, StudyTimer, TimerDriver, TimerEvent, TimerMode, announce_completion,
};
use crate::types::Personality;

const TICK_PERIOD: Duration = Duration::from_secs(1);

// Tool argument types

#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
pub struct ToggleModuleArgs {
    #[serde(rename = "skillId")]
    pub skill_id: String,
    #[serde(rename = "moduleId")]
    pub module_id: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
pub struct AnalyzeArgs {
    /// Repository URL, e.g. https://github.com/owner/repo
    pub url: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
pub struct AskCoachArgs {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<Personality>,
}

#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
pub struct CreateGoalArgs {
    pub title: String,
    pub description: String,
    /// YYYY-MM-DD
    #[serde(rename = "targetDate")]
    pub target_date: String,
    #[serde(default)]
    pub milestones: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
pub struct ToggleMilestoneArgs {
    #[serde(rename = "goalId")]
    pub goal_id: String,
    #[serde(rename = "milestoneId")]
    pub milestone_id: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
pub struct DeleteGoalArgs {
    #[serde(rename = "goalId")]
    pub goal_id: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TimerAction {
    Start,
    Pause,
    Stop,
    Reset,
    Status,
}

#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
pub struct TimerArgs {
    pub action: TimerAction,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimerStatus {
    pub mode: TimerMode,
    pub status: RunStatus,
    pub remaining: String,
    pub remaining_secs: u32,
    pub progress_percent: f64,
    pub sessions_completed: u32,
}

impl From<&StudyTimer> for TimerStatus {
    fn from(timer: &StudyTimer) -> Self {
        Self {
            mode: timer.mode(),
            status: timer.status(),
            remaining: timer.format_remaining(),
            remaining_secs: timer.remaining_secs(),
            progress_percent: timer.progress_percent(),
            sessions_completed: timer.sessions_completed(),
        }
    }
}

/// Persistent state: the catalog and goals plus the store they are written to.
pub struct GardenState {
    catalog: SkillCatalog,
    goals: GoalTracker,
    store: Box<dyn KeyValueStore>,
}

impl GardenState {
    pub fn load(store: Box<dyn KeyValueStore>) -> ServiceResult<Self> {
        let catalog = storage::load_catalog(store.as_ref())?;
        let goals = storage::load_goals(store.as_ref())?;
        Ok(Self {
            catalog,
            goals,
            store,
        })
    }

    pub fn catalog(&self) -> &SkillCatalog {
        &self.catalog
    }

    pub fn goals(&self) -> &GoalTracker {
        &self.goals
    }

    /// Applies a catalog action to a copy, persists it, and only then swaps
    /// it in. On any error the in-memory catalog is unchanged.
    pub fn update_catalog(&mut self, action: CatalogAction) -> ServiceResult<CatalogChange> {
        let mut next = self.catalog.clone();
        let change = next.apply(action)?;
        storage::save_catalog(self.store.as_mut(), &next)?;
        self.catalog = next;
        Ok(change)
    }

    /// Same commit rule as [`GardenState::update_catalog`].
    pub fn update_goals<T>(
        &mut self,
        f: impl FnOnce(&mut GoalTracker) -> ServiceResult<T>,
    ) -> ServiceResult<T> {
        let mut next = self.goals.clone();
        let out = f(&mut next)?;
        storage::save_goals(self.store.as_mut(), &next)?;
        self.goals = next;
        Ok(out)
    }
}

#[derive(Clone)]
pub struct SkillGardenServer {
    state: Arc<Mutex<GardenState>>,
    chat: Arc<Mutex<ChatLog>>,
    coach: Arc<Coach>,
    timer: SharedTimer,
    driver: Arc<Mutex<Option<TimerDriver>>>,
    timer_events: mpsc::UnboundedSender<TimerEvent>,
    github_api_base: String,
    personality: Personality,
    pub tool_router: ToolRouter<SkillGardenServer>,
}

#[tool_router]
impl SkillGardenServer {
    /// Must be called inside a tokio runtime: a task draining timer events is
    /// spawned here.
    pub fn new(settings: &Settings, store: Box<dyn KeyValueStore>) -> ServiceResult<Self> {
        let state = GardenState::load(store)?;
        let coach = Coach::new(settings.coach.latency())?;

        let (timer_events, mut events) = mpsc::unbounded_channel::<TimerEvent>();
        let timer_settings = settings.timer.clone();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                let TimerEvent::Completed {
                    finished,
                    next,
                    sessions_completed,
                } = event;
                tracing::info!(?finished, ?next, sessions_completed, "study period finished");
                if let Err(e) = announce_completion(&event, &timer_settings, &mut std::io::stderr()) {
                    tracing::warn!(error = %e, "completion alert failed");
                }
            }
        });

        Ok(Self {
            state: Arc::new(Mutex::new(state)),
            chat: Arc::new(Mutex::new(ChatLog::default())),
            coach: Arc::new(coach),
            timer: Arc::new(std::sync::Mutex::new(StudyTimer::new(settings.timer.clone()))),
            driver: Arc::new(Mutex::new(None)),
            timer_events,
            github_api_base: settings.github_api_base.clone(),
            personality: settings.coach.personality,
            tool_router: Self::tool_router(),
        })
    }

    #[tool(description = "List every skill in the catalog with its learning modules")]
    async fn list_skills(&self) -> Result<CallToolResult, ErrorData> {
        let state = self.state.lock().await;
        Ok(CallToolResult::success(vec![Content::json(
            state.catalog().skills(),
        )?]))
    }

    #[tool(description = "Flip a learning module's completion and recompute the skill's progress")]
    async fn toggle_module(
        &self,
        Parameters(args): Parameters<ToggleModuleArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        let mut state = self.state.lock().await;
        let change = state
            .update_catalog(CatalogAction::ToggleModule {
                skill_id: args.skill_id,
                module_id: args.module_id,
            })
            .map_err(rpc_error)?;
        match change {
            CatalogChange::Toggled(skill) => Ok(CallToolResult::success(vec![Content::json(skill)?])),
            CatalogChange::Merged(_) => Err(ErrorData::internal_error("unexpected catalog change", None)),
        }
    }

    #[tool(description = "Detect skills from a public GitHub repository and add new ones to the catalog")]
    async fn analyze_repository(
        &self,
        Parameters(args): Parameters<AnalyzeArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        let client = GitHubClient::new(&self.github_api_base);
        let detected = detector::detect_skills_async(client, args.url)
            .await
            .map_err(rpc_error)?;
        let detected_names: Vec<String> = detected.iter().map(|s| s.name.clone()).collect();

        let mut state = self.state.lock().await;
        let added = match state
            .update_catalog(CatalogAction::Merge(detected))
            .map_err(rpc_error)?
        {
            CatalogChange::Merged(added) => added,
            CatalogChange::Toggled(_) => Vec::new(),
        };
        Ok(CallToolResult::success(vec![Content::json(json!({
            "detected": detected_names,
            "added": added,
        }))?]))
    }

    #[tool(description = "Progress summary across the catalog")]
    async fn dashboard(&self) -> Result<CallToolResult, ErrorData> {
        let summary = self.dashboard_summary().await;
        Ok(CallToolResult::success(vec![Content::json(summary)?]))
    }

    #[tool(description = "Ask the skill coach a question; the exchange is recorded in the chat history")]
    async fn ask_coach(
        &self,
        Parameters(args): Parameters<AskCoachArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        let reply = self
            .ask(&args.message, args.personality.unwrap_or(self.personality))
            .await;
        Ok(CallToolResult::success(vec![Content::text(reply)]))
    }

    #[tool(description = "Full conversation with the coach, oldest first")]
    async fn chat_history(&self) -> Result<CallToolResult, ErrorData> {
        let chat = self.chat.lock().await;
        Ok(CallToolResult::success(vec![Content::json(chat.messages())?]))
    }

    #[tool(description = "Clear the conversation back to the greeting")]
    async fn clear_chat(&self) -> Result<CallToolResult, ErrorData> {
        self.chat.lock().await.clear();
        Ok(CallToolResult::success(vec![Content::text("Chat cleared")]))
    }

    #[tool(description = "List learning goals with milestones and progress")]
    async fn list_goals(&self) -> Result<CallToolResult, ErrorData> {
        let state = self.state.lock().await;
        Ok(CallToolResult::success(vec![Content::json(
            state.goals().goals(),
        )?]))
    }

    #[tool(description = "Create a learning goal; title, description and a YYYY-MM-DD target date are required")]
    async fn create_goal(
        &self,
        Parameters(args): Parameters<CreateGoalArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        let input = NewGoal {
            title: args.title,
            description: args.description,
            target_date: args.target_date,
            milestones: args.milestones,
        };
        let mut state = self.state.lock().await;
        let goal = state
            .update_goals(|goals| Ok(goals.create_goal(input)?))
            .map_err(rpc_error)?;
        Ok(CallToolResult::success(vec![Content::json(goal)?]))
    }

    #[tool(description = "Flip a milestone's completion and recompute the goal's progress")]
    async fn toggle_milestone(
        &self,
        Parameters(args): Parameters<ToggleMilestoneArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        let mut state = self.state.lock().await;
        let goal = state
            .update_goals(|goals| Ok(goals.toggle_milestone(&args.goal_id, &args.milestone_id)?.clone()))
            .map_err(rpc_error)?;
        Ok(CallToolResult::success(vec![Content::json(goal)?]))
    }

    #[tool(description = "Delete a goal by id; unknown ids are ignored")]
    async fn delete_goal(
        &self,
        Parameters(args): Parameters<DeleteGoalArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        let mut state = self.state.lock().await;
        let removed = state
            .update_goals(|goals| Ok(goals.delete_goal(&args.goal_id)))
            .map_err(rpc_error)?;
        Ok(CallToolResult::success(vec![Content::json(json!({
            "removed": removed,
        }))?]))
    }

    #[tool(description = "Control the study timer: start, pause, stop, reset or status")]
    async fn timer(&self, Parameters(args): Parameters<TimerArgs>) -> Result<CallToolResult, ErrorData> {
        let status = self.timer_action(args.action).await.map_err(rpc_error)?;
        Ok(CallToolResult::success(vec![Content::json(status)?]))
    }
}

impl SkillGardenServer {
    pub async fn dashboard_summary(&self) -> DashboardSummary {
        DashboardSummary::from_skills(self.state.lock().await.catalog().skills())
    }

    /// Runs one coach exchange against a snapshot of the catalog.
    pub async fn ask(&self, message: &str, personality: Personality) -> String {
        let skills = self.state.lock().await.catalog().skills().to_vec();
        let mut chat = self.chat.lock().await;
        self.coach
            .converse(&mut chat, message, &skills, personality)
            .await
            .content
            .clone()
    }

    pub async fn timer_action(&self, action: TimerAction) -> ServiceResult<TimerStatus> {
        let mut driver = self.driver.lock().await;
        {
            let mut timer = self.lock_timer()?;
            match action {
                TimerAction::Start => timer.start(),
                TimerAction::Pause => timer.pause(),
                TimerAction::Stop => timer.stop(),
                TimerAction::Reset => timer.reset(),
                TimerAction::Status => {}
            }
        }

        match action {
            TimerAction::Start => {
                if driver.as_ref().is_none_or(|d| d.is_finished()) {
                    *driver = Some(TimerDriver::spawn(
                        self.timer.clone(),
                        TICK_PERIOD,
                        self.timer_events.clone(),
                    ));
                }
            }
            TimerAction::Pause | TimerAction::Stop | TimerAction::Reset => {
                if let Some(d) = driver.take() {
                    d.shutdown().await;
                }
            }
            TimerAction::Status => {}
        }

        let timer = self.lock_timer()?;
        Ok(TimerStatus::from(&*timer))
    }

    fn lock_timer(&self) -> ServiceResult<std::sync::MutexGuard<'_, StudyTimer>> {
        self.timer
            .lock()
            .map_err(|_| ServiceError::Other("timer lock poisoned".to_string()))
    }
}

#[tool_handler]
impl rmcp::ServerHandler for SkillGardenServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Skill garden: track skills and learning modules, detect skills from GitHub \
                 repositories, chat with the coach, manage goals and run a study timer."
                    .to_string(),
            ),
        }
    }
}
