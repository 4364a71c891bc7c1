//! Learning goals with milestone checklists.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ulid::Ulid;

use crate::types::percentage;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GoalError {
    #[error("Goal title must not be empty")]
    EmptyTitle,
    #[error("Goal description must not be empty")]
    EmptyDescription,
    #[error("Invalid target date '{0}', expected YYYY-MM-DD")]
    InvalidTargetDate(String),
    #[error("Goal not found: {0}")]
    GoalNotFound(String),
    #[error("Milestone not found: {0}")]
    MilestoneNotFound(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub title: String,
    pub completed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningGoal {
    pub id: String,
    pub title: String,
    pub description: String,
    pub target_date: NaiveDate,
    progress: u8,
    pub milestones: Vec<Milestone>,
}

impl LearningGoal {
    /// Percentage of milestones completed; 0 for a goal without milestones.
    pub fn progress(&self) -> u8 {
        self.progress
    }

    fn recompute_progress(&mut self) {
        let done = self.milestones.iter().filter(|m| m.completed).count();
        self.progress = percentage(done, self.milestones.len());
    }

    /// Whole days until the target date; negative once it has passed.
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.target_date - today).num_days()
    }
}

/// Input for [`GoalTracker::create_goal`]. Blank milestone titles are dropped.
#[derive(Clone, Debug, Default)]
pub struct NewGoal {
    pub title: String,
    pub description: String,
    pub target_date: String,
    pub milestones: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalTracker {
    goals: Vec<LearningGoal>,
}

impl GoalTracker {
    pub fn goals(&self) -> &[LearningGoal] {
        &self.goals
    }

    pub fn get(&self, goal_id: &str) -> Option<&LearningGoal> {
        self.goals.iter().find(|g| g.id == goal_id)
    }

    pub fn create_goal(&mut self, input: NewGoal) -> Result<LearningGoal, GoalError> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(GoalError::EmptyTitle);
        }
        let description = input.description.trim();
        if description.is_empty() {
            return Err(GoalError::EmptyDescription);
        }
        let target_date = NaiveDate::parse_from_str(input.target_date.trim(), "%Y-%m-%d")
            .map_err(|_| GoalError::InvalidTargetDate(input.target_date.clone()))?;

        let id = Ulid::new().to_string();
        let milestones = input
            .milestones
            .iter()
            .map(|m| m.trim())
            .filter(|m| !m.is_empty())
            .enumerate()
            .map(|(index, title)| Milestone {
                id: format!("{id}-{index}"),
                title: title.to_string(),
                completed: false,
            })
            .collect();

        let goal = LearningGoal {
            id,
            title: title.to_string(),
            description: description.to_string(),
            target_date,
            progress: 0,
            milestones,
        };
        tracing::info!(goal = %goal.title, milestones = goal.milestones.len(), "goal created");
        self.goals.push(goal.clone());
        Ok(goal)
    }

    pub fn toggle_milestone(
        &mut self,
        goal_id: &str,
        milestone_id: &str,
    ) -> Result<&LearningGoal, GoalError> {
        let goal = self
            .goals
            .iter_mut()
            .find(|g| g.id == goal_id)
            .ok_or_else(|| GoalError::GoalNotFound(goal_id.to_string()))?;
        let milestone = goal
            .milestones
            .iter_mut()
            .find(|m| m.id == milestone_id)
            .ok_or_else(|| GoalError::MilestoneNotFound(milestone_id.to_string()))?;

        milestone.completed = !milestone.completed;
        goal.recompute_progress();
        Ok(&*goal)
    }

    /// Removes a goal. Returns whether anything was removed; unknown ids are
    /// not an error.
    pub fn delete_goal(&mut self, goal_id: &str) -> bool {
        let before = self.goals.len();
        self.goals.retain(|g| g.id != goal_id);
        let removed = self.goals.len() != before;
        if removed {
            tracing::info!(%goal_id, "goal deleted");
        }
        removed
    }
}
