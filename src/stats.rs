//! Derived progress statistics. Everything is recomputed from the skill list
//! on each call.

use serde::Serialize;

use crate::types::Skill;

/// Mean of `progress` over all skills, 0 for an empty list.
pub fn average_progress(skills: &[Skill]) -> f64 {
    if skills.is_empty() {
        return 0.0;
    }
    let sum: u32 = skills.iter().map(|s| u32::from(s.progress)).sum();
    f64::from(sum) / skills.len() as f64
}

pub fn completed_skill_count(skills: &[Skill]) -> usize {
    skills.iter().filter(|s| s.progress == 100).count()
}

/// Highest progress; the first one wins a tie.
pub fn strongest_skill(skills: &[Skill]) -> Option<&Skill> {
    skills.iter().fold(None, |best: Option<&Skill>, skill| match best {
        Some(b) if b.progress >= skill.progress => Some(b),
        _ => Some(skill),
    })
}

/// Lowest progress; the first one wins a tie.
pub fn weakest_skill(skills: &[Skill]) -> Option<&Skill> {
    skills.iter().fold(None, |worst: Option<&Skill>, skill| match worst {
        Some(w) if w.progress <= skill.progress => Some(w),
        _ => Some(skill),
    })
}

/// `(completed, total)` modules across every skill.
pub fn module_completion_totals(skills: &[Skill]) -> (usize, usize) {
    skills.iter().fold((0, 0), |(done, total), s| {
        (done + s.completed_modules(), total + s.total_modules())
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillRow {
    pub name: String,
    pub progress: u8,
    pub completed_modules: usize,
    pub total_modules: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_skills: usize,
    pub average_progress: u8,
    pub completed_skills: usize,
    pub completed_modules: usize,
    pub total_modules: usize,
    pub strongest: Option<String>,
    pub weakest: Option<String>,
    pub skills: Vec<SkillRow>,
}

impl DashboardSummary {
    pub fn from_skills(skills: &[Skill]) -> Self {
        let (completed_modules, total_modules) = module_completion_totals(skills);
        Self {
            total_skills: skills.len(),
            average_progress: average_progress(skills).round() as u8,
            completed_skills: completed_skill_count(skills),
            completed_modules,
            total_modules,
            strongest: strongest_skill(skills).map(|s| s.name.clone()),
            weakest: weakest_skill(skills).map(|s| s.name.clone()),
            skills: skills
                .iter()
                .map(|s| SkillRow {
                    name: s.name.clone(),
                    progress: s.progress,
                    completed_modules: s.completed_modules(),
                    total_modules: s.total_modules(),
                })
                .collect(),
        }
    }
}
