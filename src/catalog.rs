//! The shared skill catalog and its single writer path.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::detector::templates;
use crate::types::Skill;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Skill not found: {0}")]
    SkillNotFound(String),
    #[error("Module not found: {0}")]
    ModuleNotFound(String),
}

/// Every mutation the catalog accepts.
#[derive(Debug, Clone)]
pub enum CatalogAction {
    ToggleModule { skill_id: String, module_id: String },
    /// Appends skills whose names are not in the catalog yet.
    Merge(Vec<Skill>),
}

/// What an applied action changed.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogChange {
    Toggled(Skill),
    Merged(Vec<Skill>),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillCatalog {
    skills: Vec<Skill>,
}

const DEFAULT_SKILLS: [&str; 3] = ["React", "TypeScript", "CSS"];

impl SkillCatalog {
    pub fn new(skills: Vec<Skill>) -> Self {
        Self { skills }
    }

    /// First-run catalog: a UI framework, a typed language and a styling
    /// language, five open modules each.
    pub fn with_defaults() -> Self {
        let skills = DEFAULT_SKILLS
            .iter()
            .filter_map(|name| templates::by_name(name))
            .map(|t| t.instantiate())
            .collect();
        Self { skills }
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn get(&self, skill_id: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.id == skill_id)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.skills.iter().any(|s| s.is_named(name))
    }

    pub fn apply(&mut self, action: CatalogAction) -> Result<CatalogChange, CatalogError> {
        match action {
            CatalogAction::ToggleModule {
                skill_id,
                module_id,
            } => self.toggle_module(&skill_id, &module_id),
            CatalogAction::Merge(candidates) => Ok(self.merge(candidates)),
        }
    }

    fn toggle_module(
        &mut self,
        skill_id: &str,
        module_id: &str,
    ) -> Result<CatalogChange, CatalogError> {
        let skill = self
            .skills
            .iter_mut()
            .find(|s| s.id == skill_id)
            .ok_or_else(|| CatalogError::SkillNotFound(skill_id.to_string()))?;
        let module = skill
            .learning_modules
            .iter_mut()
            .find(|m| m.id == module_id)
            .ok_or_else(|| CatalogError::ModuleNotFound(module_id.to_string()))?;

        module.completed = !module.completed;
        skill.progress = skill.checklist_progress();
        tracing::debug!(skill = %skill.name, progress = skill.progress, "module toggled");
        Ok(CatalogChange::Toggled(skill.clone()))
    }

    fn merge(&mut self, candidates: Vec<Skill>) -> CatalogChange {
        let mut added = Vec::new();
        for skill in candidates {
            if self.contains_name(&skill.name) {
                continue;
            }
            added.push(skill.clone());
            self.skills.push(skill);
        }
        tracing::info!(added = added.len(), total = self.skills.len(), "catalog merged");
        CatalogChange::Merged(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SkillIcon;

    fn toggle(catalog: &mut SkillCatalog, skill: usize, module: usize) -> Skill {
        let s = &catalog.skills()[skill];
        let action = CatalogAction::ToggleModule {
            skill_id: s.id.clone(),
            module_id: s.learning_modules[module].id.clone(),
        };
        match catalog.apply(action).unwrap() {
            CatalogChange::Toggled(skill) => skill,
            other => panic!("unexpected change {other:?}"),
        }
    }

    #[test]
    fn defaults_hold_three_five_module_skills() {
        let catalog = SkillCatalog::with_defaults();
        let names: Vec<_> = catalog.skills().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["React", "TypeScript", "CSS"]);
        assert!(catalog.skills().iter().all(|s| s.total_modules() == 5));
    }

    #[test]
    fn toggling_keeps_progress_in_step_with_modules() {
        let mut catalog = SkillCatalog::with_defaults();
        assert_eq!(toggle(&mut catalog, 0, 0).progress, 20);
        assert_eq!(toggle(&mut catalog, 0, 3).progress, 40);
        assert_eq!(toggle(&mut catalog, 0, 0).progress, 20);

        let mut odd = SkillCatalog::new(vec![Skill::new(
            "Odd",
            "",
            "",
            SkillIcon::Code,
            &["a", "b", "c"],
        )]);
        assert_eq!(toggle(&mut odd, 0, 0).progress, 33);
        assert_eq!(toggle(&mut odd, 0, 1).progress, 67);
        assert_eq!(toggle(&mut odd, 0, 2).progress, 100);
    }

    #[test]
    fn toggling_unknown_ids_errors() {
        let mut catalog = SkillCatalog::with_defaults();
        let err = catalog
            .apply(CatalogAction::ToggleModule {
                skill_id: "missing".into(),
                module_id: "x".into(),
            })
            .unwrap_err();
        assert_eq!(err, CatalogError::SkillNotFound("missing".into()));

        let skill_id = catalog.skills()[0].id.clone();
        let err = catalog
            .apply(CatalogAction::ToggleModule {
                skill_id,
                module_id: "x".into(),
            })
            .unwrap_err();
        assert_eq!(err, CatalogError::ModuleNotFound("x".into()));
    }

    #[test]
    fn merge_skips_names_already_present_case_insensitively() {
        let mut catalog = SkillCatalog::with_defaults();
        let mut css = templates::by_name("CSS").unwrap().instantiate();
        css.name = "css".to_string();
        let rust = templates::by_name("Rust").unwrap().instantiate();

        let change = catalog.apply(CatalogAction::Merge(vec![css, rust])).unwrap();
        match change {
            CatalogChange::Merged(added) => {
                assert_eq!(added.len(), 1);
                assert_eq!(added[0].name, "Rust");
            }
            other => panic!("unexpected change {other:?}"),
        }
        assert_eq!(catalog.len(), 4);
        assert!(catalog.contains_name("RUST"));
    }

    #[test]
    fn catalog_serializes_as_plain_list() {
        let catalog = SkillCatalog::with_defaults();
        let json = serde_json::to_value(&catalog).unwrap();
        assert!(json.is_array());
        let back: SkillCatalog = serde_json::from_value(json).unwrap();
        assert_eq!(back, catalog);
    }
}
