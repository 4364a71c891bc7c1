use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// One checklist item under a [`Skill`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningModule {
    pub id: String,
    pub title: String,
    pub completed: bool,
}

/// Icon a skill is rendered with. Resolved to a glyph at compile time instead
/// of looking names up in an icon library at render time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillIcon {
    #[default]
    Code,
    FileCode,
    Paintbrush,
    Coffee,
    Gem,
    Hash,
}

impl SkillIcon {
    pub fn glyph(&self) -> &'static str {
        match self {
            SkillIcon::Code => "</>",
            SkillIcon::FileCode => "{ }",
            SkillIcon::Paintbrush => "~",
            SkillIcon::Coffee => "c[_]",
            SkillIcon::Gem => "<>",
            SkillIcon::Hash => "#",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Percentage in `[0, 100]`, kept in step with the module checklist by
    /// the catalog's update path.
    pub progress: u8,
    pub color: String,
    pub icon: SkillIcon,
    pub learning_modules: Vec<LearningModule>,
}

impl Skill {
    /// Builds a fresh skill at zero progress with every module open.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        color: impl Into<String>,
        icon: SkillIcon,
        module_titles: &[&str],
    ) -> Self {
        let id = Ulid::new().to_string();
        let learning_modules = module_titles
            .iter()
            .enumerate()
            .map(|(index, title)| LearningModule {
                id: format!("{id}-{index}"),
                title: (*title).to_string(),
                completed: false,
            })
            .collect();
        Self {
            id,
            name: name.into(),
            description: description.into(),
            progress: 0,
            color: color.into(),
            icon,
            learning_modules,
        }
    }

    pub fn completed_modules(&self) -> usize {
        self.learning_modules.iter().filter(|m| m.completed).count()
    }

    pub fn total_modules(&self) -> usize {
        self.learning_modules.len()
    }

    /// First module in checklist order that is still open.
    pub fn next_module(&self) -> Option<&LearningModule> {
        self.learning_modules.iter().find(|m| !m.completed)
    }

    /// `round(100 * completed / total)`, or 0 for a skill without modules.
    pub fn checklist_progress(&self) -> u8 {
        percentage(self.completed_modules(), self.total_modules())
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Rounded completion percentage with the empty case pinned to zero.
pub fn percentage(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((done as f64 * 100.0) / total as f64).round() as u8
}

/// Response style the coach renders its templates in.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    #[default]
    Friendly,
    Professional,
    Motivational,
    Technical,
}

impl Personality {
    pub const ALL: [Personality; 4] = [
        Personality::Friendly,
        Personality::Professional,
        Personality::Motivational,
        Personality::Technical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Personality::Friendly => "friendly",
            Personality::Professional => "professional",
            Personality::Motivational => "motivational",
            Personality::Technical => "technical",
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Personality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "friendly" => Ok(Personality::Friendly),
            "professional" => Ok(Personality::Professional),
            "motivational" => Ok(Personality::Motivational),
            "technical" => Ok(Personality::Technical),
            _ => Err(format!("Unknown personality: {s}")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(sender: Sender, content: impl Into<String>) -> Self {
        Self {
            id: Ulid::new().to_string(),
            content: content.into(),
            sender,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_skill_starts_untouched() {
        let skill = Skill::new("Go", "desc", "teal", SkillIcon::FileCode, &["a", "b", "c"]);
        assert_eq!(skill.progress, 0);
        assert_eq!(skill.total_modules(), 3);
        assert!(skill.learning_modules.iter().all(|m| !m.completed));
        assert_eq!(skill.learning_modules[2].id, format!("{}-2", skill.id));
        assert_eq!(skill.next_module().map(|m| m.title.as_str()), Some("a"));
    }

    #[test]
    fn percentage_rounds_and_guards_zero() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(5, 5), 100);
    }

    #[test]
    fn personality_parses_case_insensitively() {
        assert_eq!("Technical".parse::<Personality>(), Ok(Personality::Technical));
        assert!("grumpy".parse::<Personality>().is_err());
        assert_eq!(Personality::Motivational.to_string(), "motivational");
    }
}
