//! Message classification: free text in, intent tag out.

use regex::Regex;

use crate::types::Skill;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Index of the mentioned skill in catalog order.
    SkillMention(usize),
    CodeHelp,
    Career,
    Project,
    Motivation,
    Learning,
    Progress,
    Default,
}

struct IntentRule {
    intent: Intent,
    pattern: Regex,
}

/// Keyword rules evaluated in priority order after the skill check.
pub struct IntentClassifier {
    rules: Vec<IntentRule>,
}

const RULES: &[(Intent, &str)] = &[
    (Intent::CodeHelp, r"code review|review code"),
    (Intent::Career, r"career|job|interview"),
    (Intent::Project, r"project|build|portfolio"),
    (Intent::Motivation, r"motivation|stuck|difficult"),
    (Intent::Learning, r"learn|study|tips"),
    (Intent::Progress, r"progress|how am i doing"),
];

impl IntentClassifier {
    pub fn new() -> Result<Self, regex::Error> {
        let rules = RULES
            .iter()
            .map(|(intent, keywords)| {
                Ok(IntentRule {
                    intent: *intent,
                    pattern: Regex::new(&format!("(?i){keywords}"))?,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { rules })
    }

    /// First match wins: a mentioned skill, then the keyword rules, then
    /// [`Intent::Default`].
    pub fn classify(&self, message: &str, skills: &[Skill]) -> Intent {
        if let Some(index) = mentioned_skill(message, skills) {
            return Intent::SkillMention(index);
        }
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(message))
            .map(|rule| rule.intent)
            .unwrap_or(Intent::Default)
    }
}

/// A skill counts as mentioned when the message contains its full name or the
/// first word of it, case-insensitively.
fn mentioned_skill(message: &str, skills: &[Skill]) -> Option<usize> {
    let message = message.to_lowercase();
    skills.iter().position(|skill| {
        let name = skill.name.trim().to_lowercase();
        if name.is_empty() {
            return false;
        }
        let first_word = name.split_whitespace().next().unwrap_or(&name);
        message.contains(&name) || message.contains(first_word)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SkillIcon;

    fn skills(names: &[&str]) -> Vec<Skill> {
        names
            .iter()
            .map(|n| Skill::new(*n, "", "", SkillIcon::Code, &["m"]))
            .collect()
    }

    fn classify(message: &str, names: &[&str]) -> Intent {
        IntentClassifier::new()
            .unwrap()
            .classify(message, &skills(names))
    }

    #[test]
    fn skill_mention_beats_keywords() {
        assert_eq!(
            classify("How is my React going?", &["CSS", "React"]),
            Intent::SkillMention(1)
        );
        assert_eq!(
            classify("career tips for typescript", &["TypeScript"]),
            Intent::SkillMention(0)
        );
    }

    #[test]
    fn first_word_of_multi_word_name_matches() {
        assert_eq!(
            classify("what about react hooks", &["React with TypeScript"]),
            Intent::SkillMention(0)
        );
    }

    #[test]
    fn first_skill_in_catalog_order_wins() {
        assert_eq!(
            classify("html and css", &["CSS", "HTML"]),
            Intent::SkillMention(0)
        );
    }

    #[test]
    fn keyword_priority_is_fixed() {
        assert_eq!(classify("please review code for my job", &[]), Intent::CodeHelp);
        assert_eq!(classify("give me career advice", &[]), Intent::Career);
        assert_eq!(classify("what should I build for an interview", &[]), Intent::Career);
        assert_eq!(classify("portfolio ideas", &[]), Intent::Project);
        assert_eq!(classify("I'm stuck, learning is hard", &[]), Intent::Motivation);
        assert_eq!(classify("study TIPS please", &[]), Intent::Learning);
        assert_eq!(classify("How am I doing?", &[]), Intent::Progress);
        assert_eq!(classify("hello there", &[]), Intent::Default);
    }

    #[test]
    fn blank_skill_names_never_match() {
        assert_eq!(classify("anything", &["  "]), Intent::Default);
    }
}
