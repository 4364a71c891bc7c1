//! Response templates, looked up by intent and personality.

use crate::stats;
use crate::types::{Personality, Skill};

use super::intent::Intent;
use super::phrases::PhraseSource;

const NOT_AVAILABLE: &str = "N/A";
const ALL_COMPLETE: &str = "all modules complete";

/// Progress band a mentioned skill falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkillBand {
    /// `[0, 30)`
    Beginner,
    /// `[30, 70)`
    Intermediate,
    /// `[70, 100)`
    Advanced,
    /// exactly 100
    Mastery,
}

impl SkillBand {
    pub fn for_progress(progress: u8) -> Self {
        match progress {
            0..30 => SkillBand::Beginner,
            30..70 => SkillBand::Intermediate,
            70..100 => SkillBand::Advanced,
            _ => SkillBand::Mastery,
        }
    }
}

fn openers(personality: Personality) -> &'static [&'static str] {
    match personality {
        Personality::Friendly => &[
            "Hey there!",
            "Great question!",
            "Happy to help!",
            "Love that you're asking about",
        ],
        Personality::Professional => &[
            "Glad to assist with",
            "Based on industry practice,",
            "From a professional standpoint,",
            "Here is an overview of",
        ],
        Personality::Motivational => &[
            "You're doing amazing!",
            "Love the enthusiasm!",
            "Keep pushing forward!",
            "You've got this!",
        ],
        Personality::Technical => &[
            "Technical breakdown for",
            "From an engineering standpoint,",
            "Analyzing requirements for",
            "Let's get into the details of",
        ],
    }
}

fn advanced_topic(skill_name: &str) -> &'static str {
    match skill_name {
        "JavaScript" => "functional patterns and advanced async flows",
        "TypeScript" => "conditional types and generic constraints",
        "React" => "custom hooks, memoization and concurrent rendering",
        "React with TypeScript" => "generic components and type inference",
        "CSS" => "container queries, advanced animation and modern layout",
        "HTML" => "web components and accessibility patterns",
        "Python" => "decorators, metaclasses and asyncio",
        "Java" => "concurrency and JVM tuning",
        "Go" => "goroutines, channels and service design",
        "Ruby" => "metaprogramming and DSLs",
        "PHP" => "design patterns and framework internals",
        "Rust" => "lifetimes, unsafe code and systems programming",
        "Swift" => "protocol-oriented design and SwiftUI",
        "C#" => "LINQ, async and modern .NET",
        "C++" => "template metaprogramming and modern C++",
        _ => "architecture patterns and system design",
    }
}

/// Renders the reply for an already classified message.
pub fn render(
    intent: Intent,
    skills: &[Skill],
    personality: Personality,
    phrases: &mut dyn PhraseSource,
) -> String {
    match intent {
        Intent::SkillMention(index) => match skills.get(index) {
            Some(skill) => skill_reply(skill, personality, phrases),
            None => default_reply(personality),
        },
        Intent::CodeHelp => code_help_reply(personality),
        Intent::Career => career_reply(skills, personality),
        Intent::Project => project_reply(personality),
        Intent::Motivation => motivation_reply(personality),
        Intent::Learning => learning_reply(personality),
        Intent::Progress => progress_reply(skills, personality),
        Intent::Default => default_reply(personality),
    }
}

fn skill_reply(skill: &Skill, personality: Personality, phrases: &mut dyn PhraseSource) -> String {
    let name = &skill.name;
    let progress = skill.progress;
    let done = skill.completed_modules();
    let total = skill.total_modules();
    let left = total - done;
    let next = skill.next_module().map_or(ALL_COMPLETE, |m| m.title.as_str());

    match (SkillBand::for_progress(progress), personality) {
        (SkillBand::Beginner, p) => {
            let list = openers(p);
            let opener = list[phrases.pick(list.len())];
            match p {
                Personality::Friendly => format!(
                    "{opener} {name} is a great pick. You're at {progress}% with {done}/{total} modules done, and everyone starts somewhere!\n\n\
                     **Getting started:**\n1. Begin with \"{next}\"\n2. Set aside 20-30 minutes a day\n3. Celebrate the small wins\n\n\
                     What part of {name} interests you most?"
                ),
                Personality::Professional => format!(
                    "{opener} {name}. Current completion is {progress}% ({done}/{total} modules).\n\n\
                     **Recommended path:**\n- Foundation: {next}\n- Timeline: 4-6 weeks to basic proficiency\n- Outcome: marketable, demonstrable skills\n\n\
                     Would you like a curriculum with milestones?"
                ),
                Personality::Motivational => format!(
                    "{opener} {name} is going to be an incredible journey!\n\n\
                     You're at {progress}% with {done}/{total} modules done. Start with \"{next}\" and you'll nail it.\n\
                     Every expert was once a beginner. Say it with me: \"I can master {name}!\""
                ),
                Personality::Technical => format!(
                    "{opener} {name}.\n\n```\nstatus:   {progress}% ({done}/{total} modules)\nnext:     {next}\nscope:    core syntax, tooling, debugging basics\n```\n\n\
                     Prerequisites: basic programming. Want hands-on exercises for {name}?"
                ),
            }
        }
        (SkillBand::Intermediate, Personality::Friendly) => format!(
            "You're making great progress with {name}! {done}/{total} modules done ({progress}%).\n\n\
             **Next up:** \"{next}\"\n\nTake breaks, practice right away, and revisit earlier modules when needed. \
             How are you feeling about it so far?"
        ),
        (SkillBand::Intermediate, Personality::Professional) => format!(
            "Your {name} progress is on track at {progress}% ({done}/{total} modules).\n\n\
             **Status report:**\n- Completed: {done}\n- Remaining: {left}\n- Level: developing proficiency\n\n\
             Recommendation: focus on \"{next}\" next."
        ),
        (SkillBand::Intermediate, Personality::Motivational) => format!(
            "YOU'RE CRUSHING IT! {progress}% through {name} with {done} of {total} modules down!\n\n\
             Next challenge: \"{next}\". You're past the beginner stage, keep that momentum going!"
        ),
        (SkillBand::Intermediate, Personality::Technical) => format!(
            "{name} progress analysis:\n\n```\ncompletion: {progress}%\nmodules:    {done}/{total}\nnext:       {next}\n```\n\n\
             At this stage, consolidate with a small project. Want a code review of what you've built?"
        ),
        (SkillBand::Advanced, Personality::Friendly) => format!(
            "You're so close to mastering {name}! At {progress}% you're in the home stretch \
             with {done}/{total} modules done and only {left} left.\n\n\
             Up next: \"{next}\". Time to build something you're proud of!"
        ),
        (SkillBand::Advanced, Personality::Professional) => format!(
            "Excellent progress in {name}: {progress}% complete, {done}/{total} modules.\n\n\
             **Next steps:**\n1. Finish \"{next}\" and the remaining {left} module(s)\n2. Build 2-3 portfolio projects\n3. Prepare for technical interviews"
        ),
        (SkillBand::Advanced, Personality::Motivational) => format!(
            "INCREDIBLE! {progress}% done with {name}, {done}/{total} modules conquered!\n\n\
             Final stretch: \"{next}\" and {left} more to go. You're practically an expert already!"
        ),
        (SkillBand::Advanced, Personality::Technical) => format!(
            "{name} status: {progress}% (advanced)\n\n```\nmodules:  {done}/{total}\nnext:     {next}\nfocus:    performance, testing, architecture\n```\n\n\
             Ready for system design scenarios?"
        ),
        (SkillBand::Mastery, p) => {
            let topic = advanced_topic(name);
            match p {
                Personality::Friendly => format!(
                    "CONGRATULATIONS! You've mastered {name}! {progress}% with {done}/{total} modules ({next}).\n\n\
                     Ideas for what's next: teach someone, write about your journey, or explore {topic}."
                ),
                Personality::Professional => format!(
                    "Congratulations on completing {name} ({progress}%, {done}/{total} modules, {next}).\n\n\
                     Recommended specialization: {topic}. Consider mentoring and senior-level roles."
                ),
                Personality::Motivational => format!(
                    "CHAMPION ALERT! You CONQUERED {name}! {progress}% and {done}/{total} modules, {next}!\n\n\
                     Your next mission: {topic}. You're a {name} MASTER!"
                ),
                Personality::Technical => format!(
                    "{name} mastery: ACHIEVED\n\n```\ncompletion: {progress}%\nmodules:    {done}/{total} ({next})\n```\n\n\
                     Deep specialization pathway: {topic}."
                ),
            }
        }
    }
}

fn code_help_reply(personality: Personality) -> String {
    match personality {
        Personality::Friendly => "I'd love to help with a code review! Paste your code and I'll point out bugs, \
             readability wins and performance tips. Which language are you using?"
            .to_string(),
        Personality::Professional => "I can review your code for quality, performance, security and conventions. \
             Please share it along with some context on its purpose."
            .to_string(),
        Personality::Motivational => "YES! Code reviews are where developers level up. Bring on that code and let's make it shine!"
            .to_string(),
        Personality::Technical => "Code review checklist:\n\n```\n- syntax and structure\n- algorithmic complexity\n- error handling\n- security patterns\n- test coverage\n```\n\n\
             Provide the code, language and specific concerns."
            .to_string(),
    }
}

fn career_reply(skills: &[Skill], personality: Personality) -> String {
    let average = stats::average_progress(skills).round();
    let strongest = stats::strongest_skill(skills).map_or(NOT_AVAILABLE, |s| s.name.as_str());
    let weakest = stats::weakest_skill(skills).map_or(NOT_AVAILABLE, |s| s.name.as_str());
    let count = skills.len();

    match personality {
        Personality::Friendly => format!(
            "Career talk is one of my favorite topics! Your skills sit at {average}% average progress.\n\n\
             Paths to explore: frontend, full-stack, or general software engineering. \
             Practice coding challenges and prepare stories about your projects. What interests you most?"
        ),
        Personality::Professional => {
            let position = if average > 70.0 { "Competitive" } else { "Developing" };
            format!(
                "**Career assessment:**\n- Current level: {average}% skill development\n- Market position: {position}\n\
                 - Strongest skill: {strongest}\n- Growth area: {weakest}\n\n\
                 Would you like guidance on your resume, interviews, or long-term planning?"
            )
        }
        Personality::Motivational => format!(
            "YOUR CAREER IS ABOUT TO TAKE OFF! {average}% average skill progress shows real dedication.\n\n\
             Skills + passion + persistence = unstoppable. Companies need developers like you!"
        ),
        Personality::Technical => format!(
            "Career profile:\n\n```\nskills:      {count}\nproficiency: {average}%\nstrongest:   {strongest}\nweakest:     {weakest}\n```\n\n\
             Prepare data structures, system design and 3-5 substantial portfolio projects."
        ),
    }
}

fn project_reply(personality: Personality) -> String {
    match personality {
        Personality::Friendly => "Project time! Try a portfolio site, a weather app on a public API, \
             or a real-time chat. Which sounds most fun?"
            .to_string(),
        Personality::Professional => "Focus on 3-4 high-quality projects: a responsive web app, an API integration, \
             and a full-stack app with authentication, each with clean code and documentation."
            .to_string(),
        Personality::Motivational => "PROJECT TIME = DREAM BUILDING TIME! Build something you'd actually use. \
             Imperfect action beats perfect inaction!"
            .to_string(),
        Personality::Technical => "Project tiers:\n\n```\nL1: CRUD + basic UI\nL2: real-time features, state management\nL3: services, scaling, CI/CD\n```\n\n\
             Include error handling, logging and tests at every tier."
            .to_string(),
    }
}

fn motivation_reply(personality: Personality) -> String {
    match personality {
        Personality::Friendly => "I totally get it, learning to code can feel overwhelming. Struggling means you're growing. \
             Take a break, celebrate small wins, and tell me what's bothering you most."
            .to_string(),
        Personality::Professional => "Obstacles are a normal part of professional growth. Break the problem into components, \
             use several resources, and keep a consistent schedule. Which challenge should we tackle first?"
            .to_string(),
        Personality::Motivational => "You are NOT stuck, you're at a BREAKTHROUGH POINT! Every error message is teaching you something. \
             What's one small thing you can finish right now?"
            .to_string(),
        Personality::Technical => "Debugging the plateau:\n\n1. Isolate the concept causing trouble\n2. Read two or three different explanations\n\
             3. Build a minimal working example\n4. Increase complexity step by step"
            .to_string(),
    }
}

fn learning_reply(personality: Personality) -> String {
    match personality {
        Personality::Friendly => "Learning tips are my specialty! Try 25-minute focus blocks with 5-minute breaks, \
             test yourself instead of re-reading, and code a little every day."
            .to_string(),
        Personality::Professional => "Evidence-based methods: deliberate practice with feedback, interleaving topics, \
             spaced repetition, and measurable weekly objectives."
            .to_string(),
        Personality::Motivational => "LEARNING IS YOUR SUPERPOWER! Consistency beats intensity: 30 minutes daily \
             beats 5 hours once a week. Never give up on yourself!"
            .to_string(),
        Personality::Technical => "Learning pipeline:\n\n```\ninput:  multiple sources, concept maps\nmemory: active practice, spaced repetition\noutput: implementation, teaching others\n```"
            .to_string(),
    }
}

fn progress_reply(skills: &[Skill], personality: Personality) -> String {
    let average = stats::average_progress(skills).round();
    let completed = stats::completed_skill_count(skills);
    let count = skills.len();
    let strongest = stats::strongest_skill(skills).map_or(NOT_AVAILABLE, |s| s.name.as_str());
    let weakest = stats::weakest_skill(skills).map_or(NOT_AVAILABLE, |s| s.name.as_str());
    let (done_modules, total_modules) = stats::module_completion_totals(skills);
    let verdict = if average >= 70.0 {
        "You're doing AMAZING and well on your way!"
    } else if average >= 40.0 {
        "Great progress, you're building solid foundations."
    } else {
        "You're just getting started, and that's perfectly fine."
    };

    match personality {
        Personality::Friendly => format!(
            "Let's check your progress!\n\n- Overall: {average}% across {count} skills\n- Mastered: {completed}\n\
             - Strongest: {strongest}\n\n{verdict}"
        ),
        Personality::Professional => format!(
            "**Progress assessment:**\n- Overall completion: {average}%\n- Skills mastered: {completed}/{count}\n\
             - Modules: {done_modules}/{total_modules}\n- Strongest: {strongest}\n- Priority: {weakest}\n\n{verdict}"
        ),
        Personality::Motivational => format!(
            "PROGRESS CELEBRATION! {average}% overall, {completed} skills mastered, {count} in your garden. \
             Champion skill: {strongest}!\n\n{verdict}"
        ),
        Personality::Technical => format!(
            "```\nefficiency: {average}%\nmastered:   {completed}/{count}\nmodules:    {done_modules}/{total_modules}\nprimary:    {strongest}\nbacklog:    {weakest}\n```\n\n{verdict}"
        ),
    }
}

fn default_reply(personality: Personality) -> String {
    match personality {
        Personality::Friendly => "Hi there! I'm your skill coach. Ask me about a skill you're learning, \
             study tips, project ideas, career advice, or a code review!"
            .to_string(),
        Personality::Professional => "Welcome. I provide learning plans, career guidance, technical review and portfolio advice. \
             How may I assist with your development objectives today?"
            .to_string(),
        Personality::Motivational => "WELCOME TO YOUR SUCCESS JOURNEY! Tell me your biggest coding dream and let's make it happen!"
            .to_string(),
        Personality::Technical => "Coach ready. Supported queries: skill status, learning strategy, code review, \
             project scoping, career planning. Awaiting input."
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coach::phrases::FixedPhrase;
    use crate::types::SkillIcon;

    fn skill_at(name: &str, done: usize) -> Skill {
        let mut skill = Skill::new(name, "", "", SkillIcon::Code, &["m1", "m2", "m3", "m4", "m5"]);
        for m in skill.learning_modules.iter_mut().take(done) {
            m.completed = true;
        }
        skill.progress = skill.checklist_progress();
        skill
    }

    #[test]
    fn bands_split_on_thirty_seventy_and_hundred() {
        assert_eq!(SkillBand::for_progress(0), SkillBand::Beginner);
        assert_eq!(SkillBand::for_progress(29), SkillBand::Beginner);
        assert_eq!(SkillBand::for_progress(30), SkillBand::Intermediate);
        assert_eq!(SkillBand::for_progress(69), SkillBand::Intermediate);
        assert_eq!(SkillBand::for_progress(70), SkillBand::Advanced);
        assert_eq!(SkillBand::for_progress(99), SkillBand::Advanced);
        assert_eq!(SkillBand::for_progress(100), SkillBand::Mastery);
    }

    #[test]
    fn every_band_and_personality_reports_skill_facts() {
        for done in 0..=5 {
            let skill = skill_at("Rust", done);
            let next = skill
                .next_module()
                .map_or(ALL_COMPLETE.to_string(), |m| m.title.clone());
            for p in Personality::ALL {
                let out = render(Intent::SkillMention(0), std::slice::from_ref(&skill), p, &mut FixedPhrase(0));
                assert!(out.contains("Rust"), "{p}/{done}: {out}");
                assert!(out.contains(&format!("{}%", skill.progress)), "{p}/{done}: {out}");
                assert!(out.contains(&format!("{done}/5")) || out.contains(&format!("{done} of 5")), "{p}/{done}: {out}");
                assert!(out.contains(&next), "{p}/{done}: {out}");
            }
        }
    }

    #[test]
    fn beginner_opener_comes_from_phrase_source() {
        let skill = skill_at("Go", 0);
        let out = render(
            Intent::SkillMention(0),
            &[skill],
            Personality::Motivational,
            &mut FixedPhrase(3),
        );
        assert!(out.starts_with("You've got this!"));
    }

    #[test]
    fn mastery_mentions_advanced_topic() {
        let out = render(
            Intent::SkillMention(0),
            &[skill_at("Rust", 5)],
            Personality::Professional,
            &mut FixedPhrase(0),
        );
        assert!(out.contains("lifetimes, unsafe code"));
        assert!(out.contains(ALL_COMPLETE));
    }

    #[test]
    fn catalog_wide_replies_handle_empty_catalog() {
        for intent in [Intent::Career, Intent::Progress] {
            for p in Personality::ALL {
                let out = render(intent, &[], p, &mut FixedPhrase(0));
                assert!(!out.is_empty());
                assert!(out.contains("0%"), "{p}: {out}");
            }
        }
        let out = render(Intent::Career, &[], Personality::Technical, &mut FixedPhrase(0));
        assert!(out.contains("strongest:   N/A"));
    }

    #[test]
    fn progress_reply_interpolates_catalog_stats() {
        let skills = [skill_at("HTML", 5), skill_at("CSS", 1)];
        let out = render(Intent::Progress, &skills, Personality::Professional, &mut FixedPhrase(0));
        assert!(out.contains("Overall completion: 60%"));
        assert!(out.contains("Skills mastered: 1/2"));
        assert!(out.contains("Modules: 6/10"));
        assert!(out.contains("Strongest: HTML"));
        assert!(out.contains("Priority: CSS"));
    }

    #[test]
    fn stale_skill_index_falls_back_to_default() {
        let out = render(Intent::SkillMention(3), &[], Personality::Friendly, &mut FixedPhrase(0));
        assert_eq!(out, default_reply(Personality::Friendly));
    }
}
