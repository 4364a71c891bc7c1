use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{ConfigError, Settings, default_data_dir};
use crate::metadata::{PKG_DESCRIPTION, PKG_NAME, PKG_VERSION};
use crate::types::Personality;

#[derive(Parser, Debug, Clone)]
#[command(name = PKG_NAME)]
#[command(version = PKG_VERSION)]
#[command(about = PKG_DESCRIPTION, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Directory holding settings.json and store.json
    #[arg(long, global = true, env = "SKILL_GARDEN_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Base URL of the GitHub REST API (overrides settings.json)
    #[arg(long, global = true, env = "SKILL_GARDEN_GITHUB_API")]
    pub github_api: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the MCP server on stdio
    Serve,
    /// Detect skills in a GitHub repository and add them to the catalog
    Analyze {
        /// Repository URL, e.g. https://github.com/owner/repo
        url: String,
    },
    /// Print the progress dashboard
    Stats,
    /// Ask the coach a single question
    Ask {
        message: String,
        /// friendly, professional, motivational or technical
        #[arg(long, value_parser = parse_personality)]
        personality: Option<Personality>,
    },
    /// Open an interactive config editor for settings.json
    Config,
    /// Print version information
    Version,
}

fn parse_personality(value: &str) -> Result<Personality, String> {
    value.parse()
}

impl GlobalArgs {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    /// Flag and environment overrides on top of the loaded settings. The
    /// result is validated again since overrides bypass `Settings::load`.
    pub fn apply(&self, settings: &mut Settings) -> Result<(), ConfigError> {
        if let Some(api) = &self.github_api {
            settings.github_api_base = api.trim().to_string();
        }
        settings.validate()
    }
}

pub const BAR_WIDTH: usize = 20;

/// `#`/`.` bar for a progress percentage; values above 100 render full.
pub fn progress_bar(progress: u8) -> String {
    let filled = usize::from(progress.min(100)) * BAR_WIDTH / 100;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn ask_parses_personality() {
        let cli = Cli::try_parse_from([
            "skill-garden",
            "ask",
            "how am i doing",
            "--personality",
            "Technical",
        ])
        .unwrap();
        match cli.command {
            Command::Ask {
                message,
                personality,
            } => {
                assert_eq!(message, "how am i doing");
                assert_eq!(personality, Some(Personality::Technical));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn unknown_personality_is_rejected() {
        assert!(
            Cli::try_parse_from(["skill-garden", "ask", "hi", "--personality", "grumpy"]).is_err()
        );
    }

    #[test]
    fn github_api_flag_overrides_settings() {
        let cli = Cli::try_parse_from([
            "skill-garden",
            "--github-api",
            "http://localhost:9000",
            "stats",
        ])
        .unwrap();
        let mut settings = Settings::default();
        cli.global.apply(&mut settings).unwrap();
        assert_eq!(settings.github_api_base, "http://localhost:9000");
    }

    #[test]
    fn empty_github_api_override_is_rejected() {
        let cli = Cli::try_parse_from(["skill-garden", "--github-api", "", "stats"]).unwrap();
        let mut settings = Settings::default();
        assert!(matches!(
            cli.global.apply(&mut settings),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn progress_bar_clamps_out_of_range_values() {
        assert_eq!(progress_bar(0), ".".repeat(BAR_WIDTH));
        assert_eq!(progress_bar(45), format!("{}{}", "#".repeat(9), ".".repeat(11)));
        assert_eq!(progress_bar(100), "#".repeat(BAR_WIDTH));
        assert_eq!(progress_bar(255), "#".repeat(BAR_WIDTH));
    }
}
