use clap::Parser;
use colored::Colorize;
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};
use rmcp::{ServiceExt, transport::stdio};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skill_garden::catalog::{CatalogAction, CatalogChange};
use skill_garden::cli::{Cli, Command, progress_bar};
use skill_garden::coach::{ChatLog, Coach};
use skill_garden::config::Settings;
use skill_garden::detector::{self, GitHubClient};
use skill_garden::error::{ServiceError, ServiceResult};
use skill_garden::metadata::{PKG_NAME, PKG_VERSION};
use skill_garden::server::{GardenState, SkillGardenServer};
use skill_garden::stats::DashboardSummary;
use skill_garden::storage::JsonFileStore;
use skill_garden::types::Personality;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout belongs to the MCP transport
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let data_dir = cli.global.data_dir();
    let mut settings = Settings::load(&data_dir)?;
    cli.global.apply(&mut settings)?;

    match cli.command {
        Command::Serve => serve(&settings).await?,
        Command::Analyze { url } => analyze(&settings, url).await?,
        Command::Stats => stats(&settings)?,
        Command::Ask {
            message,
            personality,
        } => ask(&settings, &message, personality).await?,
        Command::Config => edit_config(settings)?,
        Command::Version => println!("{PKG_NAME} {PKG_VERSION}"),
    }
    Ok(())
}

fn open_state(settings: &Settings) -> ServiceResult<GardenState> {
    let store = JsonFileStore::open(&settings.data_dir)?;
    GardenState::load(Box::new(store))
}

async fn serve(settings: &Settings) -> ServiceResult<()> {
    let store = JsonFileStore::open(&settings.data_dir)?;
    tracing::info!(store = %store.path().display(), "Starting {PKG_NAME} MCP server on stdio");

    let service = SkillGardenServer::new(settings, Box::new(store))?;
    let running = service
        .serve(stdio())
        .await
        .map_err(|e| ServiceError::Other(e.to_string()))?;
    running
        .waiting()
        .await
        .map_err(|e| ServiceError::Other(e.to_string()))?;
    Ok(())
}

async fn analyze(settings: &Settings, url: String) -> ServiceResult<()> {
    let mut state = open_state(settings)?;
    let client = GitHubClient::new(&settings.github_api_base);
    let detected = detector::detect_skills_async(client, url).await?;

    if detected.is_empty() {
        println!("{}", "No known languages detected.".yellow());
        return Ok(());
    }
    let names: Vec<&str> = detected.iter().map(|s| s.name.as_str()).collect();
    println!("{} {}", "Detected:".bold(), names.join(", "));

    let added = match state.update_catalog(CatalogAction::Merge(detected))? {
        CatalogChange::Merged(added) => added,
        CatalogChange::Toggled(_) => Vec::new(),
    };
    if added.is_empty() {
        println!("{}", "Every detected skill is already in the catalog.".dimmed());
    }
    for skill in added {
        println!("  {} {} {}", "+".green(), skill.icon.glyph(), skill.name.green());
    }
    Ok(())
}

fn stats(settings: &Settings) -> ServiceResult<()> {
    let state = open_state(settings)?;
    let summary = DashboardSummary::from_skills(state.catalog().skills());

    println!("{}", "Skill garden".bold());
    println!(
        "  {} skills, {}% average, {} mastered, {}/{} modules",
        summary.total_skills,
        summary.average_progress,
        summary.completed_skills,
        summary.completed_modules,
        summary.total_modules
    );
    if let (Some(strongest), Some(weakest)) = (&summary.strongest, &summary.weakest) {
        println!("  strongest: {}  weakest: {}", strongest.green(), weakest.yellow());
    }
    println!();
    for row in &summary.skills {
        let bar = progress_bar(row.progress);
        let bar = match row.progress.min(100) {
            100 => bar.green(),
            70..=99 => bar.cyan(),
            30..=69 => bar.yellow(),
            _ => bar.normal(),
        };
        println!(
            "  {:<24} [{}] {:>3}% ({}/{})",
            row.name, bar, row.progress, row.completed_modules, row.total_modules
        );
    }

    let today = chrono::Local::now().date_naive();
    let goals = state.goals().goals();
    if !goals.is_empty() {
        println!("\n{}", "Goals".bold());
    }
    for goal in goals {
        println!(
            "  {:<32} {:>3}%  {} days left",
            goal.title,
            goal.progress(),
            goal.days_remaining(today)
        );
    }
    Ok(())
}

async fn ask(
    settings: &Settings,
    message: &str,
    personality: Option<Personality>,
) -> ServiceResult<()> {
    let state = open_state(settings)?;
    let coach = Coach::new(settings.coach.latency())?;
    let mut log = ChatLog::default();
    let personality = personality.unwrap_or(settings.coach.personality);

    let reply = coach
        .converse(&mut log, message, state.catalog().skills(), personality)
        .await;
    println!("{}\n", format!("coach ({personality})").cyan().bold());
    println!("{}", reply.content);
    Ok(())
}

fn prompt_err(e: dialoguer::Error) -> ServiceError {
    ServiceError::Other(format!("prompt failed: {e}"))
}

fn edit_config(mut settings: Settings) -> ServiceResult<()> {
    let theme = ColorfulTheme::default();

    settings.github_api_base = Input::with_theme(&theme)
        .with_prompt("GitHub API base URL")
        .default(settings.github_api_base.clone())
        .interact_text()
        .map_err(prompt_err)?;

    let names: Vec<&str> = Personality::ALL.iter().map(|p| p.as_str()).collect();
    let current = Personality::ALL
        .iter()
        .position(|p| *p == settings.coach.personality)
        .unwrap_or(0);
    let choice = Select::with_theme(&theme)
        .with_prompt("Coach personality")
        .items(&names)
        .default(current)
        .interact()
        .map_err(prompt_err)?;
    settings.coach.personality = Personality::ALL[choice];

    settings.coach.latency_ms = Input::with_theme(&theme)
        .with_prompt("Coach latency (ms)")
        .default(settings.coach.latency_ms)
        .interact_text()
        .map_err(prompt_err)?;

    let timer = &mut settings.timer;
    timer.work_minutes = Input::with_theme(&theme)
        .with_prompt("Work period (minutes)")
        .default(timer.work_minutes)
        .interact_text()
        .map_err(prompt_err)?;
    timer.short_break_minutes = Input::with_theme(&theme)
        .with_prompt("Short break (minutes)")
        .default(timer.short_break_minutes)
        .interact_text()
        .map_err(prompt_err)?;
    timer.long_break_minutes = Input::with_theme(&theme)
        .with_prompt("Long break (minutes)")
        .default(timer.long_break_minutes)
        .interact_text()
        .map_err(prompt_err)?;
    timer.sessions_until_long_break = Input::with_theme(&theme)
        .with_prompt("Work sessions before a long break")
        .default(timer.sessions_until_long_break)
        .interact_text()
        .map_err(prompt_err)?;
    timer.sound_enabled = Confirm::with_theme(&theme)
        .with_prompt("Play a sound when a period ends?")
        .default(timer.sound_enabled)
        .interact()
        .map_err(prompt_err)?;
    timer.auto_start_breaks = Confirm::with_theme(&theme)
        .with_prompt("Start breaks automatically?")
        .default(timer.auto_start_breaks)
        .interact()
        .map_err(prompt_err)?;
    timer.auto_start_work = Confirm::with_theme(&theme)
        .with_prompt("Start work periods automatically?")
        .default(timer.auto_start_work)
        .interact()
        .map_err(prompt_err)?;

    let path = settings.save()?;
    println!("{} {}", "Saved".green(), path.display());
    Ok(())
}
