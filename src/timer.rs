//! Pomodoro-style study timer.
//!
//! [`StudyTimer`] is a plain state machine advanced by [`StudyTimer::tick`];
//! [`TimerDriver`] feeds it one tick per second on the tokio runtime and is
//! cancelled on stop, pause, or drop.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerSettings {
    pub work_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    pub sessions_until_long_break: u32,
    pub sound_enabled: bool,
    pub auto_start_breaks: bool,
    pub auto_start_work: bool,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            sessions_until_long_break: 4,
            sound_enabled: true,
            auto_start_breaks: false,
            auto_start_work: false,
        }
    }
}

impl TimerSettings {
    pub fn duration_secs(&self, mode: TimerMode) -> u32 {
        let minutes = match mode {
            TimerMode::Work => self.work_minutes,
            TimerMode::ShortBreak => self.short_break_minutes,
            TimerMode::LongBreak => self.long_break_minutes,
        };
        minutes.saturating_mul(60)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    Work,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Work => "Work session",
            TimerMode::ShortBreak => "Short break",
            TimerMode::LongBreak => "Long break",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Idle,
    Running,
    Paused,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TimerEvent {
    Completed {
        finished: TimerMode,
        next: TimerMode,
        sessions_completed: u32,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct StudyTimer {
    #[serde(skip)]
    settings: TimerSettings,
    mode: TimerMode,
    status: RunStatus,
    remaining_secs: u32,
    sessions_completed: u32,
}

impl StudyTimer {
    pub fn new(settings: TimerSettings) -> Self {
        let remaining_secs = settings.duration_secs(TimerMode::Work);
        Self {
            settings,
            mode: TimerMode::Work,
            status: RunStatus::Idle,
            remaining_secs,
            sessions_completed: 0,
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn sessions_completed(&self) -> u32 {
        self.sessions_completed
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    pub fn start(&mut self) {
        if self.status != RunStatus::Running {
            self.status = RunStatus::Running;
        }
    }

    pub fn pause(&mut self) {
        if self.status == RunStatus::Running {
            self.status = RunStatus::Paused;
        }
    }

    /// Back to an idle work period. The session counter is kept.
    pub fn stop(&mut self) {
        self.status = RunStatus::Idle;
        self.mode = TimerMode::Work;
        self.remaining_secs = self.settings.duration_secs(TimerMode::Work);
    }

    /// Idle, with the current mode's full duration restored.
    pub fn reset(&mut self) {
        self.status = RunStatus::Idle;
        self.remaining_secs = self.settings.duration_secs(self.mode);
    }

    /// One elapsed second. Ignored unless running.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if self.status != RunStatus::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            return Some(self.complete());
        }
        None
    }

    fn complete(&mut self) -> TimerEvent {
        let finished = self.mode;
        let (next, auto_start) = match finished {
            TimerMode::Work => {
                self.sessions_completed += 1;
                let every = self.settings.sessions_until_long_break.max(1);
                let next = if self.sessions_completed % every == 0 {
                    TimerMode::LongBreak
                } else {
                    TimerMode::ShortBreak
                };
                (next, self.settings.auto_start_breaks)
            }
            TimerMode::ShortBreak | TimerMode::LongBreak => {
                (TimerMode::Work, self.settings.auto_start_work)
            }
        };

        self.mode = next;
        self.remaining_secs = self.settings.duration_secs(next);
        self.status = if auto_start {
            RunStatus::Running
        } else {
            RunStatus::Idle
        };
        tracing::info!(?finished, ?next, sessions = self.sessions_completed, "timer period complete");

        TimerEvent::Completed {
            finished,
            next,
            sessions_completed: self.sessions_completed,
        }
    }

    /// `MM:SS` of the remaining time.
    pub fn format_remaining(&self) -> String {
        format!("{:02}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }

    /// Elapsed share of the current period, 0-100.
    pub fn progress_percent(&self) -> f64 {
        let total = self.settings.duration_secs(self.mode);
        if total == 0 {
            return 0.0;
        }
        f64::from(total - self.remaining_secs.min(total)) * 100.0 / f64::from(total)
    }
}

/// Terminal bell written ahead of the completion line when sound is on.
pub const BELL: &str = "\u{7}";

/// Writes the audible alert for a finished period to `out`. Returns whether
/// anything was written; nothing is when `sound_enabled` is off.
pub fn announce_completion(
    event: &TimerEvent,
    settings: &TimerSettings,
    out: &mut dyn Write,
) -> io::Result<bool> {
    if !settings.sound_enabled {
        return Ok(false);
    }
    let TimerEvent::Completed { finished, next, .. } = event;
    writeln!(out, "{BELL}{} finished, next up: {}", finished.label(), next.label())?;
    out.flush()?;
    Ok(true)
}

/// Shared handle to a timer driven by a background task.
pub type SharedTimer = Arc<Mutex<StudyTimer>>;

/// Background task ticking a [`SharedTimer`] once per `period` while it runs.
pub struct TimerDriver {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl TimerDriver {
    pub fn spawn(
        timer: SharedTimer,
        period: Duration,
        events: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        let (event, running) = match timer.lock() {
                            Ok(mut t) => (t.tick(), t.status() == RunStatus::Running),
                            Err(_) => {
                                tracing::error!("timer lock poisoned, stopping driver");
                                break;
                            }
                        };
                        if let Some(event) = event {
                            let _ = events.send(event);
                        }
                        if !running {
                            break;
                        }
                    }
                }
            }
            tracing::debug!("timer driver stopped");
        });
        Self {
            cancel,
            handle: Some(handle),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    /// Cancels the task and waits for it to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TimerDriver {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> TimerSettings {
        TimerSettings::default()
    }

    fn run_period(timer: &mut StudyTimer) -> Vec<TimerEvent> {
        let ticks = timer.remaining_secs();
        (0..ticks).filter_map(|_| timer.tick()).collect()
    }

    #[test]
    fn huge_durations_saturate_instead_of_overflowing() {
        let timer = StudyTimer::new(TimerSettings {
            work_minutes: 80_000_000,
            ..settings()
        });
        assert_eq!(timer.remaining_secs(), u32::MAX);
    }

    #[test]
    fn completion_alert_follows_sound_setting() {
        let event = TimerEvent::Completed {
            finished: TimerMode::Work,
            next: TimerMode::ShortBreak,
            sessions_completed: 1,
        };

        let mut out = Vec::new();
        assert!(announce_completion(&event, &settings(), &mut out).unwrap());
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(BELL));
        assert!(text.contains("Work session finished, next up: Short break"));

        let muted = TimerSettings {
            sound_enabled: false,
            ..settings()
        };
        let mut out = Vec::new();
        assert!(!announce_completion(&event, &muted, &mut out).unwrap());
        assert!(out.is_empty());
    }

    #[test]
    fn starts_idle_in_work_mode() {
        let timer = StudyTimer::new(settings());
        assert_eq!(timer.mode(), TimerMode::Work);
        assert_eq!(timer.status(), RunStatus::Idle);
        assert_eq!(timer.remaining_secs(), 1500);
        assert_eq!(timer.format_remaining(), "25:00");
    }

    #[test]
    fn full_work_period_completes_once_into_short_break() {
        let mut timer = StudyTimer::new(settings());
        timer.start();
        let events: Vec<_> = (0..1500).filter_map(|_| timer.tick()).collect();

        assert_eq!(
            events,
            vec![TimerEvent::Completed {
                finished: TimerMode::Work,
                next: TimerMode::ShortBreak,
                sessions_completed: 1,
            }]
        );
        assert_eq!(timer.mode(), TimerMode::ShortBreak);
        assert_eq!(timer.remaining_secs(), 300);
        assert_eq!(timer.status(), RunStatus::Idle);
    }

    #[test]
    fn every_fourth_session_earns_a_long_break() {
        let mut timer = StudyTimer::new(settings());
        for session in 1..=4 {
            timer.start();
            run_period(&mut timer);
            let expected = if session == 4 {
                TimerMode::LongBreak
            } else {
                TimerMode::ShortBreak
            };
            assert_eq!(timer.mode(), expected, "after session {session}");
            timer.start();
            run_period(&mut timer);
            assert_eq!(timer.mode(), TimerMode::Work);
        }
        assert_eq!(timer.sessions_completed(), 4);
    }

    #[test]
    fn auto_start_flags_keep_timer_running() {
        let mut timer = StudyTimer::new(TimerSettings {
            auto_start_breaks: true,
            ..settings()
        });
        timer.start();
        run_period(&mut timer);
        assert_eq!(timer.status(), RunStatus::Running);
        run_period(&mut timer);
        assert_eq!(timer.mode(), TimerMode::Work);
        assert_eq!(timer.status(), RunStatus::Idle);
    }

    #[test]
    fn ticks_are_ignored_unless_running() {
        let mut timer = StudyTimer::new(settings());
        assert_eq!(timer.tick(), None);
        timer.start();
        timer.tick();
        timer.pause();
        assert_eq!(timer.status(), RunStatus::Paused);
        timer.tick();
        assert_eq!(timer.remaining_secs(), 1499);
        timer.start();
        timer.start();
        assert_eq!(timer.status(), RunStatus::Running);
    }

    #[test]
    fn stop_returns_to_work_and_keeps_sessions() {
        let mut timer = StudyTimer::new(settings());
        timer.start();
        run_period(&mut timer);
        timer.start();
        timer.tick();
        timer.stop();
        assert_eq!(timer.mode(), TimerMode::Work);
        assert_eq!(timer.status(), RunStatus::Idle);
        assert_eq!(timer.remaining_secs(), 1500);
        assert_eq!(timer.sessions_completed(), 1);
    }

    #[test]
    fn reset_restores_current_mode_duration() {
        let mut timer = StudyTimer::new(settings());
        timer.start();
        run_period(&mut timer);
        timer.start();
        for _ in 0..42 {
            timer.tick();
        }
        timer.reset();
        assert_eq!(timer.mode(), TimerMode::ShortBreak);
        assert_eq!(timer.status(), RunStatus::Idle);
        assert_eq!(timer.remaining_secs(), 300);
        assert_eq!(timer.progress_percent(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn driver_ticks_until_completion() {
        let timer: SharedTimer = Arc::new(Mutex::new(StudyTimer::new(TimerSettings {
            work_minutes: 1,
            ..settings()
        })));
        timer.lock().unwrap().start();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let driver = TimerDriver::spawn(timer.clone(), Duration::from_secs(1), tx);

        let event = rx.recv().await.unwrap();
        assert!(matches!(
            event,
            TimerEvent::Completed {
                finished: TimerMode::Work,
                ..
            }
        ));
        assert_eq!(timer.lock().unwrap().mode(), TimerMode::ShortBreak);
        driver.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn driver_exits_after_pause_and_leaves_timer_alone() {
        let timer: SharedTimer = Arc::new(Mutex::new(StudyTimer::new(settings())));
        timer.lock().unwrap().start();
        let (tx, _rx) = mpsc::unbounded_channel();
        let driver = TimerDriver::spawn(timer.clone(), Duration::from_secs(1), tx);

        tokio::time::sleep(Duration::from_millis(10_500)).await;
        timer.lock().unwrap().pause();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(timer.lock().unwrap().remaining_secs(), 1490);
        assert!(driver.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_driver_cancels_ticks() {
        let timer: SharedTimer = Arc::new(Mutex::new(StudyTimer::new(settings())));
        timer.lock().unwrap().start();
        let (tx, _rx) = mpsc::unbounded_channel();
        let driver = TimerDriver::spawn(timer.clone(), Duration::from_secs(1), tx);

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        drop(driver);
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(timer.lock().unwrap().remaining_secs(), 1497);
    }
}
