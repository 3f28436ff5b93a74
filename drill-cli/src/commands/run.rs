//! `drill run` - scripted training session against the in-memory SCORM host
//!
//! Walks a full session the way a trainee would: inspect the classroom
//! items, enter the warehouse, collect under the countdown, take the quiz.
//! Useful for demoing the reporting pipeline and eyeballing the suspend
//! blob an LMS would receive.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use tracing::info;

use drill_core::{EventBus, MemoryEventBus, QuizSet, SessionConfig, SessionDriver};
use drill_scorm::{
    InMemoryScormApi, LmsClient, ScormClient, SessionReporter, SharedReporter, SharedScormApi,
    SimulationLmsClient, keys,
};

#[derive(Args)]
pub struct RunArgs {
    /// Path to a session config TOML file (defaults to the reference config)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Learner name reported by the simulated LMS host
    #[arg(short, long, default_value = "Desktop User")]
    learner: String,

    /// Answer every quiz question wrong (exercise the failure path)
    #[arg(long)]
    fail_quiz: bool,

    /// Let the countdown expire after collecting only half the items
    #[arg(long)]
    time_out: bool,
}

/// Pick the LMS client for a run
///
/// With `lms_enabled = false` the SCORM host is left alone entirely; the
/// session reports through the log-only simulation client instead.
fn build_lms_client(
    config: &SessionConfig,
    host: &SharedScormApi,
    learner: &str,
) -> Box<dyn LmsClient> {
    if config.lms_enabled {
        Box::new(ScormClient::new(
            Box::new(host.clone()),
            &config.learner_fallback_name,
        ))
    } else {
        Box::new(SimulationLmsClient::new(learner))
    }
}

pub async fn run(args: RunArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::reference(),
    };
    let quiz = QuizSet::reference();

    // Composition root: host, client, reporter, driver
    let host = SharedScormApi::new(InMemoryScormApi::with_student_name(&args.learner));
    let client = build_lms_client(&config, &host, &args.learner);
    let reporter = SharedReporter::new(SessionReporter::new(client, config.total_questions));
    let bus = Arc::new(MemoryEventBus::new(1024));
    let mut driver = SessionDriver::new(config.clone(), bus.clone());
    driver.add_observer(Box::new(reporter.clone()));

    driver.start().await;

    // Scene 1: inspect every safety item
    for item in &config.required_items {
        driver.mark_inspected(item).await;
    }

    // Scene 2: collect under the countdown
    driver.enter_warehouse().await?;
    if args.time_out {
        let half = config.required_items.len() / 2;
        for item in config.required_items.iter().take(half) {
            driver.mark_collected(item).await;
        }
        driver.tick(Duration::from_secs(config.timer_secs + 1)).await;
    } else {
        for item in &config.required_items {
            driver.mark_collected(item).await;
        }
    }

    // Quiz: the "UI" checks answers against the question set
    for (i, question) in quiz.questions.iter().enumerate() {
        let selected = if args.fail_quiz {
            (question.correct_index + 1) % question.answers.len()
        } else {
            question.correct_index
        };
        driver
            .record_quiz_answer(i as u32, selected as u32, question.is_correct(selected))
            .await?;
    }
    let correct = driver.finish_quiz().await?;
    driver.finish().await;

    info!(
        phase = driver.phase().as_str(),
        correct,
        score = driver.score(),
        "session finished"
    );

    println!("== session {} ==", driver.id());
    println!("phase:   {}", driver.phase().as_str());
    println!("score:   {:.0}%", driver.score() * 100.0);
    if let Some(learner) = reporter.with(|r| r.learner_name().to_string()) {
        println!("learner: {learner}");
    }
    println!();
    println!("-- event log --");
    for (seq, event) in bus.events_from(0).await {
        println!("{seq:>3}  {event:?}");
    }
    println!();
    println!("-- LMS host state --");
    for key in [keys::LESSON_STATUS, keys::SCORE_RAW, keys::LESSON_LOCATION] {
        if let Some(value) = host.committed(key) {
            println!("{key} = {value}");
        }
    }
    if let Some(data) = host.committed(keys::SUSPEND_DATA) {
        println!();
        println!("-- suspend data --");
        for pair in data.split('|') {
            println!("{pair}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_lms_never_touches_the_host() {
        let config = SessionConfig {
            lms_enabled: false,
            ..SessionConfig::reference()
        };
        let host = SharedScormApi::new(InMemoryScormApi::new());
        let mut client = build_lms_client(&config, &host, "Desktop User");

        client.initialize();
        client.report_progress(0.5);
        client.report_completion(true, 3, 3);
        client.terminate();

        assert!(!host.is_open());
        assert_eq!(host.commit_count(), 0);
    }

    #[test]
    fn enabled_lms_opens_the_scorm_host() {
        let config = SessionConfig::reference();
        let host = SharedScormApi::new(InMemoryScormApi::new());
        let mut client = build_lms_client(&config, &host, "Desktop User");

        client.initialize();

        assert!(client.is_initialized());
        assert!(host.is_open());
    }
}
