mod config;
mod engine;
mod evaluator;
mod executor;
mod workspace;


use anyhow::Context;
use config::RunnerConfig;
use engine::ProcessEngine;
use executor::GradeError;
use judge_common::plan::TestPlan;
use std::io::Write;
use tokio::time::Instant;
use tracing::{error, info};
use workspace::Workspace;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // The verdict is the only thing allowed on stdout
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let json_logs = std::env::var("JUDGE_LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_line_number(true)
            .init();
    }

    let Some(payload) = std::env::args().nth(1) else {
        println!("No argument specified");
        std::process::exit(0);
    };

    let config = RunnerConfig::load_default().context("Failed to load runner configuration")?;
    let deadline = Instant::now() + config.timeout();

    info!(
        interpreter = %config.interpreter,
        script = %config.script_name,
        timeout_secs = config.timeout_secs,
        payload_bytes = payload.len(),
        "Judge runner starting"
    );

    let spec = judge_common::codec::decode(&payload).context("Failed to decode problem")?;
    let plan = TestPlan::build(&spec).context("Invalid setup/teardown code")?;

    let root = std::env::current_dir().context("Failed to resolve working directory")?;
    let mut workspace = Workspace::new(&root, config.script_name.as_str());
    let engine = ProcessEngine::new(config.interpreter.as_str(), config.args.clone(), &root);

    let outcome = executor::grade(&spec, &plan, &mut workspace, &engine, deadline).await;

    let verdict = match outcome {
        Ok(verdict) => verdict,
        Err(GradeError::Fixture(e)) => {
            error!(file = %e.name, error = %e.source, "Fixture creation failed");
            print!("{}", GradeError::Fixture(e));
            std::io::stdout().flush()?;
            std::process::exit(0);
        }
        Err(e) => return Err(e).context("Grading aborted"),
    };

    print!("{}", verdict.render());
    std::io::stdout().flush()?;

    if config.cleanup {
        info!(files = workspace.written().len(), "Removing job files");
        workspace.cleanup().await;
    }

    info!(
        passed = verdict.is_ok(),
        failure = verdict.message().unwrap_or(""),
        "Judge runner finished"
    );
    Ok(())
}
