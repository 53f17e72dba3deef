/// Job Executor - High-Level Orchestration
///
/// **Responsibility:**
/// Drive the per-test-case loop and produce the job's single `Verdict`.
///
/// **Per test case, in input order:**
/// 1. Write the script if it changed since the last run (workspace.rs)
/// 2. Create the declared fixture files
/// 3. Run the script once (engine.rs)
/// 4. Check outcome/stdout/stderr, then expected files (evaluator.rs)
///
/// The first failing test case ends the job; later test cases never run.
use crate::engine::ExecutionEngine;
use crate::evaluator::{self, StreamExpectation, Verdict};
use crate::workspace::{FixtureError, Workspace};
use judge_common::plan::TestPlan;
use judge_common::types::ProblemSpec;
use std::io;
use tokio::time::Instant;
use tracing::{debug, info};

/// Infrastructure faults that abort the job without a verdict
#[derive(Debug, thiserror::Error)]
pub enum GradeError {
    #[error("Error while making the files, please contact your teacher {0}")]
    Fixture(#[from] FixtureError),

    #[error("failed to write script: {0}")]
    Script(#[source] io::Error),
}

/// Grade every test case of `spec` and return the verdict
pub async fn grade<E: ExecutionEngine>(
    spec: &ProblemSpec,
    plan: &TestPlan,
    workspace: &mut Workspace,
    engine: &E,
    deadline: Instant,
) -> Result<Verdict, GradeError> {
    info!(
        tests = plan.test_count(),
        wrappers = plan.wrappers().len(),
        rewrites_per_test = plan.rewrites_per_test(),
        "Starting job"
    );

    for (i, input) in spec.inputs.iter().enumerate() {
        let written = workspace
            .materialize(plan.wrapper_for(i), &spec.code)
            .await
            .map_err(GradeError::Script)?;
        debug!(test = i, script_written = written, "Script ready");

        if let Some(files) = spec.files_to_create(i) {
            workspace.create_files(files).await?;
        }

        let started = std::time::Instant::now();
        let execution = engine.run(&workspace.script_path(), input, deadline).await;
        info!(
            test = i,
            outcome = %execution.outcome,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Test executed"
        );

        let expected = StreamExpectation {
            index: i,
            stdout: spec.expected_stdout(i),
            stderr: spec.expected_stderr(i),
            private: spec.is_private(i),
        };
        if let Some(message) = evaluator::check_outcome(&execution, &expected) {
            info!(test = i, "Stream check failed");
            return Ok(Verdict::failed(message));
        }

        if let Some(files) = spec.expected_files(i) {
            if let Some(message) = evaluator::check_files(workspace.root(), files).await {
                info!(test = i, "File check failed");
                return Ok(Verdict::failed(message));
            }
        }
    }

    info!("All test cases passed");
    Ok(Verdict::ok())
}
