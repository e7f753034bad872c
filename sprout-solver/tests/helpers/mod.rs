//! Runs the planner binary on the instances under `tests/instances`.
#![allow(
    dead_code,
    reason = "is used in integration tests but unable to find a way to silence these warnings"
)]

use std::fs::File;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Stdio;
use std::time::Duration;

use wait_timeout::ChildExt;

const TEST_TIMEOUT: Duration = Duration::from_secs(60);

/// The files produced by one run of the planner. They live in a directory of their own, which is
/// removed by [`Run::cleanup`].
#[derive(Debug)]
pub(crate) struct Run {
    pub(crate) exit_code: i32,
    pub(crate) directory: PathBuf,
    pub(crate) plan_file: PathBuf,
    pub(crate) proof_dir: PathBuf,
    pub(crate) log_file: PathBuf,
}

impl Run {
    pub(crate) fn plan(&self) -> String {
        std::fs::read_to_string(&self.plan_file).expect("the plan was written")
    }

    pub(crate) fn log(&self) -> String {
        std::fs::read_to_string(&self.log_file).expect("the log was written")
    }

    pub(crate) fn cleanup(self) {
        std::fs::remove_dir_all(self.directory).expect("the run directory can be removed");
    }
}

pub(crate) fn instance_path(instance_name: &str) -> PathBuf {
    PathBuf::from(format!(
        "{}/tests/instances/{instance_name}.sas",
        env!("CARGO_MANIFEST_DIR")
    ))
}

/// Runs the planner on `tests/instances/{instance_name}.sas` with the given arguments.
///
/// The plan file is always placed in the run directory. `test_name` keeps the directories of
/// tests which share an instance apart.
pub(crate) fn run_planner<'a>(
    test_name: &str,
    instance_name: &str,
    args: impl IntoIterator<Item = &'a str>,
) -> Run {
    run_planner_on(test_name, &instance_path(instance_name), args, false)
}

/// Like [`run_planner`], but also writes a certificate into the run directory.
pub(crate) fn run_planner_with_proof<'a>(
    test_name: &str,
    instance_name: &str,
    args: impl IntoIterator<Item = &'a str>,
) -> Run {
    run_planner_on(test_name, &instance_path(instance_name), args, true)
}

pub(crate) fn run_planner_on<'a>(
    test_name: &str,
    task_path: &Path,
    args: impl IntoIterator<Item = &'a str>,
    with_proof: bool,
) -> Run {
    let planner = PathBuf::from(env!("CARGO_BIN_EXE_sprout-solver"));

    let directory = std::env::temp_dir().join(format!(
        "sprout-solver-{test_name}-{}",
        std::process::id()
    ));
    std::fs::create_dir_all(&directory).expect("Failed to create the run directory.");

    let plan_file = directory.join("sas_plan");
    let proof_dir = directory.join("proof");
    let log_file = directory.join("planner.log");
    let err_file = directory.join("planner.err");

    let mut command = Command::new(planner);
    let _ = command.arg("--plan-file").arg(&plan_file);
    if with_proof {
        let _ = command.arg("--proof-dir").arg(&proof_dir);
    }
    let _ = command.args(args);

    let mut child = command
        .arg(task_path)
        .stdout(File::create(&log_file).expect("Failed to create log file."))
        .stderr(File::create(&err_file).expect("Failed to create error file."))
        .stdin(Stdio::null())
        .spawn()
        .expect("Failed to run planner.");

    let exit_code = match child.wait_timeout(TEST_TIMEOUT) {
        Ok(None) => panic!("planner took more than {} seconds", TEST_TIMEOUT.as_secs()),
        Ok(Some(status)) => status
            .code()
            .unwrap_or_else(|| panic!("planner was terminated by a signal: {status}")),
        Err(e) => panic!("error starting planner: {e}"),
    };

    Run {
        exit_code,
        directory,
        plan_file,
        proof_dir,
        log_file,
    }
}
