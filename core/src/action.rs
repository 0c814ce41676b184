pub mod error {
    #[allow(unused_imports)]
    pub(crate) use anyhow::{anyhow, bail, ensure, Context as _};
    pub use anyhow::{Error, Result};
}
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::terminal;
use error::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::command::Invocation;
use crate::config::{Config, TestConfig};
use crate::fixture::{self, FixtureError, FixturePaths, TestId};
use crate::lang;
use crate::style::Palette;
use crate::testing::{
    evaluate, run_interactive, DiffView, ExecutionOutcome, Judgement, ProcessRunner, Verdict,
};

const FALLBACK_DISPLAY_WIDTH: usize = 80;

#[derive(Debug, Clone)]
pub struct TestOptions {
    /// Run only these ids; every discovered id when empty.
    pub ids: Vec<TestId>,
    pub time_limit: Duration,
    pub display_width: usize,
    pub palette: Palette,
    pub show_progress: bool,
}

impl TestOptions {
    pub fn from_config(cfg: &TestConfig) -> Self {
        let display_width = cfg.display_width.unwrap_or_else(|| {
            terminal::size()
                .map(|(cols, _)| cols as usize)
                .unwrap_or(FALLBACK_DISPLAY_WIDTH)
        });
        Self {
            ids: Vec::new(),
            time_limit: cfg.time_limit(),
            display_width,
            palette: Palette::detect(cfg.color),
            show_progress: true,
        }
    }
}

#[derive(Debug)]
pub enum TestResult {
    Judged {
        judgement: Judgement,
        outcome: ExecutionOutcome,
        expected: Vec<u8>,
    },
    /// The testcase was not executed.
    Skipped(FixtureError),
}

#[derive(Debug)]
pub struct TestReport {
    pub paths: FixturePaths,
    pub result: TestResult,
}

impl TestReport {
    pub fn id(&self) -> TestId {
        self.paths.id
    }

    pub fn verdict(&self) -> Option<Verdict> {
        match &self.result {
            TestResult::Judged { judgement, .. } => Some(judgement.verdict),
            TestResult::Skipped(_) => None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.verdict() == Some(Verdict::Accepted)
    }
}

/// `Some(argv)` from the command line wins over the config's `[[test.command]]` entry.
pub fn resolve_invocation(
    source: impl AsRef<Path>,
    explicit: Option<&[String]>,
    cfg: &TestConfig,
    debug: bool,
) -> Result<Invocation> {
    let source = source.as_ref();
    if let Some(argv) = explicit {
        return Invocation::from_argv(argv).context("Invalid command");
    }

    let filename = source
        .file_name()
        .with_context(|| format!("Not a file: {}", source.to_string_lossy()))?
        .to_string_lossy();
    let entry = cfg.find_command_for_filename(&filename).with_context(|| {
        format!(
            "Unconfigured test command for filename '{}' (No entry matched glob in `test.command[]` of {})",
            filename,
            Config::FILENAME,
        )
    })?;
    let template = if debug {
        entry.debug_or_run()
    } else {
        entry.run.as_slice()
    };
    Invocation::from_template(template, source)
        .with_context(|| format!("Invalid command for pattern '{}'", entry.pattern.as_str()))
}

/// Runs `inv` against every testcase of `source`, one after another, and prints the results.
pub async fn do_test(
    source: impl AsRef<Path>,
    inv: &Invocation,
    opts: &TestOptions,
) -> Result<Vec<TestReport>> {
    let source = source.as_ref();
    let ids = if opts.ids.is_empty() {
        fixture::find_test_ids(source).context("Failed to find testcases")?
    } else {
        opts.ids.clone()
    };
    if ids.is_empty() {
        return Err(FixtureError::NoFixtures(source.to_owned()).into());
    }

    let runner = ProcessRunner::new().time_limit(opts.time_limit);
    log::info!("Running: {}", inv);

    let mut reports = Vec::with_capacity(ids.len());
    for id in ids {
        let paths = FixturePaths::new(source, id);
        log::debug!("Testcase {}: {:?}", id, paths);

        let spinner = new_spinner(opts.show_progress, format!("Test Case {} ...", id));
        let result = self::run_one(&runner, inv, &paths).await;
        spinner.finish_and_clear();

        let report = TestReport { paths, result };
        for line in render_report(&report, opts) {
            println!("{}", line);
        }
        reports.push(report);
    }

    let verdicts: Vec<Verdict> = reports.iter().filter_map(TestReport::verdict).collect();
    let num_skipped = reports.len() - verdicts.len();
    println!("{}", opts.palette.summary(&verdicts, num_skipped));
    Ok(reports)
}

async fn run_one(runner: &ProcessRunner, inv: &Invocation, paths: &FixturePaths) -> TestResult {
    if let Err(e) = paths.check_present() {
        return TestResult::Skipped(e);
    }
    let input = match fsutil::read(&paths.input) {
        Ok(input) => input,
        Err(e) => return TestResult::Skipped(e.into()),
    };

    let outcome = match runner.run(inv, &input).await {
        Ok(outcome) => outcome,
        Err(e) => {
            log::error!("Test Case {}: {:#}", paths.id, e);
            ExecutionOutcome::failed_to_run(format!("{:#}", e))
        }
    };

    if outcome.success() {
        if let Err(e) = fsutil::write(&paths.output, &outcome.stdout) {
            log::error!("{:#}", e);
        }
    }

    let expected = match fsutil::read(&paths.answer) {
        Ok(expected) => expected,
        Err(e) => return TestResult::Skipped(e.into()),
    };
    let judgement = evaluate(&outcome, &expected);
    TestResult::Judged {
        judgement,
        outcome,
        expected,
    }
}

fn new_spinner(visible: bool, msg: String) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner().with_message(msg);
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

/// Lines printed for one testcase: a status line, then whatever explains the verdict.
pub fn render_report(report: &TestReport, opts: &TestOptions) -> Vec<String> {
    let p = &opts.palette;
    let id = report.id();

    let (judgement, outcome, expected) = match &report.result {
        TestResult::Skipped(e) => {
            return vec![format!("Test Case {}: {}", id, p.warn(&e.to_string())), String::new()];
        }
        TestResult::Judged {
            judgement,
            outcome,
            expected,
        } => (judgement, outcome, expected),
    };

    let mut lines = vec![format!(
        "Test Case {}: {} [{}ms]",
        id,
        p.judge_icon(judgement.verdict),
        outcome.execution_time.as_millis()
    )];

    match judgement.verdict {
        Verdict::Accepted => {
            if let Some(advisory) = judgement.advisory {
                lines.push(p.warn(advisory.message()));
            }
            lines.push(p.on_success("Your Output:"));
            lines.extend(outcome.stdout_lossy().lines().map(str::to_owned));
        }
        Verdict::WrongAnswer => {
            let actual = outcome.stdout_lossy();
            let expected = String::from_utf8_lossy(expected);
            let view = DiffView::new(&actual, &expected, opts.display_width);
            lines.extend(view.render(p));
        }
        Verdict::RuntimeError => {
            if let Some(code) = outcome.status {
                lines.push(format!("exit status: {}", code));
            }
            let stdout = outcome.stdout_lossy();
            if !stdout.is_empty() {
                lines.push(p.title("[stdout]"));
                lines.extend(stdout.lines().map(str::to_owned));
            }
            let stderr = outcome.stderr_lossy();
            if !stderr.is_empty() {
                lines.push(p.title("[stderr]"));
                lines.extend(p.highlight_runtime_error(&stderr).lines().map(str::to_owned));
            }
        }
        Verdict::TimedOut => {}
    }
    lines.push(String::new());
    lines
}

/// Runs once without a time limit.
///
/// With an id, the input fixture is fed and the captured output is printed. Without one,
/// the solution is attached to this terminal.
pub async fn do_debug(
    source: impl AsRef<Path>,
    inv: &Invocation,
    id: Option<TestId>,
    palette: &Palette,
) -> Result<Option<i32>> {
    let Some(id) = id else {
        println!("{}", palette.title("Running with debugging flags. Enter your input manually"));
        return run_interactive(inv).await;
    };

    let paths = FixturePaths::new(source, id);
    ensure!(
        paths.input.is_file(),
        FixtureError::Missing {
            kind: fixture::FixtureKind::Input,
            path: paths.input.clone(),
        }
    );
    println!("{}", palette.title(&format!("Running Test Case {} with debugging flags", id)));

    let input = fsutil::read(&paths.input)?;
    let outcome = ProcessRunner::new().unlimited().run(inv, &input).await?;

    let stdout = outcome.stdout_lossy();
    if !stdout.is_empty() {
        print!("{}", stdout);
    }
    let stderr = outcome.stderr_lossy();
    if !stderr.is_empty() {
        eprint!("{}", palette.highlight_runtime_error(&stderr));
    }
    log::info!("Exit status: {:?}", outcome.status);
    Ok(outcome.status)
}

/// Creates empty `.in{n}`/`.ans{n}` files with the next free id.
pub fn add_testcase(source: impl AsRef<Path>) -> Result<FixturePaths> {
    let source = source.as_ref();
    let id = fixture::next_test_id(source).context("Failed to find testcases")?;
    let paths = FixturePaths::new(source, id);
    fsutil::write_new(&paths.input, "")?;
    fsutil::write_new(&paths.answer, "")?;
    Ok(paths)
}

/// Creates `dir/<normalized title>.<ext>` headed by a comment naming the problem.
pub fn create_source_file(dir: impl AsRef<Path>, title: &str, ext: &str) -> Result<PathBuf> {
    let name = lang::normalize_name(title);
    ensure!(!name.is_empty(), "Empty file name from title '{}'", title);

    let ext = ext.trim_start_matches('.');
    let filename = if ext.is_empty() {
        name
    } else {
        format!("{}.{}", name, ext)
    };
    let path = dir.as_ref().join(filename);
    fsutil::write_new(&path, lang::source_header(title, ext))?;
    Ok(path)
}

pub fn init_config(dir: impl AsRef<Path>) -> Result<PathBuf> {
    let path = dir.as_ref().join(Config::FILENAME);
    fsutil::write_new(&path, Config::example_toml()).context("Failed to init config")?;
    Ok(path)
}
