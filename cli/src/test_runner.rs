use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use script::Scene;

use crate::simulation::{Simulation, SimulationError};

const SCENE_SUFFIX: &str = ".scene.toml";

/// The `[expect]` table of a scenario file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Expectations {
    /// Human-readable test description.
    #[serde(default)]
    pub description: Option<String>,

    /// Upper bound on simulated frames.
    #[serde(default = "default_ticks")]
    pub ticks: u32,

    #[serde(default = "default_fps")]
    pub fps: f64,

    /// Clock value before the first frame.
    #[serde(default)]
    pub start: f64,

    /// Expected transcript, compared line by line after trimming.
    #[serde(default)]
    pub output: Option<String>,

    /// The load or runtime error must contain this substring.
    #[serde(default)]
    pub error: Option<String>,

    /// Number of scripts still running when the tick budget runs out.
    #[serde(default)]
    pub active: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ScenarioFile {
    expect: Option<Expectations>,
}

fn default_ticks() -> u32 {
    600
}

fn default_fps() -> f64 {
    30.0
}

pub enum TestOutcome {
    Pass,
    /// Plain scenes without an `[expect]` table.
    Skip,
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
}

impl TestResult {
    fn label(&self) -> &str {
        self.description.as_deref().unwrap_or_else(|| {
            self.path
                .file_name()
                .and_then(|s| s.to_str())
                .map(|s| s.trim_end_matches(SCENE_SUFFIX))
                .unwrap_or("?")
        })
    }
}

fn run_single_test(path: &Path) -> TestResult {
    let fail = |description: Option<String>, reason: String| TestResult {
        path: path.to_path_buf(),
        description,
        outcome: TestOutcome::Fail(reason),
    };

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return fail(None, format!("cannot read file: {}", e)),
    };

    let expect = match toml::from_str::<ScenarioFile>(&content) {
        Ok(ScenarioFile { expect: Some(expect) }) => expect,
        Ok(ScenarioFile { expect: None }) => {
            return TestResult {
                path: path.to_path_buf(),
                description: None,
                outcome: TestOutcome::Skip,
            };
        }
        Err(e) => return fail(None, format!("invalid [expect] table: {}", e.message())),
    };
    let description = expect.description.clone();

    let outcome = match simulate(&content, &expect) {
        Ok((transcript, active)) => check_success(&expect, &transcript, active),
        Err((transcript, error)) => check_failure(&expect, &transcript, &error),
    };

    match outcome {
        None => TestResult {
            path: path.to_path_buf(),
            description,
            outcome: TestOutcome::Pass,
        },
        Some(reason) => fail(description, reason),
    }
}

/// Load and tick the scene. On failure the partial transcript comes back
/// with the error.
fn simulate(
    source: &str,
    expect: &Expectations,
) -> Result<(Vec<String>, usize), (Vec<String>, SimulationError)> {
    let scene = Scene::parse(source, 0).map_err(|e| (Vec::new(), SimulationError::from(e)))?;
    let mut sim = Simulation::new(&scene, expect.start, false).map_err(|e| (Vec::new(), e))?;

    match sim.run(expect.ticks, expect.fps) {
        Ok(summary) => {
            let transcript = sim.transcript();
            sim.shutdown();
            Ok((transcript, summary.active))
        }
        Err(e) => Err((sim.transcript(), SimulationError::Runtime(e))),
    }
}

fn check_success(expect: &Expectations, transcript: &[String], active: usize) -> Option<String> {
    if let Some(expected_err) = &expect.error {
        return Some(format!(
            "expected error containing \"{}\", but the scene ran cleanly",
            expected_err
        ));
    }

    if let Some(expected_output) = &expect.output {
        let expected: Vec<&str> = expected_output
            .trim()
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if transcript != expected.as_slice() {
            return Some(format!(
                "output mismatch\n  expected:\n{}\n  actual:\n{}",
                indent(&expected),
                indent(transcript)
            ));
        }
    }

    if let Some(expected_active) = expect.active {
        if active != expected_active {
            return Some(format!(
                "expected {} active script(s), got {}",
                expected_active, active
            ));
        }
    }

    None
}

fn check_failure(
    expect: &Expectations,
    transcript: &[String],
    error: &SimulationError,
) -> Option<String> {
    let err_str = error.to_string();
    match &expect.error {
        Some(expected_err) if err_str.contains(expected_err.as_str()) => None,
        Some(expected_err) => Some(format!(
            "expected error containing \"{}\", got: {}",
            expected_err, err_str
        )),
        None => Some(format!(
            "unexpected error: {}\n  transcript so far:\n{}",
            err_str,
            indent(transcript)
        )),
    }
}

fn indent<S: AsRef<str>>(lines: &[S]) -> String {
    if lines.is_empty() {
        return "    (none)".to_string();
    }
    lines
        .iter()
        .map(|l| format!("    {}", l.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Discover scene files grouped by category (subfolder relative to root).
/// Files directly in `root` get category "" (uncategorized).
fn discover_categorized(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    collect_tests(root, root, &mut categories);
    for files in categories.values_mut() {
        files.sort();
    }
    categories
}

fn collect_tests(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_tests(&path, root, out);
        } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.ends_with(SCENE_SUFFIX) {
                let category = path
                    .parent()
                    .and_then(|p| p.strip_prefix(root).ok())
                    .map(|p| p.to_string_lossy().replace('\\', "/"))
                    .unwrap_or_default();
                out.entry(category).or_default().push(path);
            }
        }
    }
}

pub fn list_categories(path: &Path) {
    if path.is_file() {
        eprintln!("(single file, no categories)");
        return;
    }

    let categories = discover_categorized(path);
    if categories.is_empty() {
        eprintln!("no {} files found in {}", SCENE_SUFFIX, path.display());
        return;
    }

    eprintln!("available categories:");
    for (cat, files) in &categories {
        let label = if cat.is_empty() { "(root)" } else { cat.as_str() };
        eprintln!("  {} ({} scenes)", label, files.len());
    }
}

fn paint(text: &str, code: &str, no_color: bool) -> String {
    if no_color {
        text.to_string()
    } else {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    }
}

/// Run every scenario under `path` (or a single file). If `categories` is
/// non-empty, only those categories run. Returns the process exit code.
pub fn run_tests(path: &Path, no_color: bool, categories: &[String]) -> i32 {
    let groups: BTreeMap<String, Vec<PathBuf>> = if path.is_file() {
        BTreeMap::from([(String::new(), vec![path.to_path_buf()])])
    } else {
        let all = discover_categorized(path);
        if all.is_empty() {
            eprintln!("no {} files found in {}", SCENE_SUFFIX, path.display());
            return 1;
        }
        filter_categories(all, categories)
    };

    if groups.is_empty() {
        eprintln!("no matching categories found");
        return 1;
    }

    let mut passed = 0usize;
    let mut skipped = 0usize;
    let mut failures: Vec<TestResult> = Vec::new();

    for (cat, files) in &groups {
        let header = if cat.is_empty() { "(root)" } else { cat.as_str() };
        eprintln!();
        eprintln!("{}", paint(header, "1", no_color));

        for file in files {
            let result = run_single_test(file);
            match &result.outcome {
                TestOutcome::Pass => {
                    passed += 1;
                    eprintln!("  {}  {}", paint("PASS", "32", no_color), result.label());
                }
                TestOutcome::Skip => {
                    skipped += 1;
                    eprintln!("  {}  {}", paint("SKIP", "33", no_color), result.label());
                }
                TestOutcome::Fail(_) => {
                    eprintln!("  {}  {}", paint("FAIL", "31", no_color), result.label());
                    failures.push(result);
                }
            }
        }
    }

    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for f in &failures {
            eprintln!();
            eprintln!("  --- {} ---", f.path.display());
            if let TestOutcome::Fail(reason) = &f.outcome {
                for line in reason.lines() {
                    eprintln!("  {}", line);
                }
            }
        }
    }

    let failed = failures.len();
    eprintln!();
    if failed == 0 {
        eprintln!(
            "test result: {}. {} passed, 0 failed, {} skipped",
            paint("ok", "32", no_color),
            passed,
            skipped
        );
        0
    } else {
        eprintln!(
            "test result: {}. {} passed, {} failed, {} skipped (of {})",
            paint("FAILED", "31", no_color),
            passed,
            failed,
            skipped,
            passed + failed + skipped
        );
        1
    }
}

fn filter_categories(
    all: BTreeMap<String, Vec<PathBuf>>,
    requested: &[String],
) -> BTreeMap<String, Vec<PathBuf>> {
    if requested.is_empty() {
        return all;
    }

    let mut filtered = BTreeMap::new();
    for req in requested {
        let req = req.trim_matches('/');
        let matching: Vec<&String> = all
            .keys()
            .filter(|cat| *cat == req || cat.starts_with(&format!("{}/", req)))
            .collect();
        if matching.is_empty() {
            eprintln!(
                "warning: category '{}' not found (available: {})",
                req,
                all.keys()
                    .map(|k| if k.is_empty() { "(root)" } else { k.as_str() })
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        for cat in matching {
            filtered.insert(cat.clone(), all[cat].clone());
        }
    }
    filtered
}
