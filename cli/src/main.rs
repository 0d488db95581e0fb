mod host;
mod simulation;
mod test_runner;

use std::path::Path;
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::diagnostic::Diagnostic;
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use tracing_subscriber::EnvFilter;

use script::Scene;

use simulation::{Simulation, SimulationError};

#[derive(Parser)]
#[command(name = "scratch", version, about = "Tick-driven block runtime")]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log runtime events to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a scene against a simulated clock
    Run(RunArgs),

    /// Run .scene.toml scenarios that carry an [expect] table
    Test(TestArgs),

    /// Parse and compile a scene without running it
    Check(CheckArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// Scene file to run
    scene: String,

    /// Maximum number of frames to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Simulated frames per second
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// Clock value before the first frame, in seconds
    #[arg(long, default_value_t = 0.0)]
    start: f64,

    /// Print final variable values after the run
    #[arg(long)]
    variables: bool,

    /// Suppress the action transcript
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .scene.toml file or a directory containing them
    path: String,

    /// Run only scenarios in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Scene file to check
    scene: String,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let color_choice = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    match cli.command {
        Command::Run(args) => do_run(args, color_choice),
        Command::Check(args) => do_check(args, color_choice),
        Command::Test(args) => {
            let path = Path::new(&args.path);
            if args.list_categories {
                test_runner::list_categories(path);
                return;
            }
            let exit_code = test_runner::run_tests(path, cli.no_color, &args.category);
            process::exit(exit_code);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

/// Source database plus the parsed scene, so later errors can still point
/// into the file.
struct Loaded {
    files: SimpleFiles<String, String>,
    scene: Scene,
}

fn load_scene(path: &str, color_choice: ColorChoice) -> Loaded {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", path, e);
            process::exit(1);
        }
    };

    let mut files = SimpleFiles::new();
    let file_id = files.add(path.to_string(), source.clone());

    match Scene::parse(&source, file_id) {
        Ok(scene) => Loaded { files, scene },
        Err(error) => {
            emit(color_choice, &files, &error.to_diagnostic());
            process::exit(1);
        }
    }
}

fn do_check(args: CheckArgs, color_choice: ColorChoice) {
    let loaded = load_scene(&args.scene, color_choice);
    match Simulation::new(&loaded.scene, 0.0, false) {
        Ok(sim) => {
            let scripts = sim.running_scripts().len();
            sim.shutdown();
            eprintln!(
                "ok: {} compiled ({} script{})",
                args.scene,
                scripts,
                if scripts == 1 { "" } else { "s" }
            );
        }
        Err(error) => {
            report(color_choice, &loaded.files, &error);
            process::exit(1);
        }
    }
}

fn do_run(args: RunArgs, color_choice: ColorChoice) {
    if args.fps.is_nan() || args.fps <= 0.0 {
        eprintln!("error: --fps must be positive, got {}", args.fps);
        process::exit(2);
    }

    let loaded = load_scene(&args.scene, color_choice);
    let mut sim = match Simulation::new(&loaded.scene, args.start, !args.quiet) {
        Ok(sim) => sim,
        Err(error) => {
            report(color_choice, &loaded.files, &error);
            process::exit(1);
        }
    };

    let summary = match sim.run(args.ticks, args.fps) {
        Ok(summary) => summary,
        Err(error) => {
            report(color_choice, &loaded.files, &SimulationError::Runtime(error));
            process::exit(1);
        }
    };

    if args.variables {
        for (name, value) in sim.variables() {
            println!("{} = {}", name, value);
        }
    }

    let running = sim.running_scripts().join(", ");
    if running.is_empty() {
        eprintln!(
            "finished after {} ticks ({:.2}s)",
            summary.ticks, summary.elapsed
        );
    } else {
        eprintln!(
            "stopped after {} ticks ({:.2}s), still running: {}",
            summary.ticks, summary.elapsed, running
        );
    }
    sim.shutdown();
}

fn report(
    color_choice: ColorChoice,
    files: &SimpleFiles<String, String>,
    error: &SimulationError,
) {
    match error {
        SimulationError::Script(script_error) => {
            emit(color_choice, files, &script_error.to_diagnostic());
        }
        SimulationError::Runtime(_) => eprintln!("{}", error),
    }
}

fn emit(
    color_choice: ColorChoice,
    files: &SimpleFiles<String, String>,
    diagnostic: &Diagnostic<usize>,
) {
    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();
    let _ = term::emit_to_write_style(&mut writer.lock(), &config, files, diagnostic);
}
