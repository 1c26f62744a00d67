//! actionscope CLI Entry Point
//!
//! Lists a repository's workflows with their runner compatibility and the
//! dispatch inputs of a selected workflow.
//!
//! # Usage
//!
//! ```bash
//! # List workflows of the current repository against a runner roster
//! actionscope --runners runners.yaml
//!
//! # Show the dispatch form of one workflow
//! actionscope /path/to/repo --runners runners.yaml --workflow deploy.yml
//!
//! # Add labels by hand and print JSON
//! actionscope --label ubuntu-latest --label self-hosted --json
//! ```

use std::collections::HashSet;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use colored::Colorize;
use log::{debug, info};

use actionscope::workflow::{discover_workflows, list_workflows, load_runners, DispatchInputNode};
use actionscope::{LabelSet, Listing, ListingOptions, WorkflowStatus, APP_NAME, VERSION};

/// Repository scanned when none is specified.
const DEFAULT_REPO_DIR: &str = ".";

/// Command-line configuration parsed from arguments.
#[derive(Debug)]
struct Config {
    repo_dir: PathBuf,
    runners_path: Option<PathBuf>,
    extra_labels: Vec<String>,
    selected: Option<String>,
    disabled: HashSet<String>,
    json: bool,
    verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo_dir: PathBuf::from(DEFAULT_REPO_DIR),
            runners_path: None,
            extra_labels: Vec::new(),
            selected: None,
            disabled: HashSet::new(),
            json: false,
            verbose: false,
        }
    }
}

/// Configures the logging system with appropriate formatting.
fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            use std::io::Write;

            match record.level() {
                log::Level::Warn | log::Level::Error => {
                    writeln!(buf, "[{}] {}", record.level(), record.args())
                }
                _ => writeln!(buf, "{}", record.args()),
            }
        })
        .init();
}

/// Prints usage information.
fn print_usage() {
    println!("Usage: actionscope [OPTIONS] [REPO_DIR]");
    println!();
    println!("Arguments:");
    println!("  [REPO_DIR]          Repository checkout to scan (default: {})", DEFAULT_REPO_DIR);
    println!();
    println!("Options:");
    println!("  --runners PATH      Runner roster YAML file");
    println!("  --label LABEL       Treat LABEL as offered by a runner (repeatable)");
    println!("  --workflow FILE     Show dispatch inputs of this workflow file");
    println!("  --disable FILE      Mark a workflow file as disabled (repeatable)");
    println!("  --json              Print the listing as JSON");
    println!("  --verbose           Enable debug logging");
    println!("  --help              Show this help message");
    println!("  --version           Show version information");
    println!();
    println!("Examples:");
    println!("  actionscope --runners runners.yaml");
    println!("  actionscope ~/src/app --label ubuntu-latest --workflow deploy.yml");
}

/// Returns the value following an option, advancing the cursor.
fn option_value(args: &[String], i: &mut usize, option: &str) -> Result<String, String> {
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| format!("{} requires an argument", option))
}

/// Parses command-line arguments into a Config struct.
fn parse_arguments(args: &[String]) -> Result<Config, String> {
    let mut config = Config::default();
    let mut positional_index = 0;
    let mut i = 1; // Skip program name

    while i < args.len() {
        let arg = &args[i];

        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("{} {}", APP_NAME, VERSION);
                std::process::exit(0);
            }
            "--json" => {
                config.json = true;
            }
            "--verbose" | "-v" => {
                config.verbose = true;
            }
            "--runners" => {
                config.runners_path = Some(PathBuf::from(option_value(args, &mut i, arg)?));
            }
            "--label" => {
                config.extra_labels.push(option_value(args, &mut i, arg)?);
            }
            "--workflow" => {
                config.selected = Some(option_value(args, &mut i, arg)?);
            }
            "--disable" => {
                config.disabled.insert(option_value(args, &mut i, arg)?);
            }
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown option: {}", arg));
            }
            _ => {
                match positional_index {
                    0 => config.repo_dir = PathBuf::from(arg),
                    _ => return Err(format!("Unexpected argument: {}", arg)),
                }
                positional_index += 1;
            }
        }
        i += 1;
    }

    Ok(config)
}

/// Builds the available label set from the roster and extra labels.
fn collect_labels(config: &Config) -> Result<LabelSet, Box<dyn std::error::Error>> {
    let mut labels = match &config.runners_path {
        Some(path) => LabelSet::from_runners(&load_runners(path)?),
        None => LabelSet::new(),
    };
    labels.add_multiple(config.extra_labels.iter().cloned());

    debug!("Available labels: {:?}", labels.sorted());
    Ok(labels)
}

/// Prints one dispatch input as a form line.
fn print_input(node: &DispatchInputNode) {
    let input = &node.value;
    let mut line = format!("  {} ({:?})", node.key.bold(), input.kind);
    if input.required {
        line.push_str(&format!(" {}", "required".yellow()));
    }
    if let Some(default) = &input.default {
        line.push_str(&format!(" default={}", default));
    }
    if !input.options.is_empty() {
        line.push_str(&format!(" options=[{}]", input.options.join(", ")));
    }
    println!("{}", line);
    if let Some(description) = &input.description {
        println!("      {}", description.dimmed());
    }
}

/// Prints the listing as human-readable text.
fn print_listing(listing: &Listing) {
    println!();
    for entry in &listing.entries {
        let title = match &entry.name {
            Some(name) => format!("{} ({})", entry.file_name, name),
            None => entry.file_name.clone(),
        };
        match &entry.status {
            WorkflowStatus::Ready => println!("{} {}", "✓".green(), title),
            WorkflowStatus::NoMatchingRunner { label } => println!(
                "{} {} - no runner offers label '{}'",
                "!".yellow(),
                title,
                label
            ),
            WorkflowStatus::Invalid { message } => {
                println!("{} {} - invalid workflow: {}", "✗".red(), title, message)
            }
        }
    }

    let Some(selected) = &listing.selected else {
        return;
    };

    println!();
    if listing.selected_disabled {
        println!("Workflow {} is disabled", selected.bold());
        return;
    }
    match &listing.dispatch_inputs {
        Some(inputs) if inputs.is_empty() => {
            println!("Workflow {} can be dispatched without inputs", selected.bold())
        }
        Some(inputs) => {
            println!("Dispatch inputs for {}:", selected.bold());
            inputs.iter().for_each(print_input);
        }
        None => println!("Workflow {} has no manual dispatch inputs", selected.bold()),
    }
}

/// Main application entry point.
fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let config = parse_arguments(&args).map_err(|e| {
        eprintln!("Error: {}", e);
        eprintln!();
        print_usage();
        e
    })?;

    setup_logging(config.verbose);

    info!("Scanning repository: {}", config.repo_dir.display());

    let labels = collect_labels(&config)?;
    let files = discover_workflows(&config.repo_dir)?;

    let options = ListingOptions {
        selected: config.selected.clone(),
        disabled: config.disabled.clone(),
    };
    let listing = list_workflows(&files, &labels, &options);

    if config.json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        print_listing(&listing);
    }

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!();
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
