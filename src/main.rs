use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use svgshrink::{FileSource, Optimizer, Options, RuleKind};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "svgshrink")]
#[command(about = "A rule-based SVG optimizer", long_about = None)]
struct Cli {
    /// Input files or directories (use - for stdin)
    #[arg(default_value = "-")]
    inputs: Vec<PathBuf>,

    /// Output file for a single input (- for stdout), or output directory
    /// when several files are processed
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run exactly these rules, in this order
    #[arg(long, value_delimiter = ',')]
    rules: Option<Vec<RuleKind>>,

    /// Disable these rules
    #[arg(long, value_delimiter = ',')]
    disable: Vec<RuleKind>,

    /// Shorten hex colors to #rgb where possible
    #[arg(long)]
    shorthand_colors: bool,

    /// List available rules and exit
    #[arg(long)]
    list_rules: bool,

    /// Print size comparison
    #[arg(short, long)]
    stats: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.list_rules {
        for kind in RuleKind::ALL {
            println!("{:<36}{}", kind.name(), kind.description());
        }
        return Ok(ExitCode::SUCCESS);
    }

    let options = build_options(&cli)?;
    let optimizer = Optimizer::new(&options);
    tracing::debug!(rules = ?optimizer.rule_names(), "configured rules");

    if let [input] = cli.inputs.as_slice() {
        if input.as_os_str() == "-" {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            run_single(&optimizer, &buf, &cli)?;
            return Ok(ExitCode::SUCCESS);
        }
        if input.is_file() && cli.output.as_ref().is_some_and(|o| o.as_os_str() == "-") {
            run_single(&optimizer, &fs::read_to_string(input)?, &cli)?;
            return Ok(ExitCode::SUCCESS);
        }
    }

    let jobs = collect_jobs(&cli)?;
    let mut failed = 0;
    for mut job in jobs {
        match optimizer.optimize_source(&mut job) {
            Ok(metadata) => {
                if cli.stats {
                    eprintln!("{}: {}", job.input().display(), metadata);
                }
            }
            Err(e) => {
                tracing::error!(file = %job.input().display(), error = %e, "failed to optimize");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        eprintln!("{} file(s) failed", failed);
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_options(cli: &Cli) -> Result<Options, Box<dyn std::error::Error>> {
    let mut options = match &cli.config {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };

    if let Some(rules) = &cli.rules {
        options = Options {
            shorthand_colors: options.shorthand_colors,
            order: Some(rules.clone()),
            ..Options::default()
        };
        options.validate()?;
    }
    for &kind in &cli.disable {
        options.set_enabled(kind, false);
    }
    if cli.shorthand_colors {
        options.shorthand_colors = true;
    }
    Ok(options)
}

/// Optimize one in-memory document to stdout or the `--output` file.
fn run_single(optimizer: &Optimizer, input: &str, cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let optimized = optimizer.optimize(input)?;

    match &cli.output {
        Some(path) if path.as_os_str() != "-" => fs::write(path, &optimized.markup)?,
        _ => io::stdout().write_all(optimized.markup.as_bytes())?,
    }

    if cli.stats {
        eprintln!("{}", optimized.metadata);
    }
    Ok(())
}

/// Expand inputs into (input, output) pairs.
fn collect_jobs(cli: &Cli) -> Result<Vec<FileSource>, Box<dyn std::error::Error>> {
    let mut files: Vec<(PathBuf, PathBuf)> = Vec::new();
    for input in &cli.inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input).sort_by_file_name() {
                let entry = entry?;
                let path = entry.path();
                // Skip our own previous output
                let is_minified = path.to_string_lossy().ends_with(".min.svg");
                if entry.file_type().is_file() && path.extension().is_some_and(|e| e == "svg") && !is_minified {
                    let relative = path.strip_prefix(input)?.to_path_buf();
                    files.push((path.to_path_buf(), relative));
                }
            }
        } else {
            let name = input.file_name().map(PathBuf::from).unwrap_or_else(|| input.clone());
            files.push((input.clone(), name));
        }
    }

    let single = files.len() == 1 && !cli.inputs[0].is_dir();
    let jobs = files
        .into_iter()
        .map(|(input, relative)| {
            let output = match &cli.output {
                Some(out) if single => out.clone(),
                Some(dir) => dir.join(relative),
                None => minified_name(&input),
            };
            FileSource::new(input, output)
        })
        .collect();
    Ok(jobs)
}

/// `icon.svg` → `icon.min.svg`
fn minified_name(input: &Path) -> PathBuf {
    let stem = input.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    input.with_file_name(format!("{}.min.svg", stem))
}
