use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use stepmark::{EngineConfig, Locator, ParameterNames, StackTrace};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod repl;
mod session;

use session::{Session, parse_arg};

#[derive(Parser)]
#[command(
    name = "stepmark",
    about = "Preview step descriptions and locate call sites in stack traces"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    /// Print version and exit
    #[arg(long)]
    version: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Render a description template against parameter names and arguments
    Render {
        template: String,
        /// Declared parameter name, in order
        #[arg(long = "param")]
        params: Vec<String>,
        /// Signature text to take parameter names from instead of --param
        #[arg(long, conflicts_with = "params")]
        signature: Option<String>,
        /// Argument value as JSON; anything else is taken as a string
        #[arg(long = "arg")]
        args: Vec<String>,
    },
    /// Print the first caller frame of a stack trace
    Locate {
        /// Trace file; reads stdin when absent
        file: Option<PathBuf>,
        /// Leading frames to skip; defaults to STEPMARK_FRAME_DEPTH, then 0
        #[arg(long)]
        skip: Option<usize>,
        /// Extra path fragment to ignore
        #[arg(long = "ignore")]
        ignore: Vec<String>,
        /// List every parsed frame before the result
        #[arg(long)]
        frames: bool,
    },
    /// Print a stack trace without the wrapper's own frames
    Scrub {
        /// Trace file; reads stdin when absent
        file: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.version {
        println!(
            "{} {}",
            "stepmark".bright_cyan().bold(),
            env!("CARGO_PKG_VERSION").bright_black()
        );
        return;
    }

    let code = match cli.command {
        None => match repl::run() {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("{} {err}", "repl error:".red().bold());
                1
            }
        },
        Some(Command::Render {
            template,
            params,
            signature,
            args,
        }) => {
            let params = match signature {
                Some(sig) => ParameterNames::from_signature(&sig),
                None => ParameterNames::new(params),
            };
            let args = args.iter().map(|raw| parse_arg(raw)).collect();
            render(&Session::new(params, args), &template)
        }
        Some(Command::Locate {
            file,
            skip,
            ignore,
            frames,
        }) => match read_input(file.as_ref()) {
            Ok(trace) => locate(&trace, skip, ignore, frames),
            Err(code) => code,
        },
        Some(Command::Scrub { file }) => match read_input(file.as_ref()) {
            Ok(trace) => {
                println!("{}", Locator::new().scrub(&trace));
                0
            }
            Err(code) => code,
        },
    };

    process::exit(code);
}

fn render(session: &Session, template: &str) -> i32 {
    match session.render(template) {
        Ok(text) => {
            println!("{text}");
            0
        }
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            1
        }
    }
}

/// Locator for the `locate` subcommand. Flags win over `STEPMARK_*`
/// variables; ignore patterns from both are combined.
fn build_locator(config: EngineConfig, skip: Option<usize>, ignore: Vec<String>) -> Locator {
    let depth = skip.unwrap_or(config.own_frame_depth);
    config
        .ignore
        .into_iter()
        .chain(ignore)
        .fold(Locator::new().with_own_frame_depth(depth), Locator::with_ignored)
}

fn locate(trace: &str, skip: Option<usize>, ignore: Vec<String>, frames: bool) -> i32 {
    let locator = build_locator(EngineConfig::from_env(), skip, ignore);
    let skip = locator.own_frame_depth();
    tracing::debug!(
        skip,
        ignored = locator.ignored().count(),
        "locating call site"
    );

    if frames {
        let parsed = StackTrace::parse(trace);
        for (idx, frame) in parsed.frames().iter().enumerate() {
            let name = frame.function_name.as_deref().unwrap_or("<anonymous>");
            let place = frame
                .location
                .as_ref()
                .map_or_else(|| "<no location>".to_string(), ToString::to_string);
            let skipped = idx < skip
                || locator.is_own_frame(frame)
                || frame.file().is_none_or(|f| locator.is_ignored(f));
            if skipped {
                println!("{:>3} {} {}", idx, name.bright_black(), place.bright_black());
            } else {
                println!("{:>3} {} {}", idx, name.bright_white(), place.cyan());
            }
        }
    }

    match locator.locate(trace) {
        Some(location) => {
            println!("{}", location.to_string().green().bold());
            0
        }
        None => {
            eprintln!("{}", "no location".yellow());
            1
        }
    }
}

fn read_input(file: Option<&PathBuf>) -> Result<String, i32> {
    match file {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            eprintln!(
                "{} could not read '{}': {e}",
                "error:".red().bold(),
                path.display().to_string().yellow()
            );
            1
        }),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).map_err(|e| {
                eprintln!("{} could not read stdin: {e}", "error:".red().bold());
                1
            })?;
            Ok(buf)
        }
    }
}
