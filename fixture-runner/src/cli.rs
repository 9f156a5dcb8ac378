use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "fixture-runner", about = "Run stepmark YAML fixtures")]
pub struct Cli {
    #[arg(default_value = "fixtures")]
    pub path: PathBuf,

    #[arg(long, default_value_t = false)]
    pub verbose: bool,
}
