use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "form_builder", version, about = "Render a field schema as a terminal form")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Cmd>,

    /// Tick rate, i.e. number of ticks per second
    #[arg(short, long, global = true, value_name = "FLOAT")]
    pub tick_rate: Option<f64>,

    /// Frame rate, i.e. number of frames per second
    #[arg(short, long, global = true, value_name = "FLOAT")]
    pub frame_rate: Option<f64>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Cmd {
    /// Run the interactive form (default)
    Run(SchemaArg),
    /// Print the initial value map of a schema as JSON
    Init(SchemaArg),
    /// Print the built-in demo schema as JSON
    Schema,
}

#[derive(Args, Debug, Default, Clone)]
pub struct SchemaArg {
    /// Schema file (.json, .json5 or .toml); defaults to the demo schema
    #[arg(short, long, value_name = "FILE")]
    pub schema: Option<PathBuf>,
}

impl Cli {
    pub fn cmd_or_default(&self) -> Cmd {
        self.cmd
            .clone()
            .unwrap_or_else(|| Cmd::Run(SchemaArg::default()))
    }
}
