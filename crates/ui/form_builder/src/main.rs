mod action;
mod app;
mod cli;
mod components;
mod config;
mod errors;
mod logging;
mod schema_file;
mod tui;

use crate::app::App;
use crate::cli::{Cli, Cmd};
use crate::config::Config;

use clap::Parser;
use color_eyre::Result;
use form::initialize;

#[tokio::main]
pub async fn main() -> Result<()> {
    let args = Cli::parse();
    errors::init()?;

    let cmd = args.cmd_or_default();
    let schema_path = match &cmd {
        Cmd::Run(arg) | Cmd::Init(arg) => arg.schema.clone(),
        Cmd::Schema => None,
    };
    let config = Config::new()?.merge_cli(schema_path, args.tick_rate, args.frame_rate)?;
    logging::init(&config.config.data_dir)?;

    match cmd {
        Cmd::Run(_) => {
            let document = schema_file::load_or_demo(config.schema.as_deref())?;
            let mut app = App::new(config, document);
            app.run().await?;
        }
        Cmd::Init(_) => {
            let document = schema_file::load_or_demo(config.schema.as_deref())?;
            println!("{}", initialize(&document.schema.fields).to_pretty_json());
        }
        Cmd::Schema => {
            let document = schema_file::demo_document();
            println!("{}", serde_json::to_string_pretty(&document.schema)?);
        }
    }
    Ok(())
}
