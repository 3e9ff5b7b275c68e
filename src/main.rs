// Entry point - CLI parsing and wiring

use std::process;

use clap::Parser;
use colored::Colorize;

mod app;
mod auth;
mod command;
mod config;
mod error;
mod settings;

use crate::app::App;
use crate::command::Command;

#[derive(Parser)]
#[command(name = "azrs")]
#[command(about = "Deploy static sites to Azure and manage their app settings")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let app = App::new();
    if let Err(err) = app.run(cli.command) {
        eprintln!("{} {}", "error:".red().bold(), err);
        process::exit(1);
    }
}
