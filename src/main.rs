pub mod annot;
pub mod binder;
pub mod builder;
pub mod cli;
pub mod error;
pub mod generator;
pub mod name;
pub mod reader;
pub mod schema;
pub mod value;

use colored::Colorize;

fn main() {
    let command_line_interface = cli::CommandLineInterface::load();
    if let Err(error) = command_line_interface.run() {
        eprintln!("{} {error:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
