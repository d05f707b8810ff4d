use clap::{CommandFactory, Parser};
use czmil_noise_filter::cli::{Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    // Usage errors print the usage line and stop before touching any file
    let config = match args.validate() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Error: {}\n", error);
            eprintln!("{}", Args::command().render_long_help());
            process::exit(1);
        }
    };

    commands::setup_logging(&args);

    match commands::run(&args, config) {
        Ok(_stats) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
