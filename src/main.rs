use clap::Parser;
use tasktray::cli::commands::Cli;
use tasktray::cli::handlers;
use tasktray::logging;

fn main() {
    let cli = Cli::parse();

    // The TUI sets up its own file logging once it knows the task file
    if cli.command.is_some() {
        logging::init_stderr(cli.verbose);
    }

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
