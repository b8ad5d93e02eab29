//! Print every task ordered by due date, one line per task.
//!
//! Reads the same task file as `tt` (honoring `tasktray.toml` in the
//! working directory) and never writes to it. Takes no arguments.

use tasktray::cli::handlers::{self, Context};
use tasktray::logging;

fn main() {
    logging::init_stderr(0);

    let result = Context::resolve(None, None).and_then(|ctx| handlers::cmd_due(&ctx, false));
    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
