//! crosslink binary entry point.

#![allow(clippy::print_stderr)]

use crosslink::cli::{self, EXIT_OK, exit_code_for, render_error};
use crosslink::commands;
use crosslink::tracing::{TracingConfig, init_tracing};

fn main() {
    // Tracing may be unusable while panicking, so write straight to stderr.
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = cli::parse();

    let tracing_config = TracingConfig {
        format: cli.log_format,
        level: cli.level.into(),
        ..TracingConfig::default()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("Warning: {e}");
    }

    let exit_code = match commands::run(&cli) {
        Ok(()) => EXIT_OK,
        Err(err) => {
            render_error(&err);
            exit_code_for(&err)
        }
    };
    std::process::exit(exit_code);
}
