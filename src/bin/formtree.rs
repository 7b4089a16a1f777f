#![allow(clippy::print_stderr)]

use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;

use formtree::cli::args::CliArgs;
use formtree::cli::{driver, reporter::Reporter};

const EXIT_SUCCESS: u8 = 0;
const EXIT_DIAGNOSTICS: u8 = 1;
const EXIT_USAGE: u8 = 2;

fn main() -> ExitCode {
    // Only when FORMTREE_LOG or RUST_LOG is set.
    formtree::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(err) => {
            eprintln!("error: failed to resolve current directory: {err}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let result = match driver::run(&args, &cwd) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    if let Some(output) = &result.output {
        println!("{output}");
    }

    if result.has_errors() {
        let pretty = result
            .options
            .pretty
            .unwrap_or_else(|| std::io::stderr().is_terminal());
        let reporter = Reporter::new(pretty).with_file(args.document.display().to_string());
        eprint!("{}", reporter.render(&result.diagnostics));
        return ExitCode::from(EXIT_DIAGNOSTICS);
    }

    ExitCode::from(EXIT_SUCCESS)
}
