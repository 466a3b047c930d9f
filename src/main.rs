//! depseal CLI entrypoint.
//!
//! Parses arguments, runs the selected command, and maps failures to a
//! non-zero exit status with the error and its causes on stderr.

use clap::Parser;
use depseal::cli::Cli;
use depseal::commands::run;
use depseal::error::Result;
use std::error::Error;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format_args!("error: {err}"));
            let mut cause = err.source();
            while let Some(source) = cause {
                write_stderr_line(stderr, format_args!("  caused by: {source}"));
                cause = source.source();
            }
            1
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort reporting; ignore write failures.
    }
}
