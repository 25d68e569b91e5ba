use anyhow::Result;
use clap::Parser;
use loxfront::lox::{run_file, run_prompt};
use std::{path::PathBuf, process};

/// Exit status when a script scanned with errors.
const EXIT_SCAN_ERROR: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "loxfront", about = "Scan Lox source and echo its tokens")]
struct Args {
    /// Script to scan. Without it an interactive prompt is started.
    script: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.script {
        Some(script) => {
            if run_file(&script)? {
                process::exit(EXIT_SCAN_ERROR);
            }
        }
        None => run_prompt()?,
    }

    Ok(())
}
