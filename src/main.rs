//! VM Translator CLI
//!
//! Translates VM bytecode to Hack assembly.
//!
//! # Usage
//!
//! ```bash
//! # Single file
//! hack-vm-translator SimpleAdd.vm
//!
//! # Directory (bootstrap is always emitted)
//! hack-vm-translator FibonacciElement/
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser as ClapParser;
use log::{debug, info};

use hack_vm_translator::{
    TranslateOptions, VMError, output_path, translate_directory_with_options,
    translate_file_with_options,
};

#[derive(ClapParser, Debug)]
#[command(name = "hack-vm-translator")]
#[command(author = "nand2tetris")]
#[command(version = "1.0.0")]
#[command(about = "Translator from the nand2tetris VM language to Hack assembly")]
struct Args {
    /// Input .vm file or directory containing .vm files
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Enable verbose (info-level) logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit a source comment above each translated instruction
    #[arg(long)]
    comments: bool,

    /// Write the assembly to PATH instead of the default sibling .asm file
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // clap prints its own message (usage/help/version); only the exit
            // code matters here, and misuse is sysexits.h's EX_USAGE.
            let _ = e.print();
            return ExitCode::from(64);
        }
    };

    let default_level = if args.verbose { "info" } else { "warn" };
    pretty_env_logger::formatted_builder()
        .parse_filters(&std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string()))
        .init();

    if !args.input.exists() {
        eprintln!("Error: path not found: {}", args.input.display());
        return ExitCode::from(1);
    }

    let start = Instant::now();
    let opts = TranslateOptions {
        comments: args.comments,
    };

    let result = if args.input.is_dir() {
        run_directory(&args.input, args.output.as_deref(), &opts)
    } else if args.input.extension().is_some_and(|ext| ext == "vm") {
        run_file(&args.input, args.output.as_deref(), &opts)
    } else {
        Err(VMError::InvalidPath {
            path: args.input.display().to_string(),
        })
    };

    match result {
        Ok(output_file) => {
            let elapsed = start.elapsed();
            info!(
                "translated {} -> {} in {:.2}ms",
                args.input.display(),
                output_file.display(),
                elapsed.as_secs_f64() * 1000.0
            );
            println!("{}", output_file.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run_file(
    input: &Path,
    output: Option<&Path>,
    opts: &TranslateOptions,
) -> Result<PathBuf, VMError> {
    debug!("translating single file: {}", input.display());

    let asm = translate_file_with_options(input, opts)?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| output_path(input));

    fs::write(&output, &asm).map_err(|e| VMError::FileWrite {
        path: output.display().to_string(),
        source: e,
    })?;

    info!("generated {} lines of assembly", asm.lines().count());
    Ok(output)
}

fn run_directory(
    input: &Path,
    output: Option<&Path>,
    opts: &TranslateOptions,
) -> Result<PathBuf, VMError> {
    debug!("translating directory: {}", input.display());

    let asm = translate_directory_with_options(input, opts)?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| output_path(input));

    fs::write(&output, &asm).map_err(|e| VMError::FileWrite {
        path: output.display().to_string(),
        source: e,
    })?;

    info!("generated {} lines of assembly", asm.lines().count());
    Ok(output)
}
