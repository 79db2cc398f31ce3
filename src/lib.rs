//! VM Translator - Full Stack VM to Hack Assembly Translator
//!
//! Translates VM bytecode (.vm) to Hack assembly (.asm) for the nand2tetris computer.
//! Supports all 20 VM commands including branching and function calls.
//!
//! # Usage Modes
//!
//! - Single file: `translate("source", "filename")` - no bootstrap
//! - Directory: `translate_directory(path)` - bootstrap is always emitted

pub mod bootstrap;
pub mod codegen;
pub mod error;
pub mod memory;
pub mod parser;

use std::fs;
use std::path::Path;

use crate::bootstrap::generate_bootstrap;
use crate::codegen::CodeGenerator;
pub use crate::error::{Result, VMError};
use crate::parser::{VMCommand, parse_line};

/// Cosmetic knobs that don't affect the translated program's behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct TranslateOptions {
    /// Emit a `// <source line>` comment above each translated instruction.
    pub comments: bool,
}

/// Translate a single VM source string to Hack assembly.
///
/// This is the single-file mode: no bootstrap is emitted.
pub fn translate(source: &str, filename: &str) -> Result<String> {
    translate_with_options(source, filename, &TranslateOptions::default())
}

/// Like [`translate`], with cosmetic output options.
pub fn translate_with_options(
    source: &str,
    filename: &str,
    opts: &TranslateOptions,
) -> Result<String> {
    let mut codegen = CodeGenerator::new();
    codegen.set_filename(filename);

    let estimated_size = source.lines().count() * 50;
    let mut output = String::with_capacity(estimated_size);

    for (line_num, line) in source.lines().enumerate() {
        translate_line(line, line_num + 1, filename, &mut codegen, &mut output, opts)?;
    }

    Ok(output)
}

/// Translate a single .vm file to Hack assembly.
pub fn translate_file(path: &Path) -> Result<String> {
    translate_file_with_options(path, &TranslateOptions::default())
}

/// Like [`translate_file`], with cosmetic output options.
pub fn translate_file_with_options(path: &Path, opts: &TranslateOptions) -> Result<String> {
    let filename = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Unknown");

    let source = fs::read_to_string(path).map_err(|e| VMError::FileRead {
        path: path.display().to_string(),
        source: e,
    })?;

    translate_with_options(&source, filename, opts)
}

/// Translate a .vm file using the given code generator.
///
/// This allows sharing state across multiple files (comparison counter and
/// per-function call counters survive across file boundaries).
fn translate_file_with_codegen(
    path: &Path,
    codegen: &mut CodeGenerator,
    opts: &TranslateOptions,
) -> Result<String> {
    let filename = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Unknown")
        .to_string();

    codegen.set_filename(&filename);

    let source = fs::read_to_string(path).map_err(|e| VMError::FileRead {
        path: path.display().to_string(),
        source: e,
    })?;

    let estimated_size = source.lines().count() * 50;
    let mut output = String::with_capacity(estimated_size);

    for (line_num, line) in source.lines().enumerate() {
        translate_line(line, line_num + 1, &filename, codegen, &mut output, opts)?;
    }

    Ok(output)
}

/// Parse one line and, if it yields a command, validate its scoping and emit
/// its assembly into `output` via `codegen`.
fn translate_line(
    line: &str,
    line_num: usize,
    filename: &str,
    codegen: &mut CodeGenerator,
    output: &mut String,
    opts: &TranslateOptions,
) -> Result<()> {
    let Some(cmd) = parse_line(line, line_num, filename)? else {
        return Ok(());
    };

    if matches!(cmd, VMCommand::Return) && codegen.current_function().is_empty() {
        return Err(VMError::ReturnOutsideFunction {
            line: line_num,
            file: filename.to_string(),
        });
    }

    if opts.comments {
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            output.push_str("// ");
            output.push_str(trimmed);
            output.push('\n');
        }
    }

    codegen.translate(&cmd, output);
    Ok(())
}

/// Translate all .vm files in a directory to a single .asm file.
///
/// - Bootstrap code is always emitted first, unconditionally.
/// - Files are processed in lexicographic order, matching the deterministic
///   ordering the CLI reports to the user.
/// - Returns the combined assembly output.
pub fn translate_directory(dir_path: &Path) -> Result<String> {
    translate_directory_with_options(dir_path, &TranslateOptions::default())
}

/// Like [`translate_directory`], with cosmetic output options.
pub fn translate_directory_with_options(
    dir_path: &Path,
    opts: &TranslateOptions,
) -> Result<String> {
    let mut vm_files: Vec<_> = fs::read_dir(dir_path)
        .map_err(|e| VMError::FileRead {
            path: dir_path.display().to_string(),
            source: e,
        })?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "vm"))
        .collect();

    if vm_files.is_empty() {
        return Err(VMError::NoVmFiles {
            path: dir_path.display().to_string(),
        });
    }

    vm_files.sort();

    let total_lines: usize = vm_files
        .iter()
        .map(|f| {
            fs::read_to_string(f)
                .map(|s| s.lines().count())
                .unwrap_or(0)
        })
        .sum();
    let mut output = String::with_capacity(total_lines * 50 + 512);

    let mut codegen = CodeGenerator::new();

    // A directory is a multi-file program by definition: the bootstrap is
    // emitted unconditionally, regardless of whether any file actually
    // defines Sys.init. A dangling `call Sys.init 0` is the assembler's
    // concern, not the translator's.
    output.push_str(&generate_bootstrap());

    for vm_file in vm_files {
        let asm = translate_file_with_codegen(&vm_file, &mut codegen, opts)?;
        output.push_str(&asm);
    }

    Ok(output)
}

/// Determine the output filename for a given input.
///
/// - Single file: Input.vm -> Input.asm
/// - Directory: dir/ -> dir/dir.asm
pub fn output_path(input: &Path) -> std::path::PathBuf {
    if input.is_dir() {
        let dir_name = input
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        input.join(format!("{}.asm", dir_name))
    } else {
        input.with_extension("asm")
    }
}
