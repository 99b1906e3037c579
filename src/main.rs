/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */

use anyhow::{anyhow, Result};
use fsplit::utils::common::{chunk_noun, format_size};
use fsplit::utils::log::LogConfig;
use fsplit::utils::logfile::LogFile;
use fsplit::{
    Command, ConcatCommand, Concatenator, CopyResult, Invocation, Settings, SplitCommand,
    SplitPolicy, Splitter,
};
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args_os()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    let invocation = Invocation::from_args(std::env::args_os());
    let settings = &invocation.settings;
    LogConfig::init_logger(settings.quiet, settings.verbose);

    let result = match &invocation.command {
        Command::Info(message) => {
            println!("{}", message);
            Ok(())
        }
        Command::Wrong(message) => Err(anyhow!("{}", message)),
        Command::Split(cmd) => run_split(cmd, settings, &args),
        Command::Concat(cmd) => run_concat(cmd, settings, &args),
    };

    // 错误信息输出到标准输出
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn open_log_file(settings: &Settings, args: &[String]) -> Result<Option<LogFile>> {
    let Some(path) = &settings.log_file else {
        return Ok(None);
    };
    let mut log_file = LogFile::new(path, settings.log_append)?;
    log_file.log_command(args)?;
    Ok(Some(log_file))
}

fn report_chunk(log_file: &mut Option<LogFile>, verb: &str, path: &Path, size: u64) {
    LogConfig::println_verbose(&format!(
        "  {} {} ({})",
        verb,
        path.display(),
        format_size(size, 1)
    ));
    if let Some(log_file) = log_file.as_mut() {
        if let Err(e) = log_file.log_chunk(path, size) {
            log::warn!("failed to write log file: {:#}", e);
        }
    }
}

fn warn_about_plan(cmd: &SplitCommand) {
    let Ok(input_size) = std::fs::metadata(&cmd.input).map(|m| m.len()) else {
        return;
    };
    if input_size == 0 {
        LogConfig::println_warning(&format!(
            "{} is empty, no chunks written",
            cmd.input.display()
        ));
    } else if let SplitPolicy::ByParts(parts) = cmd.policy {
        if parts > input_size {
            LogConfig::println_warning(&format!(
                "{} parts requested, but {} has only {} bytes",
                parts,
                cmd.input.display(),
                input_size
            ));
        }
    }
}

fn run_split(cmd: &SplitCommand, settings: &Settings, args: &[String]) -> Result<()> {
    let mut log_file = open_log_file(settings, args)?;
    warn_about_plan(cmd);

    let result = Splitter::new(&cmd.input, &cmd.output)
        .with_chunk_callback(|path, size| report_chunk(&mut log_file, "writing", path, size))
        .run(cmd.policy);
    finish(result, log_file, "split into")
}

fn run_concat(cmd: &ConcatCommand, settings: &Settings, args: &[String]) -> Result<()> {
    let mut log_file = open_log_file(settings, args)?;

    let mut concatenator = Concatenator::new(&cmd.input, cmd.output.clone())
        .with_chunk_callback(|path, size| report_chunk(&mut log_file, "reading", path, size));
    let output = concatenator.output().to_path_buf();
    let result = concatenator.run();
    drop(concatenator);

    let verb = format!("joined into {},", output.display());
    finish(result, log_file, &verb)
}

fn finish(result: CopyResult, mut log_file: Option<LogFile>, verb: &str) -> Result<()> {
    if result.is_ok() {
        LogConfig::println_verbose(&format!(
            "{} {} {} ({})",
            verb,
            result.chunks,
            chunk_noun(result.chunks),
            format_size(result.bytes_copied, 1)
        ));
    }
    if let Some(log_file) = log_file.as_mut() {
        if let Some(e) = &result.error {
            log_file.log_error(e)?;
        }
        log_file.log_summary(result.chunks, result.bytes_copied)?;
        log_file.close()?;
    }
    result.into_result()?;
    Ok(())
}
