/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */

use crate::error::FsplitError;
use crate::planner;
use clap::{ArgAction, Args, Parser};
use std::path::PathBuf;

pub const SHORT_INFO: &str = "Run 'fsplit --help' for usage.";

#[derive(Debug, Clone, Parser, Default, PartialEq, Eq)]
#[command(
    name = "fsplit",
    about = "fsplit splits files into many, or combines them back to one",
    disable_version_flag = true
)]
pub struct FsplitArgs {
    #[command(flatten)]
    pub info: InfoOptions,

    #[command(flatten)]
    pub operation: OperationOptions,

    #[command(flatten)]
    pub paths: PathOptions,

    #[command(flatten)]
    pub display: DisplayOptions,

    #[command(flatten)]
    pub logging: LoggingOptions,
}

#[derive(Debug, Clone, Args, Default, PartialEq, Eq)]
#[group(id = "info_options")]
#[command(next_help_heading = "Info")]
pub struct InfoOptions {
    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::SetTrue, exclusive = true)]
    pub version: bool,

    /// Print usage examples
    #[arg(short = 'e', long = "example", action = ArgAction::SetTrue, exclusive = true)]
    pub example: bool,

    /// Print copyright
    #[arg(long = "copyright", action = ArgAction::SetTrue, exclusive = true)]
    pub copyright: bool,
}

#[derive(Debug, Clone, Args, Default, PartialEq, Eq)]
#[group(id = "operation", multiple = false)]
#[command(next_help_heading = "Command")]
pub struct OperationOptions {
    /// Split file into N parts (chunks)
    #[arg(short = 'p', long = "parts", value_name = "N", allow_hyphen_values = true,
        value_parser = parse_parts_arg)]
    pub parts: Option<u64>,

    /// Split file into N bytes per chunk, U = unit (k/K, m/M or g/G)
    #[arg(short = 'b', long = "bytes", value_name = "N[U]", allow_hyphen_values = true,
        value_parser = parse_bytes_arg)]
    pub bytes: Option<u64>,

    /// Split file into N lines per chunk
    #[arg(short = 'l', long = "lines", value_name = "N", allow_hyphen_values = true,
        value_parser = parse_lines_arg)]
    pub lines: Option<u64>,

    /// Concatenate files (INPUT-FILE is only one file, the first one)
    #[arg(short = 'c', long = "concat", action = ArgAction::SetTrue)]
    pub concat: bool,
}

#[derive(Debug, Clone, Args, Default, PartialEq, Eq)]
#[group(id = "path_options")]
#[command(next_help_heading = "Files")]
pub struct PathOptions {
    /// Input file
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output file (base name of the chunks when splitting)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// INPUT-FILE [OUTPUT-FILE]
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Args, Default, PartialEq, Eq)]
#[group(id = "display_options")]
#[command(next_help_heading = "Display")]
pub struct DisplayOptions {
    /// Quiet operation, no warnings
    #[arg(short = 'q', long = "quiet", action = ArgAction::SetTrue, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print every chunk as it is written or read
    #[arg(long = "verbose", action = ArgAction::SetTrue, conflicts_with = "quiet")]
    pub verbose: bool,
}

#[derive(Debug, Clone, Args, Default, PartialEq, Eq)]
#[group(id = "logging")]
#[command(next_help_heading = "Logging")]
pub struct LoggingOptions {
    /// Open file at path as logfile (overwrite existing file)
    #[arg(long = "lf", value_name = "LOGFILE")]
    pub logfile: Option<PathBuf>,

    /// Append to existing logfile
    #[arg(long = "la", action = ArgAction::SetTrue, requires = "logfile")]
    pub logfile_append: bool,
}

pub fn version_text() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

pub fn copyright_text() -> String {
    [
        "Copyright 2025 UnionTech Software Technology Co., Ltd.",
        "Distributed under the GNU General Public License, version 2 or later.",
    ]
    .join("\n")
}

pub fn example_text() -> String {
    [
        "EXAMPLES",
        "  fsplit data.bin                 split data.bin into data.bin.1 and data.bin.2",
        "  fsplit -p=12 data.bin           split into data.bin.01 .. data.bin.12",
        "  fsplit -b=4m data.bin part      split into 4 MiB chunks part.1, part.2, ...",
        "  fsplit -l=1000 log.txt          split into chunks of 1000 lines",
        "  fsplit -c data.bin.01           concatenate data.bin.01, data.bin.02, ... into data.bin",
        "  fsplit -c data.bin joined.bin   concatenate the chunks of data.bin into joined.bin",
    ]
    .join("\n")
}

// 解析失败时返回 FsplitError, 分类时从 clap 错误中取回
fn parse_parts_arg(s: &str) -> Result<u64, FsplitError> {
    planner::parse_count("number of parts", s)
}

fn parse_lines_arg(s: &str) -> Result<u64, FsplitError> {
    planner::parse_count("number of lines", s)
}

fn parse_bytes_arg(s: &str) -> Result<u64, FsplitError> {
    planner::parse_byte_size(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn argument_definitions_are_consistent() {
        FsplitArgs::command().debug_assert();
    }

    #[test]
    fn accepts_equals_and_space_forms() {
        let args = FsplitArgs::try_parse_from(["fsplit", "-p=5", "a.txt"]).unwrap();
        assert_eq!(args.operation.parts, Some(5));
        assert_eq!(args.paths.paths, vec![PathBuf::from("a.txt")]);

        let args = FsplitArgs::try_parse_from(["fsplit", "--bytes", "4k", "a.txt", "b"]).unwrap();
        assert_eq!(args.operation.bytes, Some(4096));
        assert_eq!(args.paths.paths.len(), 2);

        let args = FsplitArgs::try_parse_from(["fsplit", "-l", "-3", "a.txt"]).unwrap();
        assert_eq!(args.operation.lines, Some(3));
    }

    #[test]
    fn operations_are_mutually_exclusive() {
        assert!(FsplitArgs::try_parse_from(["fsplit", "-p=2", "-b=4k", "a.txt"]).is_err());
        assert!(FsplitArgs::try_parse_from(["fsplit", "-c", "-l=3", "a.txt"]).is_err());
    }

    #[test]
    fn options_may_appear_once() {
        assert!(FsplitArgs::try_parse_from(["fsplit", "-c", "-c", "a.txt"]).is_err());
        assert!(FsplitArgs::try_parse_from(["fsplit", "-p=2", "-p=3", "a.txt"]).is_err());
    }

    #[test]
    fn info_flags_stand_alone() {
        assert!(FsplitArgs::try_parse_from(["fsplit", "--version"]).is_ok());
        assert!(FsplitArgs::try_parse_from(["fsplit", "--version", "--copyright"]).is_err());
        assert!(FsplitArgs::try_parse_from(["fsplit", "-v", "a.txt"]).is_err());
    }

    #[test]
    fn log_append_requires_logfile() {
        assert!(FsplitArgs::try_parse_from(["fsplit", "--la", "a.txt"]).is_err());
        assert!(FsplitArgs::try_parse_from(["fsplit", "--lf", "x.log", "--la", "a.txt"]).is_ok());
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        assert!(FsplitArgs::try_parse_from(["fsplit", "-b=12q", "a.txt"]).is_err());
        assert!(FsplitArgs::try_parse_from(["fsplit", "-p=many", "a.txt"]).is_err());
    }
}
