/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */

use crate::cli::{self, FsplitArgs};
use crate::error::FsplitError;
use crate::planner::SplitPolicy;
use clap::error::ErrorKind;
use clap::Parser;
use std::error::Error as _;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;

/// Classification state of a command line. Starts at `None` and moves to
/// exactly one of the other states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandKind {
    #[default]
    None,
    Info,
    Split,
    Concat,
    Wrong,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitCommand {
    pub input: PathBuf,
    /// Base name the chunk suffixes are appended to.
    pub output: PathBuf,
    pub policy: SplitPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcatCommand {
    /// First chunk, or the name the chunks were split from.
    pub input: PathBuf,
    /// `None` joins the chunks into their base name.
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Info(String),
    Split(SplitCommand),
    Concat(ConcatCommand),
    Wrong(String),
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Info(_) => CommandKind::Info,
            Command::Split(_) => CommandKind::Split,
            Command::Concat(_) => CommandKind::Concat,
            Command::Wrong(_) => CommandKind::Wrong,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub quiet: bool,
    pub verbose: bool,
    pub log_file: Option<PathBuf>,
    pub log_append: bool,
}

impl From<&FsplitArgs> for Settings {
    fn from(args: &FsplitArgs) -> Self {
        Self {
            quiet: args.display.quiet,
            verbose: args.display.verbose,
            log_file: args.logging.logfile.clone(),
            log_append: args.logging.logfile_append,
        }
    }
}

/// A classified command line together with the output settings it asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    pub settings: Settings,
}

impl Invocation {
    pub fn from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match FsplitArgs::try_parse_from(args) {
            Ok(args) => Self {
                command: classify(&args),
                settings: Settings::from(&args),
            },
            Err(e) => Self {
                command: from_clap_error(&e),
                settings: Settings::default(),
            },
        }
    }
}

fn from_clap_error(e: &clap::Error) -> Command {
    match e.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            Command::Info(e.to_string().trim_end().to_string())
        }
        // 数值解析失败直接报告解析错误
        ErrorKind::ValueValidation => {
            match e.source().and_then(|s| s.downcast_ref::<FsplitError>()) {
                Some(parse_error) => Command::Wrong(parse_error.to_string()),
                None => wrong_usage(e),
            }
        }
        _ => wrong_usage(e),
    }
}

fn wrong_usage(e: &clap::Error) -> Command {
    let rendered = e.to_string();
    let first_line = rendered.lines().next().unwrap_or_default();
    let message = first_line.strip_prefix("error: ").unwrap_or(first_line);
    Command::Wrong(FsplitError::InvalidArguments(message.to_string()).to_string())
}

pub fn classify(args: &FsplitArgs) -> Command {
    let mut classifier = Classifier::new(args);
    classifier.interpret_info();
    classifier.interpret_paths();
    classifier.interpret_input();
    classifier.finish()
}

struct Classifier<'a> {
    args: &'a FsplitArgs,
    kind: CommandKind,
    message: String,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
}

impl<'a> Classifier<'a> {
    fn new(args: &'a FsplitArgs) -> Self {
        Self {
            args,
            kind: CommandKind::None,
            message: String::new(),
            input: None,
            output: None,
        }
    }

    fn settled(&self) -> bool {
        self.kind != CommandKind::None
    }

    fn transition(&mut self, kind: CommandKind, message: impl Into<String>) {
        if !self.settled() {
            self.kind = kind;
            self.message = message.into();
        }
    }

    fn wrong(&mut self, message: impl Into<String>) {
        self.transition(CommandKind::Wrong, message);
    }

    fn interpret_info(&mut self) {
        let args = self.args;
        let info = &args.info;
        if info.version {
            self.transition(CommandKind::Info, cli::version_text());
        } else if info.example {
            self.transition(CommandKind::Info, cli::example_text());
        } else if info.copyright {
            self.transition(CommandKind::Info, cli::copyright_text());
        } else if *args == FsplitArgs::default() {
            self.transition(CommandKind::Info, cli::SHORT_INFO);
        }
    }

    // 显式的 -i/-o 优先, 其余依次取未标记的路径参数
    fn interpret_paths(&mut self) {
        if self.settled() {
            return;
        }
        let args = self.args;
        let paths = &args.paths;
        let mut rest = paths.paths.iter();
        self.input = paths.input.clone().or_else(|| rest.next().cloned());
        self.output = paths.output.clone().or_else(|| rest.next().cloned());
        if let Some(unknown) = rest.next() {
            self.wrong(format!("unknown argument \"{}\"", unknown.display()));
        }
    }

    fn interpret_input(&mut self) {
        if self.settled() {
            return;
        }
        let Some(input) = self.input.clone() else {
            self.wrong("input file is not specified");
            return;
        };
        // 合并时由第一个分块决定输入是否存在
        if self.args.operation.concat {
            return;
        }
        match std::fs::metadata(&input) {
            Ok(meta) if meta.is_dir() => {
                self.wrong(FsplitError::InputIsDirectory(input).to_string());
            }
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.wrong(FsplitError::InputNotFound(input).to_string());
            }
            Err(e) => self.wrong(e.to_string()),
        }
    }

    fn finish(mut self) -> Command {
        if !self.settled() && self.input.is_none() {
            self.wrong("input file is not specified");
        }
        match (self.kind, self.input) {
            (CommandKind::Info, _) => Command::Info(self.message),
            (CommandKind::None, Some(input)) => {
                let operation = &self.args.operation;
                if operation.concat {
                    let output = self.output.filter(|output| *output != input);
                    Command::Concat(ConcatCommand { input, output })
                } else {
                    let policy = if let Some(parts) = operation.parts {
                        SplitPolicy::ByParts(parts)
                    } else if let Some(bytes) = operation.bytes {
                        SplitPolicy::ByByteSize(bytes)
                    } else if let Some(lines) = operation.lines {
                        SplitPolicy::ByLineCount(lines)
                    } else {
                        SplitPolicy::default()
                    };
                    let output = self.output.unwrap_or_else(|| input.clone());
                    Command::Split(SplitCommand {
                        input,
                        output,
                        policy,
                    })
                }
            }
            _ => Command::Wrong(self.message),
        }
    }
}
