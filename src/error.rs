/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FsplitError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("can't parse {what} \"{value}\"")]
    Parse { what: &'static str, value: String },

    #[error("wrong argument usage ({0})")]
    InvalidArguments(String),

    #[error("input file does not exist ({})", .0.display())]
    InputNotFound(PathBuf),

    #[error("input file is a directory, but must be a file ({})", .0.display())]
    InputIsDirectory(PathBuf),
}

impl FsplitError {
    pub fn parse(what: &'static str, value: &str) -> Self {
        FsplitError::Parse {
            what,
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FsplitError>;
