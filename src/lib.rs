/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */

//! Split a file into numbered chunks (`data.bin.1`, `data.bin.2`, ...) by part
//! count, byte size or line count, and join such chunks back into one file.

pub mod cli;
pub mod command;
pub mod copier;
pub mod error;
pub mod naming;
pub mod planner;
pub mod utils;

pub use command::{Command, CommandKind, ConcatCommand, Invocation, Settings, SplitCommand};
pub use copier::{Concatenator, CopyResult, Splitter};
pub use error::FsplitError;
pub use naming::PathSequencer;
pub use planner::{ChunkPlan, SplitPolicy};
