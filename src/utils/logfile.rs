/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */

// --lf 参数生成的日志文件
use crate::utils::common::{chunk_noun, format_size};
use anyhow::Context;
use chrono::Local;
use std::fmt::Display;
use std::io::Write;
use std::path::Path;

pub struct LogFile {
    log_file: std::fs::File,
}

impl LogFile {
    pub fn new(log_file_path: &Path, append: bool) -> anyhow::Result<Self> {
        let log_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .append(append)
            .truncate(!append)
            .open(log_file_path)
            .with_context(|| format!("Failed to open log file {}", log_file_path.display()))?;

        Ok(LogFile { log_file })
    }

    pub fn log_command(&mut self, args: &[String]) -> anyhow::Result<()> {
        // 跳过第一个参数（命令本身）
        let filtered_args = if args.len() > 1 {
            args[1..].join(" ")
        } else {
            String::new()
        };

        writeln!(
            self.log_file,
            "---------\nFsplit log opened {}",
            Local::now().format("%a %b %d %H:%M:%S %Y")
        )?;
        writeln!(
            self.log_file,
            "command line arguments:\n {}\n",
            filtered_args
        )?;

        Ok(())
    }

    pub fn log_chunk(&mut self, path: &Path, size: u64) -> anyhow::Result<()> {
        writeln!(self.log_file, "  chunk {} {}", path.display(), size)?;
        Ok(())
    }

    pub fn log_error(&mut self, error: &dyn Display) -> anyhow::Result<()> {
        writeln!(self.log_file, "error: {}", error)?;
        Ok(())
    }

    pub fn log_summary(&mut self, total_chunks: usize, total_size: u64) -> anyhow::Result<()> {
        writeln!(
            self.log_file,
            "\nTotal {} {} ({} bytes)",
            total_chunks,
            chunk_noun(total_chunks),
            format_size(total_size, 0)
        )?;

        writeln!(
            self.log_file,
            "Done {}",
            Local::now().format("%a %b %d %H:%M:%S %Y")
        )?;

        Ok(())
    }

    pub fn close(&mut self) -> anyhow::Result<()> {
        self.log_file.flush()?;
        Ok(())
    }
}
