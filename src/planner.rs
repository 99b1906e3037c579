/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */

use crate::error::{FsplitError, Result};
use regex::Regex;
use std::io::{ErrorKind, Read};
use std::sync::OnceLock;

pub const DEFAULT_PARTS: u64 = 2;

// 按行扫描时每次读取 8 MiB
const LINE_SCAN_BUFFER_SIZE: usize = 8 * 1024 * 1024;

static BYTE_SIZE_RE: OnceLock<Regex> = OnceLock::new();

/// How chunk boundaries of a split are determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitPolicy {
    ByParts(u64),
    ByByteSize(u64),
    ByLineCount(u64),
}

impl Default for SplitPolicy {
    fn default() -> Self {
        SplitPolicy::ByParts(DEFAULT_PARTS)
    }
}

impl SplitPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            SplitPolicy::ByParts(_) => "parts",
            SplitPolicy::ByByteSize(_) => "bytes",
            SplitPolicy::ByLineCount(_) => "lines",
        }
    }
}

/// Ordered byte lengths of the chunks of one split. The lengths always add up
/// to the size of the input they were planned for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChunkPlan {
    layout: Layout,
    // 后缀位数按此数计算, 按分块数分割时为截断后的分块数
    name_count: u64,
}

// 等长分块不逐个保存长度, -b=1 时分块数可能与输入字节数相同
#[derive(Debug, Clone, PartialEq, Eq)]
enum Layout {
    Uniform { chunk_size: u64, input_size: u64 },
    Listed(Vec<u64>),
}

impl Default for Layout {
    fn default() -> Self {
        Layout::Listed(Vec::new())
    }
}

impl ChunkPlan {
    /// Plans a split by part count. Zero parts means the default of two, and
    /// more parts than bytes are clamped so no chunk is ever empty.
    pub fn by_parts(parts: u64, input_size: u64) -> Self {
        let parts = if parts == 0 { DEFAULT_PARTS } else { parts };
        let parts = parts.min(input_size);
        if parts == 0 {
            return Self::default();
        }
        Self {
            name_count: parts,
            ..Self::by_byte_size(part_size(parts, input_size), input_size)
        }
    }

    /// Plans a split into chunks of `chunk_size` bytes, the last one holding the
    /// remainder. A zero size falls back to the two parts default.
    pub fn by_byte_size(chunk_size: u64, input_size: u64) -> Self {
        if chunk_size == 0 {
            return Self::by_parts(DEFAULT_PARTS, input_size);
        }
        Self {
            layout: Layout::Uniform {
                chunk_size,
                input_size,
            },
            name_count: input_size.div_ceil(chunk_size),
        }
    }

    /// Plans a split into chunks of `lines` lines each by scanning `reader` to
    /// its end. A line ends at `\n` or at a `\r` that is not followed by `\n`.
    pub fn by_line_count<R: Read>(mut reader: R, lines: u64) -> Result<Self> {
        let mut sizes = Vec::new();
        let mut buffer = vec![0u8; LINE_SCAN_BUFFER_SIZE];
        let mut lines_read: u64 = 0;
        let mut size: u64 = 0;
        let mut prev_byte: u8 = 0;

        loop {
            let bytes_read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            for &curr_byte in &buffer[..bytes_read] {
                size += 1;
                // 单独的 '\r' 要到下一个字节才能识别
                if curr_byte == b'\n' || prev_byte == b'\r' {
                    lines_read += 1;
                }
                if lines > 0 && lines_read == lines {
                    if curr_byte == b'\n' {
                        sizes.push(size);
                        size = 0;
                    } else {
                        // 当前字节属于下一个分块
                        sizes.push(size - 1);
                        size = 1;
                    }
                    lines_read = 0;
                }
                prev_byte = curr_byte;
            }
        }
        if size > 0 {
            sizes.push(size);
        }
        log::debug!("line scan produced {} chunks", sizes.len());
        Ok(Self {
            name_count: sizes.len() as u64,
            layout: Layout::Listed(sizes),
        })
    }

    /// Number of chunks the plan writes.
    pub fn len(&self) -> u64 {
        match &self.layout {
            Layout::Uniform {
                chunk_size,
                input_size,
            } => input_size.div_ceil(*chunk_size),
            Layout::Listed(sizes) => sizes.len() as u64,
        }
    }

    /// Count the chunk suffix width is derived from. Equals [`len`](Self::len)
    /// except for part splits, where rounding up the part size can leave fewer
    /// chunks than parts.
    pub fn name_count(&self) -> u64 {
        self.name_count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total_size(&self) -> u64 {
        match &self.layout {
            Layout::Uniform { input_size, .. } => *input_size,
            Layout::Listed(sizes) => sizes.iter().sum(),
        }
    }

    pub fn iter(&self) -> ChunkSizes<'_> {
        match &self.layout {
            Layout::Uniform {
                chunk_size,
                input_size,
            } => ChunkSizes::Uniform {
                chunk_size: *chunk_size,
                remaining: *input_size,
            },
            Layout::Listed(sizes) => ChunkSizes::Listed(sizes.iter()),
        }
    }
}

/// Iterator over the chunk lengths of a [`ChunkPlan`].
#[derive(Debug, Clone)]
pub enum ChunkSizes<'a> {
    Uniform { chunk_size: u64, remaining: u64 },
    Listed(std::slice::Iter<'a, u64>),
}

impl Iterator for ChunkSizes<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        match self {
            ChunkSizes::Uniform {
                chunk_size,
                remaining,
            } => {
                if *remaining == 0 {
                    return None;
                }
                let size = (*remaining).min(*chunk_size);
                *remaining -= size;
                Some(size)
            }
            ChunkSizes::Listed(sizes) => sizes.next().copied(),
        }
    }
}

// ceil(input_size / parts)
pub fn part_size(parts: u64, input_size: u64) -> u64 {
    let mut chunk_size = input_size / parts;
    if chunk_size * parts < input_size {
        chunk_size += 1;
    }
    chunk_size
}

// 解析字节大小参数, 支持 4k, 4K, 1m, 10 等格式, 小写单位按 1024, 大写单位按 1000
pub fn parse_byte_size(s: &str) -> Result<u64> {
    if s.is_empty() {
        return Ok(0);
    }
    let re = BYTE_SIZE_RE.get_or_init(|| {
        Regex::new(r"^([+-]?\d+)([kKmMgG]?)$").expect("byte size pattern is valid")
    });
    let caps = re
        .captures(s)
        .ok_or_else(|| FsplitError::parse("number of bytes", s))?;

    let num = caps[1]
        .parse::<i64>()
        .map_err(|_| FsplitError::parse("number of bytes", s))?
        .unsigned_abs();
    let multiplier: u64 = match caps.get(2).map(|m| m.as_str()) {
        Some("k") => 1024,
        Some("K") => 1000,
        Some("m") => 1024 * 1024,
        Some("M") => 1000 * 1000,
        Some("g") => 1024 * 1024 * 1024,
        Some("G") => 1000 * 1000 * 1000,
        _ => 1,
    };
    num.checked_mul(multiplier)
        .ok_or_else(|| FsplitError::parse("number of bytes", s))
}

// 解析分块数或行数, 负数取绝对值
pub fn parse_count(what: &'static str, s: &str) -> Result<u64> {
    s.parse::<i64>()
        .map(i64::unsigned_abs)
        .map_err(|_| FsplitError::parse(what, s))
}
