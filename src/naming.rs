/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */

use std::ffi::OsString;
use std::path::{Path, PathBuf};

// 路径没有数字后缀时, 依次尝试的后缀位数
const MAX_PROBE_WIDTH: usize = 10;
const FALLBACK_WIDTH: usize = 1;

/// Generates chunk paths of the form `base.NNN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSequencer {
    base: PathBuf,
    width: usize,
    counter: u64,
}

impl PathSequencer {
    pub fn new(base: impl Into<PathBuf>, width: usize, first: u64) -> Self {
        Self {
            base: base.into(),
            width,
            counter: first,
        }
    }

    /// Sequencer for writing `parts` chunks next to `base`, counting from 1.
    pub fn for_split(base: impl Into<PathBuf>, parts: u64) -> Self {
        Self::new(base, digit_count(parts), 1)
    }

    /// Sequencer for reading back the chunks that `path` belongs to. `path` is
    /// either a chunk itself (`data.bin.003`) or the name the chunks were
    /// split from (`data.bin`).
    pub fn for_concat(path: &Path) -> Self {
        if let Some((base, width, first)) = parse_chunk_path(path) {
            return Self::new(base, width, first);
        }
        let width = probe_width(path).unwrap_or_else(|| {
            log::debug!(
                "no chunk found next to {}, assuming suffix width {}",
                path.display(),
                FALLBACK_WIDTH
            );
            FALLBACK_WIDTH
        });
        Self::new(path, width, 1)
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Path for the current counter value, without advancing.
    pub fn current_path(&self) -> PathBuf {
        chunk_path(&self.base, self.width, self.counter)
    }

    pub fn next_path(&mut self) -> PathBuf {
        let path = self.current_path();
        self.counter += 1;
        path
    }
}

impl Iterator for PathSequencer {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        Some(self.next_path())
    }
}

pub fn chunk_path(base: &Path, width: usize, number: u64) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(format!(".{:0width$}", number, width = width));
    PathBuf::from(name)
}

pub fn digit_count(mut n: u64) -> usize {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}

/// Splits `data.bin.007` into (`data.bin`, 3, 7). Returns `None` when the
/// file name does not end in a dot followed by decimal digits.
pub fn parse_chunk_path(path: &Path) -> Option<(PathBuf, usize, u64)> {
    let file_name = path.file_name()?.to_str()?;
    let (stem, suffix) = file_name.rsplit_once('.')?;
    if stem.is_empty() || suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let number = suffix.parse::<u64>().ok()?;
    Some((path.with_file_name(stem), suffix.len(), number))
}

// 依次查找 path.1, path.01, ... 取第一个存在的文件的位数
fn probe_width(path: &Path) -> Option<usize> {
    (1..=MAX_PROBE_WIDTH).find(|&width| chunk_path(path, width, 1).is_file())
}
