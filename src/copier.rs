/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */

use crate::error::FsplitError;
use crate::naming::PathSequencer;
use crate::planner::{ChunkPlan, SplitPolicy};
use std::fs::File;
use std::io::{self, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

/// Outcome of a split or concatenation. Chunks finished before a failure stay
/// on disk.
#[derive(Debug, Default)]
pub struct CopyResult {
    pub bytes_copied: u64,
    pub chunks: usize,
    pub error: Option<FsplitError>,
}

impl CopyResult {
    fn failed(error: FsplitError) -> Self {
        Self {
            error: Some(error),
            ..Default::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> Result<u64, FsplitError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.bytes_copied),
        }
    }
}

type ChunkCallback<'a> = Box<dyn FnMut(&Path, u64) + 'a>;

pub struct Splitter<'a> {
    input: PathBuf,
    output: PathBuf,
    // 每个分块文件关闭后回调
    chunk_callback: Option<ChunkCallback<'a>>,
}

impl<'a> Splitter<'a> {
    /// `output` is the base name of the chunks, usually the input path itself.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            chunk_callback: None,
        }
    }

    pub fn with_chunk_callback(mut self, callback: impl FnMut(&Path, u64) + 'a) -> Self {
        self.chunk_callback = Some(Box::new(callback));
        self
    }

    pub fn plan(&self, policy: SplitPolicy, input_size: u64) -> Result<ChunkPlan, FsplitError> {
        let plan = match policy {
            SplitPolicy::ByParts(parts) => ChunkPlan::by_parts(parts, input_size),
            SplitPolicy::ByByteSize(size) => ChunkPlan::by_byte_size(size, input_size),
            // 按行分割需要单独扫描一遍输入, 复制时再读一遍
            SplitPolicy::ByLineCount(lines) => {
                ChunkPlan::by_line_count(File::open(&self.input)?, lines)?
            }
        };
        log::debug!(
            "planned {} chunks for {} ({} bytes, {} policy)",
            plan.len(),
            self.input.display(),
            input_size,
            policy.name()
        );
        Ok(plan)
    }

    pub fn run(&mut self, policy: SplitPolicy) -> CopyResult {
        let mut input = match File::open(&self.input) {
            Ok(f) => f,
            Err(e) => return CopyResult::failed(open_error(e, &self.input)),
        };
        let input_size = match input.metadata() {
            Ok(m) if m.is_dir() => {
                return CopyResult::failed(FsplitError::InputIsDirectory(self.input.clone()))
            }
            Ok(m) => m.len(),
            Err(e) => return CopyResult::failed(e.into()),
        };
        let plan = match self.plan(policy, input_size) {
            Ok(p) => p,
            Err(e) => return CopyResult::failed(e),
        };
        let mut sequencer = PathSequencer::for_split(&self.output, plan.name_count());
        copy_chunks(
            &mut input,
            &plan,
            &mut sequencer,
            self.chunk_callback.as_deref_mut(),
        )
    }
}

/// Copies `input` into one new file per planned chunk, named by `sequencer`.
pub fn copy_chunks<R: Read>(
    input: &mut R,
    plan: &ChunkPlan,
    sequencer: &mut PathSequencer,
    mut on_chunk: Option<&mut (dyn FnMut(&Path, u64) + '_)>,
) -> CopyResult {
    let total = plan.total_size();
    let mut result = CopyResult::default();

    for size in plan.iter() {
        if result.bytes_copied >= total {
            break;
        }
        let path = sequencer.next_path();
        match copy_chunk(input, &path, size) {
            Ok(written) => {
                result.bytes_copied += written;
                result.chunks += 1;
                log::debug!("wrote {} ({} bytes)", path.display(), written);
                if let Some(callback) = on_chunk.as_deref_mut() {
                    callback(&path, written);
                }
                // 输入提前结束, 最后一个分块较短
                if written < size {
                    log::warn!(
                        "input ended after {} of {} bytes",
                        result.bytes_copied,
                        total
                    );
                    break;
                }
            }
            Err(e) => {
                log::error!("failed to write {}: {}", path.display(), e);
                result.error = Some(e.into());
                break;
            }
        }
    }
    result
}

// 创建(或截断)分块文件, 从 input 复制最多 size 字节
fn copy_chunk<R: Read>(input: &mut R, path: &Path, size: u64) -> io::Result<u64> {
    let mut out = BufWriter::new(File::create(path)?);
    let written = io::copy(&mut input.take(size), &mut out)?;
    out.flush()?;
    Ok(written)
}

pub struct Concatenator<'a> {
    sequencer: PathSequencer,
    output: PathBuf,
    chunk_callback: Option<ChunkCallback<'a>>,
}

impl<'a> Concatenator<'a> {
    /// `input` is the first chunk or the name the chunks were split from. When
    /// `output` is `None` the chunks are joined into their base name.
    pub fn new(input: &Path, output: Option<PathBuf>) -> Self {
        let sequencer = PathSequencer::for_concat(input);
        let output = output.unwrap_or_else(|| sequencer.base().to_path_buf());
        Self {
            sequencer,
            output,
            chunk_callback: None,
        }
    }

    pub fn with_chunk_callback(mut self, callback: impl FnMut(&Path, u64) + 'a) -> Self {
        self.chunk_callback = Some(Box::new(callback));
        self
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn run(&mut self) -> CopyResult {
        let first = self.sequencer.next_path();
        let mut input = match File::open(&first) {
            Ok(f) => f,
            Err(e) => return CopyResult::failed(open_error(e, &first)),
        };
        let mut out = match File::create(&self.output) {
            Ok(f) => BufWriter::new(f),
            Err(e) => {
                log::error!("failed to create {}: {}", self.output.display(), e);
                return CopyResult::failed(e.into());
            }
        };

        let mut result = CopyResult::default();
        let mut path = first;
        loop {
            match io::copy(&mut input, &mut out) {
                Ok(written) => {
                    result.bytes_copied += written;
                    result.chunks += 1;
                    log::debug!("appended {} ({} bytes)", path.display(), written);
                    if let Some(callback) = self.chunk_callback.as_mut() {
                        callback(&path, written);
                    }
                }
                Err(e) => {
                    log::error!("failed to copy {}: {}", path.display(), e);
                    result.error = Some(e.into());
                    break;
                }
            }
            drop(input);

            path = self.sequencer.next_path();
            input = match File::open(&path) {
                Ok(f) => f,
                // 下一个分块不存在, 正常结束
                Err(e) if e.kind() == ErrorKind::NotFound => break,
                Err(e) => {
                    log::error!("failed to open {}: {}", path.display(), e);
                    result.error = Some(e.into());
                    break;
                }
            };
        }

        if let Err(e) = out.flush() {
            if result.error.is_none() {
                result.error = Some(e.into());
            }
        }
        result
    }
}

fn open_error(e: io::Error, path: &Path) -> FsplitError {
    if e.kind() == ErrorKind::NotFound {
        FsplitError::InputNotFound(path.to_path_buf())
    } else {
        log::error!("failed to open {}: {}", path.display(), e);
        e.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;

    fn sample(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 7 % 251) as u8).collect()
    }

    #[test]
    fn split_by_parts_then_concat_restores_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data.bin");
        let data = sample(1000);
        fs::write(&input, &data).unwrap();

        let result = Splitter::new(&input, &input).run(SplitPolicy::ByParts(3));
        assert!(result.is_ok());
        assert_eq!(result.bytes_copied, 1000);
        assert_eq!(result.chunks, 3);
        assert_eq!(fs::read(dir.path().join("data.bin.1")).unwrap().len(), 334);
        assert_eq!(fs::read(dir.path().join("data.bin.3")).unwrap().len(), 332);

        let joined = dir.path().join("joined.bin");
        let result = Concatenator::new(&dir.path().join("data.bin.1"), Some(joined.clone())).run();
        assert_eq!(result.into_result().unwrap(), 1000);
        assert_eq!(fs::read(&joined).unwrap(), data);
    }

    #[test]
    fn split_by_bytes_names_with_padded_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("log.txt");
        fs::write(&input, sample(105)).unwrap();

        let mut seen = Vec::new();
        let result = Splitter::new(&input, &input)
            .with_chunk_callback(|path, size| seen.push((path.to_path_buf(), size)))
            .run(SplitPolicy::ByByteSize(10));
        assert!(result.is_ok());
        assert_eq!(result.chunks, 11);
        assert_eq!(seen.first().unwrap().0, dir.path().join("log.txt.01"));
        assert_eq!(seen.last().unwrap(), &(dir.path().join("log.txt.11"), 5));
    }

    #[test]
    fn split_by_parts_pads_to_requested_part_count() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("f");
        fs::write(&input, sample(150)).unwrap();

        let result = Splitter::new(&input, &input).run(SplitPolicy::ByParts(100));
        assert!(result.is_ok());
        assert_eq!(result.chunks, 75);
        assert_eq!(fs::read(dir.path().join("f.001")).unwrap().len(), 2);
        assert!(dir.path().join("f.075").is_file());
        assert!(!dir.path().join("f.01").exists());
        assert!(!dir.path().join("f.076").exists());
    }

    #[test]
    fn split_by_lines_writes_whole_lines() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("lines.txt");
        let text: String = (1..=10).map(|i| format!("{}\n", i)).collect();
        fs::write(&input, &text).unwrap();

        let result = Splitter::new(&input, &input).run(SplitPolicy::ByLineCount(3));
        assert_eq!(result.chunks, 4);
        assert_eq!(fs::read_to_string(dir.path().join("lines.txt.1")).unwrap(), "1\n2\n3\n");
        assert_eq!(fs::read_to_string(dir.path().join("lines.txt.4")).unwrap(), "10\n");
    }

    #[test]
    fn split_into_other_output_base() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.dat");
        fs::write(&input, sample(10)).unwrap();
        let out = dir.path().join("piece");

        let result = Splitter::new(&input, &out).run(SplitPolicy::ByParts(2));
        assert!(result.is_ok());
        assert!(dir.path().join("piece.1").is_file());
        assert!(dir.path().join("piece.2").is_file());
        assert!(!dir.path().join("in.dat.1").exists());
    }

    #[test]
    fn split_overwrites_existing_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("f");
        fs::write(&input, b"abcd").unwrap();
        fs::write(dir.path().join("f.1"), b"old content that is longer").unwrap();

        Splitter::new(&input, &input).run(SplitPolicy::ByParts(2));
        assert_eq!(fs::read(dir.path().join("f.1")).unwrap(), b"ab");
    }

    #[test]
    fn split_missing_input_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("nope");
        let result = Splitter::new(&input, &input).run(SplitPolicy::default());
        assert!(matches!(result.error, Some(FsplitError::InputNotFound(_))));
    }

    #[test]
    fn split_empty_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty");
        fs::write(&input, b"").unwrap();
        let result = Splitter::new(&input, &input).run(SplitPolicy::default());
        assert!(result.is_ok());
        assert_eq!(result.chunks, 0);
        assert!(!dir.path().join("empty.1").exists());
    }

    #[test]
    fn copy_chunks_stops_on_short_input() {
        let dir = tempfile::tempdir().unwrap();
        let plan = ChunkPlan::by_byte_size(4, 12);
        let mut seq = PathSequencer::for_split(dir.path().join("c"), plan.len());
        let mut input = Cursor::new(b"abcdef".to_vec());

        let result = copy_chunks(&mut input, &plan, &mut seq, None);
        assert!(result.is_ok());
        assert_eq!(result.bytes_copied, 6);
        assert_eq!(result.chunks, 2);
        assert!(!dir.path().join("c.3").exists());
    }

    #[test]
    fn copy_chunks_fails_on_unwritable_target() {
        let dir = tempfile::tempdir().unwrap();
        let plan = ChunkPlan::by_byte_size(2, 4);
        let mut seq = PathSequencer::for_split(dir.path().join("missing/dir/c"), plan.len());
        let mut input = Cursor::new(b"abcd".to_vec());

        let result = copy_chunks(&mut input, &plan, &mut seq, None);
        assert!(matches!(result.error, Some(FsplitError::Io(_))));
        assert_eq!(result.bytes_copied, 0);
    }

    #[test]
    fn copy_chunks_keeps_chunks_written_before_failure() {
        let dir = tempfile::tempdir().unwrap();
        let plan = ChunkPlan::by_byte_size(2, 6);
        let mut seq = PathSequencer::for_split(dir.path().join("c"), plan.name_count());
        fs::create_dir(dir.path().join("c.2")).unwrap();
        let mut input = Cursor::new(b"abcdef".to_vec());

        let result = copy_chunks(&mut input, &plan, &mut seq, None);
        assert!(matches!(result.error, Some(FsplitError::Io(_))));
        assert_eq!(result.chunks, 1);
        assert_eq!(result.bytes_copied, 2);
        assert_eq!(fs::read(dir.path().join("c.1")).unwrap(), b"ab");
        assert!(!dir.path().join("c.3").exists());
    }

    #[test]
    fn concat_from_base_name_probes_width() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("movie.mkv");
        for (i, part) in ["aa", "bb", "c"].iter().enumerate() {
            fs::write(dir.path().join(format!("movie.mkv.00{}", i + 1)), part).unwrap();
        }

        let mut concat = Concatenator::new(&base, None);
        assert_eq!(concat.output(), base.as_path());
        let result = concat.run();
        assert_eq!(result.chunks, 3);
        assert_eq!(fs::read(&base).unwrap(), b"aabbc");
    }

    #[test]
    fn concat_stops_at_first_gap() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("x.1"), b"1").unwrap();
        fs::write(dir.path().join("x.2"), b"2").unwrap();
        fs::write(dir.path().join("x.4"), b"4").unwrap();

        let result = Concatenator::new(&dir.path().join("x.1"), None).run();
        assert!(result.is_ok());
        assert_eq!(result.chunks, 2);
        assert_eq!(fs::read(dir.path().join("x")).unwrap(), b"12");
    }

    #[test]
    fn concat_fails_on_unreadable_later_chunk() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("x.1"), b"1").unwrap();
        fs::create_dir(dir.path().join("x.2")).unwrap();
        fs::write(dir.path().join("x.3"), b"3").unwrap();

        let result = Concatenator::new(&dir.path().join("x.1"), None).run();
        assert!(matches!(result.error, Some(FsplitError::Io(_))));
        assert_eq!(result.chunks, 1);
        assert_eq!(fs::read(dir.path().join("x")).unwrap(), b"1");
    }

    #[test]
    fn concat_without_first_chunk_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = Concatenator::new(&dir.path().join("ghost"), None).run();
        assert!(matches!(result.error, Some(FsplitError::InputNotFound(_))));
        assert!(!dir.path().join("ghost").exists());
    }
}
