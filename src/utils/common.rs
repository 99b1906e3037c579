/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */

// 来格式化大小, ext 保留几位小数
pub fn format_size(size: u64, ext: u8) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.*}G", ext as usize, size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.*}M", ext as usize, size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.*}K", ext as usize, size as f64 / KB as f64)
    } else {
        format!("{}", size)
    }
}

// 分块数量的单复数
pub fn chunk_noun(count: usize) -> &'static str {
    if count == 1 {
        "chunk"
    } else {
        "chunks"
    }
}
