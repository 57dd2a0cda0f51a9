// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository path helpers

/// Logical separator of repository paths
pub const SEPARATOR: char = '/';

/// Join a directory and a file name with exactly one separator at the seam.
///
/// Only the seam is normalized, so `scheme://` prefixes survive. Either side
/// missing yields `None`.
pub fn concat(directory: Option<&str>, file: Option<&str>) -> Option<String> {
    let directory = directory?;
    let file = file?;
    let directory = directory.strip_suffix(SEPARATOR).unwrap_or(directory);
    let file = file.strip_prefix(SEPARATOR).unwrap_or(file);
    Some(format!("{}{}{}", directory, SEPARATOR, file))
}
