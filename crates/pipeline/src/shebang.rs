//! Rewrites absolute python interpreter lines in installed scripts.

use regex::bytes::Regex;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

const PORTABLE_SHEBANG: &[u8] = b"#!/usr/bin/env python";

/// `#!` followed by an absolute path whose basename is a python interpreter
/// (`python`, `python3.6`, `python3.6m`, `python3.6-dbg`). Group 1 is the
/// byte after the interpreter token.
const INTERPRETER_LINE: &str = r"^#!/\S*/python[0-9.]*[a-z]*(?:-[^\s/]+)?(\s|\z)";

fn interpreter_line() -> io::Result<&'static Regex> {
    static PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(INTERPRETER_LINE))
        .as_ref()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.clone()))
}

/// Rewrite every regular file directly inside `bin_dir` whose first line names
/// a python binary by absolute path. Returns how many files changed.
pub fn normalize_shebangs(bin_dir: &Path) -> io::Result<usize> {
    let pattern = interpreter_line()?;
    let mut rewritten = 0;

    for entry in fs::read_dir(bin_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let path = entry.path();
        let content = fs::read(&path)?;
        let Some(rest) = pattern
            .captures(&content)
            .and_then(|caps| caps.get(1))
            .map(|tail| tail.start())
        else {
            continue;
        };

        let mut updated = Vec::with_capacity(content.len());
        updated.extend_from_slice(PORTABLE_SHEBANG);
        updated.extend_from_slice(&content[rest..]);
        if updated == content {
            continue;
        }

        fs::write(&path, updated)?;
        debug!(path = %path.display(), "Normalized shebang");
        rewritten += 1;
    }

    Ok(rewritten)
}
