use std::fs::File;
use std::io;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;
use std::path::PathBuf;

/// Reads `count` lines starting at the 1-based `line` from the given file.
///
/// Lines past the end of the file are not returned, so the result can be
/// shorter than `count` and is empty when `line` is out of range.
pub fn read_source_lines(path: &Path, line: u32, count: usize) -> io::Result<Vec<String>> {
    if line == 0 {
        return Ok(Vec::new());
    }

    let reader = BufReader::new(File::open(path)?);
    let mut lines = Vec::with_capacity(count);
    for result in reader.lines().skip(line as usize - 1).take(count) {
        lines.push(result?.trim_end().to_string());
    }

    Ok(lines)
}

/// Finds the source file on disk. Absolute paths are used as is, relative paths
/// are tried against the working directory first and then against each of the
/// given roots in order.
pub fn resolve_source_path(file: &str, roots: &[PathBuf]) -> Option<PathBuf> {
    let path = Path::new(file);
    if path.is_absolute() {
        return path.is_file().then(|| path.to_path_buf());
    }

    if path.is_file() {
        return std::env::current_dir().ok().map(|cwd| cwd.join(path)).or_else(|| Some(path.to_path_buf()));
    }

    roots.iter().map(|root| root.join(path)).find(|candidate| candidate.is_file())
}

/// Returns the given directory followed by all of its ancestors. Used to turn a
/// crate manifest directory into search roots, since `file!()` is relative to
/// the workspace root rather than to the crate.
pub fn with_ancestors(directory: &Path) -> Vec<PathBuf> {
    directory.ancestors().map(Path::to_path_buf).collect()
}
