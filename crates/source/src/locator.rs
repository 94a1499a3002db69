use std::path::Path;
use std::path::PathBuf;

use log::debug;
use pdbg_utilities::debug_trace;

use crate::SourceFrame;
use crate::StackFrame;
use crate::capture_stack;
use crate::parse_backtrace;
use crate::read_source_lines;
use crate::resolve_source_path;

/// Turns stack frames into [SourceFrame]s by reading the source of the frame
/// from disk.
#[derive(Clone, Debug)]
pub struct SourceLocator {
    app_path: Option<PathBuf>,
    source_line_count: usize,
    search_roots: Vec<PathBuf>,
}

impl Default for SourceLocator {
    fn default() -> Self {
        Self {
            app_path: None,
            source_line_count: 1,
            search_roots: Vec::new(),
        }
    }
}

impl SourceLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reported paths are made relative to this directory when they lie inside it.
    pub fn with_app_path(mut self, app_path: Option<PathBuf>) -> Self {
        self.app_path = app_path;
        self
    }

    /// The number of source lines read, starting at the line of the frame. At least one line is read.
    pub fn with_source_line_count(mut self, count: usize) -> Self {
        self.source_line_count = count.max(1);
        self
    }

    /// Adds a directory against which relative source paths are resolved.
    pub fn with_search_root(mut self, root: PathBuf) -> Self {
        self.search_roots.push(root);
        self
    }

    pub fn app_path(&self) -> Option<&Path> {
        self.app_path.as_deref()
    }

    pub fn source_line_count(&self) -> usize {
        self.source_line_count
    }

    /// Selects the frame at `depth`, counted from the innermost frame, and
    /// resolves it. A depth past the end of the stack gives an empty frame.
    pub fn locate(&self, frames: &[StackFrame], depth: usize) -> SourceFrame {
        match frames.get(depth) {
            Some(frame) => self.locate_frame(frame, &[]),
            None => {
                debug!("No stack frame at depth {depth}, the stack has {} frames", frames.len());
                SourceFrame::default()
            }
        }
    }

    /// Same as [SourceLocator::locate] for the lines of a textual stack trace.
    /// Lines that are not frames do not count towards the depth.
    pub fn locate_text<S: AsRef<str>>(&self, lines: &[S], depth: usize) -> SourceFrame {
        let text = lines.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("\n");
        self.locate(&parse_backtrace(&text), depth)
    }

    /// Captures the current stack and locates the frame at `depth`, where depth
    /// zero is the function calling this method.
    #[inline(never)]
    pub fn locate_current(&self, depth: usize) -> SourceFrame {
        self.locate(&capture_stack(), depth)
    }

    /// Resolves a single frame, trying `extra_roots` after the configured
    /// search roots when the file is relative.
    pub fn locate_frame(&self, frame: &StackFrame, extra_roots: &[PathBuf]) -> SourceFrame {
        let roots: Vec<PathBuf> = self.search_roots.iter().chain(extra_roots).cloned().collect();
        let resolved = resolve_source_path(&frame.file, &roots);

        let source_text = match (&resolved, frame.line) {
            (Some(path), Some(line)) => match read_source_lines(path, line, self.source_line_count) {
                Ok(lines) => lines.join("\n"),
                Err(error) => {
                    debug!("Could not read source of {}: {error}", path.display());
                    String::new()
                }
            },
            (None, _) => {
                debug!("Source file {} not found", frame.file);
                String::new()
            }
            (Some(_), None) => String::new(),
        };

        debug_trace!("Located {frame} with source {source_text:?}");
        SourceFrame {
            file: self.display_path(&frame.file, resolved.as_deref()),
            line_number: frame.line,
            method: frame.method.clone(),
            class: frame.class.clone(),
            source_text,
        }
    }

    /// Returns the path to report for a source file: relative to the
    /// application root when the file is inside it, otherwise the absolute path
    /// of the resolved file, otherwise the path as given.
    pub fn display_path(&self, file: &str, resolved: Option<&Path>) -> String {
        let absolute = resolved.map(|path| path.canonicalize().unwrap_or_else(|_| path.to_path_buf()));

        if let Some(app_path) = &self.app_path {
            let app_root = app_path.canonicalize().unwrap_or_else(|_| app_path.clone());
            if let Some(relative) = absolute.as_deref().and_then(|path| path.strip_prefix(&app_root).ok()) {
                return relative.display().to_string();
            }

            if let Ok(relative) = Path::new(file).strip_prefix(app_path) {
                return relative.display().to_string();
            }
        }

        match absolute {
            Some(path) => path.display().to_string(),
            None => file.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use indoc::indoc;
    use pdbg_macros::pdbg_test;
    use tempfile::TempDir;

    use super::*;

    fn sample_project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("lib")).unwrap();
        fs::write(
            dir.path().join("lib/greeter.rb"),
            indoc! {"
                class Greeter
                  def hello
                    pd (x = 1 +
                      2)
                  end
                end
            "},
        )
        .unwrap();
        dir
    }

    #[pdbg_test]
    fn test_locate_reads_source_line() {
        let dir = sample_project();
        let file = dir.path().join("lib/greeter.rb");
        let frames = vec![
            StackFrame::new("/gems/pdbg/lib/pdbg.rb", 40).with_function("pd"),
            StackFrame {
                file: file.display().to_string(),
                line: Some(3),
                column: None,
                method: Some("hello".to_string()),
                class: Some("Greeter".to_string()),
            },
        ];

        let frame = SourceLocator::new().locate(&frames, 1);
        assert_eq!(frame.line_number, Some(3));
        assert_eq!(frame.class.as_deref(), Some("Greeter"));
        assert_eq!(frame.method.as_deref(), Some("hello"));
        assert_eq!(frame.source_text, "    pd (x = 1 +");
        assert!(frame.file.ends_with("greeter.rb"));
    }

    #[pdbg_test]
    fn test_locate_multiple_lines_relative_to_app() {
        let dir = sample_project();
        let text = format!("{}:3:in `hello'", dir.path().join("lib/greeter.rb").display());

        let locator = SourceLocator::new()
            .with_app_path(Some(dir.path().to_path_buf()))
            .with_source_line_count(2);
        let frame = locator.locate_text(&[text], 0);

        assert_eq!(frame.file, Path::new("lib").join("greeter.rb").display().to_string());
        assert_eq!(frame.source_text, "    pd (x = 1 +\n      2)");
    }

    #[pdbg_test]
    fn test_locate_with_search_root() {
        let dir = sample_project();
        let locator = SourceLocator::new()
            .with_search_root(dir.path().to_path_buf())
            .with_app_path(Some(dir.path().to_path_buf()));

        let frame = locator.locate(&[StackFrame::new("lib/greeter.rb", 2)], 0);
        assert_eq!(frame.source_text, "  def hello");
        assert_eq!(frame.file, Path::new("lib").join("greeter.rb").display().to_string());
    }

    #[pdbg_test]
    fn test_locate_missing_file() {
        let frame = SourceLocator::new().locate_text(&["/nowhere/app.rb:12:in `Greeter#hello'"], 0);

        assert_eq!(frame.file, "/nowhere/app.rb");
        assert_eq!(frame.line_number, Some(12));
        assert_eq!(frame.class.as_deref(), Some("Greeter"));
        assert_eq!(frame.method.as_deref(), Some("hello"));
        assert!(frame.source_text.is_empty());
    }

    #[pdbg_test]
    fn test_locate_out_of_range() {
        let dir = sample_project();
        let file = dir.path().join("lib/greeter.rb");

        let frame = SourceLocator::new().locate(&[StackFrame::new(file.display().to_string(), 100)], 0);
        assert_eq!(frame.line_number, Some(100));
        assert!(frame.source_text.is_empty());

        assert_eq!(SourceLocator::new().locate(&[], 3), SourceFrame::default());
        assert_eq!(SourceLocator::new().locate_text(&["not a frame"], 0), SourceFrame::default());
    }

    #[pdbg_test]
    fn test_display_path_outside_app() {
        let locator = SourceLocator::new().with_app_path(Some(PathBuf::from("/work/app")));
        assert_eq!(locator.display_path("/work/app/src/main.rs", None), "src/main.rs");
        assert_eq!(locator.display_path("/other/src/main.rs", None), "/other/src/main.rs");
    }
}
