use std::fmt;

/// A single frame of a call stack, as supplied by the host or parsed from the
/// text of a stack trace.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StackFrame {
    pub file: String,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub method: Option<String>,
    pub class: Option<String>,
}

impl StackFrame {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line: Some(line),
            ..Default::default()
        }
    }

    /// Sets the method and owning type from a qualified Rust path such as
    /// `my_crate::module::Type::method`, see [split_qualified_name].
    pub fn with_function(mut self, path: &str) -> Self {
        let (class, method) = split_qualified_name(path);
        self.class = class;
        self.method = method;
        self
    }

    pub fn with_column(mut self, column: u32) -> Self {
        self.column = Some(column);
        self
    }

    /// Returns `Class::method`, `method`, or `None` when the method is unknown.
    pub fn qualified_method(&self) -> Option<String> {
        self.method.as_ref().map(|method| match &self.class {
            Some(class) => format!("{class}::{method}"),
            None => method.clone(),
        })
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file)?;
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
            if let Some(column) = self.column {
                write!(f, ":{column}")?;
            }
        }

        if let Some(method) = self.qualified_method() {
            write!(f, " in {method}")?;
        }
        Ok(())
    }
}

/// The resolved location of a debug print call, together with the literal
/// source text found at that location.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceFrame {
    /// Path of the source file, relative to the application root when possible.
    pub file: String,
    pub line_number: Option<u32>,
    pub method: Option<String>,
    pub class: Option<String>,
    /// The source line(s) of the call, empty when the file could not be read.
    pub source_text: String,
}

/// Splits a qualified Rust path into the owning type and the function name.
///
/// Trailing `{{closure}}` and symbol hash segments are dropped, and the owner is
/// only reported when it looks like a type, i.e. starts with an uppercase
/// letter or is a qualified `<Type as Trait>` segment.
///
/// ```text
/// `app::Greeter::hello`              => (Some("Greeter"), Some("hello"))
/// `<app::Greeter as Display>::fmt`   => (Some("Greeter"), Some("fmt"))
/// `app::main::{{closure}}`           => (None, Some("main"))
/// ```
pub fn split_qualified_name(path: &str) -> (Option<String>, Option<String>) {
    let mut segments = split_segments(path.trim());
    while let Some(last) = segments.last() {
        if last.starts_with("{{") || is_symbol_hash(last) || last.is_empty() {
            segments.pop();
        } else {
            break;
        }
    }

    let Some(method) = segments.pop() else {
        return (None, None);
    };

    let class = segments.pop().and_then(|owner| {
        if let Some(inner) = owner.strip_prefix('<').and_then(|inner| inner.strip_suffix('>')) {
            // `<path::Type<T> as path::Trait>`, report the implementing type.
            let implementor = inner.split(" as ").next().unwrap_or(inner);
            split_segments(implementor).pop().map(|name| strip_generics(name).to_string())
        } else if owner.starts_with(|c: char| c.is_ascii_uppercase()) {
            Some(strip_generics(owner).to_string())
        } else {
            None
        }
    });

    (class, Some(strip_generics(method).to_string()))
}

/// Splits the path on `::`, ignoring separators nested inside angle brackets.
fn split_segments(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let bytes = path.as_bytes();

    let mut index = 0;
    while index < bytes.len() {
        match bytes[index] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(index + 1) == Some(&b':') => {
                segments.push(&path[start..index]);
                index += 2;
                start = index;
                continue;
            }
            _ => {}
        }
        index += 1;
    }
    segments.push(&path[start..]);
    segments
}

/// Symbol names from the linker end with a hash segment such as `h1f2e3d4c5b6a7980`.
fn is_symbol_hash(segment: &str) -> bool {
    segment.len() == 17
        && segment.starts_with('h')
        && segment[1..].chars().all(|c| c.is_ascii_hexdigit())
}

fn strip_generics(name: &str) -> &str {
    name.split('<').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("app::Greeter::hello", Some("Greeter"), Some("hello") ; "method")]
    #[test_case("app::greet", None, Some("greet") ; "free function")]
    #[test_case("main", None, Some("main") ; "bare function")]
    #[test_case("app::main::{{closure}}", None, Some("main") ; "closure")]
    #[test_case("app::Greeter::hello::{{closure}}::{{closure}}", Some("Greeter"), Some("hello") ; "nested closure")]
    #[test_case("app::Greeter::hello::h0123456789abcdef", Some("Greeter"), Some("hello") ; "symbol hash")]
    #[test_case("<app::Greeter as core::fmt::Display>::fmt", Some("Greeter"), Some("fmt") ; "trait impl")]
    #[test_case("<app::Wrapper<u32> as core::fmt::Debug>::fmt", Some("Wrapper"), Some("fmt") ; "generic trait impl")]
    #[test_case("app::Wrapper<T>::get", Some("Wrapper"), Some("get") ; "generic type")]
    #[test_case("", None, None ; "empty")]
    fn test_split_qualified_name(path: &str, class: Option<&str>, method: Option<&str>) {
        let (actual_class, actual_method) = split_qualified_name(path);
        assert_eq!(actual_class.as_deref(), class);
        assert_eq!(actual_method.as_deref(), method);
    }

    #[test]
    fn test_stack_frame_display() {
        let frame = StackFrame::new("src/main.rs", 12)
            .with_column(5)
            .with_function("app::Greeter::hello");
        assert_eq!(frame.to_string(), "src/main.rs:12:5 in Greeter::hello");

        let frame = StackFrame {
            file: "src/lib.rs".to_string(),
            ..Default::default()
        };
        assert_eq!(frame.to_string(), "src/lib.rs");
    }
}
