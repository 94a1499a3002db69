use std::fmt;
use std::fmt::Write;
use std::sync::Arc;

/// Everything known about a single print out, handed to the [Formatter].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrintData {
    pub announcer: String,
    pub file: String,
    pub line_number: Option<u32>,
    pub class: Option<String>,
    pub method: Option<String>,
    /// Only present when a run selector applies to the call.
    pub run_number: Option<u64>,
    /// The expression as written, empty when `pd!()` was called without arguments.
    pub expression: String,
    /// The source line(s) of the call as read from disk.
    pub source_text: String,
    /// The value as rendered by the print engine.
    pub value: String,
    /// One entry per calling frame, innermost first.
    pub caller: Vec<String>,
    pub header: Option<String>,
    pub wrapper: Option<String>,
    pub footer: Option<String>,
}

/// Lays out a complete print out.
#[derive(Clone, Default)]
pub enum Formatter {
    #[default]
    Default,

    Custom(Arc<dyn Fn(&PrintData) -> String + Send + Sync>),
}

impl Formatter {
    pub fn custom(format: impl Fn(&PrintData) -> String + Send + Sync + 'static) -> Self {
        Formatter::Custom(Arc::new(format))
    }

    pub fn format(&self, data: &PrintData) -> String {
        match self {
            Formatter::Default => default_format(data),
            Formatter::Custom(format) => format(data),
        }
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formatter::Default => write!(f, "Default"),
            Formatter::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Width of the `   > ` and `  => ` markers, continuation lines are indented by it.
const MARKER_WIDTH: usize = 5;

/// The default layout:
///
/// ```text
/// [PD] src/main.rs:12 in Greeter::hello (run:2)
///    > name.len()
///   => 5
/// ```
///
/// surrounded by the wrapper, header and footer when they are enabled, and
/// followed by the caller frames when those were requested.
pub fn default_format(data: &PrintData) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.extend(data.wrapper.clone());
    lines.extend(data.header.clone());

    let mut location = format!("{} {}", data.announcer, data.file);
    if let Some(line_number) = data.line_number {
        let _ = write!(location, ":{line_number}");
    }
    let qualified: Vec<&str> = [data.class.as_deref(), data.method.as_deref()].into_iter().flatten().collect();
    if !qualified.is_empty() {
        let _ = write!(location, " in {}", qualified.join("::"));
    }
    if let Some(run_number) = data.run_number {
        let _ = write!(location, " (run:{run_number})");
    }
    lines.push(location);

    // A literal such as `pd!("ready")` would only repeat the value.
    if !data.expression.is_empty() && data.expression != data.value {
        lines.push(indent_continuation("   > ", &data.expression));
    }
    if !data.value.is_empty() {
        lines.push(indent_continuation("  => ", &data.value));
    }

    let caller_indent = " ".repeat(MARKER_WIDTH);
    lines.extend(data.caller.iter().map(|frame| format!("{caller_indent}{frame}")));

    lines.extend(data.footer.clone());
    lines.extend(data.wrapper.clone());
    lines.join("\n")
}

/// Prefixes the first line with the marker and aligns the other lines below the text.
fn indent_continuation(marker: &str, text: &str) -> String {
    let indent = " ".repeat(marker.len());
    let mut result = String::with_capacity(marker.len() + text.len());
    for (index, line) in text.lines().enumerate() {
        if index == 0 {
            result.push_str(marker);
        } else {
            result.push('\n');
            result.push_str(&indent);
        }
        result.push_str(line);
    }
    result
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    fn sample() -> PrintData {
        PrintData {
            announcer: "[PD]".to_string(),
            file: "src/main.rs".to_string(),
            line_number: Some(12),
            class: Some("Greeter".to_string()),
            method: Some("hello".to_string()),
            expression: "name.len()".to_string(),
            value: "5".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_format() {
        assert_eq!(
            default_format(&sample()),
            indoc! {"
                [PD] src/main.rs:12 in Greeter::hello
                   > name.len()
                  => 5"}
        );
    }

    #[test]
    fn test_default_format_with_everything() {
        let data = PrintData {
            run_number: Some(2),
            caller: vec!["src/main.rs:30 in main".to_string()],
            header: Some(">>>".to_string()),
            footer: Some("<<<".to_string()),
            wrapper: Some("***".to_string()),
            value: "Point {\n    x: 1,\n}".to_string(),
            ..sample()
        };

        assert_eq!(
            default_format(&data),
            indoc! {"
                ***
                >>>
                [PD] src/main.rs:12 in Greeter::hello (run:2)
                   > name.len()
                  => Point {
                         x: 1,
                     }
                     src/main.rs:30 in main
                <<<
                ***"}
        );
    }

    #[test]
    fn test_default_format_literal_and_no_method() {
        let data = PrintData {
            class: None,
            method: None,
            line_number: None,
            expression: "\"ready\"".to_string(),
            value: "\"ready\"".to_string(),
            ..sample()
        };

        assert_eq!(default_format(&data), "[PD] src/main.rs\n  => \"ready\"");
    }

    #[test]
    fn test_custom_formatter() {
        let formatter = Formatter::custom(|data| format!("{}#{}", data.file, data.value));
        assert_eq!(formatter.format(&sample()), "src/main.rs#5");
    }
}
