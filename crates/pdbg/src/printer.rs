use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;

use log::Level;
use log::warn;
use parking_lot::Mutex;

use crate::ConfigError;

/// Where the rendered text of a print out goes.
#[derive(Clone, Default)]
pub enum Printer {
    /// Discards the output, the call is still counted.
    Noop,

    #[default]
    Stdout,

    Stderr,

    /// Writes to a shared writer, e.g. a file or an in-memory buffer.
    Stream(Arc<Mutex<dyn Write + Send>>),

    /// Delegates to the `log` facade with the given level under the `pdbg` target.
    Log(Level),

    /// Hands the text to a callable.
    Custom(Arc<dyn Fn(&str) + Send + Sync>),
}

impl Printer {
    pub fn stream(writer: impl Write + Send + 'static) -> Self {
        Printer::Stream(Arc::new(Mutex::new(writer)))
    }

    pub fn custom(print: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Printer::Custom(Arc::new(print))
    }

    /// Emits the text. Write errors are logged, never returned, since a debug
    /// print should not disturb the program it is inspecting.
    pub fn print(&self, text: &str) {
        match self {
            Printer::Noop => {}
            Printer::Stdout => println!("{text}"),
            Printer::Stderr => eprintln!("{text}"),
            Printer::Stream(writer) => {
                let mut writer = writer.lock();
                if let Err(error) = writeln!(writer, "{text}").and_then(|_| writer.flush()) {
                    warn!("Failed to write debug print: {error}");
                }
            }
            Printer::Log(level) => log::log!(target: "pdbg", *level, "{text}"),
            Printer::Custom(print) => print(text),
        }
    }
}

impl fmt::Debug for Printer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Printer::Noop => write!(f, "Noop"),
            Printer::Stdout => write!(f, "Stdout"),
            Printer::Stderr => write!(f, "Stderr"),
            Printer::Stream(_) => write!(f, "Stream(..)"),
            Printer::Log(level) => write!(f, "Log({level})"),
            Printer::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl FromStr for Printer {
    type Err = ConfigError;

    /// Parses `stdout`, `stderr`, `none`, `log` (at debug level) or `log:<level>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_ascii_lowercase();
        match text.as_str() {
            "stdout" | "puts" => Ok(Printer::Stdout),
            "stderr" => Ok(Printer::Stderr),
            "none" | "noop" | "false" => Ok(Printer::Noop),
            "log" => Ok(Printer::Log(Level::Debug)),
            _ => match text.strip_prefix("log:") {
                Some(level) => level
                    .parse()
                    .map(Printer::Log)
                    .map_err(|_| ConfigError::UnknownPrinter(s.to_string())),
                None => Err(ConfigError::UnknownPrinter(s.to_string())),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("stdout", "Stdout" ; "stdout")]
    #[test_case("STDERR", "Stderr" ; "stderr")]
    #[test_case("none", "Noop" ; "none")]
    #[test_case("log", "Log(DEBUG)" ; "log")]
    #[test_case("log:warn", "Log(WARN)" ; "log with level")]
    fn test_parse_printer(text: &str, expected: &str) {
        assert_eq!(format!("{:?}", text.parse::<Printer>().unwrap()), expected);
    }

    #[test_case("printer" ; "unknown")]
    #[test_case("log:loud" ; "unknown level")]
    fn test_parse_printer_error(text: &str) {
        assert!(matches!(text.parse::<Printer>(), Err(ConfigError::UnknownPrinter(_))));
    }

    #[test]
    fn test_stream_printer() {
        let buffer = Arc::new(Mutex::new(Vec::<u8>::new()));
        let printer = Printer::Stream(buffer.clone());

        printer.print("[PD] src/main.rs:1");
        printer.print("  => 1");

        let output = String::from_utf8(buffer.lock().clone()).unwrap();
        assert_eq!(output, "[PD] src/main.rs:1\n  => 1\n");
    }

    #[test]
    fn test_custom_printer() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let collected = lines.clone();
        let printer = Printer::custom(move |text| collected.lock().push(text.to_string()));

        printer.print("hello");
        Printer::Noop.print("ignored");

        assert_eq!(*lines.lock(), vec!["hello".to_string()]);
    }
}
