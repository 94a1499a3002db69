use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::ConfigError;

/// Renders the printed value itself, the metadata around it is the concern of the [crate::Formatter].
#[derive(Clone, Default)]
pub enum PrintEngine {
    /// `{:?}`
    #[default]
    Debug,

    /// `{:#?}`
    PrettyDebug,

    Custom(Arc<dyn Fn(&dyn fmt::Debug) -> String + Send + Sync>),
}

impl PrintEngine {
    pub fn custom(render: impl Fn(&dyn fmt::Debug) -> String + Send + Sync + 'static) -> Self {
        PrintEngine::Custom(Arc::new(render))
    }

    pub fn render(&self, value: &dyn fmt::Debug) -> String {
        match self {
            PrintEngine::Debug => format!("{value:?}"),
            PrintEngine::PrettyDebug => format!("{value:#?}"),
            PrintEngine::Custom(render) => render(value),
        }
    }
}

impl fmt::Debug for PrintEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrintEngine::Debug => write!(f, "Debug"),
            PrintEngine::PrettyDebug => write!(f, "PrettyDebug"),
            PrintEngine::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl FromStr for PrintEngine {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" | "p" => Ok(PrintEngine::Debug),
            "pretty" | "pretty_debug" | "pp" => Ok(PrintEngine::PrettyDebug),
            _ => Err(ConfigError::UnknownPrintEngine(s.to_string())),
        }
    }
}
