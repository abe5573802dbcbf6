use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    /// Resolve the format from flags, falling back to the config default.
    pub fn resolve(json_flag: bool, format_flag: Option<&str>, config_default: &str) -> Self {
        if json_flag {
            return Self::Json;
        }
        match format_flag.unwrap_or(config_default) {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub pretty: bool,
    pub use_color: bool,
}

/// `color` is the config setting: "always", "never" or "auto".
pub fn detect_color(color_flag: bool, color: &str) -> bool {
    if !color_flag {
        return false;
    }
    match color {
        "always" => true,
        "never" => false,
        _ => std::env::var("NO_COLOR").is_err() && std::io::stdout().is_terminal(),
    }
}
