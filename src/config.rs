//! Configuration and CLI argument handling

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "pomodoro-widget")]
#[command(about = "A 25-minute countdown timer widget served to the browser")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "25250")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Enable verbose logging (logs every tick)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["pomodoro-widget"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:25250");
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn overrides() {
        let config = Config::try_parse_from(["pomodoro-widget", "-p", "8080", "--host", "0.0.0.0", "-v"]).unwrap();
        assert_eq!(config.address(), "0.0.0.0:8080");
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn has_no_duration_flag() {
        assert!(Config::try_parse_from(["pomodoro-widget", "--timer", "5"]).is_err());
    }
}
