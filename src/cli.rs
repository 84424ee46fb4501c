//! Command-line interface for awsquiz
//!
//! Provides argument parsing and subcommand handling for the awsquiz binary.

use clap::{Parser, Subcommand};

/// AWS certification quiz question generator
#[derive(Parser)]
#[command(name = "awsquiz")]
#[command(version)]
#[command(about = "AWS certification quiz question generator")]
#[command(
    long_about = "awsquiz serves GET|POST /api/quiz, which asks OpenAI for one AWS \
    certification multiple-choice question and falls back to Gemini when OpenAI fails. \
    API keys are read from OPENAI_API_KEY and GEMINI_API_KEY."
)]
pub struct Cli {
    /// Path to configuration file (built-in defaults are used if it does not exist)
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server (the default when no command is given)
    Serve,

    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Generate one quiz question and print the response JSON
    Generate,
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# awsquiz Configuration
# =====================
#
# Every section is optional; omitted values use the defaults shown here.
# API keys are NOT read from this file. Set them in the environment:
#
#   OPENAI_API_KEY   primary provider
#   GEMINI_API_KEY   fallback provider
#
# At least one key is required. With both set, Gemini is only called when
# OpenAI fails or returns something that is not a valid quiz question.

# ─────────────────────────────────────────────────────────────────────────────
# SERVER CONFIGURATION
# ─────────────────────────────────────────────────────────────────────────────

[server]
# IP address to bind to (0.0.0.0 for all interfaces, 127.0.0.1 for localhost only)
host = "0.0.0.0"

# Port to listen on
port = 3000

# ─────────────────────────────────────────────────────────────────────────────
# PROVIDERS
# ─────────────────────────────────────────────────────────────────────────────
#
# Fields:
#   - model: Model identifier sent to the provider
#   - base_url: API base URL (http:// or https://)
#   - timeout_seconds: Per-call timeout, 1-300. A timeout counts as a provider
#     failure and triggers the fallback.

[providers.openai]
model = "gpt-4"
base_url = "https://api.openai.com/v1"
timeout_seconds = 15

[providers.gemini]
model = "gemini-1.5-flash"
base_url = "https://generativelanguage.googleapis.com/v1beta"
timeout_seconds = 15

# ─────────────────────────────────────────────────────────────────────────────
# OBSERVABILITY
# ─────────────────────────────────────────────────────────────────────────────

[observability]
# Log level: "trace", "debug", "info", "warn", "error" (RUST_LOG overrides)
log_level = "info"

# Prometheus metrics are always available at /metrics on the server port
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn default_config_path() {
        let cli = Cli::parse_from(["awsquiz"]);
        assert_eq!(cli.config, "config.toml");
        assert!(cli.command.is_none());
    }

    #[test]
    fn custom_config_path() {
        let cli = Cli::parse_from(["awsquiz", "--config", "custom.toml"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn config_subcommand_with_output() {
        let cli = Cli::parse_from(["awsquiz", "config", "-o", "my-config.toml"]);
        assert!(matches!(
            cli.command,
            Some(Command::Config { output: Some(ref path) }) if path == "my-config.toml"
        ));
    }

    #[test]
    fn generate_subcommand_accepts_global_config() {
        let cli = Cli::parse_from(["awsquiz", "generate", "--config", "q.toml"]);
        assert!(matches!(cli.command, Some(Command::Generate)));
        assert_eq!(cli.config, "q.toml");
    }

    #[test]
    fn serve_subcommand() {
        let cli = Cli::parse_from(["awsquiz", "serve"]);
        assert!(matches!(cli.command, Some(Command::Serve)));
    }

    #[test]
    fn template_is_a_valid_config() {
        let config: crate::config::Config = generate_config_template()
            .parse()
            .expect("template should parse and validate");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.providers.openai.model(), "gpt-4");
    }

    #[test]
    fn template_has_all_sections() {
        let template = generate_config_template();
        assert!(template.contains("[server]"));
        assert!(template.contains("[providers.openai]"));
        assert!(template.contains("[providers.gemini]"));
        assert!(template.contains("[observability]"));
        assert!(template.contains("OPENAI_API_KEY"));
    }
}
