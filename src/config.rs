use crate::i18n::Language;
use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_SLIDES_API_URL: &str = "https://slides.googleapis.com/v1";

/// Command-line flags. Every flag can also come from the environment.
#[derive(Parser, Debug, Clone)]
#[command(name = "slides-translate")]
#[command(about = "Translates Google Slides presentations with OpenAI models")]
pub struct Args {
    /// ID of the presentation to translate
    #[arg(short, long, env = "PRESENTATION_ID")]
    pub presentation_id: String,

    /// Language code of the current slide text
    #[arg(short, long, env = "SOURCE_LANGUAGE", default_value = "EN")]
    pub source_language: String,

    /// Language code to translate into
    #[arg(short, long, env = "TARGET_LANGUAGE", default_value = "DE")]
    pub target_language: String,

    /// OpenAI model used for translation
    #[arg(short, long, env = "OPENAI_MODEL", default_value = "gpt-3.5-turbo")]
    pub gpt_model: String,

    /// Minimum level of the events that are logged
    #[arg(short, long, env = "LOG_LEVEL", value_enum, ignore_case = true, default_value = "info")]
    pub log_level: LogLevel,

    /// Run log file, rotated daily
    #[arg(long, env = "LOG_FILE", default_value = "slides-translate.log")]
    pub log_file: PathBuf,

    /// Log to the console only
    #[arg(long)]
    pub no_log_file: bool,

    /// Plan and log the replacements without writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Maximum number of translation requests in flight
    #[arg(long, env = "TRANSLATION_CONCURRENCY", default_value_t = 1)]
    pub concurrency: usize,
}

/// Log verbosity accepted by `--log-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    #[value(alias = "success")]
    Info,
    Warn,
    #[value(alias = "critical")]
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl Args {
    /// The run log path, unless file logging is switched off.
    pub fn log_file(&self) -> Option<&Path> {
        if self.no_log_file {
            None
        } else {
            Some(self.log_file.as_path())
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub presentation_id: String,
    pub source_language: Language,
    pub target_language: Language,

    // OpenAI
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_api_url: String,
    pub openai_max_tokens: u32,

    // Google Slides
    pub google_access_token: String,
    pub slides_api_url: String,

    pub concurrency: usize,
    pub dry_run: bool,
}

impl Config {
    /// Build the configuration from parsed flags and the process environment.
    pub fn load(args: Args) -> Result<Self> {
        Self::from_lookup(args, |key| std::env::var(key).ok())
    }

    /// Build the configuration from parsed flags and a key lookup.
    ///
    /// Fails before any network access when a credential is missing or a
    /// language code is unsupported.
    pub fn from_lookup<F>(args: Args, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source_language = Language::from_code(&args.source_language)
            .context("Invalid source language")?;
        let target_language = Language::from_code(&args.target_language)
            .context("Invalid target language")?;

        if args.presentation_id.trim().is_empty() {
            bail!("Presentation ID must not be empty");
        }
        if args.concurrency == 0 {
            bail!("Translation concurrency must be at least 1");
        }

        Ok(Self {
            presentation_id: args.presentation_id,
            source_language,
            target_language,

            openai_api_key: required(&lookup, "OPENAI_API_KEY")?,
            openai_model: args.gpt_model,
            openai_api_url: lookup("OPENAI_API_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_API_URL.to_string()),
            openai_max_tokens: lookup("OPENAI_MAX_TOKENS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(500),

            google_access_token: required(&lookup, "GOOGLE_ACCESS_TOKEN")?,
            slides_api_url: lookup("SLIDES_API_URL")
                .unwrap_or_else(|| DEFAULT_SLIDES_API_URL.to_string()),

            concurrency: args.concurrency,
            dry_run: args.dry_run,
        })
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        Some(_) => bail!("{} is empty", key),
        None => bail!("{} not set", key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["slides-translate", "-p", "deck-123"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).expect("Should parse")
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn credentials() -> Vec<(&'static str, &'static str)> {
        vec![
            ("OPENAI_API_KEY", "sk-test"),
            ("GOOGLE_ACCESS_TOKEN", "ya29.test"),
        ]
    }

    // ==================== Args Tests ====================

    #[test]
    fn test_args_short_flags() {
        let args = args(&["-s", "FR", "-t", "IT", "-g", "gpt-4o-mini", "-l", "DEBUG"]);
        assert_eq!(args.presentation_id, "deck-123");
        assert_eq!(args.source_language, "FR");
        assert_eq!(args.target_language, "IT");
        assert_eq!(args.gpt_model, "gpt-4o-mini");
        assert_eq!(args.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_log_level_accepts_any_case_and_aliases() {
        assert_eq!(args(&[]).log_level, LogLevel::Info);
        assert_eq!(args(&["-l", "warn"]).log_level, LogLevel::Warn);
        assert_eq!(args(&["-l", "SUCCESS"]).log_level, LogLevel::Info);
        assert_eq!(args(&["-l", "CRITICAL"]).log_level, LogLevel::Error);
        assert_eq!(LogLevel::Error.as_str(), "error");
    }

    #[test]
    fn test_log_level_rejects_unknown_with_choices() {
        let err = Args::try_parse_from(["slides-translate", "-p", "deck-123", "-l", "LOUD"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
        let message = err.to_string();
        assert!(message.contains("LOUD"), "{}", message);
        assert!(message.contains("debug"), "{}", message);
    }

    #[test]
    fn test_log_file_flags() {
        let default = args(&[]);
        assert_eq!(default.log_file(), Some(Path::new("slides-translate.log")));

        let custom = args(&["--log-file", "logs/run.log"]);
        assert_eq!(custom.log_file(), Some(Path::new("logs/run.log")));

        assert_eq!(args(&["--no-log-file"]).log_file(), None);
    }

    #[test]
    fn test_args_require_presentation_id() {
        assert!(Args::try_parse_from(["slides-translate"]).is_err());
    }

    // ==================== Config Tests ====================

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(args(&[]), env(&credentials())).expect("Should load");

        assert_eq!(config.source_language, Language::English);
        assert_eq!(config.target_language, Language::German);
        assert_eq!(config.openai_model, "gpt-3.5-turbo");
        assert_eq!(config.openai_api_url, DEFAULT_OPENAI_API_URL);
        assert_eq!(config.openai_max_tokens, 500);
        assert_eq!(config.slides_api_url, DEFAULT_SLIDES_API_URL);
        assert_eq!(config.concurrency, 1);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_environment_overrides() {
        let mut pairs = credentials();
        pairs.push(("OPENAI_API_URL", "http://localhost:1234/v1/chat/completions"));
        pairs.push(("OPENAI_MAX_TOKENS", "1200"));
        pairs.push(("SLIDES_API_URL", "http://localhost:4321/v1"));

        let config = Config::from_lookup(args(&["--dry-run", "--concurrency", "4"]), env(&pairs))
            .expect("Should load");

        assert_eq!(config.openai_api_url, "http://localhost:1234/v1/chat/completions");
        assert_eq!(config.openai_max_tokens, 1200);
        assert_eq!(config.slides_api_url, "http://localhost:4321/v1");
        assert_eq!(config.concurrency, 4);
        assert!(config.dry_run);
    }

    #[test]
    fn test_invalid_max_tokens_falls_back() {
        let mut pairs = credentials();
        pairs.push(("OPENAI_MAX_TOKENS", "lots"));
        let config = Config::from_lookup(args(&[]), env(&pairs)).expect("Should load");
        assert_eq!(config.openai_max_tokens, 500);
    }

    #[test]
    fn test_missing_openai_key() {
        let err = Config::from_lookup(args(&[]), env(&[("GOOGLE_ACCESS_TOKEN", "t")]))
            .unwrap_err()
            .to_string();
        assert!(err.contains("OPENAI_API_KEY not set"));
    }

    #[test]
    fn test_empty_openai_key() {
        let err = Config::from_lookup(
            args(&[]),
            env(&[("OPENAI_API_KEY", ""), ("GOOGLE_ACCESS_TOKEN", "t")]),
        )
        .unwrap_err()
        .to_string();
        assert!(err.contains("OPENAI_API_KEY is empty"));
    }

    #[test]
    fn test_missing_google_token() {
        let err = Config::from_lookup(args(&[]), env(&[("OPENAI_API_KEY", "k")]))
            .unwrap_err()
            .to_string();
        assert!(err.contains("GOOGLE_ACCESS_TOKEN not set"));
    }

    #[test]
    fn test_unsupported_language_fails() {
        let err = Config::from_lookup(args(&["-t", "XX"]), env(&credentials())).unwrap_err();
        assert!(err.to_string().contains("target language"));
        assert!(matches!(
            err.downcast_ref::<crate::error::Error>(),
            Some(crate::error::Error::UnsupportedLanguageCode(_))
        ));
    }

    #[test]
    fn test_language_checked_before_credentials() {
        // No credentials at all: the language error must win
        let err = Config::from_lookup(args(&["-s", "??"]), env(&[])).unwrap_err();
        assert!(err.to_string().contains("source language"));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let result = Config::from_lookup(args(&["--concurrency", "0"]), env(&credentials()));
        assert!(result.is_err());
    }
}
