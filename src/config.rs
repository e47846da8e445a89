use crate::constants::{api, app};
use crate::prefs::PrefsStore;
use crate::theme::Theme;
use crate::types::Endpoint;
use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::PathBuf;

/// Shinobix - terminal explorer for the Dattebayo character catalog
///
/// Browse characters, clans and villages from the public Dattebayo API.
/// Configuration priority: CLI args > Environment variables > Defaults
#[derive(Parser, Debug, Default)]
#[command(name = "shinobix")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Dattebayo catalog explorer", long_about = None)]
pub struct CliArgs {
    /// Base URL of the Dattebayo API
    #[arg(long, env = "DATTEBAYO_API_URL")]
    pub api_url: Option<String>,

    /// Request timeout in milliseconds (1000-120000)
    #[arg(long, env = "API_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Collection shown on startup: character, clan or village
    #[arg(short, long, env = "START_ENDPOINT", value_parser = clap::value_parser!(Endpoint))]
    pub endpoint: Option<Endpoint>,

    /// Name filter applied on startup
    #[arg(short, long, env = "START_SEARCH")]
    pub search: Option<String>,

    /// Force a theme (dark or light) instead of the stored preference
    #[arg(long, env = "THEME")]
    pub theme: Option<String>,

    /// Preferences file (defaults to the platform config directory)
    #[arg(long, env = "SHINOBIX_PREFS")]
    pub prefs_path: Option<PathBuf>,

    /// Search debounce in milliseconds (0-5000)
    #[arg(long, env = "SEARCH_DEBOUNCE_MS")]
    pub debounce_ms: Option<u64>,

    /// Log file for the interactive UI (defaults to the platform cache directory)
    #[arg(long, env = "SHINOBIX_LOG")]
    pub log_file: Option<PathBuf>,

    /// Print the first page as plain text and exit (no terminal UI)
    #[arg(long)]
    pub print: bool,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub timeout_ms: u64,
    pub start_endpoint: Endpoint,
    pub start_search: String,
    /// Set only when `--theme`/`THEME` was given
    pub theme_override: Option<Theme>,
    pub prefs_path: PathBuf,
    pub debounce_ms: u64,
    pub log_file: PathBuf,
    pub print: bool,
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

/// Validate URL format (basic check)
fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with http:// or https://"))
    }
}

fn default_log_file() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("shinobix")
        .join("shinobix.log")
}

/// Load configuration from CLI args and environment variables
/// Priority: CLI args > Environment variables > Defaults
pub fn load() -> Result<Config> {
    from_args(CliArgs::parse())
}

/// Build a validated [`Config`] from already-parsed arguments
pub fn from_args(args: CliArgs) -> Result<Config> {
    let api_url = args
        .api_url
        .unwrap_or_else(|| api::DEFAULT_BASE_URL.to_string());
    validate_url(&api_url, "DATTEBAYO_API_URL")?;

    let timeout_ms = args.timeout_ms.unwrap_or(api::DEFAULT_TIMEOUT_MS);
    let timeout_ms = validate_in_range(timeout_ms, 1000, 120_000, "API_TIMEOUT_MS")?;

    let debounce_ms = args.debounce_ms.unwrap_or(app::SEARCH_DEBOUNCE_MS);
    let debounce_ms = validate_in_range(debounce_ms, 0, 5000, "SEARCH_DEBOUNCE_MS")?;

    let theme_override = args
        .theme
        .as_deref()
        .map(Theme::from_str)
        .transpose()
        .map_err(|e| anyhow!(e))?;

    Ok(Config {
        api_url: api_url.trim_end_matches('/').to_string(),
        timeout_ms,
        start_endpoint: args.endpoint.unwrap_or_default(),
        start_search: args.search.unwrap_or_default().trim().to_string(),
        theme_override,
        prefs_path: args.prefs_path.unwrap_or_else(PrefsStore::default_path),
        debounce_ms,
        log_file: args.log_file.unwrap_or_else(default_log_file),
        print: args.print,
    })
}

impl Config {
    /// Log the effective configuration at startup
    pub fn log_summary(&self) {
        log::info!("[config] api_url={} timeout={}ms", self.api_url, self.timeout_ms);
        log::info!(
            "[config] start={} search={:?} debounce={}ms",
            self.start_endpoint,
            self.start_search,
            self.debounce_ms
        );
        log::info!("[config] prefs={}", self.prefs_path.display());
        if let Some(theme) = self.theme_override {
            log::info!("[config] theme override: {theme}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = from_args(CliArgs::default()).unwrap();
        assert_eq!(cfg.api_url, "https://dattebayo-api.onrender.com");
        assert_eq!(cfg.timeout_ms, 30_000);
        assert_eq!(cfg.debounce_ms, 400);
        assert_eq!(cfg.start_endpoint, Endpoint::Character);
        assert!(cfg.theme_override.is_none());
    }

    #[test]
    fn rejects_out_of_range_timeout() {
        let args = CliArgs { timeout_ms: Some(10), ..Default::default() };
        assert!(from_args(args).is_err());
    }

    #[test]
    fn rejects_non_http_url() {
        let args = CliArgs { api_url: Some("ftp://x".into()), ..Default::default() };
        assert!(from_args(args).is_err());
    }

    /// Every env-backed flag given on the command line, so the host environment never leaks in
    const FULL_ARGS: &[&str] = &[
        "shinobix", "--endpoint", "clans", "--search", " uchiha ", "--theme", "light",
        "--api-url", "http://localhost:3000/", "--timeout-ms", "30000",
        "--prefs-path", "/tmp/prefs.toml", "--log-file", "/tmp/shinobix.log",
    ];

    #[test]
    fn parses_cli_flags() {
        let mut argv = FULL_ARGS.to_vec();
        argv.extend(["--debounce-ms", "400"]);
        let cfg = from_args(CliArgs::try_parse_from(argv).unwrap()).unwrap();
        assert_eq!(cfg.start_endpoint, Endpoint::Clan);
        assert_eq!(cfg.start_search, "uchiha");
        assert_eq!(cfg.theme_override, Some(Theme::Light));
        assert_eq!(cfg.api_url, "http://localhost:3000");
        assert_eq!(cfg.timeout_ms, 30_000);
        assert_eq!(cfg.debounce_ms, 400);
    }

    #[test]
    fn cli_flag_beats_env_var() {
        // Only this test touches SEARCH_DEBOUNCE_MS
        std::env::set_var("SEARCH_DEBOUNCE_MS", "1234");

        let from_env = from_args(CliArgs::try_parse_from(FULL_ARGS).unwrap()).unwrap();
        let mut argv = FULL_ARGS.to_vec();
        argv.extend(["--debounce-ms", "250"]);
        let from_cli = from_args(CliArgs::try_parse_from(argv).unwrap()).unwrap();

        std::env::remove_var("SEARCH_DEBOUNCE_MS");
        assert_eq!(from_env.debounce_ms, 1234);
        assert_eq!(from_cli.debounce_ms, 250);
    }
}
