//! Command-line and environment configuration.

use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use deepsea_api::{ListOptions, ListVolumeParams, DEFAULT_BASE_URL};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Exporter configuration. Every flag can also be set from the environment.
#[derive(Parser)]
#[command(name = "deepsead", version, about = "DigitalOcean volume exporter for Prometheus")]
pub struct Config {
    /// DigitalOcean API token.
    #[arg(long, env = "DIGITALOCEAN_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Address to serve metrics on.
    #[arg(long, env = "DEEPSEA_LISTEN", default_value = "0.0.0.0:9212")]
    pub listen: SocketAddr,

    /// Path under which metrics are exposed.
    #[arg(
        long,
        env = "DEEPSEA_METRICS_PATH",
        default_value = "/metrics",
        value_parser = parse_metrics_path
    )]
    pub metrics_path: String,

    /// Deadline for one complete collection cycle (e.g. "5s", "500ms", "1m").
    #[arg(long, env = "DEEPSEA_TIMEOUT", default_value = "5s", value_parser = parse_duration)]
    pub timeout: Duration,

    /// Volumes requested per API page.
    #[arg(
        long,
        env = "DEEPSEA_PER_PAGE",
        default_value_t = 200,
        value_parser = clap::value_parser!(u32).range(1..=200)
    )]
    pub per_page: u32,

    /// Base URL of the DigitalOcean API.
    #[arg(long, env = "DEEPSEA_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Only export volumes in this region.
    #[arg(long, env = "DEEPSEA_REGION")]
    pub region: Option<String>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, env = "DEEPSEA_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "DEEPSEA_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Config {
    /// Parameters for the volume listing of each cycle.
    pub fn list_params(&self) -> ListVolumeParams {
        ListVolumeParams {
            region: self.region.clone().filter(|r| !r.is_empty()),
            name: None,
            list_options: ListOptions {
                page: 0,
                per_page: self.per_page,
            },
        }
    }
}

/// Parse a duration string like "5s", "500ms", "1m".
///
/// A bare number is taken as seconds. Zero is rejected.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    let parsed = if let Some(ms) = s.strip_suffix("ms") {
        ms.parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(secs) = s.strip_suffix('s') {
        secs.parse::<u64>().ok().map(Duration::from_secs)
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    };

    match parsed {
        Some(d) if d.is_zero() => Err("duration must be greater than zero".to_string()),
        Some(d) => Ok(d),
        None => Err(format!("invalid duration {s:?}, expected e.g. 5s, 500ms or 1m")),
    }
}

fn parse_metrics_path(s: &str) -> Result<String, String> {
    if !s.starts_with('/') {
        return Err(format!("metrics path {s:?} must start with '/'"));
    }
    if s == "/" || s == "/healthz" {
        return Err(format!("metrics path {s:?} is reserved"));
    }
    // The router would read these as captures or wildcards.
    if s.contains(['{', '}', '*', ':']) {
        return Err(format!("metrics path {s:?} must not contain '{{', '}}', '*' or ':'"));
    }
    Ok(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config, clap::Error> {
        let mut argv = vec!["deepsead", "--token", "secret"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv)
    }

    #[test]
    fn defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.token, "secret");
        assert_eq!(config.listen, "0.0.0.0:9212".parse::<SocketAddr>().unwrap());
        assert_eq!(config.metrics_path, "/metrics");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.per_page, 200);
        assert_eq!(config.api_url, DEFAULT_BASE_URL);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn list_params_carry_page_size_and_region() {
        let config = parse(&["--per-page", "50", "--region", "ams3"]).unwrap();
        let params = config.list_params();
        assert_eq!(params.list_options.per_page, 50);
        assert_eq!(params.list_options.page, 0);
        assert_eq!(params.region.as_deref(), Some("ams3"));
    }

    #[test]
    fn per_page_is_bounded() {
        assert!(parse(&["--per-page", "0"]).is_err());
        assert!(parse(&["--per-page", "201"]).is_err());
    }

    #[test]
    fn metrics_path_validation() {
        assert_eq!(parse(&["--metrics-path", "/scrape"]).unwrap().metrics_path, "/scrape");
        assert!(parse(&["--metrics-path", "metrics"]).is_err());
        assert!(parse(&["--metrics-path", "/"]).is_err());
        assert!(parse(&["--metrics-path", "/healthz"]).is_err());
    }

    #[test]
    fn metrics_path_rejects_route_patterns() {
        assert!(parse_metrics_path("/{job}").is_err());
        assert!(parse_metrics_path("/metrics/{*rest}").is_err());
        assert!(parse_metrics_path("/:metrics").is_err());
        assert!(parse_metrics_path("/*").is_err());
        assert_eq!(parse_metrics_path("/do/metrics").as_deref(), Ok("/do/metrics"));
    }

    #[test]
    fn timeout_flag() {
        let config = parse(&["--timeout", "750ms", "--log-format", "json"]).unwrap();
        assert_eq!(config.timeout, Duration::from_millis(750));
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(parse(&["--timeout", "soon"]).is_err());
    }

    #[test]
    fn parse_duration_units() {
        assert_eq!(parse_duration("5s"), Ok(Duration::from_secs(5)));
        assert_eq!(parse_duration("500ms"), Ok(Duration::from_millis(500)));
        assert_eq!(parse_duration("2m"), Ok(Duration::from_secs(120)));
        assert_eq!(parse_duration("10"), Ok(Duration::from_secs(10)));
    }

    #[test]
    fn parse_duration_rejects_zero_and_garbage() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("").is_err());
        assert!(parse_duration("1h").is_err());
        assert!(parse_duration("-5s").is_err());
    }
}
