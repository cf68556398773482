use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::adapters::outbound::network::{Credentials, InventoryClientConfig};
use crate::application::dto::OutputFormat;
use crate::config::ExtraConfig;
use crate::sbom_generation::domain::Scope;
use crate::shared::error::SbomError;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default attempts per inventory request
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Generate SPDX SBOM documents from a remote dependency inventory
///
/// `Args` has no `Debug` impl, so credential values are never printed.
#[derive(Parser)]
#[command(name = "sbom-generator")]
#[command(version)]
#[command(
    about = "Generate SPDX SBOM documents from a remote dependency inventory",
    long_about = None,
    after_help = "Documents take their creation time from the inventory's lastUpdated field. \
When it is missing, SOURCE_DATE_EPOCH (seconds since the Unix epoch) is used. \
Without either, the current time is used and reruns are not byte-identical."
)]
pub struct Args {
    /// User key for the inventory service
    #[arg(
        short = 'u',
        long = "user-key",
        env = "SBOM_USER_KEY",
        hide_env_values = true
    )]
    pub user_key: String,

    /// Organization token for the inventory service
    #[arg(
        short = 'k',
        long = "org-token",
        env = "SBOM_ORG_TOKEN",
        hide_env_values = true
    )]
    pub org_token: String,

    /// Scope (project or product) token. Can be specified multiple times: -s tok1 -s tok2
    #[arg(
        short = 's',
        long = "scope",
        value_name = "TOKEN",
        required_unless_present = "all_projects"
    )]
    pub scopes: Vec<String>,

    /// Generate a document for every project in the organization
    #[arg(long = "all-projects")]
    pub all_projects: bool,

    /// Output format: json, rdf, tv, or all to write one file per format
    #[arg(short = 't', long = "type", default_value = "json", value_name = "FORMAT")]
    pub format: String,

    /// Directory the documents are written to (created if missing)
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Inventory service URL, or `saas` for the hosted service
    #[arg(short = 'a', long = "url", env = "SBOM_URL", value_name = "URL")]
    pub url: Option<String>,

    /// Extra configuration file (YAML or JSON) with document metadata
    #[arg(short = 'e', long = "extra", value_name = "FILE")]
    pub extra: Option<PathBuf>,

    /// Request timeout in seconds [default: 30]
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Attempts per inventory request, including the first [default: 3]
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..=10))]
    pub retries: Option<u32>,

    /// Enable debug logging on stderr (SBOM_LOG overrides the filter)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Validated credentials
    ///
    /// # Errors
    /// Returns `SbomError::Usage` when either value is blank
    pub fn credentials(&self) -> Result<Credentials, SbomError> {
        Credentials::new(self.user_key.as_str(), self.org_token.as_str())
    }

    /// Secret values to scrub from anything printed
    pub fn secrets(&self) -> [&str; 2] {
        [self.user_key.trim(), self.org_token.trim()]
    }

    /// Parses `-t`; unknown names are `SbomError::UnsupportedFormat`
    pub fn output_format(&self) -> Result<OutputFormat, SbomError> {
        self.format.parse()
    }

    /// Scope tokens in command-line order
    pub fn scope_tokens(&self) -> Result<Vec<Scope>, SbomError> {
        self.scopes.iter().map(|token| Scope::new(token.as_str())).collect()
    }

    /// Client settings. Flags win over the extra config, which wins over defaults.
    pub fn client_config(&self, extra: &ExtraConfig) -> InventoryClientConfig {
        let url = self
            .url
            .as_deref()
            .or(extra.url.as_deref())
            .unwrap_or_default();
        let timeout_secs = self
            .timeout
            .or(extra.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let max_retries = self
            .retries
            .or(extra.max_retries)
            .unwrap_or(DEFAULT_MAX_RETRIES);

        InventoryClientConfig {
            base_url: InventoryClientConfig::resolve_base_url(url),
            timeout: Duration::from_secs(timeout_secs),
            max_retries,
            ..InventoryClientConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::network::DEFAULT_INVENTORY_URL;
    use clap::CommandFactory;

    fn parse(extra: &[&str]) -> Result<Args, clap::Error> {
        let mut argv = vec!["sbom-generator", "-u", "user-1", "-k", "org-1", "-o", "out"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv)
    }

    #[test]
    fn test_minimal_arguments() {
        let args = parse(&["-s", "demo-go"]).unwrap();
        assert_eq!(args.scopes, vec!["demo-go"]);
        assert_eq!(args.format, "json");
        assert_eq!(args.output_dir, PathBuf::from("out"));
        assert!(!args.all_projects);
        assert!(!args.verbose);
        assert_eq!(args.output_format().unwrap(), OutputFormat::Json);
    }

    #[test]
    fn test_repeated_scopes_keep_order() {
        let args = parse(&["-s", "b", "--scope", "a"]).unwrap();
        let tokens: Vec<String> = args
            .scope_tokens()
            .unwrap()
            .iter()
            .map(|s| s.token().to_string())
            .collect();
        assert_eq!(tokens, vec!["b", "a"]);
    }

    #[test]
    fn test_scope_required_without_all_projects() {
        let err = parse(&[]).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
        assert!(parse(&["--all-projects"]).is_ok());
    }

    #[test]
    fn test_output_required() {
        let result = Args::try_parse_from(["sbom-generator", "-u", "u", "-k", "k", "-s", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_format_is_unsupported() {
        let args = parse(&["-s", "x", "-t", "yaml"]).unwrap();
        let err = args.output_format().unwrap_err();
        assert!(matches!(err, SbomError::UnsupportedFormat { .. }));
        assert_eq!(err.exit_code().as_i32(), 4);
    }

    #[test]
    fn test_format_aliases() {
        let args = parse(&["-s", "x", "-t", "tv"]).unwrap();
        assert_eq!(args.output_format().unwrap(), OutputFormat::TagValue);
        let args = parse(&["-s", "x", "--type", "rdf"]).unwrap();
        assert_eq!(args.output_format().unwrap(), OutputFormat::Rdf);
        let args = parse(&["-s", "x", "-t", "all"]).unwrap();
        assert_eq!(args.output_format().unwrap(), OutputFormat::All);
    }

    #[test]
    fn test_help_documents_reproducible_timestamps() {
        let help = Args::command().render_help().to_string();
        assert!(help.contains("SOURCE_DATE_EPOCH"));
        assert!(help.contains("all to write one file per format"));
    }

    #[test]
    fn test_blank_credentials_rejected() {
        let args = Args::try_parse_from([
            "sbom-generator", "-u", " ", "-k", "org", "-s", "x", "-o", "out",
        ])
        .unwrap();
        let err = args.credentials().unwrap_err();
        assert_eq!(err.exit_code().as_i32(), 2);
    }

    #[test]
    fn test_client_config_defaults() {
        let args = parse(&["-s", "x"]).unwrap();
        let config = args.client_config(&ExtraConfig::default());
        assert_eq!(config.base_url, DEFAULT_INVENTORY_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_client_config_flag_beats_extra_config() {
        let extra = ExtraConfig {
            url: Some("inventory.internal/".to_string()),
            timeout_secs: Some(60),
            max_retries: Some(5),
            ..ExtraConfig::default()
        };

        let args = parse(&["-s", "x"]).unwrap();
        let config = args.client_config(&extra);
        assert_eq!(config.base_url, "https://inventory.internal");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.max_retries, 5);

        let args = parse(&["-s", "x", "-a", "http://127.0.0.1:9000", "--timeout", "5", "--retries", "1"])
            .unwrap();
        let config = args.client_config(&extra);
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_retries, 1);
    }

    #[test]
    fn test_zero_retries_rejected() {
        assert!(parse(&["-s", "x", "--retries", "0"]).is_err());
        assert!(parse(&["-s", "x", "--timeout", "0"]).is_err());
    }

    #[test]
    fn test_secrets_are_trimmed() {
        let args = Args::try_parse_from([
            "sbom-generator", "-u", " user-1 ", "-k", "org-1", "-s", "x", "-o", "out",
        ])
        .unwrap();
        assert_eq!(args.secrets(), ["user-1", "org-1"]);
    }
}
