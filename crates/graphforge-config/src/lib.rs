//! Graphforge configuration
//!
//! All process-wide settings are read from the environment exactly once at
//! startup into an immutable [`Settings`] value that gets passed by
//! reference into every component. Nothing below this layer touches
//! environment variables.

pub mod error;

pub use error::*;

use std::path::PathBuf;

/// Default Hetzner server type for builder and client instances
const DEFAULT_SERVER_TYPE: &str = "cx22";

/// Default base OS image for the golden-image builder
const DEFAULT_BASE_IMAGE: &str = "ubuntu-24.04";

/// Immutable process configuration
#[derive(Debug, Clone)]
pub struct Settings {
    /// Hetzner Cloud API token
    pub hetzner_api_token: String,

    /// Cloudflare API token (also handed to the remote certbot run)
    pub cloudflare_api_token: String,

    /// Cloudflare zone the instance records are created in
    pub cloudflare_zone_id: String,

    /// Base domain under which instance fqdns are minted
    pub base_domain: String,

    /// Name of the SSH key registered with the compute provider
    pub ssh_key_name: String,

    /// Private key matching `ssh_key_name`
    pub ssh_private_key_path: PathBuf,

    /// Description of the golden snapshot (written at capture, matched at
    /// client provisioning)
    pub snapshot_name: String,

    /// Repository holding the bootstrap script the builder VM runs
    pub git_repo_url: String,

    /// Provider server type for all created instances
    pub server_type: String,

    /// Base OS image for the snapshot builder
    pub base_image: String,

    /// When true, an explicitly requested region is tried alone with no
    /// zone fallbacks (current behavior). When false the rest of the
    /// region's zone is appended as fallbacks.
    pub pin_explicit_region: bool,

    /// Whether instance DNS records go through the Cloudflare proxy
    pub dns_proxied: bool,
}

fn required(var: &str) -> Result<String> {
    std::env::var(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
}

fn flag(var: &str, default: bool) -> Result<bool> {
    match std::env::var(var) {
        Err(_) => Ok(default),
        Ok(value) => match value.as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                var: var.to_string(),
                value,
            }),
        },
    }
}

fn default_key_path() -> Result<PathBuf> {
    Ok(dirs::home_dir()
        .ok_or(ConfigError::HomeDirNotFound)?
        .join(".ssh")
        .join("id_ed25519"))
}

impl Settings {
    /// Load settings from the environment. Call once at process start.
    pub fn from_env() -> Result<Self> {
        let ssh_private_key_path = match std::env::var("SSH_PRIVATE_KEY_PATH") {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_key_path()?,
        };

        Ok(Self {
            hetzner_api_token: required("HETZNER_API_TOKEN")?,
            cloudflare_api_token: required("CLOUDFLARE_API_TOKEN")?,
            cloudflare_zone_id: required("CLOUDFLARE_ZONE_ID")?,
            base_domain: required("BASE_DOMAIN")?,
            ssh_key_name: required("SSH_KEY_NAME")?,
            ssh_private_key_path,
            snapshot_name: required("SNAPSHOT_NAME")?,
            git_repo_url: required("GIT_REPO_URL")?,
            server_type: std::env::var("GRAPHFORGE_SERVER_TYPE")
                .unwrap_or_else(|_| DEFAULT_SERVER_TYPE.to_string()),
            base_image: std::env::var("GRAPHFORGE_BASE_IMAGE")
                .unwrap_or_else(|_| DEFAULT_BASE_IMAGE.to_string()),
            pin_explicit_region: flag("GRAPHFORGE_PIN_REGION", true)?,
            dns_proxied: flag("GRAPHFORGE_DNS_PROXIED", true)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_REQUIRED: [(&str, Option<&str>); 7] = [
        ("HETZNER_API_TOKEN", Some("ht-token")),
        ("CLOUDFLARE_API_TOKEN", Some("cf-token")),
        ("CLOUDFLARE_ZONE_ID", Some("zone-1")),
        ("BASE_DOMAIN", Some("graphs.example.com")),
        ("SSH_KEY_NAME", Some("builder-key")),
        ("SNAPSHOT_NAME", Some("neo4j-golden")),
        ("GIT_REPO_URL", Some("https://example.com/bootstrap.git")),
    ];

    #[test]
    fn loads_with_defaults() {
        let mut vars: Vec<(&str, Option<&str>)> = ALL_REQUIRED.to_vec();
        vars.push(("SSH_PRIVATE_KEY_PATH", Some("/keys/builder")));

        temp_env::with_vars(vars, || {
            let settings = Settings::from_env().unwrap();
            assert_eq!(settings.server_type, "cx22");
            assert_eq!(settings.base_image, "ubuntu-24.04");
            assert_eq!(
                settings.ssh_private_key_path,
                PathBuf::from("/keys/builder")
            );
            assert!(settings.pin_explicit_region);
            assert!(settings.dns_proxied);
        });
    }

    #[test]
    fn missing_token_is_reported_by_name() {
        let mut vars: Vec<(&str, Option<&str>)> = ALL_REQUIRED.to_vec();
        vars[0] = ("HETZNER_API_TOKEN", None);

        temp_env::with_vars(vars, || {
            match Settings::from_env() {
                Err(ConfigError::MissingEnvVar(var)) => assert_eq!(var, "HETZNER_API_TOKEN"),
                other => panic!("unexpected: {other:?}"),
            }
        });
    }

    #[test]
    fn flag_parsing() {
        let mut vars: Vec<(&str, Option<&str>)> = ALL_REQUIRED.to_vec();
        vars.push(("SSH_PRIVATE_KEY_PATH", Some("/keys/builder")));
        vars.push(("GRAPHFORGE_PIN_REGION", Some("false")));
        vars.push(("GRAPHFORGE_DNS_PROXIED", Some("0")));

        temp_env::with_vars(vars, || {
            let settings = Settings::from_env().unwrap();
            assert!(!settings.pin_explicit_region);
            assert!(!settings.dns_proxied);
        });
    }

    #[test]
    fn bad_flag_value_rejected() {
        let mut vars: Vec<(&str, Option<&str>)> = ALL_REQUIRED.to_vec();
        vars.push(("SSH_PRIVATE_KEY_PATH", Some("/keys/builder")));
        vars.push(("GRAPHFORGE_PIN_REGION", Some("maybe")));

        temp_env::with_vars(vars, || {
            assert!(matches!(
                Settings::from_env(),
                Err(ConfigError::InvalidValue { .. })
            ));
        });
    }
}
