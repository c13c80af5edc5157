//! Client-flow result descriptor

use serde::Serialize;

/// HTTPS browser port the database serves its UI on
pub const BROWSER_PORT: u16 = 7473;

/// Bolt protocol port for driver connections
pub const BOLT_PORT: u16 = 7687;

/// Default database login on a freshly provisioned instance
pub const DEFAULT_USER: &str = "neo4j";

/// Everything a client needs to reach their freshly provisioned instance.
/// Terminal output of the client flow; never mutated after return.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionedInstance {
    pub fqdn: String,
    pub browser_url: String,
    pub connect_uri: String,
    pub user: String,
    pub password_note: String,
}

impl ProvisionedInstance {
    pub fn for_fqdn(fqdn: impl Into<String>) -> Self {
        let fqdn = fqdn.into();
        Self {
            browser_url: format!("https://{fqdn}:{BROWSER_PORT}"),
            connect_uri: format!("neo4j+s://{fqdn}:{BOLT_PORT}"),
            fqdn,
            user: DEFAULT_USER.to_string(),
            password_note: "No password is set on first login; the database prompts you to choose one."
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_embeds_fqdn_and_fixed_ports() {
        let result = ProvisionedInstance::for_fqdn("inst-9f3ab2cd.graphs.example.com");
        assert_eq!(
            result.browser_url,
            "https://inst-9f3ab2cd.graphs.example.com:7473"
        );
        assert_eq!(
            result.connect_uri,
            "neo4j+s://inst-9f3ab2cd.graphs.example.com:7687"
        );
        assert_eq!(result.user, "neo4j");
    }
}
