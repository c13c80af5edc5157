//! Cloudflare DNS API client

use crate::error::{CloudflareError, Result};
use async_trait::async_trait;
use graphforge_cloud::{DnsRecord, DnsRegistrar};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Length of the random part of a generated instance hostname
const SUBDOMAIN_SUFFIX_LEN: usize = 8;

/// Cloudflare DNS registrar
pub struct CloudflareDns {
    client: reqwest::Client,
    api_token: String,
    zone_id: String,
    domain: String,
    base_url: String,
}

/// Configuration for the registrar
#[derive(Debug, Clone)]
pub struct DnsConfig {
    pub api_token: String,
    pub zone_id: String,
    /// Base domain the zone serves, e.g. "graphs.example.com"
    pub domain: String,
}

impl CloudflareDns {
    pub fn new(config: DnsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_token: config.api_token,
            zone_id: config.zone_id,
            domain: config.domain,
            base_url: CLOUDFLARE_API_BASE.to_string(),
        }
    }

    /// Override the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Get the base domain
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Mint a fresh instance hostname: `inst-` plus a random 8-character
    /// lowercase alphanumeric suffix under the base domain. Names are never
    /// reused, which is what lets record creation skip idempotency checks.
    pub fn generate_instance_fqdn(&self) -> String {
        const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
        let mut rng = rand::thread_rng();
        let suffix: String = (0..SUBDOMAIN_SUFFIX_LEN)
            .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
            .collect();
        format!("inst-{}.{}", suffix, self.domain)
    }

    async fn post_record(&self, request: &CreateDnsRecordRequest) -> Result<ApiDnsRecord> {
        let url = format!("{}/zones/{}/dns_records", self.base_url, self.zone_id);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(request)
            .send()
            .await?;

        let api_response: ApiResponse<ApiDnsRecord> = response.json().await?;

        if !api_response.success {
            let error_msg = api_response
                .errors
                .first()
                .map(|e| e.message.clone())
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(CloudflareError::ApiError(error_msg));
        }

        api_response
            .result
            .ok_or_else(|| CloudflareError::ApiError("empty result on success".to_string()))
    }
}

#[async_trait]
impl DnsRegistrar for CloudflareDns {
    fn mint_fqdn(&self) -> String {
        self.generate_instance_fqdn()
    }

    async fn create_record(
        &self,
        fqdn: &str,
        ip: Ipv4Addr,
        proxied: bool,
    ) -> graphforge_cloud::Result<DnsRecord> {
        tracing::info!("Creating DNS record: {} -> {}", fqdn, ip);

        let request = CreateDnsRecordRequest {
            r#type: "A".to_string(),
            name: fqdn.to_string(),
            content: ip.to_string(),
            ttl: 1, // Auto
            proxied,
        };

        let record = self.post_record(&request).await.map_err(|e| {
            tracing::warn!("DNS record creation failed for {}: {}", fqdn, e);
            graphforge_cloud::CloudError::from(e)
        })?;

        Ok(DnsRecord {
            id: record.id,
            name: record.name,
            content: record.content,
            proxied: record.proxied,
        })
    }
}

// ============ API Types ============

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    success: bool,
    result: Option<T>,
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[allow(dead_code)]
    code: i32,
    message: String,
}

#[derive(Debug, Deserialize)]
struct ApiDnsRecord {
    id: String,
    name: String,
    content: String,
    proxied: bool,
}

#[derive(Debug, Serialize)]
struct CreateDnsRecordRequest {
    #[serde(rename = "type")]
    r#type: String,
    name: String,
    content: String,
    ttl: u32,
    proxied: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registrar() -> CloudflareDns {
        CloudflareDns::new(DnsConfig {
            api_token: "test".to_string(),
            zone_id: "test".to_string(),
            domain: "graphs.example.com".to_string(),
        })
    }

    #[test]
    fn generated_fqdn_shape() {
        let dns = registrar();
        let fqdn = dns.generate_instance_fqdn();

        let (host, rest) = fqdn.split_once('.').unwrap();
        assert_eq!(rest, "graphs.example.com");
        assert!(host.starts_with("inst-"));

        let suffix = host.strip_prefix("inst-").unwrap();
        assert_eq!(suffix.len(), SUBDOMAIN_SUFFIX_LEN);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn generated_fqdns_do_not_collide() {
        let dns = registrar();
        let a = dns.generate_instance_fqdn();
        let b = dns.generate_instance_fqdn();
        assert_ne!(a, b);
    }

    #[test]
    fn parse_create_response() {
        let json = r#"{
            "success": true,
            "errors": [],
            "result": {
                "id": "rec-01",
                "name": "inst-a1b2c3d4.graphs.example.com",
                "type": "A",
                "content": "65.21.10.2",
                "ttl": 1,
                "proxied": true
            }
        }"#;

        let parsed: ApiResponse<ApiDnsRecord> = serde_json::from_str(json).unwrap();
        assert!(parsed.success);
        let record = parsed.result.unwrap();
        assert_eq!(record.content, "65.21.10.2");
        assert!(record.proxied);
    }

    #[test]
    fn parse_error_response() {
        let json = r#"{
            "success": false,
            "errors": [{ "code": 10000, "message": "Authentication error" }],
            "result": null
        }"#;

        let parsed: ApiResponse<ApiDnsRecord> = serde_json::from_str(json).unwrap();
        assert!(!parsed.success);
        assert_eq!(parsed.errors[0].message, "Authentication error");
    }
}
