//! Hetzner Cloud API client
//!
//! Thin typed wrapper over the REST endpoints the workflows need: server
//! create/read/delete, power actions, snapshot capture and image lookup.
//! Bearer token authentication, JSON bodies.

use crate::error::{HetznerError, Result};
use serde::{Deserialize, Serialize};

const HETZNER_API_BASE: &str = "https://api.hetzner.cloud/v1";

/// Error codes the API uses for placement/capacity rejections. These are
/// the only errors worth retrying in another region.
const CAPACITY_CODES: &[&str] = &["resource_unavailable", "placement_error"];

/// Hetzner Cloud API client
pub struct HetznerApi {
    client: reqwest::Client,
    api_token: String,
    base_url: String,
}

impl HetznerApi {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_token: api_token.into(),
            base_url: HETZNER_API_BASE.to_string(),
        }
    }

    /// Override the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Create a server. `region` rides along only to label capacity errors.
    pub async fn create_server(&self, request: &CreateServerRequest<'_>) -> Result<ApiServer> {
        let url = format!("{}/servers", self.base_url);
        tracing::debug!(name = request.name, location = request.location, "POST /servers");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(request)
            .send()
            .await?;

        let body: CreateServerResponse =
            Self::decode(response, Some(request.location)).await?;
        Ok(body.server)
    }

    pub async fn get_server(&self, id: &str) -> Result<ApiServer> {
        let url = format!("{}/servers/{}", self.base_url, id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        let body: ServerResponse = Self::decode(response, None).await?;
        Ok(body.server)
    }

    pub async fn power_off(&self, id: &str) -> Result<()> {
        let url = format!("{}/servers/{}/actions/poweroff", self.base_url, id);
        tracing::debug!(server = id, "POST poweroff action");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        let _: ActionResponse = Self::decode(response, None).await?;
        Ok(())
    }

    pub async fn delete_server(&self, id: &str) -> Result<()> {
        let url = format!("{}/servers/{}", self.base_url, id);
        tracing::debug!(server = id, "DELETE /servers");

        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        let _: ActionResponse = Self::decode(response, None).await?;
        Ok(())
    }

    /// Request a snapshot from a powered-off server
    pub async fn create_image(&self, server_id: &str, description: &str) -> Result<ApiImage> {
        let url = format!(
            "{}/servers/{}/actions/create_image",
            self.base_url, server_id
        );
        tracing::debug!(server = server_id, description, "POST create_image action");

        let request = CreateImageRequest {
            description,
            r#type: "snapshot",
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&request)
            .send()
            .await?;

        let body: CreateImageResponse = Self::decode(response, None).await?;
        Ok(body.image)
    }

    pub async fn get_image(&self, id: &str) -> Result<ApiImage> {
        let url = format!("{}/images/{}", self.base_url, id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        let body: ImageResponse = Self::decode(response, None).await?;
        Ok(body.image)
    }

    /// List snapshot images. Snapshots carry a description rather than a
    /// name, so name matching happens client-side.
    pub async fn list_snapshots(&self) -> Result<Vec<ApiImage>> {
        let url = format!("{}/images?type=snapshot", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        let body: ImagesResponse = Self::decode(response, None).await?;
        Ok(body.images)
    }

    /// Resolve a registered SSH key name to its provider id
    pub async fn find_ssh_key(&self, name: &str) -> Result<Option<ApiSshKey>> {
        let url = format!("{}/ssh_keys?name={}", self.base_url, name);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        let body: SshKeysResponse = Self::decode(response, None).await?;
        Ok(body.ssh_keys.into_iter().next())
    }

    /// Decode a response, mapping non-2xx statuses to typed errors.
    /// `region` labels capacity rejections for the create path.
    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        region: Option<&str>,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body: ApiErrorBody = match response.json().await {
            Ok(body) => body,
            Err(_) => {
                return Err(HetznerError::Api {
                    code: status.as_u16().to_string(),
                    message: format!("HTTP {status} with undecodable body"),
                });
            }
        };

        if CAPACITY_CODES.contains(&body.error.code.as_str()) {
            return Err(HetznerError::NoCapacity {
                region: region.unwrap_or("unknown").to_string(),
                message: body.error.message,
            });
        }

        Err(HetznerError::Api {
            code: body.error.code,
            message: body.error.message,
        })
    }
}

// ============ API Types ============

#[derive(Debug, Serialize)]
pub struct CreateServerRequest<'a> {
    pub name: &'a str,
    pub server_type: &'a str,
    pub location: &'a str,
    pub image: &'a str,
    pub ssh_keys: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_data: Option<&'a str>,
    pub start_after_create: bool,
}

#[derive(Debug, Deserialize)]
struct CreateServerResponse {
    server: ApiServer,
}

#[derive(Debug, Deserialize)]
struct ServerResponse {
    server: ApiServer,
}

#[derive(Debug, Deserialize)]
struct ActionResponse {
    #[allow(dead_code)]
    action: Option<ApiAction>,
}

#[derive(Debug, Deserialize)]
struct CreateImageResponse {
    image: ApiImage,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    image: ApiImage,
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    images: Vec<ApiImage>,
}

#[derive(Debug, Deserialize)]
struct SshKeysResponse {
    ssh_keys: Vec<ApiSshKey>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiServer {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub public_net: PublicNet,
    pub datacenter: Datacenter,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublicNet {
    pub ipv4: Option<Ipv4Info>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ipv4Info {
    pub ip: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Datacenter {
    pub location: LocationInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationInfo {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiImage {
    pub id: i64,
    pub description: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSshKey {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize)]
struct CreateImageRequest<'a> {
    description: &'a str,
    r#type: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiAction {
    #[allow(dead_code)]
    id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_server_response() {
        let json = r#"{
            "server": {
                "id": 42,
                "name": "snapshot-builder",
                "status": "running",
                "public_net": { "ipv4": { "ip": "65.21.10.2", "blocked": false } },
                "datacenter": { "name": "fsn1-dc14", "location": { "name": "fsn1" } }
            }
        }"#;

        let parsed: ServerResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.server.id, 42);
        assert_eq!(parsed.server.status, "running");
        assert_eq!(parsed.server.public_net.ipv4.unwrap().ip, "65.21.10.2");
        assert_eq!(parsed.server.datacenter.location.name, "fsn1");
    }

    #[test]
    fn parse_image_response() {
        let json = r#"{
            "image": { "id": 7001, "description": "neo4j-golden", "status": "creating", "type": "snapshot" }
        }"#;

        let parsed: ImageResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.image.id, 7001);
        assert_eq!(parsed.image.description.as_deref(), Some("neo4j-golden"));
        assert_eq!(parsed.image.status, "creating");
    }

    #[test]
    fn parse_error_body() {
        let json = r#"{ "error": { "code": "resource_unavailable", "message": "no capacity left" } }"#;
        let parsed: ApiErrorBody = serde_json::from_str(json).unwrap();
        assert!(CAPACITY_CODES.contains(&parsed.error.code.as_str()));
    }

    #[test]
    fn create_request_omits_empty_user_data() {
        let request = CreateServerRequest {
            name: "inst-ab12cd34.example.com",
            server_type: "cx22",
            location: "nbg1",
            image: "ubuntu-24.04",
            ssh_keys: vec![99],
            user_data: None,
            start_after_create: true,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("user_data").is_none());
        assert_eq!(value["ssh_keys"], serde_json::json!([99]));
    }
}
