//! `ComputeProvider` implementation on top of the Hetzner API client

use crate::api::{ApiImage, ApiServer, CreateServerRequest, HetznerApi};
use crate::error::HetznerError;
use async_trait::async_trait;
use graphforge_cloud::{
    CloudError, ComputeProvider, Image, ImageRef, ImageStatus, Instance, PowerState, ServerSpec,
};
use std::net::Ipv4Addr;

/// Hetzner Cloud provider
pub struct HetznerProvider {
    api: HetznerApi,
}

impl HetznerProvider {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api: HetznerApi::new(api_token),
        }
    }

    pub fn with_api(api: HetznerApi) -> Self {
        Self { api }
    }
}

fn power_state(status: &str) -> PowerState {
    match status {
        "running" => PowerState::Running,
        "off" => PowerState::Off,
        _ => PowerState::Unknown,
    }
}

fn image_status(status: &str) -> ImageStatus {
    match status {
        "available" => ImageStatus::Available,
        "creating" => ImageStatus::Creating,
        _ => ImageStatus::Unavailable,
    }
}

fn into_instance(server: ApiServer) -> graphforge_cloud::Result<Instance> {
    let ip: Ipv4Addr = server
        .public_net
        .ipv4
        .as_ref()
        .ok_or_else(|| {
            CloudError::InvalidResponse(format!("server {} has no public IPv4", server.id))
        })?
        .ip
        .parse()
        .map_err(|e| CloudError::InvalidResponse(format!("bad IPv4 address: {e}")))?;

    Ok(Instance {
        id: server.id.to_string(),
        name: server.name,
        public_ip: ip,
        region: server.datacenter.location.name,
        status: power_state(&server.status),
    })
}

fn into_image(image: ApiImage) -> Image {
    Image {
        id: image.id.to_string(),
        description: image.description.unwrap_or_default(),
        status: image_status(&image.status),
    }
}

#[async_trait]
impl ComputeProvider for HetznerProvider {
    fn name(&self) -> &str {
        "hetzner-cloud"
    }

    async fn create_server(&self, spec: &ServerSpec) -> graphforge_cloud::Result<Instance> {
        let key = self
            .api
            .find_ssh_key(&spec.ssh_key)
            .await
            .map_err(CloudError::from)?
            .ok_or_else(|| {
                CloudError::from(HetznerError::SshKeyNotFound(spec.ssh_key.clone()))
            })?;

        // Snapshots are addressed by numeric id, base OS images by name.
        let image = match &spec.image {
            ImageRef::Name(name) => name.clone(),
            ImageRef::Id(id) => id.clone(),
        };

        let request = CreateServerRequest {
            name: &spec.name,
            server_type: &spec.server_type,
            location: &spec.region,
            image: &image,
            ssh_keys: vec![key.id],
            user_data: spec.user_data.as_deref(),
            start_after_create: true,
        };

        let server = self.api.create_server(&request).await?;
        into_instance(server)
    }

    async fn server_status(&self, id: &str) -> graphforge_cloud::Result<PowerState> {
        let server = self.api.get_server(id).await?;
        Ok(power_state(&server.status))
    }

    async fn power_off(&self, id: &str) -> graphforge_cloud::Result<()> {
        self.api.power_off(id).await?;
        Ok(())
    }

    async fn delete_server(&self, id: &str) -> graphforge_cloud::Result<()> {
        self.api.delete_server(id).await?;
        Ok(())
    }

    async fn create_image(
        &self,
        server_id: &str,
        description: &str,
    ) -> graphforge_cloud::Result<Image> {
        let image = self.api.create_image(server_id, description).await?;
        Ok(into_image(image))
    }

    async fn image_status(&self, id: &str) -> graphforge_cloud::Result<ImageStatus> {
        let image = self.api.get_image(id).await?;
        Ok(image_status(&image.status))
    }

    async fn find_image_by_name(&self, name: &str) -> graphforge_cloud::Result<Option<Image>> {
        let snapshots = self.api.list_snapshots().await?;
        Ok(snapshots
            .into_iter()
            .find(|i| i.description.as_deref() == Some(name))
            .map(into_image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(power_state("running"), PowerState::Running);
        assert_eq!(power_state("off"), PowerState::Off);
        assert_eq!(power_state("starting"), PowerState::Unknown);
        assert_eq!(power_state("migrating"), PowerState::Unknown);
    }

    #[test]
    fn image_status_mapping() {
        assert_eq!(image_status("available"), ImageStatus::Available);
        assert_eq!(image_status("creating"), ImageStatus::Creating);
        assert_eq!(image_status("unavailable"), ImageStatus::Unavailable);
    }

    #[test]
    fn instance_requires_public_ip() {
        let server: ApiServer = serde_json::from_str(
            r#"{
                "id": 5,
                "name": "builder",
                "status": "running",
                "public_net": { "ipv4": null },
                "datacenter": { "location": { "name": "hel1" } }
            }"#,
        )
        .unwrap();

        assert!(matches!(
            into_instance(server),
            Err(CloudError::InvalidResponse(_))
        ));
    }
}
