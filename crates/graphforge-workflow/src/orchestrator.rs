//! Workflow orchestrator
//!
//! Owns the stage sequencing, the region fallback loop, and the cleanup
//! discipline. Components below this layer never retry and never decide
//! what a failure means; that judgement lives here.

use crate::cert::CertificateIssuer;
use crate::error::{Result, WorkflowError};
use crate::outcome::ProvisionedInstance;
use crate::scripts;
use crate::service::{DEFAULT_SETTLE, ServiceController};
use crate::stage::{Stage, StageLogger};
use graphforge_cloud::retry::{self, Poll, PollConfig};
use graphforge_cloud::{
    ComputeProvider, DnsRegistrar, Image, ImageRef, ImageStatus, Instance, PowerState, RegionPlan,
    ServerSpec, location,
};
use graphforge_config::Settings;
use graphforge_remote::{RemoteRunner, SshTarget, wait_reachable};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Name given to the throwaway VM the golden-image flow builds on
const BUILDER_NAME: &str = "snapshot-builder";

/// Workflow tuning and identity, derived from [`Settings`] in production
/// and constructed directly (with tiny budgets) in tests.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    pub server_type: String,
    pub base_image: String,
    pub snapshot_name: String,
    pub ssh_key_name: String,
    pub ssh_private_key_path: PathBuf,
    pub git_repo_url: String,
    pub dns_api_token: String,
    pub dns_proxied: bool,
    pub pin_explicit_region: bool,
    /// Budget for power-off and image-availability polls
    pub poll: PollConfig,
    /// Budget for the SSH reachability probe
    pub reachability: PollConfig,
    /// First-start settle time before the golden-image stop
    pub settle: Duration,
}

impl From<&Settings> for WorkflowConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            server_type: settings.server_type.clone(),
            base_image: settings.base_image.clone(),
            snapshot_name: settings.snapshot_name.clone(),
            ssh_key_name: settings.ssh_key_name.clone(),
            ssh_private_key_path: settings.ssh_private_key_path.clone(),
            git_repo_url: settings.git_repo_url.clone(),
            dns_api_token: settings.cloudflare_api_token.clone(),
            dns_proxied: settings.dns_proxied,
            pin_explicit_region: settings.pin_explicit_region,
            poll: PollConfig::default(),
            reachability: PollConfig::default(),
            settle: DEFAULT_SETTLE,
        }
    }
}

/// Sequences the two provisioning flows.
pub struct Orchestrator {
    provider: Arc<dyn ComputeProvider>,
    runner: Arc<dyn RemoteRunner>,
    dns: Arc<dyn DnsRegistrar>,
    config: WorkflowConfig,
}

impl Orchestrator {
    pub fn new(
        provider: Arc<dyn ComputeProvider>,
        runner: Arc<dyn RemoteRunner>,
        dns: Arc<dyn DnsRegistrar>,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            provider,
            runner,
            dns,
            config,
        }
    }

    /// Build the golden snapshot.
    ///
    /// The builder VM is disposable: once creation has succeeded it is
    /// deleted at the end of the run no matter which later stage failed.
    /// Deletion failure is reported but never changes the run's outcome.
    pub async fn build_golden_image(
        &self,
        zone: Option<&str>,
        region: Option<&str>,
    ) -> Result<Image> {
        let logger = StageLogger::new("golden-image");

        logger.stage(Stage::Selecting);
        let plan = location::select_regions(zone, region, self.config.pin_explicit_region);
        logger.note(&format!(
            "zone {}, candidates: {}",
            plan.zone,
            plan.candidates.join(", ")
        ));

        logger.stage(Stage::Creating);
        let base_image = ImageRef::Name(self.config.base_image.clone());
        let instance = match self.create_with_fallback(&plan, BUILDER_NAME, base_image).await {
            Ok(instance) => instance,
            Err(e) => {
                logger.fail(&e.to_string());
                return Err(e);
            }
        };
        logger.note(&format!(
            "server {} created in {}, ip {}",
            instance.name, instance.region, instance.public_ip
        ));

        let result = self.golden_stages(&instance, &logger).await;

        logger.stage(Stage::CleaningUp);
        if let Err(e) = self.provider.delete_server(&instance.id).await {
            tracing::warn!("failed to delete builder server {}: {}", instance.id, e);
            logger.warn(&format!("builder server {} was not deleted: {e}", instance.id));
        } else {
            logger.note("builder server deleted");
        }

        match &result {
            Ok(image) => logger.finish(&format!("snapshot {} available", image.id)),
            Err(e) => logger.fail(&e.to_string()),
        }
        result
    }

    /// Everything between creation and cleanup of the golden-image flow.
    /// Split out so cleanup wraps it unconditionally.
    async fn golden_stages(&self, instance: &Instance, logger: &StageLogger) -> Result<Image> {
        let root = SshTarget::root(instance.public_ip, &self.config.ssh_private_key_path);

        logger.stage(Stage::WaitingReachable);
        if !wait_reachable(self.runner.as_ref(), &root, self.config.reachability).await {
            return Err(WorkflowError::Unreachable {
                address: instance.public_ip,
                attempts: self.config.reachability.max_attempts,
            });
        }

        logger.stage(Stage::Bootstrapping);
        self.runner
            .run_script(&root, &scripts::bootstrap(&self.config.git_repo_url))
            .await?;

        logger.stage(Stage::StartingService);
        let service = ServiceController::new(self.runner.as_ref());
        service.start(&root).await?;
        tracing::info!("service started, settling for {:?}", self.config.settle);
        sleep(self.config.settle).await;

        logger.stage(Stage::StoppingService);
        service.stop(&root).await?;
        logger.note("service initialized and stopped, instance is snapshot-ready");

        logger.stage(Stage::PoweringOff);
        self.provider.power_off(&instance.id).await?;
        self.wait_powered_off(instance).await?;

        logger.stage(Stage::CapturingImage);
        let image = self
            .provider
            .create_image(&instance.id, &self.config.snapshot_name)
            .await?;
        self.wait_image_available(&image).await?;

        Ok(Image {
            status: ImageStatus::Available,
            ..image
        })
    }

    /// Provision a client instance from the golden snapshot.
    ///
    /// The created server is the product: it is returned to the caller and
    /// never deleted here, even when a later stage fails.
    pub async fn provision_client(
        &self,
        zone: Option<&str>,
        region: Option<&str>,
    ) -> Result<ProvisionedInstance> {
        let logger = StageLogger::new("client-provisioning");

        let result = self.client_stages(zone, region, &logger).await;
        match &result {
            Ok(provisioned) => logger.finish(&format!("instance ready at {}", provisioned.fqdn)),
            Err(e) => logger.fail(&e.to_string()),
        }
        result
    }

    async fn client_stages(
        &self,
        zone: Option<&str>,
        region: Option<&str>,
        logger: &StageLogger,
    ) -> Result<ProvisionedInstance> {
        let snapshot = self
            .provider
            .find_image_by_name(&self.config.snapshot_name)
            .await?
            .ok_or_else(|| WorkflowError::SnapshotNotFound(self.config.snapshot_name.clone()))?;

        logger.stage(Stage::Selecting);
        let plan = location::select_regions(zone, region, self.config.pin_explicit_region);
        let fqdn = self.dns.mint_fqdn();
        logger.note(&format!("assigned hostname {fqdn}"));

        logger.stage(Stage::Creating);
        let instance = self
            .create_with_fallback(&plan, &fqdn, ImageRef::Id(snapshot.id))
            .await?;
        logger.note(&format!(
            "server created in {}, ip {}",
            instance.region, instance.public_ip
        ));

        logger.stage(Stage::ConfiguringDns);
        self.dns
            .create_record(&fqdn, instance.public_ip, self.config.dns_proxied)
            .await?;

        let root = SshTarget::root(instance.public_ip, &self.config.ssh_private_key_path);

        logger.stage(Stage::WaitingReachable);
        if !wait_reachable(self.runner.as_ref(), &root, self.config.reachability).await {
            return Err(WorkflowError::Unreachable {
                address: instance.public_ip,
                attempts: self.config.reachability.max_attempts,
            });
        }

        logger.stage(Stage::IssuingCert);
        let issuer = CertificateIssuer::new(self.runner.as_ref(), &self.config.dns_api_token);
        issuer.issue(&root, &fqdn).await?;

        logger.stage(Stage::StartingService);
        let service = ServiceController::new(self.runner.as_ref());
        service.open_firewall(&root).await?;
        service.start(&root).await?;

        Ok(ProvisionedInstance::for_fqdn(fqdn))
    }

    /// One create call per candidate region. Capacity rejections fall
    /// through to the next candidate; any other error aborts immediately,
    /// since retrying it elsewhere would fail the same way.
    async fn create_with_fallback(
        &self,
        plan: &RegionPlan,
        name: &str,
        image: ImageRef,
    ) -> Result<Instance> {
        for region in &plan.candidates {
            let spec = ServerSpec {
                name: name.to_string(),
                server_type: self.config.server_type.clone(),
                region: region.clone(),
                image: image.clone(),
                ssh_key: self.config.ssh_key_name.clone(),
                user_data: None,
            };

            match self.provider.create_server(&spec).await {
                Ok(instance) => return Ok(instance),
                Err(e) if e.is_capacity() => {
                    tracing::warn!("no capacity in {}: {}; trying next region", region, e);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(WorkflowError::NoCapacity {
            zone: plan.zone.clone(),
        })
    }

    async fn wait_powered_off(&self, instance: &Instance) -> Result<()> {
        let outcome = retry::poll_until(self.config.poll, || async {
            match self.provider.server_status(&instance.id).await {
                Ok(PowerState::Off) => Some(()),
                Ok(state) => {
                    tracing::debug!("server {} still {}", instance.id, state);
                    None
                }
                Err(e) => {
                    tracing::warn!("status poll failed for {}: {}", instance.id, e);
                    None
                }
            }
        })
        .await;

        match outcome {
            Poll::Ready(()) => Ok(()),
            Poll::Exhausted { .. } => Err(WorkflowError::ShutdownTimedOut {
                server: instance.id.clone(),
            }),
        }
    }

    async fn wait_image_available(&self, image: &Image) -> Result<()> {
        let outcome = retry::poll_until(self.config.poll, || async {
            match self.provider.image_status(&image.id).await {
                Ok(ImageStatus::Available) => Some(()),
                Ok(status) => {
                    tracing::debug!("image {} still {:?}", image.id, status);
                    None
                }
                Err(e) => {
                    tracing::warn!("image poll failed for {}: {}", image.id, e);
                    None
                }
            }
        })
        .await;

        match outcome {
            Poll::Ready(()) => Ok(()),
            Poll::Exhausted { .. } => Err(WorkflowError::ImageTimedOut {
                image: image.id.clone(),
            }),
        }
    }
}
