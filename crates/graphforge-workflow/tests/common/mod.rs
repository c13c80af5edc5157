//! Scripted fakes for the workflow tests

#![allow(dead_code)]

use async_trait::async_trait;
use graphforge_cloud::retry::PollConfig;
use graphforge_cloud::{
    CloudError, ComputeProvider, DnsRecord, DnsRegistrar, Image, ImageStatus, Instance,
    PowerState, ServerSpec,
};
use graphforge_remote::{RemoteError, RemoteRunner, SshTarget};
use graphforge_workflow::WorkflowConfig;
use std::net::Ipv4Addr;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

pub const SNAPSHOT_NAME: &str = "neo4j-golden";
pub const TEST_FQDN: &str = "inst-test1234.graphs.example.com";

/// Compute provider fake. Records every call in order in `events` so tests
/// can assert sequencing, and rejects creation with a capacity error for
/// regions listed in `capacity_fail`.
#[derive(Default)]
pub struct MockProvider {
    pub events: Mutex<Vec<String>>,
    pub capacity_fail: Vec<String>,
    pub snapshot: Option<Image>,
    next_id: AtomicU32,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity_fail(regions: &[&str]) -> Self {
        Self {
            capacity_fail: regions.iter().map(|r| r.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_snapshot() -> Self {
        Self {
            snapshot: Some(Image {
                id: "img-9000".to_string(),
                description: SNAPSHOT_NAME.to_string(),
                status: ImageStatus::Available,
            }),
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn creates(&self) -> Vec<String> {
        self.events()
            .iter()
            .filter_map(|e| e.strip_prefix("create:").map(str::to_string))
            .collect()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.events()
            .iter()
            .filter_map(|e| e.strip_prefix("delete:").map(str::to_string))
            .collect()
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl ComputeProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn create_server(&self, spec: &ServerSpec) -> graphforge_cloud::Result<Instance> {
        self.record(format!("create:{}", spec.region));

        if self.capacity_fail.contains(&spec.region) {
            return Err(CloudError::CapacityExhausted {
                region: spec.region.clone(),
                message: "no capacity left".to_string(),
            });
        }

        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Instance {
            id: format!("srv-{n}"),
            name: spec.name.clone(),
            public_ip: Ipv4Addr::new(192, 0, 2, 10),
            region: spec.region.clone(),
            status: PowerState::Running,
        })
    }

    async fn server_status(&self, _id: &str) -> graphforge_cloud::Result<PowerState> {
        Ok(PowerState::Off)
    }

    async fn power_off(&self, id: &str) -> graphforge_cloud::Result<()> {
        self.record(format!("power_off:{id}"));
        Ok(())
    }

    async fn delete_server(&self, id: &str) -> graphforge_cloud::Result<()> {
        self.record(format!("delete:{id}"));
        Ok(())
    }

    async fn create_image(
        &self,
        server_id: &str,
        description: &str,
    ) -> graphforge_cloud::Result<Image> {
        self.record(format!("create_image:{server_id}"));
        Ok(Image {
            id: "img-9000".to_string(),
            description: description.to_string(),
            status: ImageStatus::Creating,
        })
    }

    async fn image_status(&self, _id: &str) -> graphforge_cloud::Result<ImageStatus> {
        Ok(ImageStatus::Available)
    }

    async fn find_image_by_name(&self, name: &str) -> graphforge_cloud::Result<Option<Image>> {
        Ok(self
            .snapshot
            .clone()
            .filter(|image| image.description == name))
    }
}

/// Remote runner fake. Records every script, and every file copy both as
/// a `copy:<remote path>` marker in the script stream (for ordering
/// assertions) and with its content in `copied`. Optionally fails scripts
/// containing `fail_matching`, and fails the first `probe_failures` probes.
#[derive(Default)]
pub struct MockRunner {
    pub scripts: Mutex<Vec<String>>,
    pub copied: Mutex<Vec<(String, String)>>,
    pub fail_matching: Option<&'static str>,
    pub probe_failures: u32,
    probes: AtomicU32,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_scripts_containing(needle: &'static str) -> Self {
        Self {
            fail_matching: Some(needle),
            ..Self::default()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            probe_failures: u32::MAX,
            ..Self::default()
        }
    }

    pub fn scripts(&self) -> Vec<String> {
        self.scripts.lock().unwrap().clone()
    }

    pub fn copied(&self) -> Vec<(String, String)> {
        self.copied.lock().unwrap().clone()
    }

    pub fn probe_count(&self) -> u32 {
        self.probes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteRunner for MockRunner {
    async fn probe(&self, _target: &SshTarget) -> graphforge_remote::Result<()> {
        let n = self.probes.fetch_add(1, Ordering::SeqCst);
        if n < self.probe_failures {
            Err(RemoteError::AttemptTimeout { seconds: 15 })
        } else {
            Ok(())
        }
    }

    async fn run_script(&self, _target: &SshTarget, script: &str) -> graphforge_remote::Result<()> {
        self.scripts.lock().unwrap().push(script.to_string());
        if let Some(needle) = self.fail_matching {
            if script.contains(needle) {
                return Err(RemoteError::ScriptFailed {
                    status: 1,
                    stderr: format!("mock failure on script containing {needle:?}"),
                });
            }
        }
        Ok(())
    }

    async fn copy_file(
        &self,
        _target: &SshTarget,
        local: &Path,
        remote_path: &str,
    ) -> graphforge_remote::Result<()> {
        let content = std::fs::read_to_string(local)?;
        self.scripts.lock().unwrap().push(format!("copy:{remote_path}"));
        self.copied
            .lock()
            .unwrap()
            .push((remote_path.to_string(), content));
        Ok(())
    }
}

/// DNS registrar fake with a deterministic minted fqdn.
#[derive(Default)]
pub struct MockDns {
    pub records: Mutex<Vec<(String, String, bool)>>,
}

impl MockDns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(String, String, bool)> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl DnsRegistrar for MockDns {
    fn mint_fqdn(&self) -> String {
        TEST_FQDN.to_string()
    }

    async fn create_record(
        &self,
        fqdn: &str,
        ip: Ipv4Addr,
        proxied: bool,
    ) -> graphforge_cloud::Result<DnsRecord> {
        self.records
            .lock()
            .unwrap()
            .push((fqdn.to_string(), ip.to_string(), proxied));
        // Duplicate names are allowed; the provider happily creates a
        // second record for the same fqdn.
        Ok(DnsRecord {
            id: format!("rec-{}", self.records.lock().unwrap().len()),
            name: fqdn.to_string(),
            content: ip.to_string(),
            proxied,
        })
    }
}

/// Workflow config with real identity values but millisecond poll budgets.
pub fn test_config() -> WorkflowConfig {
    WorkflowConfig {
        server_type: "cx22".to_string(),
        base_image: "ubuntu-24.04".to_string(),
        snapshot_name: SNAPSHOT_NAME.to_string(),
        ssh_key_name: "builder-key".to_string(),
        ssh_private_key_path: "/keys/builder".into(),
        git_repo_url: "https://example.com/infra.git".to_string(),
        dns_api_token: "cf-token".to_string(),
        dns_proxied: true,
        pin_explicit_region: true,
        poll: PollConfig::new(3, Duration::from_millis(1)),
        reachability: PollConfig::new(4, Duration::from_millis(1)),
        settle: Duration::ZERO,
    }
}
