//! TLS certificate issuance
//!
//! DNS-challenge issuance executed on the provisioned instance itself:
//! push the DNS provider credential file, run the ACME client, move the
//! resulting certificate into the service's certificate directory.

use crate::scripts;
use graphforge_remote::{RemoteRunner, SshTarget};
use std::io::Write;
use tempfile::NamedTempFile;

pub struct CertificateIssuer<'a> {
    runner: &'a dyn RemoteRunner,
    dns_api_token: &'a str,
}

impl<'a> CertificateIssuer<'a> {
    pub fn new(runner: &'a dyn RemoteRunner, dns_api_token: &'a str) -> Self {
        Self {
            runner,
            dns_api_token,
        }
    }

    /// Issue and install a certificate for `fqdn`.
    ///
    /// The credential file is staged in a local temp file and copied over
    /// scp, so the token never rides in a remote command line. The steps
    /// run in order and the first failure aborts the whole operation.
    /// There is no rollback of partial state: the credential file or a
    /// half-issued certificate stay on the instance, and the DNS record
    /// created earlier in the flow stays in the zone. fqdns are random
    /// and never reused, so nothing later trips over the leftovers.
    pub async fn issue(&self, target: &SshTarget, fqdn: &str) -> graphforge_remote::Result<()> {
        tracing::info!("Issuing certificate for {}", fqdn);

        let credentials = self.stage_credentials()?;
        self.runner
            .run_script(target, &scripts::prepare_dns_credentials_dir())
            .await?;
        self.runner
            .copy_file(target, credentials.path(), scripts::DNS_CREDENTIALS_PATH)
            .await?;
        self.runner
            .run_script(target, &scripts::secure_dns_credentials())
            .await?;

        self.runner
            .run_script(target, &scripts::issue_certificate(fqdn))
            .await?;
        self.runner
            .run_script(target, &scripts::install_certificate(fqdn))
            .await
    }

    /// Write the credential file to a temp file that lives until the copy
    /// is done.
    fn stage_credentials(&self) -> graphforge_remote::Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        file.write_all(scripts::dns_credentials_content(self.dns_api_token).as_bytes())?;
        file.flush()?;
        Ok(file)
    }
}
