//! Remote script builders
//!
//! Every shell snippet the workflows ship over SSH is assembled here from
//! typed parameters. Callers never concatenate raw strings into scripts;
//! interpolated values arrive as function arguments and the functions own
//! the quoting.

/// Service home on provisioned instances
pub const INSTANCE_DIR: &str = "/home/neo4j_admin/neo4j_instance";

/// Where the service expects its certificate and key
pub const CERT_DIR: &str = "/home/neo4j_admin/neo4j_instance/ssl_certs";

/// uid:gid the database container runs as
const SERVICE_UID_GID: &str = "7474:7474";

/// Remote path of the DNS provider credential file used for the ACME
/// DNS challenge
pub const DNS_CREDENTIALS_PATH: &str = "/root/.secrets/cloudflare.ini";

/// OS-level bootstrap: install git, fetch the bootstrap repository and run
/// its template script. The script's content (user creation, firewall,
/// container runtime, directory layout) is versioned in that repository,
/// not here.
pub fn bootstrap(git_repo_url: &str) -> String {
    format!(
        "set -euo pipefail\n\
         sudo apt-get update\n\
         sudo apt-get install -y git\n\
         git clone '{git_repo_url}' ~/repo_temp\n\
         bash ~/repo_temp/templates/bootstrap-template.sh\n"
    )
}

/// Content of the credential file certbot's dns-cloudflare plugin reads.
/// The file is written locally and pushed over scp; the token never
/// appears in a remote command line.
pub fn dns_credentials_content(api_token: &str) -> String {
    format!("dns_cloudflare_api_token = {api_token}\n")
}

/// Create the directory the credential file is copied into.
pub fn prepare_dns_credentials_dir() -> String {
    "set -euo pipefail\n\
     mkdir -p /root/.secrets\n"
        .to_string()
}

/// Restrict the pushed credential file to the permissions certbot
/// insists on.
pub fn secure_dns_credentials() -> String {
    format!(
        "set -euo pipefail\n\
         chmod 600 {DNS_CREDENTIALS_PATH}\n"
    )
}

/// Obtain a certificate for `fqdn` via the DNS-01 challenge.
pub fn issue_certificate(fqdn: &str) -> String {
    format!(
        "set -euo pipefail\n\
         apt-get install -y certbot python3-certbot-dns-cloudflare\n\
         certbot certonly --non-interactive --agree-tos \
         --register-unsafely-without-email \
         --dns-cloudflare --dns-cloudflare-credentials {DNS_CREDENTIALS_PATH} \
         -d '{fqdn}'\n"
    )
}

/// Move the issued certificate into the service's certificate directory
/// with the ownership the container expects. Normalizes line endings
/// first; certificates occasionally arrive with CRLF from tooling upstream.
pub fn install_certificate(fqdn: &str) -> String {
    format!(
        "set -euo pipefail\n\
         install -d -m 755 {CERT_DIR}\n\
         cp /etc/letsencrypt/live/'{fqdn}'/fullchain.pem {CERT_DIR}/cert.pem\n\
         cp /etc/letsencrypt/live/'{fqdn}'/privkey.pem {CERT_DIR}/key.pem\n\
         dos2unix {CERT_DIR}/cert.pem {CERT_DIR}/key.pem || true\n\
         chown -R {SERVICE_UID_GID} {CERT_DIR}\n\
         chmod o+x /home/neo4j_admin\n"
    )
}

/// Start the database container stack.
pub fn start_service() -> String {
    format!(
        "set -euo pipefail\n\
         cd {INSTANCE_DIR}\n\
         chown -R {SERVICE_UID_GID} ./ssl_certs\n\
         docker compose -f docker-compose.yml up -d\n"
    )
}

/// Stop the stack again so the disk can be frozen into a snapshot.
pub fn stop_service() -> String {
    format!(
        "set -euo pipefail\n\
         cd {INSTANCE_DIR}\n\
         docker compose -f docker-compose.yml down\n"
    )
}

/// Open the service and ssh ports on a client instance.
pub fn open_firewall() -> String {
    "set -euo pipefail\n\
     ufw allow 7473\n\
     ufw allow 7687\n\
     ufw allow ssh\n\
     ufw --force enable\n"
        .to_string()
}
