// Guest networking endpoints: primary IP and the per-NIC fallback.

use crate::client::VmRestClient;
use crate::error::Error;
use crate::types::{IpResponse, NicIpsResponse};

impl VmRestClient {
    /// `GET /vms/{id}/ip` -- the guest's primary IP address. Fails with
    /// application code 106 while the guest is powered off and 118 while
    /// it has no address yet.
    pub async fn get_ip(&self, id: &str) -> Result<IpResponse, Error> {
        self.get_json(self.api_url(&format!("vms/{id}/ip"))).await
    }

    /// `GET /vms/{id}/nicips` -- extended per-NIC IP/route/DNS info.
    /// Addresses here may carry a `/prefix` suffix.
    pub async fn get_nic_ips(&self, id: &str) -> Result<NicIpsResponse, Error> {
        self.get_json(self.api_url(&format!("vms/{id}/nicips")))
            .await
    }
}
