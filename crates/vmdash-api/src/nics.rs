// NIC device endpoints.

use crate::client::VmRestClient;
use crate::error::Error;
use crate::types::{NicDevice, NicDevicesResponse, NicParams};

impl VmRestClient {
    /// `GET /vms/{id}/nic`.
    pub async fn list_nics(&self, id: &str) -> Result<NicDevicesResponse, Error> {
        self.get_json(self.api_url(&format!("vms/{id}/nic"))).await
    }

    /// `POST /vms/{id}/nic` -- attach a new NIC.
    pub async fn create_nic(&self, id: &str, params: &NicParams) -> Result<NicDevice, Error> {
        self.post_json(self.api_url(&format!("vms/{id}/nic")), params)
            .await
    }

    /// `PUT /vms/{id}/nic/{index}` -- reconfigure a NIC.
    pub async fn update_nic(
        &self,
        id: &str,
        index: u32,
        params: &NicParams,
    ) -> Result<NicDevice, Error> {
        self.put_json(self.api_url(&format!("vms/{id}/nic/{index}")), params)
            .await
    }

    /// `DELETE /vms/{id}/nic/{index}`.
    pub async fn delete_nic(&self, id: &str, index: u32) -> Result<(), Error> {
        self.delete(self.api_url(&format!("vms/{id}/nic/{index}")))
            .await
    }
}
