// Host virtual-network and port-forwarding endpoints.
//
// Port-forward rules are keyed by (network, protocol, port); create and
// update are both PUT against the same key.

use crate::client::VmRestClient;
use crate::error::Error;
use crate::types::{
    CreateNetworkParams, NetworksResponse, PortForwardParams, PortForwardsResponse, VirtualNetwork,
};

impl VmRestClient {
    /// `GET /vmnet` -- all host virtual networks.
    pub async fn list_networks(&self) -> Result<NetworksResponse, Error> {
        self.get_json(self.api_url("vmnet")).await
    }

    /// `POST /vmnets` -- create a virtual network.
    pub async fn create_network(
        &self,
        params: &CreateNetworkParams,
    ) -> Result<VirtualNetwork, Error> {
        self.post_json(self.api_url("vmnets"), params).await
    }

    /// `GET /vmnet/{net}/portforward`.
    pub async fn list_port_forwards(&self, vmnet: &str) -> Result<PortForwardsResponse, Error> {
        self.get_json(self.api_url(&format!("vmnet/{vmnet}/portforward")))
            .await
    }

    /// `PUT /vmnet/{net}/portforward/{protocol}/{port}` -- create or
    /// update the rule at this key.
    pub async fn set_port_forward(
        &self,
        vmnet: &str,
        protocol: &str,
        port: u16,
        params: &PortForwardParams,
    ) -> Result<(), Error> {
        let url = self.api_url(&format!("vmnet/{vmnet}/portforward/{protocol}/{port}"));
        self.put_json_no_content(url, params).await
    }

    /// `DELETE /vmnet/{net}/portforward/{protocol}/{port}`.
    pub async fn delete_port_forward(
        &self,
        vmnet: &str,
        protocol: &str,
        port: u16,
    ) -> Result<(), Error> {
        self.delete(self.api_url(&format!("vmnet/{vmnet}/portforward/{protocol}/{port}")))
            .await
    }
}
