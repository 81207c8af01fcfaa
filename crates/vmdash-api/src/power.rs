// Power endpoints.
//
// The PUT body is the bare operation string (`on`, `off`, `shutdown`,
// `suspend`, `pause`, `unpause`) -- not JSON.

use crate::client::VmRestClient;
use crate::error::Error;
use crate::types::PowerStateBody;

impl VmRestClient {
    /// `GET /vms/{id}/power` -- current server-reported power state.
    pub async fn get_power_state(&self, id: &str) -> Result<PowerStateBody, Error> {
        self.get_json(self.api_url(&format!("vms/{id}/power")))
            .await
    }

    /// `PUT /vms/{id}/power` -- request a power transition. Returns the
    /// state the daemon reports after accepting the operation; a 409 means
    /// the transition is not allowed from the current state.
    pub async fn set_power_state(&self, id: &str, operation: &str) -> Result<PowerStateBody, Error> {
        self.put_text(
            self.api_url(&format!("vms/{id}/power")),
            operation.to_owned(),
        )
        .await
    }
}
