// VM collection endpoints: list, get, update, delete, clone, register,
// restrictions.

use crate::client::VmRestClient;
use crate::error::Error;
use crate::types::{CloneParams, RegistrationParams, VmInformation, VmSummary, VmUpdateParams};

impl VmRestClient {
    /// `GET /vms` -- the full VM collection.
    pub async fn list_vms(&self) -> Result<Vec<VmSummary>, Error> {
        self.get_json(self.api_url("vms")).await
    }

    /// `GET /vms/{id}` -- CPU/memory settings for one VM.
    pub async fn get_vm(&self, id: &str) -> Result<VmInformation, Error> {
        self.get_json(self.api_url(&format!("vms/{id}"))).await
    }

    /// `PUT /vms/{id}` -- update CPU/memory settings.
    pub async fn update_vm(
        &self,
        id: &str,
        params: &VmUpdateParams,
    ) -> Result<VmInformation, Error> {
        self.put_json(self.api_url(&format!("vms/{id}")), params)
            .await
    }

    /// `DELETE /vms/{id}`.
    pub async fn delete_vm(&self, id: &str) -> Result<(), Error> {
        self.delete(self.api_url(&format!("vms/{id}"))).await
    }

    /// `POST /vms` -- clone a new VM from a parent.
    pub async fn clone_vm(&self, params: &CloneParams) -> Result<VmInformation, Error> {
        self.post_json(self.api_url("vms"), params).await
    }

    /// `POST /vms/registration` -- register an existing VM by name and
    /// filesystem path.
    pub async fn register_vm(&self, params: &RegistrationParams) -> Result<VmSummary, Error> {
        self.post_json(self.api_url("vms/registration"), params)
            .await
    }

    /// `GET /vms/{id}/restrictions` -- restriction flags. The shape varies
    /// wildly between product versions, so it stays untyped.
    pub async fn get_restrictions(&self, id: &str) -> Result<serde_json::Value, Error> {
        self.get_json(self.api_url(&format!("vms/{id}/restrictions")))
            .await
    }
}
