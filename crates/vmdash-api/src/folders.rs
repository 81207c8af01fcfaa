// Shared-folder endpoints.
//
// Create and update both return the full updated folder list.

use crate::client::VmRestClient;
use crate::error::Error;
use crate::types::{SharedFolder, SharedFolderParams};

impl VmRestClient {
    /// `GET /vms/{id}/sharedfolders`.
    pub async fn list_shared_folders(&self, id: &str) -> Result<Vec<SharedFolder>, Error> {
        self.get_json(self.api_url(&format!("vms/{id}/sharedfolders")))
            .await
    }

    /// `POST /vms/{id}/sharedfolders` -- mount a new shared folder.
    pub async fn create_shared_folder(
        &self,
        id: &str,
        folder: &SharedFolder,
    ) -> Result<Vec<SharedFolder>, Error> {
        self.post_json(self.api_url(&format!("vms/{id}/sharedfolders")), folder)
            .await
    }

    /// `PUT /vms/{id}/sharedfolders/{folderId}`.
    pub async fn update_shared_folder(
        &self,
        id: &str,
        folder_id: &str,
        params: &SharedFolderParams,
    ) -> Result<Vec<SharedFolder>, Error> {
        self.put_json(
            self.api_url(&format!("vms/{id}/sharedfolders/{folder_id}")),
            params,
        )
        .await
    }

    /// `DELETE /vms/{id}/sharedfolders/{folderId}`.
    pub async fn delete_shared_folder(&self, id: &str, folder_id: &str) -> Result<(), Error> {
        self.delete(self.api_url(&format!("vms/{id}/sharedfolders/{folder_id}")))
            .await
    }
}
