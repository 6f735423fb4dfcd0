use shared_types::Address;
use tracing::info;

use crate::domain::DirectoryError;
use crate::identity::{extract_identity, PeerContext};
use crate::ports::DirectoryApi;
use crate::service::DirectoryService;

impl DirectoryApi for DirectoryService {
    fn announce(
        &self,
        peer: Option<&PeerContext>,
        endpoints: Vec<String>,
    ) -> Result<(), DirectoryError> {
        let identity = extract_identity(peer)?;

        info!(
            eth = %identity,
            ips = ?endpoints,
            "Handling announce request"
        );

        self.directory.announce(identity, endpoints);
        Ok(())
    }

    fn resolve(&self, address: &str) -> Result<Vec<String>, DirectoryError> {
        info!(eth = address, "Handling resolve request");

        let identity: Address = address.parse()?;
        self.directory.resolve(&identity)
    }
}
