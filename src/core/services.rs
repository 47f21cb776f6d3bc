//! Remote collaborators for one invocation.

use std::rc::Rc;

use crate::core::aws::AwsSession;
use crate::core::kms::{AwsKms, KeyAgent};
use crate::core::metadata::MetadataSource;
use crate::core::settings::Settings;
use crate::core::store::{ObjectStore, S3Store};

/// Key agent, object store and metadata source used by the commands.
///
/// Nothing here touches the network until a command needs it.
pub struct Services {
    pub agent: KeyAgent,
    pub store: Box<dyn ObjectStore>,
    pub metadata: Box<dyn MetadataSource>,
}

impl Services {
    pub fn new(
        agent: KeyAgent,
        store: Box<dyn ObjectStore>,
        metadata: Box<dyn MetadataSource>,
    ) -> Self {
        Self {
            agent,
            store,
            metadata,
        }
    }

    /// AWS-backed services: KMS, S3 and the EC2 metadata service.
    pub fn aws(settings: &Settings) -> Self {
        let session = Rc::new(AwsSession::new(
            settings.region.clone(),
            Box::new(settings.metadata.client()),
        ));

        let agent = KeyAgent::new(
            Box::new(AwsKms::new(Rc::clone(&session))),
            settings.key_id.clone(),
        );
        Self::new(
            agent,
            Box::new(S3Store::new(session)),
            Box::new(settings.metadata.client()),
        )
    }
}
