//! Shared AWS session.
//!
//! The SDK is async; this module owns a single current-thread tokio runtime
//! and the loaded SDK configuration, both built on first use and reused by
//! the KMS and S3 clients.
//!
//! Region resolution order:
//! 1. explicit region from settings
//! 2. the SDK's ambient provider chain (`AWS_REGION`, profile, ...)
//! 3. the EC2 instance identity document

use std::cell::OnceCell;
use std::future::Future;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use tokio::runtime::Runtime;
use tracing::debug;

use crate::core::metadata::MetadataSource;
use crate::error::{Error, Result};

struct Loaded {
    runtime: Runtime,
    config: SdkConfig,
}

/// Lazily initialized AWS runtime and configuration.
pub struct AwsSession {
    region: Option<String>,
    metadata: Box<dyn MetadataSource>,
    loaded: OnceCell<Loaded>,
}

impl AwsSession {
    /// Create a session. Nothing is loaded until the first request.
    pub fn new(region: Option<String>, metadata: Box<dyn MetadataSource>) -> Self {
        Self {
            region,
            metadata,
            loaded: OnceCell::new(),
        }
    }

    /// SDK configuration, loading it on first call.
    pub fn config(&self) -> Result<&SdkConfig> {
        Ok(&self.loaded()?.config)
    }

    /// Drive an SDK future to completion on the session runtime.
    pub fn block_on<F: Future>(&self, future: F) -> Result<F::Output> {
        Ok(self.loaded()?.runtime.block_on(future))
    }

    fn loaded(&self) -> Result<&Loaded> {
        if let Some(loaded) = self.loaded.get() {
            return Ok(loaded);
        }
        let loaded = self.load()?;
        Ok(self.loaded.get_or_init(|| loaded))
    }

    fn load(&self) -> Result<Loaded> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::Runtime)?;

        let loader = aws_config::defaults(BehaviorVersion::latest());
        let config = match &self.region {
            Some(region) => {
                debug!(region = %region, "using configured AWS region");
                runtime.block_on(loader.region(Region::new(region.clone())).load())
            }
            None => {
                let config = runtime.block_on(loader.load());
                if config.region().is_some() {
                    config
                } else {
                    // No ambient region: ask the instance itself.
                    let region = self.metadata.region()?;
                    debug!(region = %region, "using AWS region from instance identity");
                    runtime.block_on(
                        aws_config::defaults(BehaviorVersion::latest())
                            .region(Region::new(region))
                            .load(),
                    )
                }
            }
        };

        Ok(Loaded { runtime, config })
    }
}
