//! Constants used throughout kmsenv.
//!
//! Centralizes reserved document keys, wire names and defaults.

/// Reserved key naming the owning application.
pub const APP_NAME: &str = "APP_NAME";

/// Reserved key naming the deployment stage.
pub const STAGE_NAME: &str = "STAGE_NAME";

/// Reserved key holding an `s3://` locator to merge into the document.
pub const INCLUDE_KEY: &str = "include";

/// Single-key mapping marker for a value awaiting encryption.
pub const TO_ENCRYPT: &str = "to_encrypt";

/// Single-key mapping marker for a base64 ciphertext.
pub const ENCRYPTED: &str = "encrypted";

/// Encryption context field bound to `APP_NAME`.
pub const CONTEXT_APP: &str = "app";

/// Encryption context field bound to `STAGE_NAME`.
pub const CONTEXT_STAGE: &str = "stage";

/// Encryption context field bound to the entry's own key.
pub const CONTEXT_KEY: &str = "key";

/// KMS key used for encryption unless overridden.
pub const DEFAULT_KEY_ID: &str = "alias/kmsenv";

/// Top-level key in EC2 user data holding the document.
pub const USER_DATA_SECTION: &str = "kmsenv";

/// Value substituted for the reserved keys when user data is absent.
pub const MISSING_SENTINEL: &str = "Missing";

/// EC2 instance metadata service base URL.
pub const DEFAULT_METADATA_ENDPOINT: &str = "http://169.254.169.254";

/// User data path relative to the metadata endpoint.
pub const USER_DATA_PATH: &str = "/latest/user-data";

/// Instance identity document path relative to the metadata endpoint.
pub const IDENTITY_PATH: &str = "/latest/dynamic/instance-identity/document";

/// Per-request metadata timeout in seconds.
pub const DEFAULT_METADATA_TIMEOUT_SECS: u64 = 10;

/// Transport-level retries for metadata requests.
pub const DEFAULT_METADATA_RETRIES: u32 = 3;

/// Upper bound accepted for `metadata.retries`.
pub const MAX_METADATA_RETRIES: u32 = 10;

/// Editor used by `edit` when `$EDITOR` is unset.
pub const DEFAULT_EDITOR: &str = "nano";

/// Environment variable overriding the settings file location.
pub const CONFIG_ENV: &str = "KMSENV_CONFIG";

/// Environment variable overriding the KMS key.
pub const KEY_ENV: &str = "KMSENV_KEY";

/// Environment variable overriding the AWS region.
pub const REGION_ENV: &str = "KMSENV_REGION";

/// Environment variable overriding the metadata endpoint.
pub const METADATA_URL_ENV: &str = "KMSENV_METADATA_URL";

/// Environment variable controlling the log filter.
pub const LOG_ENV: &str = "KMSENV_LOG";
