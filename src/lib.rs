//! kmsenv - KMS-encrypted environment configuration.
//!
//! Configuration lives in a YAML mapping. Values are plain strings,
//! `{to_encrypt: ...}` awaiting encryption, or `{encrypted: ...}` base64
//! ciphertext from AWS KMS. Each ciphertext is bound to its application,
//! stage and key through the KMS encryption context.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── encrypt_file  # Encrypt pending values in place
//! │   ├── decrypt_file  # Decrypt values in place
//! │   ├── edit          # Decrypt, run $EDITOR, re-encrypt
//! │   ├── exec          # Run a command with decrypted values
//! │   ├── print         # Print values as shell or JSON
//! │   └── output        # Terminal output helpers
//! └── core/             # Core library components
//!     ├── value         # Plain / pending / encrypted values
//!     ├── context       # KMS encryption context
//!     ├── mapping       # Ordered mapping and bulk passes
//!     ├── kms/          # Key agent
//!     │   ├── mod       # KmsClient trait, KeyAgent
//!     │   ├── cache     # Ciphertext memo
//!     │   └── aws       # AWS KMS implementation
//!     ├── document      # YAML load/save
//!     ├── include       # Remote include merge
//!     ├── store/        # Object store
//!     │   ├── mod       # ObjectStore trait, s3:// locators
//!     │   └── s3        # AWS S3 implementation
//!     ├── metadata      # EC2 instance metadata
//!     ├── aws           # Shared AWS runtime and config
//!     ├── settings      # Layered settings
//!     └── services      # Collaborator wiring
//! ```
//!
//! # Document format
//!
//! ```yaml
//! APP_NAME: billing
//! STAGE_NAME: production
//! LOG_LEVEL: info
//! DATABASE_PASSWORD:
//!   encrypted: AQICAHh...
//! NEW_TOKEN:
//!   to_encrypt: s3cr3t
//! include: s3://bucket/shared.yml?versionId=3
//! ```

pub mod cli;
pub mod core;
pub mod error;
