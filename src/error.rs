//! Error types.
//!
//! Each concern has its own error enum; [`Error`] wraps them all so the CLI
//! can propagate with `?` and decide on a hint at the top level.

use std::path::PathBuf;

use thiserror::Error;

/// Malformed or unreadable configuration documents.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("file does not exist: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to serialize document: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error("failed to serialize JSON: {0}")]
    Json(#[source] serde_json::Error),

    #[error("document is not a mapping")]
    NotAMapping,

    #[error("document keys must be strings, found: {0}")]
    NonStringKey(String),

    #[error("invalid value for {key}: expected a string, {{to_encrypt: ...}} or {{encrypted: ...}}")]
    InvalidValue { key: String },
}

/// Problems building an encryption context.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ContextError {
    #[error("missing {0}")]
    MissingReservedKey(&'static str),

    #[error("{0} must not be encrypted")]
    EncryptedReservedKey(&'static str),
}

/// KMS encrypt/decrypt failures.
#[derive(Error, Debug)]
pub enum KmsError {
    #[error("ciphertext is not valid base64: {0}")]
    InvalidCiphertext(#[from] base64::DecodeError),

    #[error("decrypted value is not valid UTF-8")]
    InvalidPlaintext,

    #[error("KMS encrypt failed: {0}")]
    EncryptFailed(String),

    #[error("KMS decrypt failed: {0}")]
    DecryptFailed(String),
}

/// Object store failures.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("unsupported url scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid s3 url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("s3 url missing versionId: {0}")]
    MissingVersion(String),

    #[error("got \"{code}\" when attempting to fetch key {key} version {version} from bucket {bucket}")]
    Fetch {
        code: String,
        bucket: String,
        key: String,
        version: String,
    },
}

/// Failures resolving the `include` key.
#[derive(Error, Debug)]
pub enum IncludeError {
    #[error("include must be a single s3:// url string")]
    NotAString,

    #[error("included document {0} is not a mapping")]
    NotAMapping(String),
}

/// Host metadata service failures.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("could not connect to EC2 metadata service - are we on an EC2 instance?")]
    Connect(#[source] reqwest::Error),

    #[error("got a 404 from the EC2 metadata service when retrieving {0}")]
    NotFound(&'static str),

    #[error("got a {status} from the EC2 metadata service when retrieving {what}")]
    Status { status: u16, what: &'static str },

    #[error("did not find valid YAML in the EC2 user data: {0}")]
    InvalidYaml(#[source] serde_yaml::Error),

    #[error("EC2 user data is not a YAML dictionary")]
    NotAMapping,

    #[error("YAML in EC2 user data does not have a key \"{0}\"")]
    MissingSection(&'static str),

    #[error("invalid instance identity document: {0}")]
    InvalidIdentity(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Settings file failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Kms(#[from] KmsError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Include(#[from] IncludeError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to start AWS runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("no command to execute provided")]
    NoCommand,

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("editor failed with return code {0}")]
    EditorFailed(i32),

    #[error("{source} (edits kept in {path})")]
    EditKept {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
