//! Sample documents.

/// Only plain values; no command needs KMS for it.
pub const PLAIN: &str = "\
APP_NAME: billing
STAGE_NAME: test
LOG_LEVEL: info
GREETING: hello world
QUOTED: it's here
EMPTY: ''
";

/// Plain and pending values.
pub const PENDING: &str = "\
APP_NAME: billing
STAGE_NAME: test
LOG_LEVEL: info
TOKEN:
  to_encrypt: s3cr3t
";

/// A pending value without the reserved keys.
pub const NO_RESERVED: &str = "\
TOKEN:
  to_encrypt: s3cr3t
";
