pub mod env {
    /// Prefix of every environment override, e.g. `EMAIL_PROOF__STORE__KEY_LAYOUT`.
    pub const ENV_PREFIX: &str = "EMAIL_PROOF";
    pub const ENV_SEPARATOR: &str = "__";
}

/// Optional settings file, any extension the `config` crate understands.
pub const CONFIG_FILE: &str = "config/email_proof";

pub mod defaults {
    pub const VALIDITY_WINDOW_SECS: i64 = 300;
    pub const KEY_LAYOUT: &str = "shared";
    pub const WRITE_MODE: &str = "last_writer_wins";
    pub const MAX_CAS_ATTEMPTS: i64 = 5;
    pub const REDIS_HOST_NAME: &str = "127.0.0.1";
}

pub mod test {
    pub const REDIS_HOST_NAME: &str = "127.0.0.1";
    pub const CACHE_KEY: &str = "EmailProofTest";
}
