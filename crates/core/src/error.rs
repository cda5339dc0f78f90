#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    #[error("Account {0} has no destination webhook configured")]
    UnconfiguredAccount(String),
}
