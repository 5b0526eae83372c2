/// Crate-wide error type.
///
/// Handlers decide per variant whether a failure is shown to the user, retried
/// or only logged; see `router` for the catch-all boundary.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("delivery error: {0}")]
    Delivery(String),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("payload error: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("invalid stored state: {0}")]
    State(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
