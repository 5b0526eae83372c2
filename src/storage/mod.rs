//! Persistence gateway. Owns all durable state; callers never cache rows
//! between messages.

use sea_orm::DatabaseConnection;

mod applications;
mod broadcasts;
mod states;
mod users;

pub use applications::NewApplication;
pub use states::StaleForm;

#[derive(Clone, Debug)]
pub struct Storage {
    connection: DatabaseConnection,
}

impl Storage {
    pub fn new(connection: DatabaseConnection) -> Self {
        Storage { connection }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }
}
