pub mod error;
pub mod events;
pub mod models;

pub use error::{CoreError, Result};
pub use events::{
    ConnectionEstablished, Event, EventKind, EventPayload, ExpiryAlert, ExpiryAlertItem,
    Heartbeat, MedicineNotice, StockAlert, StockAlertItem,
};
pub use models::medicine::Medicine;
pub use models::tenant::Tenant;
