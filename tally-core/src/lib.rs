//! tally-core: record types, error taxonomy and the entity annotation contract

pub mod entities;
pub mod error;
pub mod record;

pub use entities::{EntityAnnotator, EntityKind, NamedEntity};
pub use error::{ErrorKind, Result, TallyError};
pub use record::{PaymentMethod, PaymentPlatform, RawRecord, TransactionRecord};
