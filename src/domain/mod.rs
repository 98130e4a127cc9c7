//! Domain layer: event documents, identities, profiles and tickets.
//!
//! These are the shapes persisted by the store and returned by the API.
//! Nothing here performs I/O.

pub mod event_id;
pub mod event_record;
pub mod profile;
pub mod ticket;

pub use event_id::EventId;
pub use event_record::{Comment, EventRecord, ExtractedFields};
pub use profile::UserProfile;
pub use ticket::Ticket;
