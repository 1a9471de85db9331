// Internal types - never serialized directly to clients
pub mod auth;
pub mod caller;
pub mod lookup;
pub mod period;

pub use auth::{Claims, RoleName};
pub use caller::Caller;
pub use lookup::LookupInput;
pub use period::{DateRange, Period};
