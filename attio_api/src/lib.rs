mod client;
mod errors;
mod query;
pub mod pagination;
pub mod types;
pub use self::client::Client;
pub use self::errors::Error;
pub use self::query::{Filter, Query, QueryCommon, RecordQuery, Sort, SortDirection};
