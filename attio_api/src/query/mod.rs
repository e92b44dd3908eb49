mod common;
mod filter;
mod record;

pub use self::common::{Query, QueryCommon, Sort, SortDirection};
pub use self::filter::Filter;
pub use self::record::RecordQuery;
