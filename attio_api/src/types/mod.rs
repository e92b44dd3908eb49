mod meta;
pub use self::meta::Page;

mod value;
pub use self::value::{AttributeValue, Location, StatusOption};

mod record;
pub use self::record::{RawRecord, RecordId};

mod entry;
pub use self::entry::{EntryId, ListEntry};
