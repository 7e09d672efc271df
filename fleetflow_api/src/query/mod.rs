mod common;
pub use self::common::{Query, QueryCommon};

mod list;
pub use self::list::ListQuery;
