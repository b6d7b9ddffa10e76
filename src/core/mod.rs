pub mod detail;
pub mod fetch_more;
pub mod gallery;
pub mod pagination;
pub mod scroll;
pub mod throttle;

pub use crate::domain::model::{Photo, RawPhoto};
pub use crate::domain::ports::{PageFetcher, PhotoSource};
pub use crate::utils::error::Result;
