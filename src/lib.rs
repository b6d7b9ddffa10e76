pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::http::PicsumClient;
pub use config::GalleryConfig;
pub use crate::core::{
    detail::DetailResolver,
    fetch_more::FetchMoreController,
    gallery::{GallerySession, GalleryView, InitialLoad},
    pagination::{
        LoadOutcome, PaginationDriver, PaginationOptions, PaginationState, Phase, ScrollMetrics,
        ScrollOutcome, SkipReason,
    },
    scroll::ScrollListener,
};
pub use domain::model::{Photo, RawPhoto};
pub use domain::photo_list::PhotoList;
pub use utils::error::{GalleryError, Result};
