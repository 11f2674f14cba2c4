pub mod fetcher;
pub mod overview;
pub mod state;
pub mod stenoprot;
pub mod writer;

pub use overview::{OverviewPart, SessionOverview, SpeechRef};
pub use state::CrawlState;
