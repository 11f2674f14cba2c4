pub mod extract;
pub mod walker;

pub use extract::Extractor;
pub use walker::SessionWalker;
