pub mod extractor;
pub mod generation;
pub mod html;
pub mod test_utils;

pub use generation::{LoadGeneration, LoadTicket};
pub use html::{escape, Fragment};
