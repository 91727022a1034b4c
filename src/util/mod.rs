pub mod books;
pub mod reference;

pub use reference::{parse_reference, VerseKey};
