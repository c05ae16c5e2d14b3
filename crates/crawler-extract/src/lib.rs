//! HTML parsing: turns fetched bytes into a [`crawler_types::content::ParsedContent`]
//! record — title, main text, metadata, headings, links, images, and
//! schema.org data — normalizing and filtering extracted links as it goes.

pub mod clean;
pub mod extractors;
pub mod normalize;
pub mod parser;

pub use parser::Parser;
