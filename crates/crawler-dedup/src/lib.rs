//! Multi-strategy duplicate detection: URL, exact content, title, and
//! fuzzy-feature hashing, backed by an in-process mirror plus a durable
//! coordinator store.

mod detector;
mod hashes;

pub use detector::{DuplicateCheck, DuplicateDetector};
pub use hashes::{content_hash, fuzzy_hash, hash_bundle, title_hash, url_hash};
