//! Email text handling ahead of triage

pub mod features;
pub mod input;
pub mod normalize;

pub use features::EmailFeatures;
pub use input::{decode_upload, load_email_file, EmailText};
pub use normalize::normalize;
