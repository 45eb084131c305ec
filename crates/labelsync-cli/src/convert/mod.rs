//! Label list generation
//!
//! Converters that turn a directory of images or a directory of VoTT
//! exports into the list files training services import.

pub mod list;
pub mod output;
pub mod vott;

pub use list::ListFormat;
pub use output::ListWriter;
