//! Public types for the aniki API.

mod item;
mod message;
mod options;
mod response;

pub use item::{Category, ListItem};
pub use message::{Message, Role};
pub use options::ChatOptions;
pub use response::{ChatResponse, Usage};
