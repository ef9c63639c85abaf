//! Assistant composition: builder plus the request pipeline.

mod builder;
mod pipeline;

pub use builder::{Aniki, AnikiBuilder};
pub use pipeline::Assistant;
