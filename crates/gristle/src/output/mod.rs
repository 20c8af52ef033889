//! Output destinations, sampling and record routing.

mod destination;
mod router;
mod sampler;

pub use destination::Destination;
pub use router::{OutputRouter, RouterOptions};
pub use sampler::{SampleRate, Sampler};
