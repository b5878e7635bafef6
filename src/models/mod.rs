pub mod location;

pub use location::{iso_timestamp, NewLocation, StoneLocation};
