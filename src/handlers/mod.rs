// Every path is served by the same handler; only the method selects behavior.
pub mod locations;

pub use locations::handle;
