//! Process lifecycle management.

pub mod shutdown;

pub use shutdown::{Shutdown, ShutdownHandle};
