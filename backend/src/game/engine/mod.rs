pub mod registry;
pub mod sweeper;

pub use registry::GameRegistry;
pub use sweeper::spawn_idle_sweeper;
