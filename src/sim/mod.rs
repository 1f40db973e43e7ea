pub mod event;
pub mod ports;
pub mod step;
pub mod world;
