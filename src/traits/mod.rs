pub mod capture_device;
pub mod codec;
pub mod player;
