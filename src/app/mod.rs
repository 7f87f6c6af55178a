pub mod assets;
pub mod setup;
pub mod atmosphere;
pub mod display;

pub use assets::ensure_ground_sampler;
pub use setup::setup;
pub use atmosphere::sync_atmosphere_settings;
pub use display::{sync_ambient_settings, sync_vsync_settings};
