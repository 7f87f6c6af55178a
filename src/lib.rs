pub mod actor;
pub mod animation;
pub mod assets;
pub mod audio;
pub mod context;
pub mod hazard;
pub mod input;
pub mod pickup;
pub mod ron;
pub use crate::ron as ron_loader;
pub mod session;
pub mod ui;

pub mod settings;
pub mod debug;
