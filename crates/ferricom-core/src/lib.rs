//! ferricom-core: a headless, cycle-faithful NES emulation core.
//!
//! Feed [`Console::new`] a parsed iNES image, push controller bitmasks,
//! and call [`Console::run_frame`]; each call yields a 256x240 frame of
//! palette indices (or RGB via the system palette) and one frame of
//! signed 16-bit mono audio.

pub mod apu;
pub mod audio;
pub mod bus;
pub mod cartridge;
pub mod console;
pub mod controller;
pub mod cpu;
pub mod error;
pub mod memory;
pub mod ppu;
pub mod state;

pub use cartridge::Cartridge;
pub use console::Console;
pub use controller::{Button, Controller};
pub use error::Error;
pub use state::{CpuSnapshot, PpuSnapshot};
