//! Console content: the loader boot sequence and the interface mode readouts.
//!
//! Both are plain data plus pure functions; the CLI renders them through the glitch engine.

pub mod boot;
pub mod modes;

pub use boot::{BootFrame, BootSequence, BOOT_MESSAGES};
pub use modes::{Mode, UnknownMode, DEFAULT_READOUT};
