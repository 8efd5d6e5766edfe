pub mod asm;
pub mod listing;
pub mod model;

// Re-export commonly used types/functions for the CLIs
pub use asm::{assemble, render_ls8, Assembled};
pub use listing::{listing, Line};
pub use model::{load_program, read_u8, Image};
