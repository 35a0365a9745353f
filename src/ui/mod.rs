pub mod menu;
pub mod prompt;
pub mod status;
pub mod table;

pub use menu::Menu;
pub use prompt::{PromptError, Prompter};
pub use status::{ColorMode, StatusPainter, StatusPalette};
