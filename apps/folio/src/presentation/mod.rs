//! Presentation behaviors applied to a page after rendering: theme, broken-image placeholders
//! and the print view.

pub mod images;
pub mod print;
pub mod theme;

pub use images::ImageFallback;
pub use print::print_view;
pub use theme::{Theme, ThemeManager};
