pub mod app;
pub mod event;
pub mod input;
pub mod scroll;
pub mod surface;
pub mod theme;
pub mod viewport;
pub mod widgets;

pub use app::{App, FeedItem, FeedKind, FeedUpdate, FeedView};
pub use surface::TerminalSurface;
pub use theme::Theme;
