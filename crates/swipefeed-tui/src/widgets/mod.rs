mod action_button;
mod feed_list;
mod pull_indicator;
mod status_bar;

pub use action_button::ActionButtonWidget;
pub use feed_list::FeedListWidget;
pub use pull_indicator::PullIndicatorWidget;
pub use status_bar::StatusBarWidget;
