use ratatui::style::Color;

/// Colors by role in the feed screen (Gruvbox dark values)
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    /// Pull indicator strip and other raised areas
    pub raised: Color,
    pub status_bar: Color,

    pub text: Color,
    pub text_muted: Color,
    pub text_faint: Color,

    pub border: Color,
    pub border_active: Color,

    /// Pull indicator below and past the refresh threshold
    pub pull: Color,
    pub pull_armed: Color,
    pub refreshing: Color,

    pub action: Color,
    pub badge: Color,
    pub loading: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        let grey0 = Color::Rgb(0x7c, 0x6f, 0x64);
        let grey2 = Color::Rgb(0xa8, 0x99, 0x84);
        let yellow = Color::Rgb(0xd8, 0xa6, 0x57);
        let aqua = Color::Rgb(0x89, 0xb4, 0x82);

        Self {
            background: Color::Rgb(0x28, 0x28, 0x28),
            raised: Color::Rgb(0x32, 0x30, 0x2f),
            status_bar: Color::Rgb(0x45, 0x40, 0x3d),
            text: Color::Rgb(0xd4, 0xbe, 0x98),
            text_muted: grey2,
            text_faint: grey0,
            border: grey0,
            border_active: aqua,
            pull: grey2,
            pull_armed: Color::Rgb(0xa9, 0xb6, 0x65),
            refreshing: yellow,
            action: Color::Rgb(0xe7, 0x8a, 0x4e),
            badge: aqua,
            loading: yellow,
            error: Color::Rgb(0xea, 0x69, 0x62),
        }
    }
}
