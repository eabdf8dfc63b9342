use anstyle::{AnsiColor, Color, RgbColor, Style};

/// Raw RGB tuple of the accent color
pub const ACCENT_RGB: (u8, u8, u8) = (207, 106, 76);

pub const ACCENT: Style = Style::new().fg_color(Some(Color::Rgb(RgbColor(
    ACCENT_RGB.0,
    ACCENT_RGB.1,
    ACCENT_RGB.2,
))));
pub const SUCCESS: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green)));
pub const FAILURE: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red)));
pub const WARNING: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow)));
pub const BOLD: Style = Style::new().bold();
pub const DIM: Style = Style::new().dimmed();
