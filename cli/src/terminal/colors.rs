use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const ACCENT: Color = Color::BrightCyan;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

pub const OPEN: Color = Color::Green;
pub const CLOSED: Color = Color::BrightBlack;
pub const TIMEOUT: Color = Color::Yellow;
pub const FAILURE: Color = Color::Red;

pub const IPV4_ADDR: Color = Color::BrightBlue;
pub const DURATION: Color = Color::Yellow;
