/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

/// Status color for list output: pending states yellow, approved
/// green, rejected red, everything else neutral.
pub fn color_for_status(status: &str) -> &'static str {
    match status {
        "submitted" | "clarification" => YELLOW,
        "approved" => GREEN,
        "rejected" => RED,
        "cancelled" => GREY,
        _ => RESET,
    }
}
