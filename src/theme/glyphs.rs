//! Symbols shared by the header, chat log and footer.

pub const SEP_RIGHT: &str = "\u{e0b0}";
pub const LOGO: &str = "✉";
pub const DATABASE: &str = "◆";

pub const SENT: &str = "›";
pub const RECEIVED: &str = "‹";
pub const BULLET: &str = "•";
pub const CURSOR: &str = "▏";

pub const BUBBLE_TOP: &str = "╭─";
pub const BUBBLE_SIDE: &str = "│ ";
pub const BUBBLE_BOTTOM: &str = "╰─";

pub const CHECKED: &str = "[x]";
pub const UNCHECKED: &str = "[ ]";
pub const EMPTY_VALUE: &str = "—";
