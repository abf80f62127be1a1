pub const BAR_WIDTH: usize = 32;
pub const BAR_FILLED: char = '#';
pub const BAR_EMPTY: char = '-';

pub const RETRY_HINT: &str = "Type 'r' and press Enter to retry.";
pub const AUTO_RECOVERY_HINT: &str = "Taking you to the page directly in a moment.";
