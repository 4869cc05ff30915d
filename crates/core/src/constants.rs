/// Decimal precision for stored money amounts and summary totals
pub const AMOUNT_DECIMAL_PRECISION: u32 = 2;

/// Decimal precision for display percentages
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Number of entries returned by the top-categories read path
pub const TOP_CATEGORIES_LIMIT: usize = 3;

/// Default and maximum page size for transaction searches
pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 500;
