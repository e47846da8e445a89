//! Application constants
//!
//! Centralized constants for the remote API, image URLs, paging, timing and
//! user-facing strings.

/// Remote API constants
pub mod api {
    /// Public Dattebayo API (hosted on a free tier, so it may cold-start)
    pub const DEFAULT_BASE_URL: &str = "https://dattebayo-api.onrender.com";

    /// Per-request deadline in milliseconds
    pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

    /// Page size sent as `limit` on every list request
    pub const ITEMS_PER_PAGE: u32 = 20;
}

/// Image URLs used by cards and the detail overlay
pub mod images {
    /// One reliable banner used for every clan and village
    pub const GENERIC_BANNER_URL: &str =
        "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcQQqb1nFRAQqu-WbvdIv0A-2-uMpX7zDR0DFA&s";
    pub const CLAN_BANNER_URL: &str = GENERIC_BANNER_URL;
    pub const VILLAGE_BANNER_URL: &str = GENERIC_BANNER_URL;

    /// Card-sized placeholder; the entity name is appended url-encoded
    pub const CARD_PLACEHOLDER_PREFIX: &str =
        "https://via.placeholder.com/600x450/141414/ff6b35?text=";

    /// Detail-sized placeholder; the entity name is appended url-encoded
    pub const DETAIL_PLACEHOLDER_PREFIX: &str =
        "https://via.placeholder.com/800x1000/141414/ff6b35?text=";
}

/// Application state and behavior constants
pub mod app {
    /// Inactivity window before a typed search is applied (milliseconds)
    pub const SEARCH_DEBOUNCE_MS: u64 = 400;

    /// Number of skeleton cards drawn while a page is loading
    pub const SKELETON_CARDS: usize = 12;

    /// UI frame budget when idle (milliseconds)
    pub const FRAME_MS: u64 = 50;

    /// Duration to show toast notifications (seconds)
    pub const TOAST_DURATION_SECS: u64 = 2;
}

/// User-facing message strings
pub mod messages {
    /// Shown under every page-level fetch error
    pub const OFFLINE_HINT: &str =
        "The API server might be sleeping or offline. Please try again in a minute.";

    /// Grid placeholder when a page has no displayable entities
    pub const NO_RESULTS: &str = "No results found.";

    /// Stats counter text until a positive total arrives
    pub const STAT_PENDING: &str = "...";

    pub const CLAN_ABOUT_TITLE: &str = "About this Clan";
    pub const CLAN_ABOUT: &str = "Clans are bloodline groups with unique traditions and techniques. Members listed below are known shinobi from this clan.";

    pub const VILLAGE_ABOUT_TITLE: &str = "About this Village";
    pub const VILLAGE_ABOUT: &str = "Hidden Villages are the shinobi centers of their countries. Members listed below are known shinobi from this village.";
}
