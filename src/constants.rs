/// Archive host and markup constants shared across the scraper.
/// Selectors mirror the Flashscore results-page markup; change them together.

pub const DEFAULT_HOST: &str = "www.flashscore.com";

// Reveal control ("Show more matches") on paginated results pages
pub const SHOW_MORE_SELECTOR: &str = ".event__more.event__more--static";

// Scores use an exact class attribute match
pub const HOME_SCORE_SELECTOR: &str = r#"[class="event__score event__score--home"]"#;
pub const AWAY_SCORE_SELECTOR: &str = r#"[class="event__score event__score--away"]"#;

// Participants are prefix matched; some pages append modifier classes
pub const HOME_PARTICIPANT_SELECTOR: &str =
    r#"div[class^="event__participant event__participant--home"]"#;
pub const AWAY_PARTICIPANT_SELECTOR: &str =
    r#"div[class^="event__participant event__participant--away"]"#;

// Newer markup variant: home and away names share one node type, alternating
pub const SIMPLE_TEXT_PARTICIPANT_SELECTOR: &str =
    r#"[class^="wcl-simpleText_Asp-0 wcl-scores-simpleText-01_pV2Wk"]"#;

pub const EVENT_TIME_SELECTOR: &str = ".event__time";

// Timing defaults, in milliseconds
pub const DEFAULT_IMPLICIT_WAIT_MS: u64 = 3_000;
pub const DEFAULT_INITIAL_SETTLE_MS: u64 = 1_000;
pub const DEFAULT_INTERACT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_SETTLE_MS: u64 = 2_000;
pub const CONTROL_POLL_INTERVAL_MS: u64 = 250;

/// Upper bound on "show more" activations per season page
pub const DEFAULT_MAX_REVEALS: usize = 500;

/// Months before this one belong to the second year of a "YYYY-YYYY" season
pub const DEFAULT_ROLLOVER_MONTH: u32 = 7;

/// Column order of the persisted dataset
pub const CSV_HEADER: [&str; 8] = [
    "DT",
    "Home",
    "Away",
    "Home_points",
    "Away_points",
    "season",
    "country",
    "league",
];
