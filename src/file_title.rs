/// Title extraction from release filenames.
///
/// Filenames are matched against an ordered list of rules. The first rule whose
/// pattern matches from the start of the name wins, and its captured title is
/// sanitized into a folder name.
///
/// # Examples
///
/// ```
/// use mediatidy::file_title::{TitleKind, classify, extract_title};
///
/// assert_eq!(
///     extract_title("[SubsPlease] Aparida - 09.5 (720p) [F40254DB].mkv").as_deref(),
///     Some("Aparida")
/// );
///
/// let movie = classify("Perfect Blue (1997) 1080p.mkv").unwrap();
/// assert_eq!(movie.kind, TitleKind::Movie);
/// assert_eq!(movie.title, "Perfect Blue");
///
/// assert_eq!(extract_title("randomfile.txt"), None);
/// ```
use crate::sanitize::sanitize;
use regex::Regex;
use std::sync::LazyLock;

/// `[Group] Title - 01v2 (720p) [ABCDEF12].mkv`
static EPISODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^\s*
        \[[^\]]+\]              # [Group]
        \s+
        (?P<title>.*?)
        \s*-\s*
        \d+(?:\.\d+)?           # 01 or 09.5
        (?:v\d+)?               # v2
        (?:\s*\([^)]+\))?       # (720p)
        \s*\[[0-9A-Fa-f]+\]     # [ABCDEF12]
        \.[A-Za-z0-9]+$
        ",
    )
    .expect("valid episode pattern")
});

/// `[Group]? Title (YEAR) anything.ext`
static MOVIE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^\s*
        (?:\[[^\]]+\]\s+)?      # [Group]
        (?P<title>.+?)\s*
        \(\d{4}\)               # (YEAR)
        .*?\.[A-Za-z0-9]+$
        ",
    )
    .expect("valid movie pattern")
});

/// The kind of release a filename was recognised as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TitleKind {
    /// Fansub episode with a trailing CRC hash.
    Episode,
    /// Stand-alone movie with a parenthesised release year.
    Movie,
}

impl TitleKind {
    /// Rules in the order they are tried.
    ///
    /// A name matching both rules is an episode.
    pub const PRIORITY: [TitleKind; 2] = [TitleKind::Episode, TitleKind::Movie];

    fn pattern(self) -> &'static Regex {
        match self {
            TitleKind::Episode => &EPISODE_PATTERN,
            TitleKind::Movie => &MOVIE_PATTERN,
        }
    }

    /// Returns the raw, unsanitized title capture if this rule matches.
    pub fn capture(self, filename: &str) -> Option<&str> {
        self.pattern()
            .captures(filename)
            .and_then(|caps| caps.name("title"))
            .map(|m| m.as_str())
    }

    pub fn label(&self) -> &'static str {
        match self {
            TitleKind::Episode => "episode",
            TitleKind::Movie => "movie",
        }
    }
}

/// A sanitized title together with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTitle {
    pub title: String,
    pub kind: TitleKind,
}

/// Classifies a filename (not a path) against every rule in priority order.
///
/// Only the first matching rule is considered. Returns `None` when no rule
/// matches, or when that rule's sanitized title could not name a folder
/// directly under the root (empty, `.` or `..`).
pub fn classify(filename: &str) -> Option<ExtractedTitle> {
    let (kind, capture) = TitleKind::PRIORITY
        .iter()
        .find_map(|&kind| kind.capture(filename).map(|capture| (kind, capture)))?;

    let title = sanitize(capture);
    if !is_usable_folder_name(&title) {
        return None;
    }
    Some(ExtractedTitle { title, kind })
}

/// Returns the folder title for `filename`, or `None` if no rule matches.
pub fn extract_title(filename: &str) -> Option<String> {
    classify(filename).map(|extracted| extracted.title)
}

fn is_usable_folder_name(title: &str) -> bool {
    !title.is_empty() && !title.chars().all(|c| c == '.')
}
