use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::i18n::Language;

/// Countdowns and a small journal for the days that matter.
#[derive(Debug, Default, Parser)]
#[command(name = "countdown-tui", version)]
pub struct Cli {
    /// Config file (default: <config dir>/countdown-tui/config.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Base URL of the events backend
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    #[arg(long, value_enum)]
    pub lang: Option<Language>,

    /// Where the local snapshot and log file live
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Print upcoming events and exit
    #[arg(long, conflicts_with_all = ["range", "show"])]
    pub upcoming: bool,

    /// Print events between two dates (YYYY-MM-DD) and exit
    #[arg(long, num_args = 2, value_names = ["START", "END"])]
    pub range: Option<Vec<NaiveDate>>,

    /// Print one event by id and exit
    #[arg(long, value_name = "ID", conflicts_with = "range")]
    pub show: Option<String>,
}

impl Cli {
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match self.range.as_deref() {
            Some([start, end]) => Some((*start, *end)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_range_pair() {
        let cli = Cli::try_parse_from(["countdown-tui", "--range", "2026-01-01", "2026-02-01"]).unwrap();
        assert_eq!(
            cli.date_range(),
            Some((
                NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()
            ))
        );
        assert!(!cli.upcoming);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Cli::try_parse_from(["countdown-tui", "--range", "2026-01-01"]).is_err());
        assert!(Cli::try_parse_from(["countdown-tui", "--range", "soon", "later"]).is_err());
        assert!(Cli::try_parse_from(["countdown-tui", "--lang", "fr"]).is_err());
        assert!(Cli::try_parse_from([
            "countdown-tui",
            "--upcoming",
            "--range",
            "2026-01-01",
            "2026-02-01"
        ])
        .is_err());
    }

    #[test]
    fn show_takes_an_id_alone() {
        let cli = Cli::try_parse_from(["countdown-tui", "--show", "e42"]).unwrap();
        assert_eq!(cli.show.as_deref(), Some("e42"));
        assert!(Cli::try_parse_from(["countdown-tui", "--show", "e42", "--upcoming"]).is_err());
        assert!(Cli::try_parse_from(["countdown-tui", "--show"]).is_err());
    }

    #[test]
    fn overrides_are_optional() {
        let cli = Cli::try_parse_from(["countdown-tui", "--lang", "en", "--api-url", "http://x/api"]).unwrap();
        assert_eq!(cli.lang, Some(Language::En));
        assert_eq!(cli.api_url.as_deref(), Some("http://x/api"));
        assert_eq!(cli.date_range(), None);
    }
}
