//! Terminal surface of checktick: the live clock line, the check-in table,
//! and the command prompt of a watch session.

use std::io::Write;

use ansi_term::{Colour, Style};
use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::watch,
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    projector::project,
    store::{entities::CheckinRecord, record_store::RecordStore, slot_storage::SlotStorage},
    tags::{EmojiTag, SelectionState},
    utils::time::format_timestamp,
};

const HELP_LINE: &str =
    "r = record   s <tag> = select tag   t <index> <tag> = retag   c = clear   q = quit";

const CLEAR_PROMPT: &str = "Remove all recorded check-ins? [y/N]";

/// Renders the check-in table with its elapsed-time column. Shared between
/// the watch session and the one-shot `list` command.
pub fn render_table(now: DateTime<Utc>, records: &[CheckinRecord]) -> String {
    if records.is_empty() {
        return "No check-ins recorded yet.\n".to_owned();
    }

    let labels = project(now.timestamp_millis(), records);
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n",
        Style::new().bold().paint("  #  recorded at          tag  since")
    ));
    for (index, (record, label)) in records.iter().zip(&labels).enumerate() {
        out.push_str(&format!(
            "  {}  {}  {}   {}\n",
            index, record.formatted_time, record.emoji, label
        ));
    }
    out
}

/// One full frame of the widget.
pub fn render_screen(
    now: DateTime<Utc>,
    records: &[CheckinRecord],
    selection: &SelectionState,
) -> String {
    format!(
        "{}\n\n{}\nNext tag: {}\n{}\n",
        Colour::Blue.bold().paint(format_timestamp(now)),
        render_table(now, records),
        selection.current().glyph(),
        Colour::Fixed(8).paint(HELP_LINE),
    )
}

pub fn is_confirmation(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

/// Commands accepted on stdin during a watch session.
#[derive(Debug, PartialEq, Eq)]
enum ViewCommand {
    Record,
    Select(EmojiTag),
    Retag(usize, EmojiTag),
    Clear,
    Quit,
}

fn parse_command(line: &str) -> Option<ViewCommand> {
    let mut parts = line.split_whitespace();
    let command = match (parts.next()?, parts.next(), parts.next()) {
        ("r", None, None) => ViewCommand::Record,
        ("s", Some(tag), None) => ViewCommand::Select(tag.parse().ok()?),
        ("t", Some(index), Some(tag)) => {
            ViewCommand::Retag(index.parse().ok()?, tag.parse().ok()?)
        }
        ("c", None, None) => ViewCommand::Clear,
        ("q", None, None) => ViewCommand::Quit,
        _ => return None,
    };
    if parts.next().is_some() {
        return None;
    }
    Some(command)
}

/// Interactive session over one store: redraws on every ticker publish and
/// applies commands typed on stdin. Ends on `q`, on closed stdin, or on
/// cancellation.
pub struct WatchSession<S> {
    store: RecordStore<S>,
    selection: SelectionState,
    ticks: watch::Receiver<DateTime<Utc>>,
    shutdown: CancellationToken,
}

impl<S: SlotStorage> WatchSession<S> {
    pub fn new(
        store: RecordStore<S>,
        ticks: watch::Receiver<DateTime<Utc>>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            store,
            selection: SelectionState::default(),
            ticks,
            shutdown,
        }
    }

    fn draw(&self) {
        let now = *self.ticks.borrow();
        print!(
            "\x1B[2J\x1B[1;1H{}",
            render_screen(now, self.store.records(), &self.selection)
        );
        let _ = std::io::stdout().flush();
    }

    pub async fn run(mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        self.draw();

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => return Ok(()),
                changed = self.ticks.changed() => {
                    // A closed channel means the ticker is gone and the
                    // session has nothing left to show.
                    if changed.is_err() {
                        return Ok(());
                    }
                    self.draw();
                }
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        return Ok(());
                    };
                    debug!("Received command {line:?}");
                    match parse_command(&line) {
                        Some(ViewCommand::Record) => {
                            self.store.insert(self.selection.current());
                            self.draw();
                        }
                        Some(ViewCommand::Select(tag)) => {
                            self.selection.select(tag);
                            self.draw();
                        }
                        Some(ViewCommand::Retag(index, tag)) => {
                            self.store.retag(index, tag);
                            self.draw();
                        }
                        Some(ViewCommand::Clear) => {
                            println!("{CLEAR_PROMPT}");
                            let confirmed = matches!(
                                lines.next_line().await?,
                                Some(answer) if is_confirmation(&answer)
                            );
                            if confirmed {
                                self.store.clear();
                            }
                            self.draw();
                        }
                        Some(ViewCommand::Quit) => return Ok(()),
                        None => println!("{HELP_LINE}"),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use crate::{
        store::entities::CheckinRecord,
        tags::{EmojiTag, SelectionState},
    };

    use super::{is_confirmation, parse_command, render_screen, render_table, ViewCommand};

    #[test]
    fn parses_session_commands() {
        assert_eq!(parse_command("r"), Some(ViewCommand::Record));
        assert_eq!(parse_command("q"), Some(ViewCommand::Quit));
        assert_eq!(parse_command("c"), Some(ViewCommand::Clear));
        assert_eq!(
            parse_command("s 🚀"),
            Some(ViewCommand::Select(EmojiTag::Rocket))
        );
        assert_eq!(
            parse_command("t 2 pizza"),
            Some(ViewCommand::Retag(2, EmojiTag::Pizza))
        );
    }

    #[test]
    fn rejects_malformed_commands() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("x"), None);
        assert_eq!(parse_command("s"), None);
        assert_eq!(parse_command("s 🦀"), None);
        assert_eq!(parse_command("t one pizza"), None);
        assert_eq!(parse_command("r extra"), None);
    }

    #[test]
    fn confirmation_accepts_y_and_yes_only() {
        assert!(is_confirmation("y"));
        assert!(is_confirmation("YES"));
        assert!(is_confirmation("  y  "));
        assert!(!is_confirmation(""));
        assert!(!is_confirmation("n"));
        assert!(!is_confirmation("yep"));
    }

    #[test]
    fn table_shows_records_with_elapsed_labels() {
        let now = Utc.with_ymd_and_hms(2018, 7, 4, 12, 0, 0).unwrap();
        let records = vec![
            CheckinRecord::at(now, EmojiTag::Rocket),
            CheckinRecord::at(now - Duration::minutes(90), EmojiTag::Pizza),
        ];

        let table = render_table(now, &records);

        assert!(table.contains("0  2018-07-04 12:00:00  🚀   00 h 00 m"));
        assert!(table.contains("1  2018-07-04 10:30:00  🍕   01 h 30 m"));
    }

    #[test]
    fn empty_table_has_placeholder() {
        let now = Utc.with_ymd_and_hms(2018, 7, 4, 12, 0, 0).unwrap();
        assert_eq!(render_table(now, &[]), "No check-ins recorded yet.\n");
    }

    #[test]
    fn screen_shows_clock_and_selection() {
        let now = Utc.with_ymd_and_hms(2018, 7, 4, 12, 0, 0).unwrap();
        let screen = render_screen(now, &[], &SelectionState::default());

        assert!(screen.contains("2018-07-04 12:00:00"));
        assert!(screen.contains("Next tag: ⏰"));
    }
}
