use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::Serialize;

use crate::{tags::EmojiTag, utils::time::format_timestamp};

/// One stored check-in. Field names mirror the persisted json layout, which
/// predates this implementation, so they stay camelCase on the wire.
///
/// `formatted_time` is derived from `timestamp` exactly once, at creation.
/// Retagging replaces `emoji` and nothing else.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CheckinRecord {
    pub formatted_time: String,
    pub timestamp: i64,
    #[serde(default = "default_emoji")]
    pub emoji: String,
}

/// Older persisted data carries no `emoji` field at all.
fn default_emoji() -> String {
    EmojiTag::LOAD_DEFAULT.glyph().to_owned()
}

impl CheckinRecord {
    pub fn at(moment: DateTime<Utc>, tag: EmojiTag) -> Self {
        Self {
            formatted_time: format_timestamp(moment),
            timestamp: moment.timestamp_millis(),
            emoji: tag.glyph().to_owned(),
        }
    }
}
