//! Kudos store
//!
//! An append-only, newest-first list of kudos held in memory for one session.
//! Records are never edited or removed. Reads go through [`KudosStore::project`],
//! which filters and orders without touching the store.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, warn};

use crate::types::{Kudos, KudosTag};

/// Sender label shown for anonymous kudos
pub const ANONYMOUS_LABEL: &str = "Anonymous";

/// Avatar initial shown when no sender may be displayed
pub const ANONYMOUS_AVATAR: char = '?';

/// Reasons a kudos submission is refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KudosValidationError {
    #[error("a recipient must be selected")]
    MissingRecipient,

    #[error("a tag must be selected")]
    MissingTag,

    #[error("the message must not be empty")]
    EmptyMessage,
}

/// A kudos as filled in on the form, before it is accepted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KudosDraft {
    pub sender: String,
    pub recipient: Option<String>,
    pub tag: Option<KudosTag>,
    pub message: String,
    pub is_anonymous: bool,
}

impl KudosDraft {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            ..Default::default()
        }
    }

    pub fn to(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    pub fn tagged(mut self, tag: KudosTag) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn anonymous(mut self, is_anonymous: bool) -> Self {
        self.is_anonymous = is_anonymous;
        self
    }

    /// Check the form: recipient, then tag, then message
    pub fn validate(self) -> Result<ValidKudos, KudosValidationError> {
        let recipient = match self.recipient {
            Some(r) if !r.trim().is_empty() => r,
            _ => return Err(KudosValidationError::MissingRecipient),
        };
        let tag = self.tag.ok_or(KudosValidationError::MissingTag)?;
        if self.message.trim().is_empty() {
            return Err(KudosValidationError::EmptyMessage);
        }

        Ok(ValidKudos {
            sender: self.sender,
            recipient,
            tag,
            message: self.message,
            is_anonymous: self.is_anonymous,
        })
    }
}

/// A draft that passed validation, waiting for an id and timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct ValidKudos {
    pub sender: String,
    pub recipient: String,
    pub tag: KudosTag,
    pub message: String,
    pub is_anonymous: bool,
}

impl ValidKudos {
    fn into_kudos(self, id: u64, timestamp: DateTime<Utc>) -> Kudos {
        Kudos {
            id,
            sender: self.sender,
            recipient: self.recipient,
            message: self.message,
            tag: self.tag,
            timestamp,
            is_anonymous: self.is_anonymous,
        }
    }
}

/// Feed filters; `None` leaves a dimension unconstrained
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KudosFilters {
    pub recipient: Option<String>,
    pub tag: Option<KudosTag>,
}

impl KudosFilters {
    pub fn matches(&self, kudos: &Kudos) -> bool {
        let recipient_ok = self
            .recipient
            .as_deref()
            .map_or(true, |r| kudos.recipient == r);
        let tag_ok = self.tag.map_or(true, |t| kudos.tag == t);
        recipient_ok && tag_ok
    }
}

/// Display form of a kudos. Anonymous kudos carry no sender at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KudosCard {
    pub id: u64,
    pub sender: Option<String>,
    pub sender_label: String,
    pub avatar: char,
    pub recipient: String,
    pub tag: KudosTag,
    pub tag_label: String,
    pub message: String,
    pub sent_at: String,
}

impl From<&Kudos> for KudosCard {
    fn from(kudos: &Kudos) -> Self {
        let sender = (!kudos.is_anonymous).then(|| kudos.sender.clone());
        let avatar = sender
            .as_deref()
            .and_then(|s| s.chars().next())
            .unwrap_or(ANONYMOUS_AVATAR);

        KudosCard {
            id: kudos.id,
            sender_label: sender
                .clone()
                .unwrap_or_else(|| ANONYMOUS_LABEL.to_string()),
            sender,
            avatar,
            recipient: kudos.recipient.clone(),
            tag: kudos.tag,
            tag_label: kudos.tag.label().to_string(),
            message: kudos.message.clone(),
            sent_at: kudos.timestamp.format("%b %-d, %-I:%M %p").to_string(),
        }
    }
}

/// In-memory kudos feed, newest first
#[derive(Debug, Clone, PartialEq)]
pub struct KudosStore {
    entries: VecDeque<Kudos>,
    next_id: u64,
}

impl Default for KudosStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KudosStore {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            next_id: 1,
        }
    }

    /// Start from existing kudos, given newest first. New ids continue after
    /// the highest id present.
    pub fn from_entries(entries: Vec<Kudos>) -> Self {
        let next_id = entries.iter().map(|k| k.id).max().map_or(1, |max| max + 1);
        Self {
            entries: entries.into(),
            next_id,
        }
    }

    /// The demo feed shown before anyone has sent kudos
    pub fn with_sample_feed() -> Self {
        Self::from_entries(sample_feed())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All kudos in store order (newest insertion first)
    pub fn iter(&self) -> impl Iterator<Item = &Kudos> {
        self.entries.iter()
    }

    /// Accept a draft stamped with the current time
    pub fn submit(&mut self, draft: KudosDraft) -> Result<&Kudos, KudosValidationError> {
        self.submit_at(draft, Utc::now())
    }

    /// Accept a draft with an explicit timestamp.
    ///
    /// A rejected draft leaves the store untouched and does not consume an id.
    pub fn submit_at(
        &mut self,
        draft: KudosDraft,
        timestamp: DateTime<Utc>,
    ) -> Result<&Kudos, KudosValidationError> {
        let valid = draft.validate().map_err(|e| {
            warn!(error = %e, "kudos rejected");
            e
        })?;

        let id = self.next_id;
        self.next_id += 1;

        self.entries.push_front(valid.into_kudos(id, timestamp));
        debug!(id, total = self.entries.len(), "kudos added");

        Ok(&self.entries[0])
    }

    /// Kudos matching `filters`, newest timestamp first.
    ///
    /// Equal timestamps keep store order, so the later insertion comes first.
    pub fn project(&self, filters: &KudosFilters) -> Vec<&Kudos> {
        let mut matching: Vec<&Kudos> = self.entries.iter().filter(|k| filters.matches(k)).collect();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matching
    }

    /// Display cards for the projected feed
    pub fn cards(&self, filters: &KudosFilters) -> Vec<KudosCard> {
        self.project(filters).into_iter().map(KudosCard::from).collect()
    }
}

fn sample_feed() -> Vec<Kudos> {
    let samples = [
        (1, "Alice", "Bob", "Thanks for the great pairing session on the auth bug!", KudosTag::Pairing, (24, 14, 30), false),
        (2, "Charlie", "Diana", "Amazing idea for optimizing the build process!", KudosTag::Innovation, (23, 10, 0), false),
        (3, "Bob", "Alice", "Really appreciate you helping me debug that tricky CSS issue.", KudosTag::Helpfulness, (22, 16, 15), false),
        (4, "System", "Evan", "Went above and beyond staying late to fix the deployment!", KudosTag::AboveAndBeyond, (21, 9, 5), true),
    ];

    samples
        .into_iter()
        .filter_map(|(id, sender, recipient, message, tag, (day, hour, minute), is_anonymous)| {
            let timestamp = NaiveDate::from_ymd_opt(2025, 4, day)?
                .and_hms_opt(hour, minute, 0)?
                .and_utc();
            Some(Kudos {
                id,
                sender: sender.to_string(),
                recipient: recipient.to_string(),
                message: message.to_string(),
                tag,
                timestamp,
                is_anonymous,
            })
        })
        .collect()
}
