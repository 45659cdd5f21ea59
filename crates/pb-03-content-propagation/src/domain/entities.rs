use std::collections::BTreeMap;
use std::fmt;

use pb_02_content_codec::{ContentKey, ContentType};
use shared_types::encode_hex;

use super::value_objects::PropagationState;

/// Hex characters of a content value shown in logs before truncation.
pub const LOGGED_VALUE_HEX_CHARS: usize = 2048;

/// One (key, value) pair ready to be offered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentItem {
    pub key: ContentKey,
    pub value: Vec<u8>,
    /// Block the content belongs to, when known. Used for logging only.
    pub block_number: Option<u64>,
}

impl ContentItem {
    pub fn new(key: ContentKey, value: Vec<u8>) -> Self {
        Self {
            key,
            value,
            block_number: None,
        }
    }

    pub fn for_block(mut self, block_number: u64) -> Self {
        self.block_number = Some(block_number);
        self
    }

    pub fn content_type(&self) -> ContentType {
        self.key.content_type
    }

    pub fn key_hex(&self) -> String {
        self.key.to_hex()
    }

    pub fn value_hex(&self) -> String {
        encode_hex(&self.value)
    }

    /// Value hex cut to [`LOGGED_VALUE_HEX_CHARS`] characters.
    pub fn value_preview(&self) -> String {
        let mut full = self.value_hex();
        if full.len() > LOGGED_VALUE_HEX_CHARS {
            let hidden = full.len() - LOGGED_VALUE_HEX_CHARS;
            full.truncate(LOGGED_VALUE_HEX_CHARS);
            full.push_str(&format!("... ({hidden} more)"));
        }
        full
    }
}

/// Peers reached per endpoint for one offer round.
///
/// Holds exactly one entry per configured endpoint; 0 means the offer failed
/// locally at that endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PushResult(BTreeMap<String, u64>);

impl PushResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, endpoint: impl Into<String>, peers_reached: u64) {
        self.0.insert(endpoint.into(), peers_reached);
    }

    pub fn get(&self, endpoint: &str) -> Option<u64> {
        self.0.get(endpoint).copied()
    }

    /// Best result across endpoints; drives the retry decision.
    pub fn max_peers(&self) -> u64 {
        self.0.values().copied().max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, u64)> for PushResult {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for PushResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (endpoint, peers)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{endpoint}: {peers}")?;
        }
        f.write_str("}")
    }
}

/// A content item plus its propagation progress.
///
/// Owned by exactly one task at a time; no interior mutability.
#[derive(Clone, Debug)]
pub struct PropagationRecord {
    pub item: ContentItem,
    pub state: PropagationState,
    pub last_result: PushResult,
    pub rounds: u32,
}

impl PropagationRecord {
    pub fn new(item: ContentItem) -> Self {
        Self {
            item,
            state: PropagationState::Pending,
            last_result: PushResult::new(),
            rounds: 0,
        }
    }

    /// Whether the next round should offer this item.
    pub fn needs_push(&self) -> bool {
        matches!(
            self.state,
            PropagationState::Pending | PropagationState::Retry
        )
    }

    pub fn is_satisfied(&self) -> bool {
        self.state == PropagationState::Satisfied
    }

    pub fn record_push(&mut self, result: PushResult) {
        self.last_result = result;
        self.rounds += 1;
        self.state = PropagationState::Pushed;
    }

    /// Move a pushed record to `Satisfied` or `Retry`.
    pub fn evaluate(&mut self, threshold: u64) -> PropagationState {
        if self.state == PropagationState::Pushed {
            self.state = if self.last_result.max_peers() >= threshold {
                PropagationState::Satisfied
            } else {
                PropagationState::Retry
            };
        }
        self.state
    }
}
