// ── Identity types ──
//
// Boards, lists and tasks are identified by client-minted strings derived
// from the current time in milliseconds. Ids are unique within their
// containing collection only; the same string may name a list in one
// board and a task in another.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Mints millisecond-timestamp ids that never repeat within a process.
///
/// When two ids are requested in the same millisecond (or the clock steps
/// backwards) the generator hands out `last + 1` instead.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicU64,
}

impl IdGenerator {
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    pub fn next(&self) -> u64 {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let prev = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(prev + 1)
    }
}

static IDS: IdGenerator = IdGenerator::new();

/// Next process-wide unique id, as the string form stored on the wire.
pub fn next_id() -> String {
    IDS.next().to_string()
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Mint a fresh time-derived id.
            pub fn generate() -> Self {
                Self(next_id())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_owned()))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Identifier of a [`Board`](super::Board).
    BoardId
);
string_id!(
    /// Identifier of a [`List`](super::List), unique within its board.
    ListId
);
string_id!(
    /// Identifier of a [`Task`](super::Task), unique within its list.
    TaskId
);
string_id!(
    /// Identifier of a [`User`](super::User). Doubles as the session token.
    UserId
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn generator_is_strictly_increasing() {
        let ids = IdGenerator::new();
        let mut prev = ids.next();
        for _ in 0..1_000 {
            let next = ids.next();
            assert!(next > prev, "{next} should be greater than {prev}");
            prev = next;
        }
    }

    #[test]
    fn generated_ids_track_the_clock() {
        let before = u64::try_from(Utc::now().timestamp_millis()).unwrap();
        let id = IdGenerator::new().next();
        assert!(id >= before);
    }

    #[test]
    fn board_id_display_and_parse() {
        let id: BoardId = "1712345678901".parse().unwrap();
        assert_eq!(id.to_string(), "1712345678901");
        assert_eq!(id, BoardId::from("1712345678901"));
    }

    #[test]
    fn generated_board_ids_differ() {
        assert_ne!(BoardId::generate(), BoardId::generate());
    }
}
