//! Type-safe entity identifiers.
//!
//! Each persisted collection gets its own UUID v4 newtype so that event,
//! message, and payment identifiers cannot be confused with one another.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Creates a new random identifier (UUID v4).
            #[must_use]
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Wraps an existing [`uuid::Uuid`].
            #[must_use]
            pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner [`uuid::Uuid`].
            #[must_use]
            pub const fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<uuid::Uuid> for $name {
            fn from(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for uuid::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

entity_id! {
    /// Unique identifier for one promotional work assignment.
    ///
    /// Generated once at event creation time and immutable thereafter.
    /// Dependent message and payment rows reference it, and it is the
    /// WebSocket subscription target.
    EventId
}

entity_id! {
    /// Unique identifier for a generated confirmation message.
    MessageId
}

entity_id! {
    /// Unique identifier for a payment record.
    PaymentId
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn new_generates_unique_ids() {
        let a = EventId::new();
        let b = EventId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn display_is_uuid_format() {
        let id = PaymentId::new();
        let s = format!("{id}");
        assert_eq!(s.len(), 36);
        assert!(s.contains('-'));
    }

    #[test]
    fn serde_round_trip() {
        let id = MessageId::new();
        let json = serde_json::to_string(&id).ok();
        let Some(json) = json else {
            panic!("serialization failed");
        };
        let deserialized: MessageId = serde_json::from_str(&json).ok().unwrap_or_else(|| {
            panic!("deserialization failed");
        });
        assert_eq!(id, deserialized);
    }

    #[test]
    fn from_uuid_round_trip() {
        let uuid = uuid::Uuid::new_v4();
        let id = EventId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
    }

    #[test]
    fn hash_works_in_hashmap() {
        use std::collections::HashMap;
        let id = EventId::new();
        let mut map = HashMap::new();
        map.insert(id, "test");
        assert_eq!(map.get(&id), Some(&"test"));
    }
}
