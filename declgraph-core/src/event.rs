//! Parser events - what [`Parser::advance`](crate::Parser::advance) reports.
//!
//! Events carry no payload. The names, types and values that go with an
//! event are read from the parser's accessors while the event is current.
//! Structure is represented by start/end pairs.
//!
//! ```text
//! Type => Name { title: "x", items: [1, 2], version(mobile) { w: 10 } }
//!
//! StartObject            object_type() = Type, object_name() = Name
//! Property               property_name() = title
//! Value                  value() = "x"
//! Property               property_name() = items
//! StartArray
//! Value                  value() = 1
//! Value                  value() = 2
//! EndArray
//! StartVersionBlock      version_id() = mobile
//! Property               property_name() = w
//! Value                  value() = 10
//! EndVersionBlock
//! EndObject
//! End
//! ```

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// Created, nothing consumed yet.
    Ready,

    // ========== Structure Events ==========
    /// `{`, `Type {` or `Type => Name {`
    StartObject,
    /// `}` closing an object (or end of input for an unbraced top level)
    EndObject,
    /// `version(id) {`
    StartVersionBlock,
    /// `}` closing a version block
    EndVersionBlock,
    /// `[`
    StartArray,
    /// `]`
    EndArray,

    // ========== Member Events ==========
    /// `name:` inside an object. The value follows.
    Property,
    /// `key:` inside a dictionary literal. The value follows.
    Key,
    /// A scalar, binding or expression.
    Value,

    /// Input exhausted. Terminal.
    End,
}

impl Event {
    /// Check if this event opens a structure with a matching end.
    pub fn is_start(self) -> bool {
        matches!(
            self,
            Self::StartObject | Self::StartVersionBlock | Self::StartArray
        )
    }

    /// Check if this event closes a structure.
    pub fn is_end(self) -> bool {
        matches!(
            self,
            Self::EndObject | Self::EndVersionBlock | Self::EndArray
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::StartObject => "startObject",
            Self::EndObject => "endObject",
            Self::StartVersionBlock => "startVersionBlock",
            Self::EndVersionBlock => "endVersionBlock",
            Self::StartArray => "startArray",
            Self::EndArray => "endArray",
            Self::Property => "property",
            Self::Key => "key",
            Self::Value => "value",
            Self::End => "end",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
