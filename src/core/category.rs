//! Change categories.
//!
//! [`Classification`] is what a changed path *means* for the build;
//! [`SourceRoot`] is which watched root reported it.

use std::fmt;

/// Domain of a changed path, determines the rebuild cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Under `<output>/<client>/<name>/`. `entry` is true for the
    /// client's `index.<ext>` itself.
    Client { name: String, entry: bool },
    /// Under `<output>/<server>/`
    Server,
    /// Script under the output root reachable from both sides
    Shared,
    /// Stylesheet source. Partials never compile directly.
    Stylesheet { partial: bool },
    /// Server-rendered template
    Template,
    /// No cascade
    Other,
}

impl Classification {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Client { .. } => "client",
            Self::Server => "server",
            Self::Shared => "shared",
            Self::Stylesheet { .. } => "stylesheet",
            Self::Template => "template",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client { name, entry: true } => write!(f, "client {name} (entry)"),
            Self::Client { name, .. } => write!(f, "client {name}"),
            Self::Stylesheet { partial: true } => f.write_str("stylesheet (partial)"),
            other => f.write_str(other.name()),
        }
    }
}

/// Watched root that reported a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceRoot {
    Scripts,
    Stylesheets,
    Templates,
    VendorClient,
    VendorServer,
}

impl SourceRoot {
    pub const ALL: [Self; 5] = [
        Self::Scripts,
        Self::Stylesheets,
        Self::Templates,
        Self::VendorClient,
        Self::VendorServer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Scripts => "scripts",
            Self::Stylesheets => "stylesheets",
            Self::Templates => "templates",
            Self::VendorClient => "vendor client",
            Self::VendorServer => "vendor server",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_display() {
        let entry = Classification::Client {
            name: "alpha".into(),
            entry: true,
        };
        assert_eq!(entry.to_string(), "client alpha (entry)");
        assert_eq!(
            Classification::Stylesheet { partial: true }.to_string(),
            "stylesheet (partial)"
        );
        assert_eq!(Classification::Shared.to_string(), "shared");
    }
}
