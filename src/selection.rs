//! Selection requests.
//!
//! A `SelectionRequest` carries the raw flags a command received: `--all`,
//! `--latest` and positional identifiers. Callers are expected to set only
//! one of them; when several are set the request resolves by strict
//! priority (`all`, then `latest`, then identifiers) rather than failing.

/// What the caller asked for, as received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionRequest {
    /// Select every entity.
    pub all: bool,
    /// Select the most recently created entity.
    pub latest: bool,
    /// Select by name, full ID or unique ID prefix, in this order.
    pub identifiers: Vec<String>,
}

/// The single mode a request resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<'a> {
    All,
    Latest,
    Identifiers(&'a [String]),
}

impl SelectionRequest {
    /// Creates a request from raw flags.
    pub fn new(all: bool, latest: bool, identifiers: Vec<String>) -> Self {
        Self {
            all,
            latest,
            identifiers,
        }
    }

    /// Request for every entity.
    #[must_use]
    pub fn all() -> Self {
        Self {
            all: true,
            ..Self::default()
        }
    }

    /// Request for the latest entity.
    #[must_use]
    pub fn latest() -> Self {
        Self {
            latest: true,
            ..Self::default()
        }
    }

    /// Request for an explicit identifier list. Duplicates are kept.
    pub fn ids<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            identifiers: identifiers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Returns the mode this request resolves to.
    ///
    /// `all` wins over `latest`, which wins over identifiers. An empty
    /// identifier list is still the identifier mode.
    pub fn selection(&self) -> Selection<'_> {
        if self.all {
            Selection::All
        } else if self.latest {
            Selection::Latest
        } else {
            Selection::Identifiers(&self.identifiers)
        }
    }
}

impl std::fmt::Display for Selection<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Latest => write!(f, "latest"),
            Self::Identifiers(ids) => write!(f, "ids({})", ids.len()),
        }
    }
}
