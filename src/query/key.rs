//! Cache keys

use std::borrow::Cow;
use std::fmt;

use crate::remote::Resource;

/// Stable identifier of one cache entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey(Cow<'static, str>);

impl ResourceKey {
    pub const fn from_static(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }

    pub fn new(key: impl Into<String>) -> Self {
        Self(Cow::Owned(key.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Resource> for ResourceKey {
    fn from(resource: Resource) -> Self {
        Self::from_static(resource.key())
    }
}

impl From<&'static str> for ResourceKey {
    fn from(key: &'static str) -> Self {
        Self::from_static(key)
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_keys_match_identifiers() {
        assert_eq!(ResourceKey::from(Resource::DailyReport).as_str(), "daily-report");
        assert_eq!(ResourceKey::from(Resource::MissedWords), ResourceKey::new("missed-words"));
    }
}
