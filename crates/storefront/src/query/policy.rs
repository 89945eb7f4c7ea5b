//! Cache policy profiles.
//!
//! Callers pick a [`CacheClass`]; the class fixes how long data stays fresh,
//! how long an unused entry is kept, whether regaining focus refetches, and
//! how many times a failed read is retried.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const MINUTE: u64 = 60;

/// Cache profile selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheClass {
    /// Catalog data that rarely changes (categories, product lists).
    Static,
    /// Data that changes during a session (reviews, stock).
    #[default]
    Dynamic,
    /// Per-customer data that is always considered stale.
    UserSpecific,
    /// Never cached.
    NoCache,
}

impl CacheClass {
    pub const ALL: [Self; 4] = [Self::Static, Self::Dynamic, Self::UserSpecific, Self::NoCache];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Dynamic => "dynamic",
            Self::UserSpecific => "user-specific",
            Self::NoCache => "no-cache",
        }
    }

    /// The fixed profile for this class.
    #[must_use]
    pub const fn policy(self) -> CachePolicy {
        CachePolicy::for_class(self)
    }
}

impl std::fmt::Display for CacheClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CacheClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|class| class.as_str() == lower)
            .ok_or_else(|| format!("unknown cache class: {s}"))
    }
}

/// Resolved caching behaviour for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Age after which an entry is refetched on the next load.
    pub stale_time: Duration,
    /// Idle time after which an unused entry is evicted.
    pub gc_time: Duration,
    pub refetch_on_window_focus: bool,
    /// Retries after the first failed read.
    pub retry: u32,
}

impl CachePolicy {
    #[must_use]
    pub const fn for_class(class: CacheClass) -> Self {
        match class {
            CacheClass::Static => Self {
                stale_time: Duration::from_secs(30 * MINUTE),
                gc_time: Duration::from_secs(60 * MINUTE),
                refetch_on_window_focus: false,
                retry: 2,
            },
            CacheClass::Dynamic => Self {
                stale_time: Duration::from_secs(2 * MINUTE),
                gc_time: Duration::from_secs(10 * MINUTE),
                refetch_on_window_focus: true,
                retry: 1,
            },
            CacheClass::UserSpecific => Self {
                stale_time: Duration::ZERO,
                gc_time: Duration::from_secs(5 * MINUTE),
                refetch_on_window_focus: true,
                retry: 1,
            },
            CacheClass::NoCache => Self {
                stale_time: Duration::ZERO,
                gc_time: Duration::ZERO,
                refetch_on_window_focus: true,
                retry: 0,
            },
        }
    }

    /// Replace the fields `overrides` sets.
    #[must_use]
    pub fn with_overrides(self, overrides: &QueryOverrides) -> Self {
        Self {
            stale_time: overrides.stale_time.unwrap_or(self.stale_time),
            gc_time: overrides.gc_time.unwrap_or(self.gc_time),
            refetch_on_window_focus: overrides
                .refetch_on_window_focus
                .unwrap_or(self.refetch_on_window_focus),
            retry: overrides.retry.unwrap_or(self.retry),
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::for_class(CacheClass::default())
    }
}

/// Per-query replacements for individual profile fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOverrides {
    pub stale_time: Option<Duration>,
    pub gc_time: Option<Duration>,
    pub refetch_on_window_focus: Option<bool>,
    pub retry: Option<u32>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles() {
        let s = CacheClass::Static.policy();
        assert_eq!(s.stale_time, Duration::from_secs(1800));
        assert_eq!(s.gc_time, Duration::from_secs(3600));
        assert!(!s.refetch_on_window_focus);
        assert_eq!(s.retry, 2);

        let d = CacheClass::Dynamic.policy();
        assert_eq!(d.stale_time, Duration::from_secs(120));
        assert_eq!(d.gc_time, Duration::from_secs(600));
        assert_eq!(d.retry, 1);

        let u = CacheClass::UserSpecific.policy();
        assert_eq!(u.stale_time, Duration::ZERO);
        assert_eq!(u.gc_time, Duration::from_secs(300));

        let n = CacheClass::NoCache.policy();
        assert_eq!(n.gc_time, Duration::ZERO);
        assert_eq!(n.retry, 0);
        assert!(n.refetch_on_window_focus);
    }

    #[test]
    fn test_overrides_replace_single_fields() {
        let policy = CacheClass::Static.policy().with_overrides(&QueryOverrides {
            retry: Some(0),
            ..QueryOverrides::default()
        });
        assert_eq!(policy.retry, 0);
        assert_eq!(policy.stale_time, Duration::from_secs(1800));
    }

    #[test]
    fn test_class_strings() {
        for class in CacheClass::ALL {
            assert_eq!(class.to_string().parse::<CacheClass>().unwrap(), class);
        }
        assert_eq!("User-Specific".parse::<CacheClass>().unwrap(), CacheClass::UserSpecific);
        assert!("forever".parse::<CacheClass>().is_err());
    }
}
