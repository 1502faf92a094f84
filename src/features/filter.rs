//! Optional restriction of the identifiers to a set of IP addresses.

use crate::error::Result;
use std::collections::HashSet;
use std::net::IpAddr;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpFilter {
    ips: HashSet<IpAddr>,
}

impl IpFilter {
    pub fn new(ips: impl IntoIterator<Item = IpAddr>) -> Self {
        Self {
            ips: ips.into_iter().collect(),
        }
    }

    /// Parse a JSON array of IP strings, e.g. `["10.0.0.5","10.0.0.6"]`.
    /// Entries that are not IP addresses are skipped. An empty array yields `None`.
    pub fn from_json(raw: &str) -> Result<Option<Self>> {
        let entries: Vec<String> = serde_json::from_str(raw)?;
        let mut ips = HashSet::with_capacity(entries.len());
        for entry in &entries {
            match entry.trim().parse::<IpAddr>() {
                Ok(ip) => {
                    ips.insert(ip);
                }
                Err(_) => warn!(entry = %entry, "skipping invalid ip in filter"),
            }
        }
        if entries.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self { ips }))
    }

    /// Filter from the optional command-line argument. A blank argument, an empty array or
    /// JSON that does not parse all mean no filtering; the last one is logged.
    pub fn from_arg(raw: Option<&str>) -> Option<Self> {
        let raw = raw.filter(|r| !r.trim().is_empty())?;
        match Self::from_json(raw) {
            Ok(Some(filter)) => {
                info!(ips = filter.len(), "ip filter enabled");
                Some(filter)
            }
            Ok(None) => None,
            Err(error) => {
                warn!(%error, "could not parse filter ips; filtering disabled");
                None
            }
        }
    }

    pub fn allows(&self, ip: &IpAddr) -> bool {
        self.ips.contains(ip)
    }

    pub fn len(&self) -> usize {
        self.ips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ips.is_empty()
    }
}
