//! Geo-database codec boundary.
//!
//! The core treats the on-disk database format as an opaque capability:
//! `open(path) -> handle` and `lookup(ip) -> nested-field-map`. The
//! production implementation wraps `maxminddb::Reader` and decodes records
//! into `serde_json::Value`, which the lookup service probes with ordered
//! field-path aliases. Keeping the boundary behind traits lets tests drive
//! the lifecycle with a fake codec and plain fixture files.

use std::net::IpAddr;
use std::path::Path;

use log::debug;
use maxminddb::Reader;
use serde_json::Value;

/// An open reference to a geolocation database file.
pub trait GeoHandle: Send + Sync {
    /// Looks up `ip` and returns the record as a nested field map, or `None`
    /// when the database has no entry for the address (or `ip` is not a
    /// parseable address).
    fn lookup(&self, ip: &str) -> Option<Value>;
}

/// Opens geolocation database files.
pub trait GeoCodec: Send + Sync {
    /// Opens the database at `path`, returning `None` if the file is absent
    /// or not a well-formed database.
    fn open(&self, path: &Path) -> Option<Box<dyn GeoHandle>>;
}

/// The production codec, backed by the `maxminddb` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct MaxMindCodec;

impl GeoCodec for MaxMindCodec {
    fn open(&self, path: &Path) -> Option<Box<dyn GeoHandle>> {
        let reader = match Reader::open_readfile(path) {
            Ok(reader) => reader,
            Err(e) => {
                debug!("Codec rejected {}: {}", path.display(), e);
                return None;
            }
        };
        Some(Box::new(MaxMindHandle { reader }))
    }
}

struct MaxMindHandle {
    reader: Reader<Vec<u8>>,
}

impl GeoHandle for MaxMindHandle {
    fn lookup(&self, ip: &str) -> Option<Value> {
        let addr: IpAddr = ip.parse().ok()?;
        let result = self.reader.lookup(addr).ok()?;
        if !result.has_data() {
            return None;
        }
        // Decode into a generic nested map rather than a fixed geoip2 struct:
        // field paths differ across database vendors and schema vintages, and
        // the lookup service resolves them by alias probing.
        match result.decode::<Value>() {
            Ok(Some(value)) => Some(value),
            Ok(None) => None,
            Err(e) => {
                debug!("Failed to decode record for {}: {}", ip, e);
                None
            }
        }
    }
}
