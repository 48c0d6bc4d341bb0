use serde::{Deserialize, Serialize};
use std::fmt;

/// Bucket and key of a synthesized audio object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobLocator {
    pub bucket: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocatorParseError {
    #[error("unsupported URI scheme in '{0}'")]
    UnsupportedScheme(String),
    #[error("'{0}' is not an S3 host")]
    UnrecognizedHost(String),
    #[error("no bucket in '{0}'")]
    MissingBucket(String),
    #[error("no object key in '{0}'")]
    MissingKey(String),
    #[error("object key in '{0}' is not valid UTF-8 once decoded")]
    InvalidEncoding(String),
}

impl BlobLocator {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Parse a storage URI reported by the synthesis service.
    ///
    /// Accepted forms:
    /// - `s3://bucket/key`
    /// - `https://s3.<region>.amazonaws.com/bucket/key` (path style)
    /// - `https://bucket.s3.<region>.amazonaws.com/key` (virtual hosted)
    ///
    /// Keys of the https forms are percent-decoded; `s3://` keys are taken
    /// verbatim. Either a full locator comes back or an error.
    pub fn parse(uri: &str) -> Result<Self, LocatorParseError> {
        let uri = uri.trim();
        let (scheme, rest) = uri
            .split_once("://")
            .ok_or_else(|| LocatorParseError::UnsupportedScheme(uri.to_string()))?;

        // Query and fragment never belong to the key
        let rest = rest.split(['?', '#']).next().unwrap_or_default();

        let (bucket, raw_key, encoded) = match scheme.to_ascii_lowercase().as_str() {
            "s3" => {
                let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
                (bucket, key, false)
            }
            "https" | "http" => {
                let (host, path) = rest.split_once('/').unwrap_or((rest, ""));
                let host = host.to_ascii_lowercase();
                let (bucket, key) = match s3_host_style(&host) {
                    Some(HostStyle::Path) => path.split_once('/').unwrap_or((path, "")),
                    Some(HostStyle::VirtualHosted(bucket_len)) => (&rest[..bucket_len], path),
                    None => return Err(LocatorParseError::UnrecognizedHost(host)),
                };
                (bucket, key, true)
            }
            _ => return Err(LocatorParseError::UnsupportedScheme(uri.to_string())),
        };

        if bucket.is_empty() {
            return Err(LocatorParseError::MissingBucket(uri.to_string()));
        }
        if raw_key.is_empty() {
            return Err(LocatorParseError::MissingKey(uri.to_string()));
        }

        if !encoded {
            return Ok(Self::new(bucket, raw_key));
        }

        let key = urlencoding::decode(raw_key)
            .map_err(|_| LocatorParseError::InvalidEncoding(uri.to_string()))?;

        Ok(Self::new(bucket, key.into_owned()))
    }
}

impl fmt::Display for BlobLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

enum HostStyle {
    Path,
    /// Byte length of the bucket name at the start of the host
    VirtualHosted(usize),
}

fn s3_host_style(host: &str) -> Option<HostStyle> {
    let host = host.split(':').next().unwrap_or(host);
    let aws_domain = host.ends_with(".amazonaws.com") || host.ends_with(".amazonaws.com.cn");
    if !aws_domain {
        return None;
    }

    if host.starts_with("s3.") || host.starts_with("s3-") {
        return Some(HostStyle::Path);
    }

    // Bucket names may contain `.s3.` themselves, so the endpoint marker is
    // the rightmost one
    [".s3.", ".s3-"]
        .iter()
        .filter_map(|marker| host.rfind(marker))
        .max()
        .map(HostStyle::VirtualHosted)
}
