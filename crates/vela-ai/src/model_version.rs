//! Version extraction from provider model identifiers.
//!
//! Grammar: `[models/]<family>-<major>.<minor>[-<suffix>]` where `family` is
//! ASCII alphanumeric or `_`, and `major`/`minor` are ASCII digit runs. The
//! version must be the whole second `-`-separated segment. Identifiers that do
//! not match carry no version.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Numeric `<major>.<minor>` pair; ordering compares components as integers.
pub struct ModelVersion {
    pub major: u32,
    pub minor: u32,
}

impl ModelVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for ModelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid model version '{input}': expected <major>.<minor>")]
pub struct ModelVersionParseError {
    pub input: String,
}

impl FromStr for ModelVersion {
    type Err = ModelVersionParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_version_segment(value.trim()).ok_or_else(|| ModelVersionParseError {
            input: value.to_string(),
        })
    }
}

/// Extracts the version of a model identifier such as `models/gemini-2.5-flash`.
pub fn parse_model_version(identifier: &str) -> Option<ModelVersion> {
    let identifier = identifier.trim();
    let identifier = identifier.strip_prefix("models/").unwrap_or(identifier);
    let mut segments = identifier.split('-');
    let family = segments.next()?;
    if family.is_empty()
        || !family
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || byte == b'_')
    {
        return None;
    }
    parse_version_segment(segments.next()?)
}

fn parse_version_segment(segment: &str) -> Option<ModelVersion> {
    let (major, minor) = segment.split_once('.')?;
    Some(ModelVersion {
        major: parse_digits(major)?,
        minor: parse_digits(minor)?,
    })
}

fn parse_digits(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::{parse_model_version, ModelVersion};

    #[test]
    fn unit_parse_model_version_reads_family_major_minor() {
        assert_eq!(
            parse_model_version("gemini-2.5-flash"),
            Some(ModelVersion::new(2, 5))
        );
        assert_eq!(
            parse_model_version("models/gemini-3.1-pro-preview"),
            Some(ModelVersion::new(3, 1))
        );
        assert_eq!(parse_model_version("gemini-2.0"), Some(ModelVersion::new(2, 0)));
    }

    #[test]
    fn unit_parse_model_version_rejects_non_matching_identifiers() {
        for identifier in [
            "",
            "gemini",
            "gemini-pro",
            "gemini-exp-1206",
            "gemma-3-27b-it",
            "gemini-2.-flash",
            "gemini-.5-flash",
            "gemini-2.5.1-flash",
            "-2.5-flash",
            "gemini-2.5x-flash",
            "gemini-99999999999.1",
        ] {
            assert_eq!(parse_model_version(identifier), None, "{identifier}");
        }
    }

    #[test]
    fn functional_model_versions_compare_numerically() {
        let ten = parse_model_version("gemini-2.10-x").expect("2.10");
        let nine = parse_model_version("gemini-2.9-x").expect("2.9");
        assert_eq!(ten, ModelVersion::new(2, 10));
        assert!(ten > nine);
        assert!(ModelVersion::new(3, 0) > ModelVersion::new(2, 99));
    }

    #[test]
    fn unit_model_version_from_str_parses_floor_values() {
        assert_eq!("2.5".parse::<ModelVersion>(), Ok(ModelVersion::new(2, 5)));
        assert_eq!(" 10.0 ".parse::<ModelVersion>(), Ok(ModelVersion::new(10, 0)));
        assert!("2".parse::<ModelVersion>().is_err());
        assert!("v2.5".parse::<ModelVersion>().is_err());
        assert_eq!(ModelVersion::new(2, 10).to_string(), "2.10");
    }
}
