//! Composite identities: `"<source_key>-<native_id>"`.
//!
//! Source keys are hyphen-free (enforced when configuration is loaded), so the
//! first hyphen always separates the key from the native id. Hyphens after
//! the first one belong to the native id.

use crate::error::CatalogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeId<'a> {
    pub source_key: &'a str,
    pub native_id: &'a str,
}

impl<'a> CompositeId<'a> {
    /// Split a composite identity on its first hyphen.
    pub fn parse(raw: &'a str) -> Result<Self, CatalogError> {
        let (source_key, native_id) = raw.split_once('-').ok_or_else(|| {
            CatalogError::InvalidInput(format!("malformed id '{}'", raw))
        })?;

        if source_key.is_empty() || native_id.is_empty() {
            return Err(CatalogError::InvalidInput(format!(
                "malformed id '{}'",
                raw
            )));
        }

        Ok(Self {
            source_key,
            native_id,
        })
    }

    pub fn format(source_key: &str, native_id: &str) -> String {
        format!("{}-{}", source_key, native_id)
    }
}

/// Native part of `raw` when it is a composite id for `source_key`, otherwise
/// `raw` unchanged. Used by clients whose upstream wants the bare id.
pub fn strip_source_prefix<'a>(raw: &'a str, source_key: &str) -> &'a str {
    match CompositeId::parse(raw) {
        Ok(id) if id.source_key == source_key => id.native_id,
        _ => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_first_hyphen_only() {
        let id = CompositeId::parse("src1-abc-123").unwrap();
        assert_eq!(id.source_key, "src1");
        assert_eq!(id.native_id, "abc-123");
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(CompositeId::parse("nohyphen").is_err());
        assert!(CompositeId::parse("-123").is_err());
        assert!(CompositeId::parse("src1-").is_err());
        assert!(CompositeId::parse("").is_err());
    }

    #[test]
    fn test_format_round_trip() {
        let raw = CompositeId::format("A", "7f3");
        assert_eq!(raw, "A-7f3");
        let id = CompositeId::parse(&raw).unwrap();
        assert_eq!((id.source_key, id.native_id), ("A", "7f3"));
    }

    #[test]
    fn test_strip_source_prefix() {
        assert_eq!(strip_source_prefix("bgm-1234", "bgm"), "1234");
        assert_eq!(strip_source_prefix("other-1234", "bgm"), "other-1234");
        assert_eq!(strip_source_prefix("1234", "bgm"), "1234");
    }
}
