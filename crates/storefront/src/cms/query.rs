//! Query string builder for the CMS REST API.
//!
//! The API takes bracketed keys (`populate[0]=images`,
//! `filters[slug][$eq]=smoky-rub`). Pairs are kept in insertion order so the
//! encoded string is stable and can double as a cache key.

use std::fmt::Display;

use under_the_hood_core::PublicationState;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CmsQuery {
    pairs: Vec<(String, String)>,
}

impl CmsQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw key/value pair.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.pairs.push((key.into(), value.to_string()));
        self
    }

    /// `populate[i]` for each relation, numbered from 0.
    #[must_use]
    pub fn populate(self, relations: &[&str]) -> Self {
        self.indexed("populate", relations)
    }

    /// `fields[i]` for each top-level field, numbered from 0.
    #[must_use]
    pub fn fields(self, fields: &[&str]) -> Self {
        self.indexed("fields", fields)
    }

    /// `sort[i]` for each `field:asc|desc` entry, numbered from 0.
    #[must_use]
    pub fn sort(self, order: &[&str]) -> Self {
        self.indexed("sort", order)
    }

    /// `filters[field][$eq]=value`.
    #[must_use]
    pub fn filter_eq(self, field: &str, value: impl Display) -> Self {
        self.param(format!("filters[{field}][$eq]"), value)
    }

    /// `pagination[pageSize]=n`.
    #[must_use]
    pub fn page_size(self, size: u32) -> Self {
        self.param("pagination[pageSize]", size)
    }

    #[must_use]
    pub fn publication_state(self, state: PublicationState) -> Self {
        self.param("publicationState", state)
    }

    /// Value of the first pair with `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Percent-encode the pairs as `application/x-www-form-urlencoded`.
    #[must_use]
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }

    fn indexed(mut self, prefix: &str, values: &[&str]) -> Self {
        for (i, value) in values.iter().enumerate() {
            self.pairs.push((format!("{prefix}[{i}]"), (*value).to_string()));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexed_params() {
        let query = CmsQuery::new()
            .populate(&["images", "art"])
            .fields(&["title"])
            .sort(&["title:asc"]);

        assert_eq!(query.get("populate[0]"), Some("images"));
        assert_eq!(query.get("populate[1]"), Some("art"));
        assert_eq!(query.get("fields[0]"), Some("title"));
        assert_eq!(query.get("sort[0]"), Some("title:asc"));
    }

    #[test]
    fn test_encode_escapes_brackets() {
        let query = CmsQuery::new()
            .filter_eq("slug", "smoky rub")
            .page_size(1)
            .publication_state(PublicationState::Live);

        assert_eq!(
            query.encode(),
            "filters%5Bslug%5D%5B%24eq%5D=smoky+rub&pagination%5BpageSize%5D=1&publicationState=live"
        );
    }

    #[test]
    fn test_empty_query() {
        assert!(CmsQuery::new().is_empty());
        assert_eq!(CmsQuery::new().encode(), "");
    }
}
