//! Transport-agnostic description of an API call
//!
//! A [`Request`] names a resource (`v2/worlds`, `v1/guild_details.json`), carries
//! an ordered list of query parameters and the selection of entities it targets.
//! Requests are built once per call with [`RequestBuilder`] and never mutated.

use std::fmt::Display;

use url::Url;

use crate::error::{ProtocolError, Result};
use crate::locale::Locale;

/// Which entities a request targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The bare resource: an id list for discovery endpoints, or whatever the resource returns
    Resource,
    /// A single entity (`id=`)
    Id(String),
    /// A bulk lookup (`ids=a,b,c`)
    Ids(Vec<String>),
    /// Every entity (`ids=all`)
    All,
    /// A page of entities (`page=`, optional `page_size=`)
    Page { index: u32, size: Option<u32> },
}

/// An immutable API call description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    resource: String,
    parameters: Vec<(String, String)>,
    selection: Selection,
    locale: Option<Locale>,
}

impl Request {
    pub fn builder(resource: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(resource)
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn locale(&self) -> Option<Locale> {
        self.locale
    }

    /// Explicit parameters, without the ones derived from the selection and locale
    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    /// Full ordered query: explicit parameters, then selection, then `lang`.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.parameters.clone();

        match &self.selection {
            Selection::Resource => {}
            Selection::Id(id) => pairs.push(("id".to_string(), id.clone())),
            Selection::Ids(ids) => pairs.push(("ids".to_string(), ids.join(","))),
            Selection::All => pairs.push(("ids".to_string(), "all".to_string())),
            Selection::Page { index, size } => {
                pairs.push(("page".to_string(), index.to_string()));
                if let Some(size) = size {
                    pairs.push(("page_size".to_string(), size.to_string()));
                }
            }
        }

        if let Some(locale) = self.locale {
            pairs.push(("lang".to_string(), locale.code().to_string()));
        }

        pairs
    }

    /// Resolve against the API base URL (`https://api.guildwars2.com/`).
    pub fn url(&self, base: &Url) -> Result<Url> {
        let mut url = base.join(self.resource.trim_start_matches('/'))?;
        let pairs = self.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }
}

/// Builder for [`Request`]; conflicting selections are rejected by [`RequestBuilder::build`].
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    resource: String,
    parameters: Vec<(String, String)>,
    id: Option<String>,
    ids: Option<Vec<String>>,
    all: bool,
    page: Option<u32>,
    page_size: Option<u32>,
    locale: Option<Locale>,
}

impl RequestBuilder {
    fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            parameters: Vec::new(),
            id: None,
            ids: None,
            all: false,
            page: None,
            page_size: None,
            locale: None,
        }
    }

    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.parameters.push((key.into(), value.to_string()));
        self
    }

    #[must_use]
    pub fn id(mut self, id: impl Display) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Identifiers are formatted with `Display`, which is locale-independent for
    /// integers and strings.
    #[must_use]
    pub fn ids<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        self.ids = Some(ids.into_iter().map(|id| id.to_string()).collect());
        self
    }

    #[must_use]
    pub fn all(mut self) -> Self {
        self.all = true;
        self
    }

    #[must_use]
    pub fn page(mut self, index: u32) -> Self {
        self.page = Some(index);
        self
    }

    #[must_use]
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    #[must_use]
    pub fn locale(mut self, locale: Option<Locale>) -> Self {
        self.locale = locale;
        self
    }

    pub fn build(self) -> Result<Request> {
        let resource = self.resource.trim().to_string();
        if resource.is_empty() {
            return Err(ProtocolError::InvalidRequest("empty resource path".to_string()));
        }

        let selection = match (self.id, self.ids, self.all, self.page, self.page_size) {
            (None, None, false, None, None) => Selection::Resource,
            (Some(id), None, false, None, None) => Selection::Id(id),
            (None, Some(ids), false, None, None) => Selection::Ids(ids),
            (None, None, true, None, None) => Selection::All,
            (None, None, false, Some(index), size) => Selection::Page { index, size },
            (None, None, false, None, Some(_)) => {
                return Err(ProtocolError::InvalidRequest(
                    "page size requires a page index".to_string(),
                ));
            }
            _ => {
                return Err(ProtocolError::InvalidRequest(
                    "identifier, identifiers, all and paging are mutually exclusive".to_string(),
                ));
            }
        };

        Ok(Request {
            resource,
            parameters: self.parameters,
            selection,
            locale: self.locale,
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
        expected
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_details_request() {
        let request = Request::builder("v2/worlds")
            .id(1001)
            .locale(Some(Locale::German))
            .build()
            .expect("valid request");

        assert_eq!(request.selection(), &Selection::Id("1001".to_string()));
        assert_eq!(request.query_pairs(), pairs(&[("id", "1001"), ("lang", "de")]));
    }

    #[test]
    fn test_bulk_ids_are_comma_joined() {
        let request = Request::builder("v2/items")
            .ids([12, 34, 56])
            .build()
            .expect("valid request");

        assert_eq!(request.query_pairs(), pairs(&[("ids", "12,34,56")]));
    }

    #[test]
    fn test_page_request() {
        let request = Request::builder("v2/items")
            .page(2)
            .page_size(50)
            .build()
            .expect("valid request");

        assert_eq!(request.query_pairs(), pairs(&[("page", "2"), ("page_size", "50")]));
    }

    #[test]
    fn test_explicit_parameters_come_first() {
        let request = Request::builder("v1/guild_details.json")
            .param("guild_name", "Edge Of Destiny")
            .locale(Some(Locale::French))
            .build()
            .expect("valid request");

        assert_eq!(
            request.query_pairs(),
            pairs(&[("guild_name", "Edge Of Destiny"), ("lang", "fr")])
        );
    }

    #[test]
    fn test_id_and_ids_are_rejected() {
        let result = Request::builder("v2/worlds").id(1).ids([2, 3]).build();
        assert!(matches!(result, Err(ProtocolError::InvalidRequest(_))));
    }

    #[test]
    fn test_ids_and_all_are_rejected() {
        let result = Request::builder("v2/worlds").ids([2, 3]).all().build();
        assert!(matches!(result, Err(ProtocolError::InvalidRequest(_))));
    }

    #[test]
    fn test_page_size_without_page_is_rejected() {
        let result = Request::builder("v2/worlds").page_size(10).build();
        assert!(matches!(result, Err(ProtocolError::InvalidRequest(_))));
    }

    #[test]
    fn test_empty_resource_is_rejected() {
        let result = Request::builder("  ").build();
        assert!(matches!(result, Err(ProtocolError::InvalidRequest(_))));
    }

    #[test]
    fn test_url_construction() {
        let base = Url::parse("https://api.guildwars2.com/").expect("valid base");
        let request = Request::builder("/v2/worlds")
            .all()
            .locale(Some(Locale::English))
            .build()
            .expect("valid request");

        let url = request.url(&base).expect("valid url");
        assert_eq!(
            url.as_str(),
            "https://api.guildwars2.com/v2/worlds?ids=all&lang=en"
        );
    }

    #[test]
    fn test_url_without_query() {
        let base = Url::parse("https://api.guildwars2.com/").expect("valid base");
        let request = Request::builder("v2/worlds").build().expect("valid request");

        let url = request.url(&base).expect("valid url");
        assert_eq!(url.as_str(), "https://api.guildwars2.com/v2/worlds");
    }
}
