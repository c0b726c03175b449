//! Dynamic events against the v1 API
//!
//! Discovery goes through `v1/event_names.json`. Details come from
//! `v1/event_details.json`, either for one `event_id` or for every event when
//! no id is given. Neither resource supports bulk ids or paging.

use std::fmt;
use std::sync::Arc;

use enumflags2::make_bitflags;
use tokio_util::sync::CancellationToken;

use gw2net_convert::{Context, Converter, DictionaryRange};
use gw2net_protocol::{Locale, Request, Response, ServiceClient};

use super::{Operation, Operations, fetch, fetch_async, unsupported};
use crate::error::Result;
use crate::model::Event;
use crate::model::event::{EventConverter, EventDetailsDto, EventNameDto};

const NAMES_RESOURCE: &str = "v1/event_names.json";
const DETAILS_RESOURCE: &str = "v1/event_details.json";

#[derive(Clone)]
pub struct EventRepository {
    client: Arc<dyn ServiceClient>,
    locale: Option<Locale>,
    converter: Arc<EventConverter>,
}

impl fmt::Debug for EventRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRepository")
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

impl EventRepository {
    pub const OPERATIONS: Operations = make_bitflags!(Operation::{Discover | Find | FindAll});

    pub fn new(client: Arc<dyn ServiceClient>) -> Self {
        Self {
            client,
            locale: None,
            converter: Arc::new(EventConverter::default()),
        }
    }

    #[must_use]
    pub fn with_locale(mut self, locale: Option<Locale>) -> Self {
        self.locale = locale;
        self
    }

    pub fn locale(&self) -> Option<Locale> {
        self.locale
    }

    pub fn supports(&self, operation: Operation) -> bool {
        Self::OPERATIONS.contains(operation)
    }

    /// Ids of every event, in server order
    pub fn discover(&self) -> Result<Vec<String>> {
        let request = self.names_request()?;
        Ok(Self::finish_discover(fetch(&*self.client, &request)?))
    }

    pub async fn discover_async(&self, cancel: &CancellationToken) -> Result<Vec<String>> {
        let request = self.names_request()?;
        Ok(Self::finish_discover(
            fetch_async(&*self.client, &request, cancel).await?,
        ))
    }

    /// Localized name of every event, keyed by event id
    pub fn names(&self) -> Result<DictionaryRange<String, String>> {
        let request = self.names_request()?;
        Ok(Self::finish_names(fetch(&*self.client, &request)?))
    }

    pub async fn names_async(
        &self,
        cancel: &CancellationToken,
    ) -> Result<DictionaryRange<String, String>> {
        let request = self.names_request()?;
        Ok(Self::finish_names(
            fetch_async(&*self.client, &request, cancel).await?,
        ))
    }

    /// One event, `None` if the id is unknown
    pub fn find(&self, event_id: &str) -> Result<Option<Event>> {
        let request = self.details_request(Some(event_id))?;
        let range = self.finish_details(fetch(&*self.client, &request)?)?;
        Ok(Self::pick(range, event_id))
    }

    pub async fn find_async(
        &self,
        event_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Event>> {
        let request = self.details_request(Some(event_id))?;
        let range = self.finish_details(fetch_async(&*self.client, &request, cancel).await?)?;
        Ok(Self::pick(range, event_id))
    }

    /// Details of every event
    pub fn find_all(&self) -> Result<DictionaryRange<String, Event>> {
        let request = self.details_request(None)?;
        self.finish_details(fetch(&*self.client, &request)?)
    }

    pub async fn find_all_async(
        &self,
        cancel: &CancellationToken,
    ) -> Result<DictionaryRange<String, Event>> {
        let request = self.details_request(None)?;
        self.finish_details(fetch_async(&*self.client, &request, cancel).await?)
    }

    /// Always [`crate::Error::Unsupported`]
    pub fn find_all_by_ids(&self, _event_ids: &[String]) -> Result<DictionaryRange<String, Event>> {
        Err(unsupported(Operation::FindAllByIds, DETAILS_RESOURCE))
    }

    /// Always [`crate::Error::Unsupported`]
    pub fn find_page(&self, _page_index: u32) -> Result<Vec<Event>> {
        Err(unsupported(Operation::FindPage, DETAILS_RESOURCE))
    }

    fn names_request(&self) -> Result<Request> {
        Ok(Request::builder(NAMES_RESOURCE).locale(self.locale).build()?)
    }

    fn details_request(&self, event_id: Option<&str>) -> Result<Request> {
        let mut builder = Request::builder(DETAILS_RESOURCE);
        if let Some(id) = event_id {
            builder = builder.param("event_id", id);
        }
        Ok(builder.locale(self.locale).build()?)
    }

    fn finish_discover(response: Response<Vec<EventNameDto>>) -> Vec<String> {
        response
            .content
            .unwrap_or_default()
            .into_iter()
            .map(|entry| entry.id)
            .collect()
    }

    fn finish_names(response: Response<Vec<EventNameDto>>) -> DictionaryRange<String, String> {
        response
            .content
            .unwrap_or_default()
            .into_iter()
            .map(|entry| (entry.id, entry.name))
            .collect()
    }

    fn finish_details(
        &self,
        response: Response<EventDetailsDto>,
    ) -> Result<DictionaryRange<String, Event>> {
        let context = Context::new(self.locale).with_metadata(response.metadata);
        let Some(details) = response.content else {
            return Ok(DictionaryRange::new());
        };

        let mut range = DictionaryRange::with_capacity(details.events.len());
        for (event_id, dto) in details.events {
            let event = self.converter.convert((event_id.clone(), dto), &context)?;
            range.insert(event_id, event);
        }
        range.subtotal_count = range.len();
        range.total_count = range.len();
        Ok(range)
    }

    fn pick(range: DictionaryRange<String, Event>, event_id: &str) -> Option<Event> {
        range
            .into_iter()
            .find(|(id, _)| id.eq_ignore_ascii_case(event_id))
            .map(|(_, event)| event)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gw2net_protocol::RawResponse;
    use pretty_assertions::assert_eq;

    struct Fixed(&'static str);

    #[async_trait]
    impl ServiceClient for Fixed {
        fn send(&self, _request: &Request) -> gw2net_protocol::Result<RawResponse> {
            Ok(RawResponse::new(200, self.0).with_header("Content-Language", "de"))
        }

        async fn send_async(
            &self,
            request: &Request,
            _cancel: &CancellationToken,
        ) -> gw2net_protocol::Result<RawResponse> {
            self.send(request)
        }
    }

    #[test]
    fn test_discover_reads_event_names() {
        let repository = EventRepository::new(Arc::new(Fixed(
            r#"[{"id": "A-1", "name": "Erste"}, {"id": "B-2", "name": "Zweite"}]"#,
        )));

        assert_eq!(
            repository.discover().expect("discovers"),
            vec!["A-1".to_string(), "B-2".to_string()]
        );
        let names = repository.names().expect("names");
        assert_eq!(names.get(&"B-2".to_string()), Some(&"Zweite".to_string()));
    }

    #[test]
    fn test_find_picks_requested_event() {
        let repository = EventRepository::new(Arc::new(Fixed(
            r#"{"events": {"a-1": {"name": "Erste", "map_id": 15, "location": {"type": "sphere"}}}}"#,
        )))
        .with_locale(Some(Locale::German));

        let event = repository
            .find("A-1")
            .expect("request succeeds")
            .expect("event found");
        assert_eq!(event.map_id, 15);
        assert_eq!(event.locale, Some(Locale::German));

        assert_eq!(repository.find("Z-9").expect("request succeeds"), None);
    }

    #[test]
    fn test_paging_is_unsupported() {
        let repository = EventRepository::new(Arc::new(Fixed("[]")));
        assert!(repository.find_page(0).expect_err("unsupported").is_unsupported());
        assert!(!repository.supports(Operation::FindAllByIds));
    }
}
