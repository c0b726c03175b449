//! In-memory transport for repository tests
#![allow(dead_code, clippy::expect_used)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gw2net_api::{CancellationToken, ServiceClient};
use gw2net_protocol::{Locale, ProtocolError, RawResponse, Request, Selection};

type Handler = dyn Fn(&Request) -> RawResponse + Send + Sync;

/// Answers every request with a handler and records what was sent
pub struct FakeApi {
    handler: Box<Handler>,
    requests: Mutex<Vec<Request>>,
}

impl FakeApi {
    pub fn new(handler: impl Fn(&Request) -> RawResponse + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().expect("not poisoned").clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("not poisoned").len()
    }

    pub fn last_query(&self) -> Vec<(String, String)> {
        self.requests()
            .last()
            .map(Request::query_pairs)
            .unwrap_or_default()
    }
}

#[async_trait]
impl ServiceClient for FakeApi {
    fn send(&self, request: &Request) -> gw2net_protocol::Result<RawResponse> {
        self.requests
            .lock()
            .map_err(|_| ProtocolError::InvalidRequest("poisoned".to_string()))?
            .push(request.clone());
        Ok((self.handler)(request))
    }

    async fn send_async(
        &self,
        request: &Request,
        cancel: &CancellationToken,
    ) -> gw2net_protocol::Result<RawResponse> {
        if cancel.is_cancelled() {
            return Err(ProtocolError::Cancelled);
        }
        self.send(request)
    }
}

pub fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
    expected
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

pub fn world_json(id: u32) -> String {
    format!(r#"{{"id": {id}, "name": "World {id}", "population": "High"}}"#)
}

/// A 120-world collection served by id, by ids, by `ids=all` and by page.
///
/// Like the live API it always answers with `Content-Language`: the requested
/// language, or `en` when none was asked for.
pub fn world_api() -> Arc<FakeApi> {
    FakeApi::new(|request| {
        let language = request.locale().unwrap_or(Locale::English);
        serve_worlds(request).with_header("Content-Language", language.to_string())
    })
}

fn serve_worlds(request: &Request) -> RawResponse {
    const TOTAL: u32 = 120;
    let ids: Vec<u32> = (1..=TOTAL).map(|n| 1000 + n).collect();

    let array = |selected: &[u32]| {
        let body = selected
            .iter()
            .map(|id| world_json(*id))
            .collect::<Vec<_>>()
            .join(",");
        RawResponse::new(200, format!("[{body}]"))
            .with_header("X-Result-Count", selected.len().to_string())
            .with_header("X-Result-Total", TOTAL.to_string())
    };

    match request.selection() {
        Selection::Resource => RawResponse::new(
            200,
            format!(
                "[{}]",
                ids.iter().map(u32::to_string).collect::<Vec<_>>().join(",")
            ),
        ),
        Selection::Id(id) => match id.parse::<u32>() {
            Ok(id) if ids.contains(&id) => RawResponse::new(200, world_json(id)),
            _ => RawResponse::new(404, r#"{"text": "no such id"}"#),
        },
        Selection::Ids(requested) => {
            let found: Vec<u32> = requested
                .iter()
                .filter_map(|id| id.parse().ok())
                .filter(|id| ids.contains(id))
                .collect();
            if found.is_empty() {
                RawResponse::new(404, r#"{"text": "all ids provided are invalid"}"#)
            } else {
                array(&found)
            }
        }
        Selection::All => array(&ids),
        Selection::Page { index, size } => {
            let size = size.unwrap_or(50) as usize;
            let start = *index as usize * size;
            let page: Vec<u32> = ids.iter().copied().skip(start).take(size).collect();
            let page_total = ids.len().div_ceil(size);
            array(&page)
                .with_header("X-Page-Size", size.to_string())
                .with_header("X-Page-Total", page_total.to_string())
        }
    }
}
