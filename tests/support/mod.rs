//! In-memory doubles shared by the behaviour tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use time::{Date, Month};
use tweetick_core::{
    HttpClient, HttpError, HttpRequest, HttpResponse, Polarity, SentimentScorer, SourceError,
    Status, StatusFuture, StatusUser, TweetSource,
};

/// Replays queued responses in order and records every request.
///
/// Once the queue is drained every call fails with a retryable transport
/// error.
#[derive(Debug, Default)]
pub struct CannedHttpClient {
    responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl CannedHttpClient {
    pub fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn json(body: &str) -> Self {
        Self::new(vec![Ok(HttpResponse::ok_json(body))])
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self::new(vec![Ok(HttpResponse::with_status(status, body))])
    }

    pub fn unreachable() -> Self {
        Self::new(Vec::new())
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .clone()
    }
}

impl HttpClient for CannedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .push(request);
        let response = self
            .responses
            .lock()
            .expect("response queue should not be poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(HttpError::new("connection refused")));
        Box::pin(async move { response })
    }
}

/// Scripted tweet source keyed by call type.
#[derive(Debug, Default)]
pub struct FakeTweetSource {
    timeline: Mutex<Option<Result<Vec<Status>, SourceError>>>,
    search_by_until: Mutex<HashMap<Date, Result<Vec<Status>, SourceError>>>,
    search_calls: Mutex<Vec<(String, Date, usize)>>,
}

impl FakeTweetSource {
    pub fn with_timeline(self, result: Result<Vec<Status>, SourceError>) -> Self {
        *self.timeline.lock().expect("not poisoned") = Some(result);
        self
    }

    /// Days without a scripted result return an empty page.
    pub fn with_search_day(self, until: Date, result: Result<Vec<Status>, SourceError>) -> Self {
        self.search_by_until
            .lock()
            .expect("not poisoned")
            .insert(until, result);
        self
    }

    pub fn search_calls(&self) -> Vec<(String, Date, usize)> {
        self.search_calls.lock().expect("not poisoned").clone()
    }
}

impl TweetSource for FakeTweetSource {
    fn user_timeline<'a>(&'a self, _user: &'a str, count: usize) -> StatusFuture<'a> {
        let result = self
            .timeline
            .lock()
            .expect("not poisoned")
            .clone()
            .unwrap_or_else(|| Ok(Vec::new()))
            .map(|statuses| statuses.into_iter().take(count).collect());
        Box::pin(async move { result })
    }

    fn search<'a>(&'a self, query: &'a str, until: Date, count: usize) -> StatusFuture<'a> {
        self.search_calls
            .lock()
            .expect("not poisoned")
            .push((query.to_owned(), until, count));
        let result = self
            .search_by_until
            .lock()
            .expect("not poisoned")
            .get(&until)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()));
        Box::pin(async move { result })
    }
}

/// Scores every text with the same label.
#[derive(Debug, Clone, Copy)]
pub struct FixedScorer(pub Polarity);

impl SentimentScorer for FixedScorer {
    fn polarity(&self, _text: &str) -> Polarity {
        self.0
    }
}

pub fn status(id: u64, created_at: &str, text: &str, followers: u64) -> Status {
    Status {
        id,
        created_at: created_at.to_owned(),
        text: text.to_owned(),
        user: StatusUser {
            followers_count: followers,
        },
    }
}

pub fn april(day: u8) -> Date {
    Date::from_calendar_date(2021, Month::April, day).expect("valid April 2021 date")
}

/// JSON body of a price record in the feed's default layout.
pub fn price_record(block_hour: &str, price: &str) -> serde_json::Value {
    serde_json::json!({ "BLOCK_HOUR": block_hour, "COMP_PRICE": price })
}
