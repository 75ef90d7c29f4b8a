//! In-process stand-in for the hotel endpoints, used by the client tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::types::Json;
use uuid::Uuid;

use super::api::{ApiError, HotelApi, ListParams};
use crate::models::hotel::{Hotel, HotelPage, HotelPayload};
use crate::query::{compile, HotelQuery};

pub fn hotel(name: &str, price_per_night: f64, rating: f64) -> Hotel {
    Hotel {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        description: None,
        location: "Paris".to_string(),
        address: "12 Rue de Rivoli".to_string(),
        rating,
        price_per_night,
        photos: Json(Vec::new()),
        rooms: Vec::new(),
        created_at: NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid timestamp"),
    }
}

#[derive(Default)]
pub struct FakeApi {
    /// Newest first, like the real listing.
    pub hotels: Mutex<Vec<Hotel>>,
    pub list_calls: Mutex<Vec<ListParams>>,
    pub creates: Mutex<Vec<HotelPayload>>,
    pub updates: Mutex<Vec<HotelPayload>>,
    pub delays: Mutex<HashMap<ListParams, Duration>>,
    /// Consumed one per list call, ahead of `delays`.
    pub next_delays: Mutex<VecDeque<Duration>>,
    pub mutation_delay: Mutex<Duration>,
    pub fail_lists: Mutex<bool>,
    pub fail_mutations: Mutex<bool>,
}

impl FakeApi {
    pub fn with_hotels(count: usize) -> Self {
        let api = Self::default();
        {
            let mut hotels = api.hotels.lock().unwrap();
            for i in 0..count {
                hotels.insert(0, hotel(&format!("Hotel {i:02}"), 100.0, 3.0));
            }
        }
        api
    }

    pub fn delay(&self, params: ListParams, delay: Duration) {
        self.delays.lock().unwrap().insert(params, delay);
    }

    pub fn calls(&self) -> Vec<ListParams> {
        self.list_calls.lock().unwrap().clone()
    }

    fn unavailable() -> ApiError {
        ApiError::Status {
            status: 500,
            message: "Something went wrong!".into(),
        }
    }

    fn snapshot(&self, params: &ListParams) -> HotelPage {
        let compiled = compile(&HotelQuery {
            name: Some(params.search_text.clone()),
            page: Some(params.page.to_string()),
            ..HotelQuery::default()
        });
        let hotels = self.hotels.lock().unwrap();
        let matching: Vec<&Hotel> = hotels
            .iter()
            .filter(|h| compiled.filter.matches(h))
            .collect();
        HotelPage {
            total_count: matching.len() as i64,
            hotels: matching
                .into_iter()
                .skip(compiled.window.offset as usize)
                .take(compiled.window.limit as usize)
                .cloned()
                .collect(),
        }
    }

    async fn mutation_pause(&self) {
        let delay = *self.mutation_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl HotelApi for FakeApi {
    async fn list(&self, params: &ListParams) -> Result<HotelPage, ApiError> {
        self.list_calls.lock().unwrap().push(params.clone());
        let queued = self.next_delays.lock().unwrap().pop_front();
        let delay = queued.or_else(|| self.delays.lock().unwrap().get(params).copied());
        // Read before the delay, so a slow response carries old data.
        let page = self.snapshot(params);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if *self.fail_lists.lock().unwrap() {
            return Err(Self::unavailable());
        }
        Ok(page)
    }

    async fn create(&self, payload: &HotelPayload) -> Result<Hotel, ApiError> {
        self.mutation_pause().await;
        self.creates.lock().unwrap().push(payload.clone());
        if *self.fail_mutations.lock().unwrap() {
            return Err(Self::unavailable());
        }
        let mut created = hotel(payload.name.as_deref().unwrap_or_default(), 100.0, 0.0);
        created.location = payload.location.clone().unwrap_or_default();
        self.hotels.lock().unwrap().insert(0, created.clone());
        Ok(created)
    }

    async fn update(&self, payload: &HotelPayload) -> Result<Hotel, ApiError> {
        self.mutation_pause().await;
        self.updates.lock().unwrap().push(payload.clone());
        if *self.fail_mutations.lock().unwrap() {
            return Err(Self::unavailable());
        }
        let mut hotels = self.hotels.lock().unwrap();
        let target = hotels
            .iter_mut()
            .find(|h| Some(h.id.as_str()) == payload.id.as_deref())
            .ok_or(ApiError::Status {
                status: 404,
                message: "Hotel not found".into(),
            })?;
        if let Some(name) = &payload.name {
            target.name = name.clone();
        }
        Ok(target.clone())
    }
}
