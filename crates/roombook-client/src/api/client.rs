//! Booking backend REST API client.
//!
//! Uses reqwest to call the backend. All business logic, conflict checking
//! and authorization enforcement happen server-side; this client only
//! shapes requests and classifies failures.

use std::future::Future;
use std::sync::{Arc, RwLock};

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use roombook_core::models::{Booking, BookingStatus, Hotel, Room, User, UserRole};

use super::types::{
    ApiErrorBody, AuthResponse, BookingInput, HotelInput, LoginRequest, RegisterRequest, RoomInput,
};

/// Generic failure message when no response was received at all.
pub const MSG_NETWORK: &str = "Не удалось связаться с сервером. Попробуйте ещё раз";
/// Fallback for 401 responses without a server message.
pub const MSG_INVALID_CREDENTIALS: &str = "Неверный email или пароль";
/// Fallback for 5xx responses without a server message.
pub const MSG_SERVER_ERROR: &str = "Ошибка сервера. Попробуйте позже";

/// Booking API client errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        /// Structured message from the backend's error envelope, when the
        /// body carried one.
        message: Option<String>,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Message suitable for direct display.
    ///
    /// A server-provided message is surfaced verbatim; otherwise the error
    /// class picks a generic fallback: invalid credentials for 401, server
    /// error for 5xx, try again for transport failures.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api {
                message: Some(msg), ..
            } => msg.clone(),
            Self::Api { status, .. } if *status == 401 => MSG_INVALID_CREDENTIALS.to_string(),
            Self::Api { status, .. } if *status >= 500 => MSG_SERVER_ERROR.to_string(),
            Self::Api { status, .. } => format!("Ошибка запроса ({status})"),
            Self::Http(_) => MSG_NETWORK.to_string(),
            Self::Config(msg) => msg.clone(),
        }
    }

    /// Whether this is a 401 (token missing, expired, or wrong credentials).
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }
}

/// Shared bearer token slot. The session store writes it, every
/// authenticated request reads it.
pub type TokenHandle = Arc<RwLock<Option<String>>>;

/// Booking backend REST API client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: TokenHandle,
}

impl ApiClient {
    /// Create a new API client for the given base URL
    /// (e.g., "<http://localhost:8080/api>").
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        if base_url.is_empty() {
            return Err(ApiError::Config("api_base_url is empty".into()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Handle to the bearer token slot, shared with the session store.
    pub fn token_handle(&self) -> TokenHandle {
        Arc::clone(&self.token)
    }

    /// Build the full URL for an API path.
    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, self.api_url(path));
        let token = self.token.read().ok().and_then(|guard| guard.clone());
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Turn a non-2xx response into an [`ApiError::Api`], keeping the
    /// backend's structured message when the body carries one.
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp.json::<ApiErrorBody>().await.ok().map(|b| b.message);
        debug!(status = status.as_u16(), ?message, "API request failed");
        Err(ApiError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.request(Method::GET, path).send().await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    async fn send_body<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let resp = self.request(method, path).json(body).send().await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    /// PATCH with query parameters and no body, as the backend's partial
    /// updates expect.
    async fn patch_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &impl Serialize,
    ) -> Result<T, ApiError> {
        let resp = self
            .request(Method::PATCH, path)
            .query(query)
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let resp = self.request(Method::DELETE, path).send().await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// Fetch a path as raw JSON. This is the read path the resource cache
    /// goes through; typed views deserialize from the cached value.
    pub async fn get_json(&self, path: &str) -> Result<serde_json::Value, ApiError> {
        self.get(path).await
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// `POST /auth/login`.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.send_body(Method::POST, "/auth/login", credentials)
            .await
    }

    /// `POST /auth/register`.
    pub async fn register(&self, profile: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.send_body(Method::POST, "/auth/register", profile).await
    }

    /// `GET /auth/me` (requires bearer token).
    pub async fn me(&self) -> Result<User, ApiError> {
        self.get("/auth/me").await
    }

    // =========================================================================
    // Hotels
    // =========================================================================

    /// `GET /hotels`.
    pub async fn hotels(&self) -> Result<Vec<Hotel>, ApiError> {
        self.get("/hotels").await
    }

    /// `GET /hotels/:id`.
    pub async fn hotel(&self, id: i64) -> Result<Hotel, ApiError> {
        self.get(&format!("/hotels/{id}")).await
    }

    /// `GET /hotels/city/:city`.
    pub async fn hotels_by_city(&self, city: &str) -> Result<Vec<Hotel>, ApiError> {
        self.get(&format!("/hotels/city/{city}")).await
    }

    /// `POST /hotels` (admin).
    pub async fn create_hotel(&self, hotel: &HotelInput) -> Result<Hotel, ApiError> {
        self.send_body(Method::POST, "/hotels", hotel).await
    }

    /// `PUT /hotels/:id` (admin).
    pub async fn update_hotel(&self, id: i64, hotel: &HotelInput) -> Result<Hotel, ApiError> {
        self.send_body(Method::PUT, &format!("/hotels/{id}"), hotel)
            .await
    }

    /// `DELETE /hotels/:id` (admin).
    pub async fn delete_hotel(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/hotels/{id}")).await
    }

    // =========================================================================
    // Rooms
    // =========================================================================

    /// `GET /rooms/hotel/:hotelId`, the guest-facing available rooms.
    pub async fn rooms_by_hotel(&self, hotel_id: i64) -> Result<Vec<Room>, ApiError> {
        self.get(&format!("/rooms/hotel/{hotel_id}")).await
    }

    /// `GET /rooms/admin/all`, every room including unavailable ones.
    pub async fn all_rooms_admin(&self) -> Result<Vec<Room>, ApiError> {
        self.get("/rooms/admin/all").await
    }

    /// `POST /rooms` (admin).
    pub async fn create_room(&self, room: &RoomInput) -> Result<Room, ApiError> {
        self.send_body(Method::POST, "/rooms", room).await
    }

    /// `PUT /rooms/:id` (admin).
    pub async fn update_room(&self, id: i64, room: &RoomInput) -> Result<Room, ApiError> {
        self.send_body(Method::PUT, &format!("/rooms/{id}"), room)
            .await
    }

    /// `PATCH /rooms/:id/availability?available=` (admin).
    pub async fn set_room_availability(
        &self,
        id: i64,
        available: bool,
    ) -> Result<Room, ApiError> {
        self.patch_query(
            &format!("/rooms/{id}/availability"),
            &[("available", available)],
        )
        .await
    }

    /// `DELETE /rooms/:id` (admin).
    pub async fn delete_room(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/rooms/{id}")).await
    }

    // =========================================================================
    // Bookings
    // =========================================================================

    /// `GET /bookings/my`.
    pub async fn my_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        self.get("/bookings/my").await
    }

    /// `GET /bookings/my/active`.
    pub async fn my_active_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        self.get("/bookings/my/active").await
    }

    /// `GET /bookings/:id`.
    pub async fn booking(&self, id: i64) -> Result<Booking, ApiError> {
        self.get(&format!("/bookings/{id}")).await
    }

    /// `POST /bookings`.
    pub async fn create_booking(&self, booking: &BookingInput) -> Result<Booking, ApiError> {
        self.send_body(Method::POST, "/bookings", booking).await
    }

    /// `POST /bookings/:id/cancel`.
    pub async fn cancel_booking(&self, id: i64) -> Result<Booking, ApiError> {
        let resp = self
            .request(Method::POST, &format!("/bookings/{id}/cancel"))
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    /// `GET /bookings/hotel/:hotelId` (admin).
    pub async fn hotel_bookings(&self, hotel_id: i64) -> Result<Vec<Booking>, ApiError> {
        self.get(&format!("/bookings/hotel/{hotel_id}")).await
    }

    /// `GET /bookings/status/:status` (admin).
    pub async fn bookings_by_status(
        &self,
        status: BookingStatus,
    ) -> Result<Vec<Booking>, ApiError> {
        self.get(&format!("/bookings/status/{}", status.as_str()))
            .await
    }

    /// `PATCH /bookings/:id/status?status=` (admin).
    pub async fn set_booking_status(
        &self,
        id: i64,
        status: BookingStatus,
    ) -> Result<Booking, ApiError> {
        self.patch_query(
            &format!("/bookings/{id}/status"),
            &[("status", status.as_str())],
        )
        .await
    }

    // =========================================================================
    // Admin users
    // =========================================================================

    /// `GET /admin/users`.
    pub async fn users(&self) -> Result<Vec<User>, ApiError> {
        self.get("/admin/users").await
    }

    /// `PATCH /admin/users/:id/role?role=`.
    pub async fn set_user_role(&self, id: i64, role: UserRole) -> Result<User, ApiError> {
        self.patch_query(&format!("/admin/users/{id}/role"), &[("role", role.as_str())])
            .await
    }

    /// `PATCH /admin/users/:id/toggle-status`.
    pub async fn toggle_user_status(&self, id: i64) -> Result<User, ApiError> {
        let resp = self
            .request(Method::PATCH, &format!("/admin/users/{id}/toggle-status"))
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }
}

/// Read seam between the resource cache and the transport.
///
/// The cache only ever issues GETs; keeping them behind this trait lets
/// tests drive the cache with a scripted fetcher instead of a live server.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<serde_json::Value, ApiError>> + Send;
}

impl Fetcher for ApiClient {
    fn fetch(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<serde_json::Value, ApiError>> + Send {
        self.get_json(path)
    }
}
