use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::Address;
use crate::domain::user::models::AddressDraft;
use crate::domain::user::models::AddressId;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::AddressError;

pub async fn list_addresses(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<ApiSuccess<Vec<AddressData>>, ApiError> {
    state
        .user_service
        .list_addresses(&current.user.id)
        .await
        .map_err(ApiError::from)
        .map(|ref addresses| ApiSuccess::new(StatusCode::OK, AddressData::list(addresses)))
}

pub async fn add_address(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(body): Json<AddressRequest>,
) -> Result<ApiSuccess<Vec<AddressData>>, ApiError> {
    let draft = body.try_into_draft()?;

    state
        .user_service
        .add_address(&current.user.id, draft)
        .await
        .map_err(ApiError::from)
        .map(|ref addresses| ApiSuccess::new(StatusCode::CREATED, AddressData::list(addresses)))
}

pub async fn update_address(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(address_id): Path<String>,
    Json(body): Json<AddressRequest>,
) -> Result<ApiSuccess<Vec<AddressData>>, ApiError> {
    let address_id = parse_address_id(&address_id)?;
    let draft = body.try_into_draft()?;

    state
        .user_service
        .update_address(&current.user.id, &address_id, draft)
        .await
        .map_err(ApiError::from)
        .map(|ref addresses| ApiSuccess::new(StatusCode::OK, AddressData::list(addresses)))
}

pub async fn delete_address(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(address_id): Path<String>,
) -> Result<ApiSuccess<Vec<AddressData>>, ApiError> {
    let address_id = parse_address_id(&address_id)?;

    state
        .user_service
        .delete_address(&current.user.id, &address_id)
        .await
        .map_err(ApiError::from)
        .map(|ref addresses| ApiSuccess::new(StatusCode::OK, AddressData::list(addresses)))
}

// A malformed id cannot name an existing address.
fn parse_address_id(raw: &str) -> Result<AddressId, ApiError> {
    AddressId::from_string(raw).map_err(|_| ApiError::NotFound(format!("Address not found: {}", raw)))
}

/// HTTP request body for an address (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddressRequest {
    address_line: String,
    pincode: String,
    #[serde(default)]
    landmark: Option<String>,
    city: String,
    state: String,
    nation: String,
    receiver_phone: String,
    #[serde(default)]
    is_default: bool,
}

impl AddressRequest {
    pub(crate) fn try_into_draft(self) -> Result<AddressDraft, AddressError> {
        AddressDraft::new(
            self.address_line,
            self.pincode,
            self.landmark,
            self.city,
            self.state,
            self.nation,
            self.receiver_phone,
            self.is_default,
        )
    }
}

impl From<AddressError> for ApiError {
    fn from(err: AddressError) -> Self {
        ApiError::UnprocessableEntity(format!("Invalid address: {}", err))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressData {
    pub id: String,
    pub address_line: String,
    pub pincode: String,
    pub landmark: Option<String>,
    pub city: String,
    pub state: String,
    pub nation: String,
    pub receiver_phone: String,
    pub is_default: bool,
}

impl AddressData {
    pub fn list(addresses: &[Address]) -> Vec<Self> {
        addresses.iter().map(Self::from).collect()
    }
}

impl From<&Address> for AddressData {
    fn from(address: &Address) -> Self {
        Self {
            id: address.id.to_string(),
            address_line: address.address_line.clone(),
            pincode: address.pincode.clone(),
            landmark: address.landmark.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            nation: address.nation.clone(),
            receiver_phone: address.receiver_phone.clone(),
            is_default: address.is_default,
        }
    }
}
