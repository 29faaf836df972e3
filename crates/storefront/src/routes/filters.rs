//! Filter route handlers.
//!
//! Each `POST /filters` applies one facet change to the session's filter
//! state, so the browser can mirror checkbox clicks one at a time.

use axum::Json;
use luxe_core::{FilterState, SortKey};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::{load_or_default, save};
use crate::models::session_keys;

/// A single facet change.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FilterUpdate {
    SetSearch { text: String },
    ToggleCategory { value: String },
    ToggleBrand { value: String },
    ToggleSize { value: String },
    ToggleColor { value: String },
    SetPriceRange {
        min: Decimal,
        #[serde(default)]
        max: Option<Decimal>,
    },
    SetSort { sort: SortKey },
}

impl FilterUpdate {
    /// Apply the change. A rejected price range leaves `state` unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error for negative or inverted price ranges.
    pub fn apply(self, state: &mut FilterState) -> std::result::Result<(), luxe_core::FilterError> {
        match self {
            Self::SetSearch { text } => state.set_search_text(text),
            Self::ToggleCategory { value } => state.toggle_category(&value),
            Self::ToggleBrand { value } => state.toggle_brand(&value),
            Self::ToggleSize { value } => state.toggle_size(&value),
            Self::ToggleColor { value } => state.toggle_color(&value),
            Self::SetPriceRange { min, max } => state.set_price_range(min, max)?,
            Self::SetSort { sort } => state.set_sort_key(sort),
        }
        Ok(())
    }
}

/// Show the session's filter state.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<FilterState>> {
    let filters = load_or_default(&session, session_keys::FILTERS).await?;
    Ok(Json(filters))
}

/// Apply one facet change.
#[instrument(skip(session))]
pub async fn update(session: Session, Json(change): Json<FilterUpdate>) -> Result<Json<FilterState>> {
    let mut filters: FilterState = load_or_default(&session, session_keys::FILTERS).await?;
    change.apply(&mut filters)?;
    save(&session, session_keys::FILTERS, &filters).await?;
    Ok(Json(filters))
}

/// Reset every facet.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<FilterState>> {
    let filters = FilterState::default();
    save(&session, session_keys::FILTERS, &filters).await?;
    Ok(Json(filters))
}
