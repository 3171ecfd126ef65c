//! Round model.

use placement_core::participation::RoundRef;
use placement_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `rounds` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Round {
    pub id: DbId,
    pub drive_id: DbId,
    pub name: String,
    pub order_index: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Round {
    pub fn to_round_ref(&self) -> RoundRef {
        RoundRef {
            id: self.id,
            order_index: self.order_index,
        }
    }
}

/// DTO for creating a round.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRound {
    pub drive_id: DbId,
    pub name: String,
    pub order_index: i32,
}
