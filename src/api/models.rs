//! Response bodies for the product endpoints.
//!
//! Products themselves are returned as stored; see [`crate::catalog::Product`].

use serde::{Deserialize, Serialize};

/// `{"error": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
}

/// `{"success": true, "message": "..."}` returned by edit and delete
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Acknowledgement {
    pub success: bool,
    pub message: String,
}

impl Acknowledgement {
    pub fn updated(id: &str) -> Self {
        Self {
            success: true,
            message: format!("Product {id} updated"),
        }
    }

    pub fn deleted(id: &str) -> Self {
        Self {
            success: true,
            message: format!("Product {id} deleted"),
        }
    }
}
