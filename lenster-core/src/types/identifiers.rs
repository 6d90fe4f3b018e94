use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{ServiceError, ServiceResult, U256};

/// A profile id as handed out by the backend, e.g. `0x0f`.
///
/// The backend is the source of truth for the textual form, so it is kept
/// verbatim and only converted to a number when it goes on-chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(String);

impl ProfileId {
    /// Wrap a hex profile id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as sent to the backend.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the id, as expected by the hub contract.
    pub fn to_u256(&self) -> ServiceResult<U256> {
        let digits = self
            .0
            .strip_prefix("0x")
            .or_else(|| self.0.strip_prefix("0X"))
            .unwrap_or(&self.0);
        U256::from_str_radix(digits, 16)
            .map_err(|_| ServiceError::InvalidValue(format!("profile id {}", self.0)))
    }
}

impl Display for ProfileId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProfileId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
