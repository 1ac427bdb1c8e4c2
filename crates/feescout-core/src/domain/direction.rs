use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Which side of an exchange a transfer goes through.
///
/// `Deposit` is the buy side: fiat goes in and the coin eventually has to be
/// withdrawn, so the coin withdraw fee is part of the cost. `Withdraw` is the
/// sell side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Deposit,
    Withdraw,
}

impl Direction {
    pub const ALL: [Self; 2] = [Self::Deposit, Self::Withdraw];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdraw => "withdraw",
        }
    }

    pub const fn is_buy(self) -> bool {
        matches!(self, Self::Deposit)
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "deposit" | "buy" => Ok(Self::Deposit),
            "withdraw" | "sell" => Ok(Self::Withdraw),
            other => Err(ValidationError::InvalidDirection {
                value: other.to_owned(),
            }),
        }
    }
}
