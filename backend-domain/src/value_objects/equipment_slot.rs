// Equipment slot value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentSlot {
    Head,
    Shirt,
    Pants,
    Shoes,
    Artifact,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown equipment slot '{0}'")]
pub struct UnknownSlot(pub String);

impl EquipmentSlot {
    pub const ALL: [EquipmentSlot; 5] = [
        EquipmentSlot::Head,
        EquipmentSlot::Shirt,
        EquipmentSlot::Pants,
        EquipmentSlot::Shoes,
        EquipmentSlot::Artifact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentSlot::Head => "head",
            EquipmentSlot::Shirt => "shirt",
            EquipmentSlot::Pants => "pants",
            EquipmentSlot::Shoes => "shoes",
            EquipmentSlot::Artifact => "artifact",
        }
    }
}

impl fmt::Display for EquipmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EquipmentSlot {
    type Err = UnknownSlot;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "head" => Ok(EquipmentSlot::Head),
            "shirt" => Ok(EquipmentSlot::Shirt),
            "pants" => Ok(EquipmentSlot::Pants),
            "shoes" => Ok(EquipmentSlot::Shoes),
            "artifact" => Ok(EquipmentSlot::Artifact),
            other => Err(UnknownSlot(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Head".parse::<EquipmentSlot>(), Ok(EquipmentSlot::Head));
        assert_eq!(" artifact ".parse::<EquipmentSlot>(), Ok(EquipmentSlot::Artifact));
        assert!("cape".parse::<EquipmentSlot>().is_err());
    }

    #[test]
    fn as_str_matches_serde_name() {
        for slot in EquipmentSlot::ALL {
            let json = serde_json::to_string(&slot).expect("serialize slot");
            assert_eq!(json, format!("\"{}\"", slot.as_str()));
        }
    }
}
