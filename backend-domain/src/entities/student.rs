// Student game-state entity
// One independently addressable record per student, keyed by StudentId

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{ClassId, EquipmentSlot, ItemId, StudentId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemVisibility {
    #[default]
    Public,
    Private,
}

/// Catalog item. Copies of it are embedded in a student's equipment at
/// acquisition time; later catalog edits do not reach equipped copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub slot: EquipmentSlot,
    #[serde(default)]
    pub power: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
    #[serde(default)]
    pub visibility: ItemVisibility,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

fn default_pvp_opt_in() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentGameState {
    pub student_id: StudentId,
    pub handle: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pic: Option<String>,
    #[serde(default)]
    pub gold: u64,
    #[serde(default)]
    pub equipment: BTreeMap<EquipmentSlot, Item>,
    #[serde(default = "default_pvp_opt_in")]
    pub pvp_opt_in: bool,
    #[serde(default)]
    pub cooldown_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub class_ids: Vec<ClassId>,
    /// Optimistic-concurrency version, bumped by the store on every commit.
    #[serde(default)]
    pub version: u64,
}

impl StudentGameState {
    pub fn new(student_id: StudentId, handle: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            student_id,
            handle: handle.into(),
            display_name: display_name.into(),
            pic: None,
            gold: 0,
            equipment: BTreeMap::new(),
            pvp_opt_in: true,
            cooldown_until: None,
            class_ids: Vec::new(),
            version: 0,
        }
    }

    /// Sum of power over every equipped item; empty slots contribute nothing.
    pub fn equipped_power(&self) -> u64 {
        self.equipment.values().map(|item| u64::from(item.power)).sum()
    }

    /// Puts a copy of `item` into its slot, returning the previous occupant.
    pub fn equip(&mut self, item: Item) -> Option<Item> {
        self.equipment.insert(item.slot, item)
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Option<Item> {
        self.equipment.remove(&slot)
    }

    pub fn shares_class_with(&self, class_ids: &[ClassId]) -> bool {
        self.class_ids.iter().any(|class_id| class_ids.contains(class_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, slot: EquipmentSlot, power: u32) -> Item {
        Item {
            id: ItemId(id.to_string()),
            name: id.to_string(),
            slot,
            power,
            icon: None,
            effect: None,
            visibility: ItemVisibility::Public,
            owner: None,
        }
    }

    #[test]
    fn power_sums_equipped_items() {
        let mut student = StudentGameState::new(StudentId(1), "ana", "Ana");
        assert_eq!(student.equipped_power(), 0);
        student.equip(item("helm", EquipmentSlot::Head, 4));
        student.equip(item("boots", EquipmentSlot::Shoes, 6));
        assert_eq!(student.equipped_power(), 10);
    }

    #[test]
    fn equip_replaces_slot_occupant() {
        let mut student = StudentGameState::new(StudentId(1), "ana", "Ana");
        assert!(student.equip(item("old", EquipmentSlot::Head, 3)).is_none());
        let previous = student.equip(item("new", EquipmentSlot::Head, 7)).expect("previous helm");
        assert_eq!(previous.id, ItemId("old".to_string()));
        assert_eq!(student.equipped_power(), 7);
        assert_eq!(student.equipment.len(), 1);
    }

    #[test]
    fn missing_opt_in_deserializes_as_enabled() {
        let raw = r#"{"studentId":7,"handle":"bia","displayName":"Bia","gold":12}"#;
        let student: StudentGameState = serde_json::from_str(raw).expect("parse student");
        assert!(student.pvp_opt_in);
        assert!(student.cooldown_until.is_none());
        assert_eq!(student.gold, 12);
    }

    #[test]
    fn negative_gold_is_rejected_at_parse_time() {
        let raw = r#"{"studentId":7,"handle":"bia","displayName":"Bia","gold":-5}"#;
        assert!(serde_json::from_str::<StudentGameState>(raw).is_err());
    }

    #[test]
    fn equipment_round_trips_with_slot_keys() {
        let mut student = StudentGameState::new(StudentId(3), "caio", "Caio");
        student.equip(item("ring", EquipmentSlot::Artifact, 9));
        let json = serde_json::to_value(&student).expect("serialize");
        assert!(json["equipment"]["artifact"].is_object());
        let back: StudentGameState = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back.equipped_power(), 9);
    }
}
