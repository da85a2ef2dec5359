//! PC build drafts: seven component slots and what is selected in each.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

/// One of the seven parts every custom build needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentSlot {
    #[serde(rename = "CPU")]
    Cpu,
    Motherboard,
    #[serde(rename = "RAM")]
    Ram,
    #[serde(rename = "GPU")]
    Gpu,
    #[serde(rename = "SSD")]
    Ssd,
    #[serde(rename = "PSU")]
    Psu,
    Case,
}

impl ComponentSlot {
    /// Display order.
    pub const ALL: [ComponentSlot; 7] = [
        ComponentSlot::Cpu,
        ComponentSlot::Motherboard,
        ComponentSlot::Ram,
        ComponentSlot::Gpu,
        ComponentSlot::Ssd,
        ComponentSlot::Psu,
        ComponentSlot::Case,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ComponentSlot::Cpu => "CPU",
            ComponentSlot::Motherboard => "Motherboard",
            ComponentSlot::Ram => "RAM",
            ComponentSlot::Gpu => "GPU",
            ComponentSlot::Ssd => "SSD",
            ComponentSlot::Psu => "PSU",
            ComponentSlot::Case => "Case",
        }
    }

    /// Accepts the label in any case, e.g. `"gpu"`.
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|slot| slot.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl Display for ComponentSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// What the buyer put in a slot. A missing price counts as 0 in totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedComponent {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u64>,
}

impl SelectedComponent {
    pub fn new(name: impl Into<String>, price: u64) -> Self {
        Self {
            name: name.into(),
            price: Some(price),
        }
    }
}

/// A recommendation from the advisor. Not a selection until accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryComponent {
    pub name: String,
    #[serde(default)]
    pub reasoning: String,
}

/// An in-progress build.
///
/// Slots are only filled through the configurator, which checks names against the catalog.
/// Selections restored from a saved build whose names are no longer offered are kept and
/// marked foreign.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildDraft {
    selections: BTreeMap<ComponentSlot, SelectedComponent>,
    #[serde(default)]
    foreign: BTreeSet<ComponentSlot>,
    #[serde(default)]
    pub use_case: Option<String>,
    #[serde(default)]
    pub budget: Option<u64>,
}

impl BuildDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: ComponentSlot) -> Option<&SelectedComponent> {
        self.selections.get(&slot)
    }

    pub fn selections(&self) -> &BTreeMap<ComponentSlot, SelectedComponent> {
        &self.selections
    }

    pub fn is_foreign(&self, slot: ComponentSlot) -> bool {
        self.foreign.contains(&slot)
    }

    /// Sum of defined slot prices. Recomputed on every call.
    pub fn total(&self) -> u64 {
        self.selections
            .values()
            .filter_map(|c| c.price)
            .fold(0, u64::saturating_add)
    }

    /// Empty slots in display order.
    pub fn missing_slots(&self) -> Vec<ComponentSlot> {
        ComponentSlot::ALL
            .into_iter()
            .filter(|slot| !self.selections.contains_key(slot))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.selections.len() == ComponentSlot::ALL.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub(crate) fn set(&mut self, slot: ComponentSlot, component: SelectedComponent) {
        self.foreign.remove(&slot);
        self.selections.insert(slot, component);
    }

    pub(crate) fn set_foreign(&mut self, slot: ComponentSlot, component: SelectedComponent) {
        self.foreign.insert(slot);
        self.selections.insert(slot, component);
    }

    pub(crate) fn clear(&mut self, slot: ComponentSlot) {
        self.foreign.remove(&slot);
        self.selections.remove(&slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_skips_undefined_prices() {
        let mut draft = BuildDraft::new();
        draft.set(ComponentSlot::Cpu, SelectedComponent::new("Ryzen 5 7600", 5_290_000));
        draft.set(
            ComponentSlot::Case,
            SelectedComponent {
                name: "Mystery case".into(),
                price: None,
            },
        );
        assert_eq!(draft.total(), 5_290_000);
        assert_eq!(draft.total(), draft.total());
    }

    #[test]
    fn test_missing_slots_in_display_order() {
        let mut draft = BuildDraft::new();
        draft.set(ComponentSlot::Ram, SelectedComponent::new("32GB DDR5", 2_500_000));
        draft.set(ComponentSlot::Cpu, SelectedComponent::new("i5-14400F", 4_690_000));
        assert_eq!(
            draft.missing_slots(),
            vec![
                ComponentSlot::Motherboard,
                ComponentSlot::Gpu,
                ComponentSlot::Ssd,
                ComponentSlot::Psu,
                ComponentSlot::Case,
            ]
        );
        assert!(!draft.is_complete());
    }

    #[test]
    fn test_slot_labels_round_trip() {
        for slot in ComponentSlot::ALL {
            assert_eq!(ComponentSlot::parse(slot.label()), Some(slot));
            assert_eq!(
                serde_json::to_string(&slot).unwrap(),
                format!("\"{}\"", slot.label())
            );
        }
        assert_eq!(ComponentSlot::parse(" gpu "), Some(ComponentSlot::Gpu));
        assert_eq!(ComponentSlot::parse("Fan"), None);
    }

    #[test]
    fn test_manual_selection_clears_foreign_mark() {
        let mut draft = BuildDraft::new();
        draft.set_foreign(ComponentSlot::Gpu, SelectedComponent::new("GTX 970", 1_000_000));
        assert!(draft.is_foreign(ComponentSlot::Gpu));
        draft.set(ComponentSlot::Gpu, SelectedComponent::new("RTX 4060", 7_990_000));
        assert!(!draft.is_foreign(ComponentSlot::Gpu));
    }
}
