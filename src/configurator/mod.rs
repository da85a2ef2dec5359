//! # Build Configurator
//!
//! Assembles a custom PC one slot at a time from catalog options, optionally guided by an
//! [`Advisor`], and turns the finished draft into a cart line.
//!
//! The configurator never touches the cart. [`BuildConfigurator::materialize`] hands back a
//! [`CustomBuildLine`] and the caller decides what to do with it.
//!
//! ```rust,ignore
//! let mut builder = BuildConfigurator::from_catalog(&catalog, advisor, timeout).await?;
//! builder.select_component(ComponentSlot::Cpu, "Intel Core i5-14400F")?;
//! if let Ok(advice) = builder.request_advisory("gaming", Some(25_000_000)).await {
//!     builder.accept_advisory(ComponentSlot::Gpu)?;
//! }
//! let line = builder.materialize()?;
//! cart.add_custom_build(line).await?;
//! ```

pub mod advisory;

pub use advisory::*;

use crate::catalog_actor::CatalogError;
use crate::clients::CatalogSource;
use crate::model::{
    AdvisoryComponent, BuildDraft, ComponentSlot, CustomBuildLine, LineId, ProductFilter,
    SelectedComponent,
};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("{name:?} is not an option for {slot}")]
    NotAnOption { slot: ComponentSlot, name: String },

    #[error("Build is incomplete, missing: {}", join_slots(.missing))]
    Incomplete { missing: Vec<ComponentSlot> },

    #[error("No recommendation for {0}")]
    NoRecommendation(ComponentSlot),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

fn join_slots(slots: &[ComponentSlot]) -> String {
    slots
        .iter()
        .map(|slot| slot.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Catalog choices per slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotOptions {
    options: BTreeMap<ComponentSlot, Vec<SelectedComponent>>,
}

impl SlotOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, slot: ComponentSlot, component: SelectedComponent) -> Self {
        self.options.entry(slot).or_default().push(component);
        self
    }

    /// In-stock products whose category is the slot's label.
    pub async fn load(catalog: &dyn CatalogSource) -> Result<Self, CatalogError> {
        let mut options = BTreeMap::new();
        for slot in ComponentSlot::ALL {
            let filter = ProductFilter {
                in_stock_only: true,
                ..ProductFilter::category(slot.label())
            };
            let page = catalog.list_products(&filter).await?;
            let components = page
                .products
                .into_iter()
                .map(|p| SelectedComponent::new(p.name, p.price))
                .collect();
            options.insert(slot, components);
        }
        Ok(Self { options })
    }

    pub fn for_slot(&self, slot: ComponentSlot) -> &[SelectedComponent] {
        self.options.get(&slot).map(Vec::as_slice).unwrap_or_default()
    }

    /// Exact name match, ignoring surrounding whitespace and ASCII case.
    pub fn find(&self, slot: ComponentSlot, name: &str) -> Option<&SelectedComponent> {
        let name = name.trim();
        self.for_slot(slot)
            .iter()
            .find(|option| option.name.eq_ignore_ascii_case(name))
    }

    fn names(&self) -> BTreeMap<ComponentSlot, Vec<String>> {
        self.options
            .iter()
            .map(|(slot, options)| (*slot, options.iter().map(|o| o.name.clone()).collect()))
            .collect()
    }
}

/// Sum of the defined slot prices; an undefined price counts as 0.
pub fn compute_total(draft: &BuildDraft) -> u64 {
    draft.total()
}

/// `15900000` → `15.900.000₫`
pub fn format_vnd(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out.push('₫');
    out
}

pub struct BuildConfigurator {
    options: SlotOptions,
    draft: BuildDraft,
    advisor: Arc<dyn Advisor>,
    advisory_timeout: Duration,
    advice: BTreeMap<ComponentSlot, AdvisoryComponent>,
}

impl BuildConfigurator {
    pub fn new(options: SlotOptions, advisor: Arc<dyn Advisor>, advisory_timeout: Duration) -> Self {
        Self {
            options,
            draft: BuildDraft::new(),
            advisor,
            advisory_timeout,
            advice: BTreeMap::new(),
        }
    }

    pub async fn from_catalog(
        catalog: &dyn CatalogSource,
        advisor: Arc<dyn Advisor>,
        advisory_timeout: Duration,
    ) -> Result<Self, BuildError> {
        let options = SlotOptions::load(catalog).await?;
        Ok(Self::new(options, advisor, advisory_timeout))
    }

    pub fn draft(&self) -> &BuildDraft {
        &self.draft
    }

    pub fn options(&self) -> &SlotOptions {
        &self.options
    }

    /// Recommendations from the last successful advisory call.
    pub fn advice(&self) -> &BTreeMap<ComponentSlot, AdvisoryComponent> {
        &self.advice
    }

    pub fn total(&self) -> u64 {
        compute_total(&self.draft)
    }

    /// Sets a slot to one of its catalog options. A blank name clears the slot.
    #[instrument(skip(self))]
    pub fn select_component(
        &mut self,
        slot: ComponentSlot,
        name: &str,
    ) -> Result<&BuildDraft, BuildError> {
        if name.trim().is_empty() {
            self.draft.clear(slot);
            debug!("Slot cleared");
            return Ok(&self.draft);
        }
        let component = self
            .options
            .find(slot, name)
            .cloned()
            .ok_or_else(|| BuildError::NotAnOption {
                slot,
                name: name.to_string(),
            })?;
        self.draft.set(slot, component);
        debug!(total = self.draft.total(), "Slot selected");
        Ok(&self.draft)
    }

    /// Asks the advisor for a recommendation per slot.
    ///
    /// The call is bounded by the configured timeout. Failures leave the draft and any
    /// previous advice untouched.
    #[instrument(skip(self))]
    pub async fn request_advisory(
        &mut self,
        use_case: &str,
        budget: Option<u64>,
    ) -> Result<AdvisoryResult, AdvisoryError> {
        self.draft.use_case = Some(use_case.to_string()).filter(|s| !s.trim().is_empty());
        self.draft.budget = budget;

        let request = AdvisoryRequest {
            use_case: use_case.to_string(),
            budget,
            current_selection: self
                .draft
                .selections()
                .iter()
                .map(|(slot, c)| (*slot, c.name.clone()))
                .collect(),
            options: self.options.names(),
        };

        let result = match tokio::time::timeout(
            self.advisory_timeout,
            self.advisor.recommend_build(&request),
        )
        .await
        {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                warn!(error = %e, "Advisory failed");
                return Err(e);
            }
            Err(_) => {
                warn!(timeout_secs = self.advisory_timeout.as_secs(), "Advisory timed out");
                return Err(AdvisoryError::Timeout(self.advisory_timeout.as_secs()));
            }
        };

        info!(slots = result.recommendations.len(), "Advisory received");
        self.advice = result.recommendations.clone();
        Ok(result)
    }

    /// Applies the advisor's pick for `slot`, provided the catalog still offers it.
    #[instrument(skip(self))]
    pub fn accept_advisory(&mut self, slot: ComponentSlot) -> Result<&BuildDraft, BuildError> {
        let name = self
            .advice
            .get(&slot)
            .map(|advice| advice.name.clone())
            .ok_or(BuildError::NoRecommendation(slot))?;
        self.select_component(slot, &name)
    }

    /// Accepts every recommendation that names a catalog option; returns the slots that
    /// were skipped.
    pub fn accept_all_advisory(&mut self) -> Vec<ComponentSlot> {
        let slots: Vec<ComponentSlot> = self.advice.keys().copied().collect();
        slots
            .into_iter()
            .filter(|slot| self.accept_advisory(*slot).is_err())
            .collect()
    }

    /// Freezes a complete draft into a cart line with a fresh identity.
    #[instrument(skip(self))]
    pub fn materialize(&self) -> Result<CustomBuildLine, BuildError> {
        let missing = self.draft.missing_slots();
        if !missing.is_empty() {
            return Err(BuildError::Incomplete { missing });
        }

        let created_at = Utc::now();
        let id = LineId(format!(
            "custom-build-{}-{}",
            created_at.timestamp_millis(),
            Uuid::new_v4().simple()
        ));
        let price = self.draft.total();
        let use_case = self.draft.use_case.clone();
        let name = match &use_case {
            Some(use_case) => format!("Custom PC ({use_case}) - {}", format_vnd(price)),
            None => format!("Custom PC - {}", format_vnd(price)),
        };

        info!(line_id = %id, price, "Build materialized");
        Ok(CustomBuildLine {
            id,
            name,
            price,
            quantity: 1,
            build_components: self.draft.selections().clone(),
            use_case,
            created_at,
        })
    }

    /// Loads a saved build back for editing.
    ///
    /// Components the catalog no longer offers are kept as foreign selections with their
    /// saved price.
    #[instrument(skip(self, line), fields(line_id = %line.id))]
    pub fn reload(&mut self, line: &CustomBuildLine) -> &BuildDraft {
        let mut draft = BuildDraft::new();
        for (slot, component) in &line.build_components {
            if self.options.find(*slot, &component.name).is_some() {
                draft.set(*slot, component.clone());
            } else {
                debug!(%slot, name = %component.name, "Keeping foreign selection");
                draft.set_foreign(*slot, component.clone());
            }
        }
        draft.use_case = line.use_case.clone();
        self.draft = draft;
        self.advice.clear();
        &self.draft
    }

    /// Starts over with an empty draft.
    pub fn reset(&mut self) {
        self.draft = BuildDraft::new();
        self.advice.clear();
    }
}
