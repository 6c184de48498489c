use serde::Deserialize;

/// Marker the POS puts in item names of double-sided jobs.
pub const DOUBLE_SIDED_MARKER: &str = "2 SIDES";

/// One row of the page-multiplier table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageRule {
    /// Case-insensitive substring looked for in the item name.
    pub marker: String,
    pub multiplier: f64,
}

impl PageRule {
    pub fn new(marker: impl Into<String>, multiplier: f64) -> Self {
        Self {
            marker: marker.into(),
            multiplier,
        }
    }

    fn matches(&self, item_upper: &str) -> bool {
        item_upper.contains(&self.marker.to_uppercase())
    }
}

/// Ordered page-multiplier table. The first rule whose marker appears in the
/// item name decides the multiplier; an item matching no rule counts 1 page
/// per unit sold.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRules {
    rules: Vec<PageRule>,
}

impl Default for PageRules {
    fn default() -> Self {
        Self {
            rules: vec![PageRule::new(DOUBLE_SIDED_MARKER, 2.0)],
        }
    }
}

impl PageRules {
    pub fn new(rules: Vec<PageRule>) -> Self {
        Self { rules }
    }

    /// No multipliers at all: expected pages equal the sold quantity.
    pub fn none() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn rules(&self) -> &[PageRule] {
        &self.rules
    }

    pub fn multiplier_for(&self, item_name: &str) -> f64 {
        let item_upper = item_name.to_uppercase();
        self.rules
            .iter()
            .find(|r| r.matches(&item_upper))
            .map(|r| r.multiplier)
            .unwrap_or(1.0)
    }

    /// Physical pages a sales line should have consumed.
    pub fn expected_pages(&self, sales_qty: f64, item_name: &str) -> f64 {
        if sales_qty == 0.0 {
            return 0.0;
        }
        sales_qty * self.multiplier_for(item_name)
    }
}
