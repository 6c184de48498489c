use serde::Deserialize;

use crate::error::ReconError;
use crate::finance::{CostRule, CostRules};
use crate::pages::{PageRule, PageRules, DOUBLE_SIDED_MARKER};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Audit run configuration. Every section is optional; an empty file (or no
/// file at all) audits the stock POS / printer exports.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub sales: SalesConfig,
    #[serde(default)]
    pub production: ProductionConfig,
    /// Omitted → the stock double-sided rule. `page_rules = []` compares raw
    /// quantities against printed pages.
    #[serde(default = "default_page_rules")]
    pub page_rules: Vec<PageRule>,
    #[serde(default)]
    pub cost_rules: Vec<CostRule>,
    #[serde(default)]
    pub dates: DateConfig,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            sales: SalesConfig::default(),
            production: ProductionConfig::default(),
            page_rules: default_page_rules(),
            cost_rules: Vec::new(),
            dates: DateConfig::default(),
        }
    }
}

fn default_name() -> String {
    "Print audit".into()
}

fn default_page_rules() -> Vec<PageRule> {
    vec![PageRule::new(DOUBLE_SIDED_MARKER, 2.0)]
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SalesConfig {
    #[serde(default)]
    pub columns: SalesColumns,
}

/// Header names in the POS sales export.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SalesColumns {
    pub invoice_ref: String,
    pub customer_name: String,
    pub item_name: String,
    pub sales_qty: String,
    pub total_amount: String,
    pub sales_date: String,
}

impl Default for SalesColumns {
    fn default() -> Self {
        Self {
            invoice_ref: "Invoice No.".into(),
            customer_name: "Customer Name".into(),
            item_name: "Item Name".into(),
            sales_qty: "Sales Qty".into(),
            total_amount: "Total".into(),
            sales_date: "Sales Date".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductionConfig {
    #[serde(default)]
    pub columns: ProductionColumns,
}

/// Header names in the printer's job log.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProductionColumns {
    pub job_name: String,
    pub owner: String,
    pub printed_pages: String,
}

impl Default for ProductionColumns {
    fn default() -> Self {
        Self {
            job_name: "Job Name".into(),
            owner: "Owner".into(),
            printed_pages: "Printed Pages".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// chrono formats tried in order on the sales date column. Day-first forms
/// come before ISO since the POS exports dates day-first.
#[derive(Debug, Clone, Deserialize)]
pub struct DateConfig {
    #[serde(default = "default_date_formats")]
    pub formats: Vec<String>,
}

impl Default for DateConfig {
    fn default() -> Self {
        Self {
            formats: default_date_formats(),
        }
    }
}

fn default_date_formats() -> Vec<String> {
    ["%d/%m/%Y", "%d-%m-%Y", "%d/%m/%Y %H:%M", "%Y-%m-%d", "%d.%m.%Y"]
        .iter()
        .map(|f| f.to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl AuditConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: AuditConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let s = &self.sales.columns;
        let p = &self.production.columns;
        let columns = [
            ("sales.columns.invoice_ref", &s.invoice_ref),
            ("sales.columns.customer_name", &s.customer_name),
            ("sales.columns.item_name", &s.item_name),
            ("sales.columns.sales_qty", &s.sales_qty),
            ("sales.columns.total_amount", &s.total_amount),
            ("sales.columns.sales_date", &s.sales_date),
            ("production.columns.job_name", &p.job_name),
            ("production.columns.owner", &p.owner),
            ("production.columns.printed_pages", &p.printed_pages),
        ];
        for (key, value) in columns {
            if value.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!("{key} must not be empty")));
            }
        }

        for (i, rule) in self.page_rules.iter().enumerate() {
            if rule.marker.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "page_rules[{i}]: marker must not be empty"
                )));
            }
            if !rule.multiplier.is_finite() || rule.multiplier <= 0.0 {
                return Err(ReconError::ConfigValidation(format!(
                    "page_rules[{i}] ('{}'): multiplier must be > 0, got {}",
                    rule.marker, rule.multiplier
                )));
            }
        }

        for (i, rule) in self.cost_rules.iter().enumerate() {
            if rule.pattern.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "cost_rules[{i}]: pattern must not be empty"
                )));
            }
            if !rule.unit_cost.is_finite() || rule.unit_cost < 0.0 {
                return Err(ReconError::ConfigValidation(format!(
                    "cost_rules[{i}] ('{}'): unit_cost must be >= 0, got {}",
                    rule.pattern, rule.unit_cost
                )));
            }
        }

        if self.dates.formats.is_empty() {
            return Err(ReconError::ConfigValidation(
                "dates.formats needs at least one format".into(),
            ));
        }

        Ok(())
    }

    pub fn page_rules(&self) -> PageRules {
        PageRules::new(self.page_rules.clone())
    }

    pub fn cost_rules(&self) -> CostRules {
        CostRules::new(self.cost_rules.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
