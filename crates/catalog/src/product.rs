use std::fmt;

use chrono::NaiveDate;

use crate::error::ProductError;

pub const MIN_DESCRIPTION_LEN: usize = 3;
pub const MIN_MARGIN: f64 = 0.1;
pub const MAX_MARGIN: f64 = 0.5;
/// Discount applied to perishables close to their expiry date.
pub const EXPIRY_DISCOUNT: f64 = 0.25;
pub const EXPIRY_DISCOUNT_DAYS: i64 = 7;

const DATE_FORMAT: &str = "%d/%m/%Y";

/// Sequential identifiers, starting at 10001.
#[derive(Debug, Clone)]
pub struct IdSequence {
    next: u32,
}

impl Default for IdSequence {
    fn default() -> Self {
        Self { next: 10_001 }
    }
}

impl IdSequence {
    pub fn issue(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductKind {
    NonPerishable,
    Perishable { expiry: NaiveDate },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: u32,
    description: String,
    cost: f64,
    margin: f64,
    kind: ProductKind,
}

impl Product {
    pub fn new(
        id: u32,
        description: &str,
        cost: f64,
        margin: f64,
        kind: ProductKind,
    ) -> Result<Self, ProductError> {
        let description = description.trim();
        if description.chars().count() < MIN_DESCRIPTION_LEN {
            return Err(ProductError::ShortDescription);
        }
        if !(cost.is_finite() && cost > 0.0) {
            return Err(ProductError::InvalidCost(cost.to_string()));
        }
        if !(MIN_MARGIN..=MAX_MARGIN).contains(&margin) {
            return Err(ProductError::MarginOutOfRange(margin));
        }
        Ok(Self {
            id,
            description: description.to_string(),
            cost,
            margin,
            kind,
        })
    }

    /// Parses `kind;description;cost;margin[;expiry]`.
    ///
    /// Kind `1` is non-perishable, `2` perishable with a `dd/mm/yyyy`
    /// expiry. Decimal commas are accepted.
    pub fn parse(line: &str, id: u32) -> Result<Self, ProductError> {
        let fields: Vec<&str> = line.trim().split(';').map(str::trim).collect();
        if !(4..=5).contains(&fields.len()) {
            return Err(ProductError::FieldCount(fields.len()));
        }

        let cost =
            parse_decimal(fields[2]).ok_or_else(|| ProductError::InvalidCost(fields[2].into()))?;
        let margin =
            parse_decimal(fields[3]).ok_or_else(|| ProductError::InvalidMargin(fields[3].into()))?;
        let kind = match fields[0] {
            "1" => ProductKind::NonPerishable,
            "2" => {
                let raw = fields
                    .get(4)
                    .filter(|s| !s.is_empty())
                    .ok_or(ProductError::MissingExpiry)?;
                let expiry = NaiveDate::parse_from_str(raw, DATE_FORMAT)
                    .map_err(|_| ProductError::InvalidExpiry(raw.to_string()))?;
                ProductKind::Perishable { expiry }
            }
            other => return Err(ProductError::UnknownKind(other.to_string())),
        };
        Self::new(id, fields[1], cost, margin, kind)
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    pub fn kind(&self) -> ProductKind {
        self.kind
    }

    pub fn expiry(&self) -> Option<NaiveDate> {
        match self.kind {
            ProductKind::NonPerishable => None,
            ProductKind::Perishable { expiry } => Some(expiry),
        }
    }

    /// Cost plus margin, before any expiry discount.
    pub fn base_price(&self) -> f64 {
        self.cost * (1.0 + self.margin)
    }

    /// Sale price on `today`; `None` once a perishable has expired.
    pub fn price_on(&self, today: NaiveDate) -> Option<f64> {
        let Some(expiry) = self.expiry() else {
            return Some(self.base_price());
        };
        let days_left = (expiry - today).num_days();
        if days_left < 0 {
            None
        } else if days_left <= EXPIRY_DISCOUNT_DAYS {
            Some(self.base_price() * (1.0 - EXPIRY_DISCOUNT))
        } else {
            Some(self.base_price())
        }
    }
}

fn parse_decimal(raw: &str) -> Option<f64> {
    raw.replace(',', ".").parse().ok()
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}: $ {:.2}", self.id, self.description, self.base_price())?;
        if let Some(expiry) = self.expiry() {
            write!(f, " (expires {})", expiry.format(DATE_FORMAT))?;
        }
        Ok(())
    }
}
