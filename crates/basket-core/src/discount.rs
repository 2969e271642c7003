//! # Discount Codes
//!
//! Basket-level promotional codes and the table that resolves them.
//!
//! ```text
//! "save10 " ──► normalize ──► "SAVE10" ──► table ──► Some(10%)
//! "BOGUS"   ──► normalize ──► "BOGUS"  ──► table ──► None
//! ""        ──► normalize ──► blank    ──────────────► None
//! ```
//!
//! The table is a trait so handlers receive it as `Arc<dyn DiscountCodes>`
//! and tests can inject their own.

use crate::money::Percentage;

/// The default code table.
const DEFAULT_CODES: &[(&str, u8)] = &[
    ("SAVE10", 10),
    ("SAVE15", 15),
    ("SAVE20", 20),
    ("SAVE25", 25),
    ("WINTER10", 10),
    ("WINTER15", 15),
    ("WINTER20", 20),
    ("STUDENT10", 10),
    ("STUDENT15", 15),
    ("NEWUSER10", 10),
    ("NEWUSER20", 20),
    ("LOYALTY10", 10),
    ("LOYALTY15", 15),
    ("VIP25", 25),
    ("VIP30", 30),
];

/// Canonical form of a code: trimmed and upper-cased. `None` when blank.
pub fn normalize_code(code: &str) -> Option<String> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

// =============================================================================
// DiscountCodes Trait
// =============================================================================

/// Lookup from a discount code to the percentage it grants.
///
/// Implementations are stateless lookups and must be safe to share across
/// tasks.
pub trait DiscountCodes: Send + Sync {
    /// Resolves a code, case-insensitively. Blank and unknown codes give `None`.
    fn resolve(&self, code: &str) -> Option<Percentage>;

    /// Whether the code resolves.
    fn is_valid(&self, code: &str) -> bool {
        self.resolve(code).is_some()
    }

    /// Every `(code, percentage)` pair in the table.
    fn codes(&self) -> Vec<(String, Percentage)>;
}

// =============================================================================
// Static Table
// =============================================================================

/// In-memory code table. [`Default`] yields the built-in promotional codes.
#[derive(Debug, Clone)]
pub struct StaticDiscountCodes {
    entries: Vec<(String, Percentage)>,
}

impl StaticDiscountCodes {
    /// Builds a table from arbitrary pairs. Codes are normalized; blank codes
    /// are skipped.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Percentage)>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .filter_map(|(code, pct)| normalize_code(code.as_ref()).map(|c| (c, pct)))
            .collect();
        StaticDiscountCodes { entries }
    }

    /// A table with no codes.
    pub fn empty() -> Self {
        StaticDiscountCodes {
            entries: Vec::new(),
        }
    }
}

impl Default for StaticDiscountCodes {
    fn default() -> Self {
        StaticDiscountCodes::new(
            DEFAULT_CODES
                .iter()
                .filter_map(|(code, pct)| Percentage::new(*pct).map(|p| (*code, p))),
        )
    }
}

impl DiscountCodes for StaticDiscountCodes {
    fn resolve(&self, code: &str) -> Option<Percentage> {
        let code = normalize_code(code)?;
        self.entries
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, pct)| *pct)
    }

    fn codes(&self) -> Vec<(String, Percentage)> {
        self.entries.clone()
    }
}
