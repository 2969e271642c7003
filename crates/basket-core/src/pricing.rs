//! # Pricing Calculator
//!
//! Pure functions that derive every number shown for a basket. Nothing here
//! is stored; totals are recomputed from the basket on each request.
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  lines ──┬── discounted ─────► line totals (own %) ─────┐               │
//! │          │                                              │               │
//! │          └── not discounted ─► sum ─► basket code %? ───┼──► subtotal   │
//! │                                                         │               │
//! │  subtotal + shipping ──────────────────────────────► total_without_vat  │
//! │  total_without_vat × VAT ──────────────────────────► vat_amount         │
//! │  total_without_vat + vat_amount ───────────────────► total_with_vat     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A basket-level code never stacks with a per-line discount: lines that
//! carry their own percentage are summed as-is.
//!
//! Every step is checked. An amount that leaves the decimal range is an
//! error, never a panic.

use crate::discount::DiscountCodes;
use crate::error::{CoreError, CoreResult};
use crate::money::{Money, Percentage};
use crate::types::{Basket, BasketTotal, VatRate};

/// Total for one line: `price × quantity`, less the line's own percentage.
/// `None` when `price × quantity` overflows.
///
/// ## Example
/// ```rust
/// use basket_core::money::{Money, Percentage};
/// use basket_core::pricing::line_total;
///
/// let total = line_total(Money::from_pennies(3000), 2, Percentage::new(10));
/// assert_eq!(total, Some(Money::from_pennies(5400)));
/// ```
pub fn line_total(price: Money, quantity: u32, discount: Option<Percentage>) -> Option<Money> {
    let base = price.multiply_quantity(quantity)?;
    Some(match discount {
        Some(pct) => base.apply_percentage_discount(pct),
        None => base,
    })
}

/// Subtotal after per-line discounts and the basket-level code.
///
/// The code is applied only when it resolves in `codes`; a stored code that
/// no longer resolves is ignored.
pub fn subtotal(basket: &Basket, codes: &dyn DiscountCodes) -> CoreResult<Money> {
    let (discounted, plain): (Vec<_>, Vec<_>) =
        basket.items.iter().partition(|line| line.is_discounted());

    let discounted_sum = sum_lines(basket, discounted.iter().map(|line| line.total_price()))?;
    let plain_sum = sum_lines(basket, plain.iter().map(|line| line.total_price()))?;

    let plain_sum = match basket
        .discount_code
        .as_deref()
        .and_then(|code| codes.resolve(code))
    {
        Some(pct) => plain_sum.apply_percentage_discount(pct),
        None => plain_sum,
    };

    discounted_sum
        .checked_add(plain_sum)
        .ok_or_else(|| total_overflow(basket))
}

/// Full totals for a basket.
///
/// ## Example
/// ```rust
/// use basket_core::{Basket, StaticDiscountCodes, VatRate, Money};
/// use basket_core::pricing::calculate_totals;
///
/// let totals = calculate_totals(&Basket::new(), &StaticDiscountCodes::default(), VatRate::STANDARD)
///     .unwrap();
/// assert_eq!(totals.total_with_vat, Money::zero());
/// ```
pub fn calculate_totals(
    basket: &Basket,
    codes: &dyn DiscountCodes,
    vat_rate: VatRate,
) -> CoreResult<BasketTotal> {
    let sub_total = subtotal(basket, codes)?;
    let shipping_cost = basket.shipping_cost();

    let total_without_vat = sub_total
        .checked_add(shipping_cost)
        .ok_or_else(|| total_overflow(basket))?;
    let vat_amount = total_without_vat
        .calculate_tax(vat_rate)
        .ok_or_else(|| total_overflow(basket))?;
    let total_with_vat = total_without_vat
        .checked_add(vat_amount)
        .ok_or_else(|| total_overflow(basket))?;

    Ok(BasketTotal {
        basket_id: basket.id,
        sub_total,
        shipping_cost,
        vat_amount,
        total_with_vat,
        total_without_vat,
        total_items: basket.total_items(),
    })
}

/// Largest total a basket could reach: every line undiscounted, shipping
/// included, and VAT at [`VatRate::MAX`].
///
/// Discounts only lower a line, so a basket whose ceiling fits can always be
/// totalled under any code table and any accepted VAT rate.
pub fn total_ceiling(basket: &Basket) -> CoreResult<Money> {
    let mut gross = basket.shipping_cost();
    for line in &basket.items {
        let base = line.item.price.multiply_quantity(line.quantity).ok_or_else(|| {
            CoreError::QuantityOverflow {
                item_id: line.item.id.to_string(),
            }
        })?;
        gross = gross.checked_add(base).ok_or_else(|| total_overflow(basket))?;
    }

    gross
        .calculate_tax(VatRate::MAX)
        .and_then(|vat| gross.checked_add(vat))
        .ok_or_else(|| total_overflow(basket))
}

fn sum_lines<I>(basket: &Basket, mut totals: I) -> CoreResult<Money>
where
    I: Iterator<Item = CoreResult<Money>>,
{
    totals.try_fold(Money::zero(), |acc, line| {
        acc.checked_add(line?).ok_or_else(|| total_overflow(basket))
    })
}

fn total_overflow(basket: &Basket) -> CoreError {
    CoreError::TotalOverflow {
        basket_id: basket.id.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
