//! Exchange Rate Rules with Macro-Based Currency Definitions
//!
//! This library holds the pricing rules of the rate board: which currencies
//! are quoted, how purchase and selling rates are derived from the official
//! NBP mid rate, and how a multiplier between two quotes is computed.
//! Currencies are declared with a macro that generates the `CurrencyCode`
//! enum and all of its metadata lookups.
//!
//! # Adding a New Currency
//! Add a line to the `define_currencies!` invocation, picking its markup:
//! ```ignore
//! define_currencies! {
//!     base PLN => ("PLN", "polski złoty");
//!     // ... existing currencies ...
//!     HUF => ("HUF", "forint (Węgry)", SellOnly),
//! }
//! ```
//!
//! # Example
//! ```
//! use exchange_rates::{Operation, RateQuote, derive_rates};
//! use rust_decimal_macros::dec;
//!
//! let quote = derive_rates("USD", dec!(4.00)).unwrap();
//! assert_eq!(quote.purchase, Some(dec!(3.95)));
//! assert_eq!(quote.selling, dec!(4.07));
//!
//! // 1 USD sold for PLN
//! let pln = RateQuote::unit();
//! let multiplier = exchange_rates::cross_rate(&quote, &pln, Operation::Sell).unwrap();
//! assert_eq!(exchange_rates::convert(dec!(10), multiplier), Some(dec!(40.70)));
//! ```

mod conversion;

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

pub use conversion::{AMOUNT_SCALE, MULTIPLIER_SCALE, convert, cross_rate, round_amount};

// ─────────────────────────────────────────────────────────────────────────────
// Markups
// ─────────────────────────────────────────────────────────────────────────────

/// Subtracted from the mid rate for currencies bought from customers.
pub const PURCHASE_MARKUP: Decimal = dec!(0.05);

/// Added to the mid rate for currencies that are both bought and sold.
pub const SELLING_MARKUP: Decimal = dec!(0.07);

/// Added to the mid rate for currencies that are only sold.
pub const DEFAULT_SELLING_MARKUP: Decimal = dec!(0.15);

/// How purchase and selling rates are derived from a mid rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Markup {
    /// Quoted both ways: `mid - 0.05` to buy, `mid + 0.07` to sell.
    Spread,
    /// Only sold to customers: `mid + 0.15`, no purchase rate.
    SellOnly,
}

impl Markup {
    /// Applies the markup to an official mid rate.
    pub fn apply(self, mid: Decimal) -> RateQuote {
        match self {
            Markup::Spread => RateQuote {
                nbp: mid,
                purchase: Some(mid - PURCHASE_MARKUP),
                selling: mid + SELLING_MARKUP,
            },
            Markup::SellOnly => RateQuote {
                nbp: mid,
                purchase: None,
                selling: mid + DEFAULT_SELLING_MARKUP,
            },
        }
    }

    pub fn supports_purchase(self) -> bool {
        matches!(self, Markup::Spread)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Quotes
// ─────────────────────────────────────────────────────────────────────────────

/// Derived rates of one currency against PLN.
///
/// Values are kept exact; rounding happens only when they are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RateQuote {
    /// Official NBP mid rate
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 4.0)]
    pub nbp: Decimal,
    /// Rate at which the currency is bought from a customer
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>, example = 3.95)]
    pub purchase: Option<Decimal>,
    /// Rate at which the currency is sold to a customer
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 4.07)]
    pub selling: Decimal,
}

impl RateQuote {
    /// Quote of the base currency against itself.
    pub fn unit() -> Self {
        Self {
            nbp: Decimal::ONE,
            purchase: Some(Decimal::ONE),
            selling: Decimal::ONE,
        }
    }

    /// Rate used for the given operation, if the currency is quoted for it.
    pub fn for_operation(&self, operation: Operation) -> Option<Decimal> {
        match operation {
            Operation::Buy => self.purchase,
            Operation::Sell => Some(self.selling),
        }
    }

    pub fn supports(&self, operation: Operation) -> bool {
        self.for_operation(operation).is_some()
    }
}

/// Side of a simulated exchange.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Uses purchase rates.
    Buy,
    /// Uses selling rates.
    #[default]
    Sell,
}

impl Operation {
    pub fn all() -> &'static [Operation] {
        &[Operation::Buy, Operation::Sell]
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Buy => write!(f, "buy"),
            Operation::Sell => write!(f, "sell"),
        }
    }
}

impl FromStr for Operation {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "buy" => Ok(Operation::Buy),
            "sell" => Ok(Operation::Sell),
            _ => Err(format!("Unknown operation: {} (expected buy or sell)", s)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateError {
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("Invalid rate for {code}: {mid}")]
    InvalidRate { code: CurrencyCode, mid: Decimal },
}

// ─────────────────────────────────────────────────────────────────────────────
// THE MACRO: Defines all currencies, CurrencyCode enum, and metadata lookups
// ─────────────────────────────────────────────────────────────────────────────

/// Macro to define the base currency and the quoted currencies.
///
/// # Syntax
/// ```ignore
/// define_currencies! {
///     base BASE => ("CODE", "display name");
///     Name => ("CODE", "display name", Spread | SellOnly),
/// }
/// ```
/// Quoted currencies keep their declaration order everywhere they are listed.
#[macro_export]
macro_rules! define_currencies {
    (
        base $base:ident => ($base_code:literal, $base_display:literal);
        $(
            $name:ident => ($code:literal, $display:literal, $markup:ident)
        ),* $(,)?
    ) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize, utoipa::ToSchema,
        )]
        #[serde(rename_all = "UPPERCASE")]
        pub enum CurrencyCode {
            $base,
            $($name),*
        }

        impl CurrencyCode {
            /// The unit currency every rate is expressed in.
            pub const BASE: CurrencyCode = CurrencyCode::$base;

            pub fn code(&self) -> &'static str {
                match self {
                    CurrencyCode::$base => $base_code,
                    $(CurrencyCode::$name => $code),*
                }
            }

            /// Polish display name, as published by NBP.
            pub fn display_name(&self) -> &'static str {
                match self {
                    CurrencyCode::$base => $base_display,
                    $(CurrencyCode::$name => $display),*
                }
            }

            /// Markup applied to this currency; `None` for the base.
            pub fn markup(&self) -> Option<Markup> {
                match self {
                    CurrencyCode::$base => None,
                    $(CurrencyCode::$name => Some(Markup::$markup)),*
                }
            }

            pub fn is_base(&self) -> bool {
                *self == Self::BASE
            }

            /// Quoted currencies, in declaration order.
            pub fn supported() -> &'static [CurrencyCode] {
                &[$(CurrencyCode::$name),*]
            }

            /// Quoted currencies that are also bought from customers.
            pub fn purchase_supported() -> Vec<CurrencyCode> {
                Self::supported()
                    .iter()
                    .copied()
                    .filter(|c| c.markup().is_some_and(Markup::supports_purchase))
                    .collect()
            }

            /// Every known code, base first.
            pub fn all() -> &'static [CurrencyCode] {
                &[CurrencyCode::$base, $(CurrencyCode::$name),*]
            }
        }

        impl std::fmt::Display for CurrencyCode {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.code())
            }
        }

        impl std::str::FromStr for CurrencyCode {
            type Err = RateError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_uppercase().as_str() {
                    $base_code => Ok(CurrencyCode::$base),
                    $($code => Ok(CurrencyCode::$name),)*
                    _ => Err(RateError::UnsupportedCurrency(s.to_string())),
                }
            }
        }
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// CURRENCY DEFINITIONS - Add new currencies here!
// ─────────────────────────────────────────────────────────────────────────────

define_currencies! {
    base PLN => ("PLN", "polski złoty");
    EUR => ("EUR", "euro", Spread),
    USD => ("USD", "dolar amerykański", Spread),
    CZK => ("CZK", "korona czeska", SellOnly),
    IDR => ("IDR", "rupia indonezyjska", SellOnly),
    BRL => ("BRL", "real (Brazylia)", SellOnly),
}

impl CurrencyCode {
    /// Derives the purchase and selling rates from an official mid rate.
    pub fn derive(self, mid: Decimal) -> Result<RateQuote, RateError> {
        let markup = self
            .markup()
            .ok_or_else(|| RateError::UnsupportedCurrency(self.code().to_string()))?;
        if mid <= Decimal::ZERO {
            return Err(RateError::InvalidRate { code: self, mid });
        }
        Ok(markup.apply(mid))
    }
}

/// Derives rates for a currency given by its code.
pub fn derive_rates(code: &str, mid: Decimal) -> Result<RateQuote, RateError> {
    code.parse::<CurrencyCode>()?.derive(mid)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
