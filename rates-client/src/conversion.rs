//! Conversion of an amount from one quoted currency into another.

use std::str::FromStr;

use rust_decimal::Decimal;

use exchange_rates::{convert, cross_rate};
use rates_types::{CurrencyCode, CurrencyRate, Operation, RateSnapshot};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error("No {operation} quote for {from} -> {to}")]
    Unavailable {
        from: CurrencyCode,
        to: CurrencyCode,
        operation: Operation,
    },

    #[error("No rate for {0}")]
    MissingRate(CurrencyCode),
}

/// State of an open conversion.
///
/// The source is priced with today's rates, the targets with the rates of the
/// selected date plus PLN. Closing and reopening always starts from the
/// defaults: sell, into PLN, with no amount.
#[derive(Debug, Clone)]
pub struct ConversionContext {
    source: CurrencyRate,
    targets: Vec<CurrencyRate>,
    operation: Operation,
    target: CurrencyCode,
    amount: String,
}

impl ConversionContext {
    pub fn open(source: CurrencyRate, reference: &RateSnapshot) -> Self {
        let mut targets = vec![CurrencyRate::base()];
        targets.extend(reference.rates().cloned());
        Self {
            source,
            targets,
            operation: Operation::default(),
            target: CurrencyCode::BASE,
            amount: String::new(),
        }
    }

    pub fn source(&self) -> &CurrencyRate {
        &self.source
    }

    /// Currencies the amount can be converted into, PLN first.
    pub fn targets(&self) -> &[CurrencyRate] {
        &self.targets
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn target(&self) -> CurrencyCode {
        self.target
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    /// Operations the source currency is quoted for.
    pub fn available_operations(&self) -> Vec<Operation> {
        Operation::all()
            .iter()
            .copied()
            .filter(|op| self.source.rates.supports(*op))
            .collect()
    }

    pub fn set_operation(&mut self, operation: Operation) {
        self.operation = operation;
    }

    pub fn set_target(&mut self, code: CurrencyCode) -> Result<(), ConversionError> {
        if !self.targets.iter().any(|t| t.code == code) {
            return Err(ConversionError::MissingRate(code));
        }
        self.target = code;
        Ok(())
    }

    /// Raw amount as typed; parsed lazily by [`Self::result`].
    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.amount = amount.into();
    }

    pub fn reset(&mut self) {
        self.operation = Operation::default();
        self.target = CurrencyCode::BASE;
        self.amount.clear();
    }

    /// Units of the target paid per unit of the source, rounded to 6 places.
    pub fn multiplier(&self) -> Result<Decimal, ConversionError> {
        let target = self
            .targets
            .iter()
            .find(|t| t.code == self.target)
            .ok_or(ConversionError::MissingRate(self.target))?;

        cross_rate(&self.source.rates, &target.rates, self.operation).ok_or(
            ConversionError::Unavailable {
                from: self.source.code,
                to: self.target,
                operation: self.operation,
            },
        )
    }

    /// Converted amount, rounded to 2 places.
    ///
    /// `None` while the amount is blank, not a number or negative, when no
    /// multiplier exists, or when the product is too large to represent.
    pub fn result(&self) -> Option<Decimal> {
        let amount = parse_amount(&self.amount)?;
        let multiplier = self.multiplier().ok()?;
        convert(amount, multiplier)
    }

    pub fn multiplier_text(&self) -> String {
        match self.multiplier() {
            Ok(m) => m.normalize().to_string(),
            Err(err) => err.to_string(),
        }
    }

    pub fn result_text(&self) -> String {
        self.result()
            .map(|r| format!("{:.2}", r))
            .unwrap_or_default()
    }
}

fn parse_amount(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    // number inputs also produce exponent forms such as "1e3"
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
        .filter(|amount| !amount.is_sign_negative())
}
