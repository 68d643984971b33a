//! Weight-table driven modulus checking.
//!
//! Each table row covers a sort code range and names one of the standard
//! checks (MOD10, MOD11, double alternate) with fourteen weights spanning
//! the sort code and an eight digit account number. An account is valid when
//! every matching row passes; sort codes with no matching row cannot be
//! checked and validate by default.

use std::path::Path;

use modcheck_core::domain::BankAccount;
use modcheck_core::ports::AccountResolver;

/// Bundled table excerpt; the full industry table can be supplied via
/// `ModulusResolver::from_file`.
const EMBEDDED_TABLE: &str = include_str!("../../data/modulus-weights.txt");

/// Weight table loading errors.
#[derive(Debug, thiserror::Error)]
pub enum WeightTableError {
    #[error("Failed to read weight table: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid weight table line {line}: {reason}")]
    InvalidLine { line: usize, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckMethod {
    Mod10,
    Mod11,
    DoubleAlternate,
}

#[derive(Debug, Clone)]
struct WeightRow {
    range_start: u32,
    range_end: u32,
    method: CheckMethod,
    weights: [u32; 14],
}

impl WeightRow {
    fn matches(&self, sort_code: u32) -> bool {
        (self.range_start..=self.range_end).contains(&sort_code)
    }

    fn passes(&self, digits: &[u32; 14]) -> bool {
        match self.method {
            CheckMethod::Mod10 => weighted_sum(digits, &self.weights) % 10 == 0,
            CheckMethod::Mod11 => weighted_sum(digits, &self.weights) % 11 == 0,
            CheckMethod::DoubleAlternate => {
                // Sum the decimal digits of each product, not the products.
                let sum: u32 = digits
                    .iter()
                    .zip(self.weights.iter())
                    .map(|(d, w)| {
                        let product = d * w;
                        product / 10 + product % 10
                    })
                    .sum();
                sum % 10 == 0
            }
        }
    }
}

fn weighted_sum(digits: &[u32; 14], weights: &[u32; 14]) -> u32 {
    digits.iter().zip(weights.iter()).map(|(d, w)| d * w).sum()
}

/// Resolver applying the standard modulus checks against a weight table.
pub struct ModulusResolver {
    rows: Vec<WeightRow>,
}

impl ModulusResolver {
    /// Resolver over the bundled table excerpt.
    pub fn from_embedded() -> Self {
        Self {
            rows: parse_table(EMBEDDED_TABLE).expect("bundled weight table parses"),
        }
    }

    /// Resolver over an operator-supplied table file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, WeightTableError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self {
            rows: parse_table(&text)?,
        })
    }
}

impl AccountResolver for ModulusResolver {
    fn is_valid(&self, account: &BankAccount) -> bool {
        let Some(digits) = account_digits(account) else {
            // Non-numeric input can never pass a modulus check.
            return false;
        };

        let sort_code = digits[..6].iter().fold(0u32, |acc, d| acc * 10 + d);

        self.rows
            .iter()
            .filter(|row| row.matches(sort_code))
            .all(|row| row.passes(&digits))
    }
}

/// Fourteen check digits: the sort code followed by the account number
/// normalized to eight digits (rightmost eight, left-padded with zeros).
fn account_digits(account: &BankAccount) -> Option<[u32; 14]> {
    let sort: Vec<u32> = account
        .sort_code
        .chars()
        .map(|c| c.to_digit(10))
        .collect::<Option<_>>()?;
    let number: Vec<u32> = account
        .account_number
        .chars()
        .map(|c| c.to_digit(10))
        .collect::<Option<_>>()?;

    if sort.len() != 6 || number.is_empty() || number.len() > 10 {
        return None;
    }

    let mut digits = [0u32; 14];
    digits[..6].copy_from_slice(&sort);

    let tail = if number.len() > 8 {
        &number[number.len() - 8..]
    } else {
        &number[..]
    };
    digits[14 - tail.len()..].copy_from_slice(tail);

    Some(digits)
}

fn parse_table(text: &str) -> Result<Vec<WeightRow>, WeightTableError> {
    let mut rows = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        rows.push(parse_row(line).map_err(|reason| WeightTableError::InvalidLine {
            line: index + 1,
            reason,
        })?);
    }

    Ok(rows)
}

fn parse_row(line: &str) -> Result<WeightRow, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 17 {
        return Err(format!("expected 17 fields, got {}", tokens.len()));
    }

    let range_start: u32 = tokens[0]
        .parse()
        .map_err(|_| format!("bad range start {:?}", tokens[0]))?;
    let range_end: u32 = tokens[1]
        .parse()
        .map_err(|_| format!("bad range end {:?}", tokens[1]))?;

    let method = match tokens[2] {
        "MOD10" => CheckMethod::Mod10,
        "MOD11" => CheckMethod::Mod11,
        "DBLAL" => CheckMethod::DoubleAlternate,
        other => return Err(format!("unknown check method {other:?}")),
    };

    let mut weights = [0u32; 14];
    for (slot, token) in weights.iter_mut().zip(&tokens[3..]) {
        *slot = token
            .parse()
            .map_err(|_| format!("bad weight {token:?}"))?;
    }

    Ok(WeightRow {
        range_start,
        range_end,
        method,
        weights,
    })
}
