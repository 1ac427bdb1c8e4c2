//! Fee rules as data.
//!
//! Every fee an exchange charges (channel fee, trading fee, modeled spread) is
//! a [`FeeRule`] evaluated by [`FeeRule::evaluate`]. Rules are pure: the same
//! amount and coin always produce the same fiat value.
//!
//! | Variant | Value for amount `a` |
//! |---------|----------------------|
//! | `Flat(x)` | `x` |
//! | `Percentage(r)` | `r * a` |
//! | `Sum(rules)` | sum of every inner rule |
//! | `Greatest(rules)` | largest inner rule, `0` when empty |
//! | `Brackets { brackets, otherwise }` | first bracket whose bound admits `a`, else `otherwise` |
//! | `ByCoin { rules, otherwise }` | rule for the queried coin, else `otherwise` |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Amount, CoinSymbol};

/// Upper bound of a fee bracket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpperBound {
    /// Admits amounts `<= limit`.
    AtMost(f64),
    /// Admits amounts `< limit`.
    Below(f64),
}

impl UpperBound {
    pub fn admits(self, amount: f64) -> bool {
        match self {
            Self::AtMost(limit) => amount <= limit,
            Self::Below(limit) => amount < limit,
        }
    }

    pub const fn limit(self) -> f64 {
        match self {
            Self::AtMost(limit) | Self::Below(limit) => limit,
        }
    }
}

/// One step of a piecewise fee schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub upper: UpperBound,
    pub rule: FeeRule,
}

impl Bracket {
    pub fn at_most(limit: f64, rule: FeeRule) -> Self {
        Self {
            upper: UpperBound::AtMost(limit),
            rule,
        }
    }

    pub fn below(limit: f64, rule: FeeRule) -> Self {
        Self {
            upper: UpperBound::Below(limit),
            rule,
        }
    }
}

/// Fee rule evaluated against a transfer amount, in fiat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeRule {
    Flat(f64),
    Percentage(f64),
    Sum(Vec<FeeRule>),
    Greatest(Vec<FeeRule>),
    Brackets {
        brackets: Vec<Bracket>,
        otherwise: Box<FeeRule>,
    },
    ByCoin {
        rules: BTreeMap<CoinSymbol, FeeRule>,
        otherwise: Box<FeeRule>,
    },
}

impl Default for FeeRule {
    fn default() -> Self {
        Self::zero()
    }
}

impl FeeRule {
    pub const fn zero() -> Self {
        Self::Flat(0.0)
    }

    pub fn brackets(brackets: Vec<Bracket>, otherwise: FeeRule) -> Self {
        Self::Brackets {
            brackets,
            otherwise: Box::new(otherwise),
        }
    }

    pub fn by_coin(rules: impl IntoIterator<Item = (CoinSymbol, FeeRule)>, otherwise: FeeRule) -> Self {
        Self::ByCoin {
            rules: rules.into_iter().collect(),
            otherwise: Box::new(otherwise),
        }
    }

    /// Fiat fee for `amount`. `coin` only matters for [`FeeRule::ByCoin`].
    pub fn evaluate(&self, amount: Amount, coin: Option<&CoinSymbol>) -> f64 {
        let value = amount.value();
        match self {
            Self::Flat(fee) => *fee,
            Self::Percentage(rate) => rate * value,
            Self::Sum(rules) => rules.iter().map(|rule| rule.evaluate(amount, coin)).sum(),
            Self::Greatest(rules) => rules
                .iter()
                .map(|rule| rule.evaluate(amount, coin))
                .reduce(f64::max)
                .unwrap_or(0.0),
            Self::Brackets {
                brackets,
                otherwise,
            } => brackets
                .iter()
                .find(|bracket| bracket.upper.admits(value))
                .map_or_else(
                    || otherwise.evaluate(amount, coin),
                    |bracket| bracket.rule.evaluate(amount, coin),
                ),
            Self::ByCoin { rules, otherwise } => coin
                .and_then(|coin| rules.get(coin))
                .unwrap_or(otherwise.as_ref())
                .evaluate(amount, coin),
        }
    }

    /// True when every constant in the rule is finite.
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Flat(value) | Self::Percentage(value) => value.is_finite(),
            Self::Sum(rules) | Self::Greatest(rules) => rules.iter().all(Self::is_finite),
            Self::Brackets {
                brackets,
                otherwise,
            } => {
                brackets
                    .iter()
                    .all(|bracket| bracket.upper.limit().is_finite() && bracket.rule.is_finite())
                    && otherwise.is_finite()
            }
            Self::ByCoin { rules, otherwise } => {
                rules.values().all(Self::is_finite) && otherwise.is_finite()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(value: f64) -> Amount {
        Amount::new(value).expect("valid amount")
    }

    fn close(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-9
    }

    #[test]
    fn flat_and_percentage() {
        assert_eq!(FeeRule::Flat(25.0).evaluate(amount(1_000.0), None), 25.0);
        assert!(close(
            FeeRule::Percentage(0.0059).evaluate(amount(100.0), None),
            0.59
        ));
    }

    #[test]
    fn sum_and_greatest() {
        let post_office = FeeRule::Sum(vec![FeeRule::Flat(1.25), FeeRule::Percentage(0.0025)]);
        assert!(close(post_office.evaluate(amount(100.0), None), 1.5));

        let card = FeeRule::Greatest(vec![FeeRule::Flat(10.0), FeeRule::Percentage(0.06)]);
        assert!(close(card.evaluate(amount(100.0), None), 10.0));
        assert!(close(card.evaluate(amount(1_000.0), None), 60.0));
        assert_eq!(FeeRule::Greatest(Vec::new()).evaluate(amount(5.0), None), 0.0);
    }

    #[test]
    fn at_most_bracket_includes_its_limit() {
        let rule = FeeRule::brackets(
            vec![
                Bracket::at_most(100.0, FeeRule::zero()),
                Bracket::at_most(1_000.0, FeeRule::Percentage(0.005)),
            ],
            FeeRule::Percentage(0.01),
        );

        assert_eq!(rule.evaluate(amount(100.0), None), 0.0);
        assert!(close(rule.evaluate(amount(1_000.0), None), 5.0));
        assert!(close(rule.evaluate(amount(1_000.5), None), 10.005));
    }

    #[test]
    fn below_bracket_excludes_its_limit() {
        let rule = FeeRule::brackets(
            vec![Bracket::below(10_000.0, FeeRule::Flat(50.0))],
            FeeRule::zero(),
        );

        assert_eq!(rule.evaluate(amount(9_999.99), None), 50.0);
        assert_eq!(rule.evaluate(amount(10_000.0), None), 0.0);
    }

    #[test]
    fn by_coin_falls_back_when_coin_missing_or_unlisted() {
        let rule = FeeRule::by_coin(
            [(CoinSymbol::btc(), FeeRule::Percentage(0.002))],
            FeeRule::Percentage(0.004),
        );

        let btc = CoinSymbol::btc();
        let eth = CoinSymbol::eth();
        assert!(close(rule.evaluate(amount(1_000.0), Some(&btc)), 2.0));
        assert!(close(rule.evaluate(amount(1_000.0), Some(&eth)), 4.0));
        assert!(close(rule.evaluate(amount(1_000.0), None), 4.0));
    }

    #[test]
    fn serializes_as_snake_case_tags() {
        let rule = FeeRule::brackets(
            vec![Bracket::below(500.0, FeeRule::Flat(5.0))],
            FeeRule::Percentage(0.01),
        );
        let json = serde_json::to_value(&rule).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "brackets": {
                    "brackets": [{ "upper": { "below": 500.0 }, "rule": { "flat": 5.0 } }],
                    "otherwise": { "percentage": 0.01 }
                }
            })
        );

        let parsed: FeeRule = serde_json::from_value(json).expect("deserialize");
        assert_eq!(parsed, rule);
    }

    #[test]
    fn detects_non_finite_constants() {
        assert!(FeeRule::Sum(vec![FeeRule::Flat(1.0), FeeRule::Percentage(0.1)]).is_finite());
        assert!(!FeeRule::Sum(vec![FeeRule::Flat(f64::NAN)]).is_finite());
    }
}
