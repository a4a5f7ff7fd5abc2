//! Tier and pass pricing.
//!
//! All prices are fixed rupee amounts looked up from tables in this module.
//! Totals are recomputed server-side at write time; client-supplied amounts
//! are never trusted beyond the selection identifiers themselves.

use festa_common::{AppError, AppResult};
use festa_db::entities::registration::{PassTier, PassType, Tier};
use serde::{Deserialize, Serialize};

/// A participant's base selection: a delegate tier or a pass, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selection {
    /// Delegate tier.
    Tier {
        /// Chosen tier.
        tier: Tier,
    },
    /// Festival pass.
    Pass {
        /// Chosen pass kind.
        pass_type: PassType,
        /// Sub-tier, required iff the pass kind is sub-tiered.
        pass_tier: Option<PassTier>,
    },
}

impl Selection {
    /// Build a selection from the optional form fields, enforcing the
    /// exactly-one-of invariant.
    pub fn from_parts(
        tier: Option<Tier>,
        pass_type: Option<PassType>,
        pass_tier: Option<PassTier>,
    ) -> AppResult<Self> {
        match (tier, pass_type) {
            (Some(_), Some(_)) => Err(AppError::InvalidSelection(
                "choose either a tier or a pass, not both".to_string(),
            )),
            (None, None) => Err(AppError::InvalidSelection(
                "a tier or a pass is required".to_string(),
            )),
            (Some(tier), None) => {
                if pass_tier.is_some() {
                    return Err(AppError::InvalidSelection(
                        "a tier selection does not take a pass sub-tier".to_string(),
                    ));
                }
                Ok(Self::Tier { tier })
            }
            (None, Some(pass_type)) => Ok(Self::Pass {
                pass_type,
                pass_tier,
            }),
        }
    }

    /// The tier field to persist, if any.
    #[must_use]
    pub const fn tier(&self) -> Option<Tier> {
        match self {
            Self::Tier { tier } => Some(*tier),
            Self::Pass { .. } => None,
        }
    }

    /// The pass fields to persist, if any.
    #[must_use]
    pub const fn pass(&self) -> Option<(PassType, Option<PassTier>)> {
        match self {
            Self::Tier { .. } => None,
            Self::Pass {
                pass_type,
                pass_tier,
            } => Some((*pass_type, *pass_tier)),
        }
    }
}

/// Fixed delegate tier prices in rupees.
#[must_use]
pub const fn tier_price(tier: Tier) -> i32 {
    match tier {
        Tier::Tier1 => 450,
        Tier::Tier2 => 650,
        Tier::Tier3 => 950,
    }
}

/// Fixed pass prices in rupees. Nexus Forum is priced by a compound
/// (pass, sub-tier) lookup; the other pass kinds must not carry a sub-tier.
pub fn pass_price(pass_type: PassType, pass_tier: Option<PassTier>) -> AppResult<i32> {
    match (pass_type, pass_tier) {
        (PassType::NexusForum, Some(PassTier::Tier1)) => Ok(300),
        (PassType::NexusForum, Some(PassTier::Tier2)) => Ok(500),
        (PassType::NexusForum, Some(PassTier::Tier3)) => Ok(700),
        (PassType::NexusForum, None) => Err(AppError::InvalidSelection(
            "the Nexus Forum pass requires a sub-tier".to_string(),
        )),
        (PassType::ProNite, None) => Ok(999),
        (PassType::Esports, None) => Ok(450),
        (PassType::ProNite | PassType::Esports, Some(_)) => Err(AppError::InvalidSelection(
            "this pass does not take a sub-tier".to_string(),
        )),
    }
}

/// Base price of a selection.
pub fn base_price(selection: &Selection) -> AppResult<i32> {
    match *selection {
        Selection::Tier { tier } => Ok(tier_price(tier)),
        Selection::Pass {
            pass_type,
            pass_tier,
        } => pass_price(pass_type, pass_tier),
    }
}

/// Total amount: base price plus the sum of the selected event prices.
pub fn compute_amount(selection: &Selection, event_prices: &[i32]) -> AppResult<i32> {
    let base = base_price(selection)?;
    Ok(base + event_prices.iter().sum::<i32>())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_prices() {
        assert_eq!(tier_price(Tier::Tier1), 450);
        assert_eq!(tier_price(Tier::Tier2), 650);
        assert_eq!(tier_price(Tier::Tier3), 950);
    }

    #[test]
    fn test_tier_total_with_events() {
        let selection = Selection::Tier { tier: Tier::Tier2 };
        let total = compute_amount(&selection, &[150]).unwrap();
        assert_eq!(total, 800);
    }

    #[test]
    fn test_total_is_order_independent() {
        let selection = Selection::Tier { tier: Tier::Tier1 };
        let forward = compute_amount(&selection, &[100, 250, 75]).unwrap();
        let reversed = compute_amount(&selection, &[75, 250, 100]).unwrap();
        assert_eq!(forward, reversed);
        assert_eq!(forward, 450 + 425);
    }

    #[test]
    fn test_nexus_forum_requires_sub_tier() {
        let selection = Selection::Pass {
            pass_type: PassType::NexusForum,
            pass_tier: None,
        };
        let err = compute_amount(&selection, &[]).unwrap_err();
        assert!(matches!(err, AppError::InvalidSelection(_)));
    }

    #[test]
    fn test_nexus_forum_compound_lookup() {
        assert_eq!(
            pass_price(PassType::NexusForum, Some(PassTier::Tier1)).unwrap(),
            300
        );
        assert_eq!(
            pass_price(PassType::NexusForum, Some(PassTier::Tier2)).unwrap(),
            500
        );
        assert_eq!(
            pass_price(PassType::NexusForum, Some(PassTier::Tier3)).unwrap(),
            700
        );
    }

    #[test]
    fn test_flat_pass_rejects_sub_tier() {
        let err = pass_price(PassType::ProNite, Some(PassTier::Tier1)).unwrap_err();
        assert!(matches!(err, AppError::InvalidSelection(_)));
        assert_eq!(pass_price(PassType::ProNite, None).unwrap(), 999);
        assert_eq!(pass_price(PassType::Esports, None).unwrap(), 450);
    }

    #[test]
    fn test_from_parts_rejects_both_and_neither() {
        let both = Selection::from_parts(Some(Tier::Tier1), Some(PassType::Esports), None);
        assert!(matches!(both, Err(AppError::InvalidSelection(_))));

        let neither = Selection::from_parts(None, None, None);
        assert!(matches!(neither, Err(AppError::InvalidSelection(_))));
    }

    #[test]
    fn test_from_parts_rejects_sub_tier_on_tier() {
        let result = Selection::from_parts(Some(Tier::Tier1), None, Some(PassTier::Tier1));
        assert!(matches!(result, Err(AppError::InvalidSelection(_))));
    }

    #[test]
    fn test_from_parts_accepts_valid_combinations() {
        let tier = Selection::from_parts(Some(Tier::Tier3), None, None).unwrap();
        assert_eq!(tier.tier(), Some(Tier::Tier3));

        let pass =
            Selection::from_parts(None, Some(PassType::NexusForum), Some(PassTier::Tier2)).unwrap();
        assert_eq!(
            pass.pass(),
            Some((PassType::NexusForum, Some(PassTier::Tier2)))
        );
    }
}
