//! Reference model portfolios and allocation similarity.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::types::{AssetClass, WeightVector};

/// A published reference allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPortfolio {
    pub id: String,
    pub manager: String,
    pub name: String,
    pub allocation: WeightVector,
}

/// How close an allocation is to one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelComparison {
    pub id: String,
    pub manager: String,
    pub name: String,
    /// Allocation minus model weight, per class.
    pub diffs: BTreeMap<AssetClass, f64>,
    /// `max(0, 100 − 50·Σ|diff|)`.
    pub similarity: f64,
}

/// Compare an allocation against one model over the union of their classes.
pub fn compare_to_model(allocation: &WeightVector, model: &ModelPortfolio) -> ModelComparison {
    let classes: BTreeSet<AssetClass> = allocation
        .classes()
        .chain(model.allocation.classes())
        .collect();
    let diffs: BTreeMap<AssetClass, f64> = classes
        .into_iter()
        .map(|ac| (ac, allocation.get(ac) - model.allocation.get(ac)))
        .collect();
    let total: f64 = diffs.values().map(|d| d.abs()).sum();
    ModelComparison {
        id: model.id.clone(),
        manager: model.manager.clone(),
        name: model.name.clone(),
        diffs,
        similarity: (100.0 - total * 50.0).max(0.0),
    }
}

/// Every model ranked by similarity, most similar first, truncated to `n`.
pub fn closest_models(
    allocation: &WeightVector,
    models: &[ModelPortfolio],
    n: usize,
) -> Vec<ModelComparison> {
    let mut out: Vec<ModelComparison> =
        models.iter().map(|m| compare_to_model(allocation, m)).collect();
    out.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    out.truncate(n);
    out
}

/// Built-in balanced and growth models from large asset managers.
pub fn default_models() -> Vec<ModelPortfolio> {
    const MODELS: &[(&str, &str, &str, [f64; 4])] = &[
        ("blackrock_moderate", "BlackRock", "Moderate", [0.40, 0.10, 0.05, 0.45]),
        ("blackrock_growth", "BlackRock", "Growth", [0.55, 0.15, 0.05, 0.25]),
        ("vanguard_moderate", "Vanguard", "LifeStrategy Moderate", [0.40, 0.15, 0.05, 0.40]),
        ("vanguard_growth", "Vanguard", "LifeStrategy Growth", [0.55, 0.20, 0.05, 0.20]),
        ("fidelity_balanced", "Fidelity", "Balanced", [0.45, 0.12, 0.03, 0.40]),
        ("capitalgroup_growth", "Capital Group", "Growth", [0.50, 0.20, 0.10, 0.20]),
        ("jpmorgan_balanced", "JP Morgan", "Balanced", [0.45, 0.10, 0.05, 0.40]),
        ("schwab_growth", "Schwab", "Aggressive", [0.60, 0.20, 0.10, 0.10]),
    ];

    MODELS
        .iter()
        .filter_map(|(id, manager, name, [us, intl, em, bonds])| {
            let allocation = WeightVector::from_pairs([
                (AssetClass::UsEquity, *us),
                (AssetClass::IntlDeveloped, *intl),
                (AssetClass::EmergingMarkets, *em),
                (AssetClass::UsBonds, *bonds),
            ])
            .ok()?;
            Some(ModelPortfolio {
                id: (*id).to_string(),
                manager: (*manager).to_string(),
                name: (*name).to_string(),
                allocation,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_allocation_is_fully_similar() {
        let models = default_models();
        assert_eq!(models.len(), 8);
        let cmp = compare_to_model(&models[0].allocation, &models[0]);
        assert!((cmp.similarity - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_closest_models_ranking() {
        let alloc = WeightVector::from_pairs([
            (AssetClass::UsEquity, 0.60),
            (AssetClass::IntlDeveloped, 0.20),
            (AssetClass::EmergingMarkets, 0.10),
            (AssetClass::UsBonds, 0.10),
        ])
        .unwrap();
        let top = closest_models(&alloc, &default_models(), 3);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].id, "schwab_growth");
        assert!(top[0].similarity >= top[1].similarity);
    }

    #[test]
    fn test_similarity_floors_at_zero() {
        let alloc = WeightVector::from_pairs([(AssetClass::Crypto, 1.0)]).unwrap();
        let cmp = compare_to_model(&alloc, &default_models()[0]);
        assert_eq!(cmp.similarity, 0.0);
        assert!((cmp.diffs[&AssetClass::Crypto] - 1.0).abs() < 1e-12);
    }
}
