//! Footer totals and weights over already-fetched budget records.
//!
//! Plain f64 sums in list order; no rounding until display.

use serde::Serialize;

use crate::models::{Contract, Estimate, WorkItem};

pub const VAT_RATE: f64 = 0.16;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ContractTotals {
    pub contracted: f64,
    pub additive: f64,
    pub deductive: f64,
    pub total: f64,
    pub vat: f64,
    pub total_with_vat: f64,
    pub advance: f64,
}

impl ContractTotals {
    pub fn sum<'a>(contracts: impl IntoIterator<Item = &'a Contract>) -> Self {
        contracts.into_iter().fold(Self::default(), |mut acc, c| {
            acc.contracted += c.contracted;
            acc.additive += c.additive;
            acc.deductive += c.deductive;
            acc.total += c.total;
            acc.vat += c.vat;
            acc.total_with_vat += c.total_with_vat;
            acc.advance += c.advance;
            acc
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EstimateTotals {
    pub estimated: f64,
    pub deductions: f64,
    pub amortized: f64,
    pub guarantee_fund: f64,
    pub retentions: f64,
    pub total: f64,
    pub vat: f64,
    pub total_with_vat: f64,
}

impl EstimateTotals {
    pub fn sum<'a>(estimates: impl IntoIterator<Item = &'a Estimate>) -> Self {
        estimates.into_iter().fold(Self::default(), |mut acc, e| {
            acc.estimated += e.estimated;
            acc.deductions += e.deductions;
            acc.amortized += e.amortized;
            acc.guarantee_fund += e.guarantee_fund;
            acc.retentions += e.retentions;
            acc.total += e.total;
            acc.vat += e.vat;
            acc.total_with_vat += e.total_with_vat;
            acc
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WorkItemTotals {
    pub base_budget: f64,
    pub actual_cost: f64,
    pub cost_variance: f64,
}

impl WorkItemTotals {
    pub fn sum<'a>(items: impl IntoIterator<Item = &'a WorkItem>) -> Self {
        items.into_iter().fold(Self::default(), |mut acc, w| {
            acc.base_budget += w.base_budget;
            acc.actual_cost += w.actual_cost;
            acc.cost_variance += w.cost_variance;
            acc
        })
    }
}

/// Each item's share of the summed base budget, in percent. All zero when
/// the sum is zero.
pub fn weight_percentages(items: &[WorkItem]) -> Vec<f64> {
    let total: f64 = items.iter().map(|w| w.base_budget).sum();
    items
        .iter()
        .map(|w| {
            if total == 0.0 {
                0.0
            } else {
                w.base_budget / total * 100.0
            }
        })
        .collect()
}

/// Client-side estimate filter. A contract id wins over a contractor id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EstimateFilter {
    pub contractor_id: Option<i64>,
    pub contract_id: Option<i64>,
}

impl EstimateFilter {
    pub fn matches(&self, estimate: &Estimate) -> bool {
        if let Some(contract) = self.contract_id {
            return estimate.contract_key() == Some(contract);
        }
        if let Some(contractor) = self.contractor_id {
            return estimate.contractor_key() == Some(contractor);
        }
        true
    }

    pub fn apply<'a>(&self, estimates: &'a [Estimate]) -> Vec<&'a Estimate> {
        estimates.iter().filter(|e| self.matches(e)).collect()
    }
}

/// Distinct contractors referenced by a contract list, in first-seen order.
pub fn unique_contractors(contracts: &[Contract]) -> Vec<(i64, String)> {
    let mut out: Vec<(i64, String)> = Vec::new();
    for c in contracts {
        let Some(id) = c.contractor_key() else {
            continue;
        };
        if out.iter().any(|(seen, _)| *seen == id) {
            continue;
        }
        let name = c
            .contractor
            .as_ref()
            .map(|r| r.legal_name.clone())
            .unwrap_or_else(|| format!("#{id}"));
        out.push((id, name));
    }
    out
}

/// Estimate figures as the create form previews them before submitting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EstimatePreview {
    pub subtotal: f64,
    pub vat: f64,
    pub total_with_vat: f64,
}

pub fn preview_estimate(
    estimated: f64,
    deductions: f64,
    amortized: f64,
    guarantee_fund: f64,
    retentions: f64,
    applies_vat: bool,
) -> EstimatePreview {
    let subtotal = estimated - deductions - amortized - guarantee_fund - retentions;
    let vat = if applies_vat { subtotal * VAT_RATE } else { 0.0 };
    EstimatePreview {
        subtotal,
        vat,
        total_with_vat: subtotal + vat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContractSummary, ContractorRef};

    fn item(id: i64, base: f64) -> WorkItem {
        WorkItem {
            id,
            code: format!("P-{id}"),
            description: String::new(),
            base_budget: base,
            actual_cost: base / 2.0,
            cost_variance: base / 2.0,
        }
    }

    fn contract(id: i64, contractor: i64, contracted: f64) -> Contract {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "numero_contrato": format!("C-{id}"),
            "contractor_id": contractor,
            "contractor": {"id": contractor, "razon_social": format!("Empresa {contractor}")},
            "contratado": contracted,
            "total": contracted,
            "iva": contracted * 0.16,
            "total_con_iva": contracted * 1.16,
            "anticipo": 10.0,
        }))
        .unwrap()
    }

    fn estimate(id: i64, contract: i64, contractor: i64, estimated: f64) -> Estimate {
        Estimate {
            id,
            contract_id: Some(contract),
            number: None,
            estimated,
            deductions: 0.0,
            amortized: 0.0,
            guarantee_fund: 0.0,
            retentions: 0.0,
            total: estimated,
            vat: 0.0,
            total_with_vat: estimated,
            contract: Some(ContractSummary {
                id: contract,
                number: String::new(),
                contractor_id: None,
                applies_vat: None,
                contractor: Some(ContractorRef {
                    id: contractor,
                    legal_name: String::new(),
                }),
            }),
        }
    }

    #[test]
    fn test_weights_sum_to_100() {
        let items = vec![item(1, 300.0), item(2, 100.0), item(3, 33.3)];
        let sum: f64 = weight_percentages(&items).iter().sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_weights_zero_total() {
        let items = vec![item(1, 0.0), item(2, 0.0)];
        assert_eq!(weight_percentages(&items), vec![0.0, 0.0]);
        assert!(weight_percentages(&[]).is_empty());
    }

    #[test]
    fn test_contract_totals() {
        let totals = ContractTotals::sum(&[contract(1, 7, 1000.0), contract(2, 8, 500.0)]);
        assert_eq!(totals.contracted, 1500.0);
        assert_eq!(totals.advance, 20.0);
        assert!((totals.total_with_vat - 1740.0).abs() < 1e-9);
    }

    #[test]
    fn test_work_item_totals() {
        let totals = WorkItemTotals::sum(&[item(1, 100.0), item(2, 50.0)]);
        assert_eq!(totals.base_budget, 150.0);
        assert_eq!(totals.actual_cost, 75.0);
    }

    #[test]
    fn test_estimate_filter_contract_wins() {
        let list = vec![estimate(1, 10, 7, 1.0), estimate(2, 11, 7, 2.0), estimate(3, 12, 8, 3.0)];
        let by_contractor = EstimateFilter {
            contractor_id: Some(7),
            contract_id: None,
        };
        assert_eq!(by_contractor.apply(&list).len(), 2);

        let both = EstimateFilter {
            contractor_id: Some(8),
            contract_id: Some(11),
        };
        let ids: Vec<i64> = both.apply(&list).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2]);

        let totals = EstimateTotals::sum(by_contractor.apply(&list));
        assert_eq!(totals.estimated, 3.0);
        assert_eq!(EstimateFilter::default().apply(&list).len(), 3);
    }

    #[test]
    fn test_unique_contractors() {
        let list = vec![contract(1, 7, 1.0), contract(2, 7, 1.0), contract(3, 8, 1.0)];
        let ids: Vec<i64> = unique_contractors(&list).iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![7, 8]);
    }

    #[test]
    fn test_preview_estimate() {
        let p = preview_estimate(1000.0, 100.0, 200.0, 50.0, 50.0, true);
        assert_eq!(p.subtotal, 600.0);
        assert!((p.vat - 96.0).abs() < 1e-9);
        assert!((p.total_with_vat - 696.0).abs() < 1e-9);

        let no_vat = preview_estimate(1000.0, 0.0, 0.0, 0.0, 0.0, false);
        assert_eq!(no_vat.vat, 0.0);
        assert_eq!(no_vat.total_with_vat, 1000.0);
    }
}
