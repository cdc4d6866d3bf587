//! Budget-control records. Wire names follow the backend (Spanish); the
//! Rust side uses English names through `serde(rename)`.

use serde::{Deserialize, Serialize};

use super::de::null_as_default;
use super::{require_id, require_text, Identified, Validate};
use crate::error::ObraError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contractor {
    pub id: i64,
    #[serde(rename = "razon_social")]
    pub legal_name: String,
    #[serde(rename = "responsable", default)]
    pub contact: Option<String>,
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
    #[serde(rename = "correo_electronico", default)]
    pub email: Option<String>,
}

impl Identified for Contractor {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractorDraft {
    #[serde(rename = "razon_social")]
    pub legal_name: String,
    #[serde(rename = "responsable")]
    pub contact: Option<String>,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    #[serde(rename = "correo_electronico")]
    pub email: Option<String>,
}

impl From<&Contractor> for ContractorDraft {
    fn from(c: &Contractor) -> Self {
        Self {
            legal_name: c.legal_name.clone(),
            contact: c.contact.clone(),
            phone: c.phone.clone(),
            email: c.email.clone(),
        }
    }
}

impl Validate for ContractorDraft {
    fn validate(&self) -> Result<(), ObraError> {
        require_text(&self.legal_name, "Legal name (razon_social)")
    }
}

/// Budget line ("partida") of a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: i64,
    #[serde(rename = "item_code")]
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "presupuesto_base", default, deserialize_with = "null_as_default")]
    pub base_budget: f64,
    #[serde(rename = "costo_real", default, deserialize_with = "null_as_default")]
    pub actual_cost: f64,
    #[serde(rename = "diferencia_costo", default, deserialize_with = "null_as_default")]
    pub cost_variance: f64,
}

impl Identified for WorkItem {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkItemDraft {
    #[serde(rename = "item_code")]
    pub code: String,
    pub description: String,
    #[serde(rename = "presupuesto_base")]
    pub base_budget: f64,
}

impl From<&WorkItem> for WorkItemDraft {
    fn from(w: &WorkItem) -> Self {
        Self {
            code: w.code.clone(),
            description: w.description.clone(),
            base_budget: w.base_budget,
        }
    }
}

impl Validate for WorkItemDraft {
    fn validate(&self) -> Result<(), ObraError> {
        if self.code.trim().is_empty() || self.description.trim().is_empty() {
            return Err(ObraError::validation("Code and description are required"));
        }
        if !self.base_budget.is_finite() {
            return Err(ObraError::validation("Base budget must be a number"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractorRef {
    pub id: i64,
    #[serde(rename = "razon_social")]
    pub legal_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItemRef {
    pub id: i64,
    #[serde(rename = "item_code")]
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: i64,
    #[serde(default)]
    pub contractor_id: Option<i64>,
    #[serde(default)]
    pub work_item_id: Option<i64>,
    #[serde(rename = "numero_contrato")]
    pub number: String,
    #[serde(rename = "trabajos", default)]
    pub works: Option<String>,
    #[serde(rename = "contratado", default, deserialize_with = "null_as_default")]
    pub contracted: f64,
    #[serde(rename = "aditiva", default, deserialize_with = "null_as_default")]
    pub additive: f64,
    #[serde(rename = "deductiva", default, deserialize_with = "null_as_default")]
    pub deductive: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: f64,
    #[serde(rename = "iva", default, deserialize_with = "null_as_default")]
    pub vat: f64,
    #[serde(rename = "total_con_iva", default, deserialize_with = "null_as_default")]
    pub total_with_vat: f64,
    #[serde(rename = "anticipo", default, deserialize_with = "null_as_default")]
    pub advance: f64,
    #[serde(rename = "aplica_iva", default, deserialize_with = "null_as_default")]
    pub applies_vat: bool,
    #[serde(default)]
    pub contractor: Option<ContractorRef>,
    #[serde(default)]
    pub work_item: Option<WorkItemRef>,
}

impl Contract {
    /// Contractor id from the embedded reference or the foreign key.
    pub fn contractor_key(&self) -> Option<i64> {
        self.contractor.as_ref().map(|c| c.id).or(self.contractor_id)
    }
}

impl Identified for Contract {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractDraft {
    pub contractor_id: Option<i64>,
    pub work_item_id: Option<i64>,
    #[serde(rename = "numero_contrato")]
    pub number: String,
    #[serde(rename = "trabajos")]
    pub works: String,
    #[serde(rename = "contratado")]
    pub contracted: f64,
    #[serde(rename = "aditiva")]
    pub additive: f64,
    #[serde(rename = "deductiva")]
    pub deductive: f64,
    #[serde(rename = "anticipo")]
    pub advance: f64,
    #[serde(rename = "aplica_iva")]
    pub applies_vat: bool,
}

impl Default for ContractDraft {
    fn default() -> Self {
        Self {
            contractor_id: None,
            work_item_id: None,
            number: String::new(),
            works: String::new(),
            contracted: 0.0,
            additive: 0.0,
            deductive: 0.0,
            advance: 0.0,
            applies_vat: true,
        }
    }
}

impl From<&Contract> for ContractDraft {
    fn from(c: &Contract) -> Self {
        Self {
            contractor_id: c.contractor_key(),
            work_item_id: c.work_item.as_ref().map(|w| w.id).or(c.work_item_id),
            number: c.number.clone(),
            works: c.works.clone().unwrap_or_default(),
            contracted: c.contracted,
            additive: c.additive,
            deductive: c.deductive,
            advance: c.advance,
            applies_vat: c.applies_vat,
        }
    }
}

impl Validate for ContractDraft {
    fn validate(&self) -> Result<(), ObraError> {
        if self.contractor_id.is_none() || self.work_item_id.is_none() || self.number.trim().is_empty() {
            return Err(ObraError::validation(
                "Contractor, work item and contract number are required",
            ));
        }
        require_id(self.contractor_id, "Contractor")?;
        require_id(self.work_item_id, "Work item")?;
        Ok(())
    }
}

/// Contract summary embedded in an estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractSummary {
    pub id: i64,
    #[serde(rename = "numero_contrato", default)]
    pub number: String,
    #[serde(default)]
    pub contractor_id: Option<i64>,
    #[serde(rename = "aplica_iva", default)]
    pub applies_vat: Option<bool>,
    #[serde(default)]
    pub contractor: Option<ContractorRef>,
}

impl ContractSummary {
    pub fn contractor_key(&self) -> Option<i64> {
        self.contractor.as_ref().map(|c| c.id).or(self.contractor_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub id: i64,
    #[serde(default)]
    pub contract_id: Option<i64>,
    #[serde(rename = "numero_estimacion", default)]
    pub number: Option<String>,
    #[serde(rename = "estimado", default, deserialize_with = "null_as_default")]
    pub estimated: f64,
    #[serde(rename = "deductiva_estimacion", default, deserialize_with = "null_as_default")]
    pub deductions: f64,
    #[serde(rename = "amortizado", default, deserialize_with = "null_as_default")]
    pub amortized: f64,
    #[serde(rename = "fondo_garantia", default, deserialize_with = "null_as_default")]
    pub guarantee_fund: f64,
    #[serde(rename = "retenciones", default, deserialize_with = "null_as_default")]
    pub retentions: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: f64,
    #[serde(rename = "iva", default, deserialize_with = "null_as_default")]
    pub vat: f64,
    #[serde(rename = "total_con_iva", default, deserialize_with = "null_as_default")]
    pub total_with_vat: f64,
    #[serde(default)]
    pub contract: Option<ContractSummary>,
}

impl Estimate {
    pub fn contract_key(&self) -> Option<i64> {
        self.contract.as_ref().map(|c| c.id).or(self.contract_id)
    }

    pub fn contractor_key(&self) -> Option<i64> {
        self.contract.as_ref().and_then(ContractSummary::contractor_key)
    }
}

impl Identified for Estimate {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EstimateDraft {
    pub contract_id: Option<i64>,
    #[serde(rename = "numero_estimacion")]
    pub number: String,
    #[serde(rename = "estimado")]
    pub estimated: f64,
    #[serde(rename = "deductiva_estimacion")]
    pub deductions: f64,
    #[serde(rename = "amortizado")]
    pub amortized: f64,
    #[serde(rename = "fondo_garantia")]
    pub guarantee_fund: f64,
    #[serde(rename = "retenciones")]
    pub retentions: f64,
}

impl From<&Estimate> for EstimateDraft {
    fn from(e: &Estimate) -> Self {
        Self {
            contract_id: e.contract_key(),
            number: e.number.clone().unwrap_or_default(),
            estimated: e.estimated,
            deductions: e.deductions,
            amortized: e.amortized,
            guarantee_fund: e.guarantee_fund,
            retentions: e.retentions,
        }
    }
}

impl Validate for EstimateDraft {
    fn validate(&self) -> Result<(), ObraError> {
        require_id(self.contract_id, "Contract")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_wire_names() {
        let c: Contract = serde_json::from_str(
            r#"{"id": 3, "numero_contrato": "C-001", "contratado": 1000.5, "aditiva": null,
                "iva": 160.08, "total_con_iva": 1160.58, "aplica_iva": true,
                "contractor": {"id": 7, "razon_social": "Acme SA"}}"#,
        )
        .unwrap();
        assert_eq!(c.number, "C-001");
        assert_eq!(c.additive, 0.0);
        assert_eq!(c.contractor_key(), Some(7));

        let draft = ContractDraft::from(&c);
        let v = serde_json::to_value(&draft).unwrap();
        assert_eq!(v["numero_contrato"], "C-001");
        assert_eq!(v["contractor_id"], 7);
        assert_eq!(v["aplica_iva"], true);
    }

    #[test]
    fn test_contract_draft_requires_keys() {
        let mut draft = ContractDraft {
            number: "C-9".into(),
            ..Default::default()
        };
        assert!(draft.validate().is_err());
        draft.contractor_id = Some(1);
        draft.work_item_id = Some(2);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_contractor_draft_requires_legal_name() {
        let draft = ContractorDraft {
            legal_name: "".into(),
            contact: None,
            phone: None,
            email: None,
        };
        assert_eq!(
            draft.validate().unwrap_err().code,
            crate::error::ErrorCode::ValidationError
        );
    }
}
