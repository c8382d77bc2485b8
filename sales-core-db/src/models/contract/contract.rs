use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::contract::contract_status::ContractStatus;
use crate::models::identifiable::Identifiable;

/// Database model for a loan contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractModel {
    pub id: Uuid,

    /// Requested loan amount
    pub amount: Decimal,
    pub service_fee: Decimal,
    /// Amount actually granted by the bank
    pub bank_amount: Decimal,

    pub status: ContractStatus,

    pub financial_product: Option<String>,
    pub contract_document: Option<String>,
    pub bank_documents: Option<String>,

    /// References CustomerModel.id
    pub customer_id: Uuid,
    /// References UserModel.id of the submitting salesperson
    pub saler_id: Uuid,
    /// References UserModel.id of the reviewing finance specialist
    pub specialist_id: Uuid,
    /// References UserModel.id of the accountant
    pub accountant_id: Uuid,

    /// Department of the saler at submission time. Never recomputed.
    pub department_id: Option<Uuid>,
    /// Zone of the saler at submission time. Never recomputed.
    pub zone_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identifiable for ContractModel {
    const ENTITY_NAME: &'static str = "Contract";

    fn get_id(&self) -> Uuid {
        self.id
    }
}
