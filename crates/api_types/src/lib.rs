use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub mod metal {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct MetalResponse {
        pub id: i32,
        pub code: String,
        pub name: String,
        pub fine_percentage: f64,
        pub average_cost_per_gram: Option<f64>,
        pub is_active: bool,
    }
}

pub mod ledger {
    use super::*;

    /// A ledger entry with `direction` + `quantity`/`weight` re-projected
    /// into `qty_in`/`qty_out`/`weight_in`/`weight_out`. Exactly one pair is
    /// populated, matching the entry's direction.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct LedgerEntryResponse {
        pub id: i32,
        pub date: NaiveDate,
        pub department_id: i32,
        pub order_id: i32,
        pub metal_id: i32,
        pub direction: String,
        pub qty_in: Option<f64>,
        pub qty_out: Option<f64>,
        pub weight_in: Option<f64>,
        pub weight_out: Option<f64>,
        pub fine_weight: f64,
        pub notes: Option<String>,
        pub is_archived: bool,
        pub created_by: i32,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    impl LedgerEntryResponse {
        /// Split `quantity`/`weight` into the IN or OUT column pair.
        ///
        /// `is_in` reflects the entry direction; the other pair stays empty.
        pub fn split_direction(
            &mut self,
            is_in: bool,
            quantity: f64,
            weight: f64,
        ) {
            if is_in {
                self.qty_in = Some(quantity);
                self.qty_out = None;
                self.weight_in = Some(weight);
                self.weight_out = None;
            } else {
                self.qty_in = None;
                self.qty_out = Some(quantity);
                self.weight_in = None;
                self.weight_out = Some(weight);
            }
        }
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct MetalBalanceItem {
        pub metal_id: i32,
        pub metal_code: String,
        pub metal_name: String,
        pub fine_weight_balance: f64,
    }

    /// Summary grouped by metal; metals with a zero fine-weight balance are
    /// omitted from `balances`.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct LedgerSummaryResponse {
        pub total_qty_held: f64,
        pub total_qty_out: f64,
        pub balances: Vec<MetalBalanceItem>,
    }

    /// Inclusive date range for bulk archiving.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct ArchiveRequest {
        pub date_from: NaiveDate,
        pub date_to: NaiveDate,
    }
}

pub mod manufacturing {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct RemainingResponse {
        pub step_id: i32,
        pub total_quantity: f64,
        pub total_weight: f64,
        pub transferred_quantity: f64,
        pub transferred_weight: f64,
        pub remaining_quantity: f64,
        pub remaining_weight: f64,
        pub children_count: usize,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct TransferResponse {
        pub parent_step_id: i32,
        pub parent_step_status: String,
        pub child_step_id: i32,
        pub remaining_quantity: f64,
        pub remaining_weight: f64,
    }
}

pub mod supply {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct SafeSupplyResponse {
        pub metal_id: Option<i32>,
        pub supply_type: String,
        pub metal_code: Option<String>,
        pub metal_name: Option<String>,
        pub quantity_grams: f64,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CompanyMetalBalanceResponse {
        pub company_id: i32,
        pub metal_id: i32,
        pub metal_code: String,
        pub metal_name: String,
        pub balance_grams: f64,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct MetalTransactionResponse {
        pub id: i32,
        pub transaction_type: String,
        pub metal_id: Option<i32>,
        pub company_id: Option<i32>,
        pub order_id: Option<i32>,
        pub quantity_grams: f64,
        pub notes: Option<String>,
        pub created_by: i32,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CastingConsumptionResponse {
        pub fine_metal_grams: f64,
        pub alloy_grams: f64,
        pub metal_code: String,
        pub company_id: i32,
        pub order_id: i32,
        pub company_balance_after: f64,
        pub safe_fine_metal_after: f64,
        pub safe_alloy_after: f64,
    }
}

#[cfg(test)]
mod tests {
    use super::ledger::LedgerEntryResponse;
    use chrono::Utc;

    fn entry() -> LedgerEntryResponse {
        LedgerEntryResponse {
            id: 1,
            date: chrono::NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            department_id: 1,
            order_id: 1,
            metal_id: 1,
            direction: "IN".to_string(),
            qty_in: None,
            qty_out: None,
            weight_in: None,
            weight_out: None,
            fine_weight: 26.4724,
            notes: None,
            is_archived: false,
            created_by: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn split_populates_exactly_one_pair() {
        let mut response = entry();
        response.split_direction(true, 5.0, 28.9);
        assert_eq!(response.qty_in, Some(5.0));
        assert_eq!(response.weight_in, Some(28.9));
        assert_eq!(response.qty_out, None);
        assert_eq!(response.weight_out, None);

        response.split_direction(false, 5.0, 10.0);
        assert_eq!(response.qty_in, None);
        assert_eq!(response.weight_in, None);
        assert_eq!(response.qty_out, Some(5.0));
        assert_eq!(response.weight_out, Some(10.0));
    }
}
