//! Mapping from engine domain types to the presentation DTOs.

use api_types::{ledger, manufacturing, metal, supply};
use engine::{
    CastingConsumption, CompanyMetalBalance, Direction, LedgerEntry, LedgerSummary, Metal,
    MetalTransaction, SafeSupply, StepRemaining, TransferOutcome,
};

pub fn metal_response(metal: Metal) -> metal::MetalResponse {
    metal::MetalResponse {
        id: metal.id,
        code: metal.code,
        name: metal.name,
        fine_percentage: metal.fine_percentage,
        average_cost_per_gram: metal.average_cost_per_gram,
        is_active: metal.is_active,
    }
}

pub fn entry_response(entry: LedgerEntry) -> ledger::LedgerEntryResponse {
    let mut response = ledger::LedgerEntryResponse {
        id: entry.id,
        date: entry.date,
        department_id: entry.department_id,
        order_id: entry.order_id,
        metal_id: entry.metal_id,
        direction: entry.direction.as_str().to_string(),
        qty_in: None,
        qty_out: None,
        weight_in: None,
        weight_out: None,
        fine_weight: entry.fine_weight,
        notes: entry.notes,
        is_archived: entry.is_archived,
        created_by: entry.created_by,
        created_at: entry.created_at,
        updated_at: entry.updated_at,
    };
    response.split_direction(entry.direction == Direction::In, entry.quantity, entry.weight);
    response
}

pub fn summary_response(summary: LedgerSummary) -> ledger::LedgerSummaryResponse {
    ledger::LedgerSummaryResponse {
        total_qty_held: summary.total_qty_held,
        total_qty_out: summary.total_qty_out,
        balances: summary
            .balances
            .into_iter()
            .map(|balance| ledger::MetalBalanceItem {
                metal_id: balance.metal_id,
                metal_code: balance.metal_code,
                metal_name: balance.metal_name,
                fine_weight_balance: balance.fine_weight_balance,
            })
            .collect(),
    }
}

pub fn remaining_response(step_id: i32, remaining: StepRemaining) -> manufacturing::RemainingResponse {
    manufacturing::RemainingResponse {
        step_id,
        total_quantity: remaining.total_quantity,
        total_weight: remaining.total_weight,
        transferred_quantity: remaining.transferred_quantity,
        transferred_weight: remaining.transferred_weight,
        remaining_quantity: remaining.remaining_quantity,
        remaining_weight: remaining.remaining_weight,
        children_count: remaining.children_count,
    }
}

pub fn transfer_response(outcome: TransferOutcome) -> manufacturing::TransferResponse {
    manufacturing::TransferResponse {
        parent_step_id: outcome.parent_step_id,
        parent_step_status: outcome.parent_step_status.as_str().to_string(),
        child_step_id: outcome.child_step_id,
        remaining_quantity: outcome.remaining_quantity,
        remaining_weight: outcome.remaining_weight,
    }
}

pub fn safe_supply_response(supply: SafeSupply) -> supply::SafeSupplyResponse {
    supply::SafeSupplyResponse {
        metal_id: supply.kind.metal_id(),
        supply_type: supply.kind.type_str().to_string(),
        metal_code: supply.metal_code,
        metal_name: supply.metal_name,
        quantity_grams: supply.quantity_grams,
    }
}

pub fn company_balance_response(
    balance: CompanyMetalBalance,
) -> supply::CompanyMetalBalanceResponse {
    supply::CompanyMetalBalanceResponse {
        company_id: balance.company_id,
        metal_id: balance.metal_id,
        metal_code: balance.metal_code,
        metal_name: balance.metal_name,
        balance_grams: balance.balance_grams,
    }
}

pub fn transaction_response(row: MetalTransaction) -> supply::MetalTransactionResponse {
    supply::MetalTransactionResponse {
        id: row.id,
        transaction_type: row.transaction_type.as_str().to_string(),
        metal_id: row.metal_id,
        company_id: row.company_id,
        order_id: row.order_id,
        quantity_grams: row.quantity_grams,
        notes: row.notes,
        created_by: row.created_by,
        created_at: row.created_at,
    }
}

pub fn consumption_response(result: CastingConsumption) -> supply::CastingConsumptionResponse {
    supply::CastingConsumptionResponse {
        fine_metal_grams: result.fine_metal_grams,
        alloy_grams: result.alloy_grams,
        metal_code: result.metal_code,
        company_id: result.company_id,
        order_id: result.order_id,
        company_balance_after: result.company_balance_after,
        safe_fine_metal_after: result.safe_fine_metal_after,
        safe_alloy_after: result.safe_alloy_after,
    }
}
