pub use commands::{
    CompanyDepositCmd, CreateEntryCmd, CreateStepCmd, EntryFilter, EntryPatch, MetalPatch,
    SafePurchaseCmd, StepPatch, TransactionFilter, TransferCmd,
};
pub use company_balances::CompanyMetalBalance;
pub use department_balances::DepartmentBalance;
pub use department_stocks::DepartmentStock;
pub use error::EngineError;
pub use ledger_entries::{Direction, LedgerEntry, LedgerSummary, MetalBalance};
pub use manufacturing_steps::{
    ManufacturingStep, StepRemaining, StepStatus, TRANSFER_TOLERANCE, TransferOutcome,
};
pub use metal_transactions::{MetalTransaction, TransactionType};
pub use metals::{DEFAULT_METALS, Metal};
pub use ops::{Engine, EngineBuilder};
pub use safe_supplies::{CastingConsumption, SafeSupply, SupplyKind};

mod commands;
mod companies;
mod company_balances;
mod department_balances;
mod department_stocks;
mod departments;
mod error;
mod ledger_entries;
mod manufacturing_steps;
mod metal_transactions;
mod metals;
mod ops;
mod orders;
mod safe_supplies;

type ResultEngine<T> = Result<T, EngineError>;
