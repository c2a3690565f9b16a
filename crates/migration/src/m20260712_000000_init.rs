//! Initial schema migration - creates all tables from scratch.
//!
//! It creates the complete schema for Orafo:
//!
//! - `departments` / `companies` / `orders`: collaborator tables the core
//!   reads but does not manage
//! - `metals`: the metal registry (purity, running average cost)
//! - `department_ledger_entries`: signed IN/OUT movements per department
//! - `department_balances`: ledger-scoped running balances
//! - `department_stocks`: transfer-scoped running balances (legacy buckets)
//! - `manufacturing_steps`: the step transfer tree
//! - `safe_supplies`: the house reserve, fine metal and alloy
//! - `company_metal_balances`: customer metal held in trust
//! - `metal_transactions`: the audit trail

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Departments {
    Table,
    Id,
    TenantId,
    Name,
}

#[derive(Iden)]
enum Companies {
    Table,
    Id,
    TenantId,
    Name,
}

#[derive(Iden)]
enum Metals {
    Table,
    Id,
    TenantId,
    Code,
    Name,
    FinePercentage,
    AverageCostPerGram,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Orders {
    Table,
    Id,
    TenantId,
    OrderNumber,
    CompanyId,
    MetalId,
    Quantity,
    TargetWeightPerPiece,
}

#[derive(Iden)]
enum DepartmentLedgerEntries {
    Table,
    Id,
    TenantId,
    Date,
    DepartmentId,
    OrderId,
    MetalId,
    Direction,
    Quantity,
    Weight,
    FineWeight,
    Notes,
    IsArchived,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum DepartmentBalances {
    Table,
    Id,
    TenantId,
    DepartmentId,
    MetalId,
    BalanceGrams,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum DepartmentStocks {
    Table,
    Id,
    TenantId,
    DepartmentName,
    MetalCode,
    BalanceGrams,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ManufacturingSteps {
    Table,
    Id,
    TenantId,
    OrderId,
    ParentStepId,
    StepType,
    Description,
    Status,
    Department,
    WorkerName,
    StartedAt,
    CompletedAt,
    ReceivedAt,
    TransferredBy,
    ReceivedBy,
    QuantityReceived,
    QuantityReturned,
    WeightReceived,
    WeightReturned,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SafeSupplies {
    Table,
    Id,
    TenantId,
    MetalId,
    SupplyType,
    QuantityGrams,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CompanyMetalBalances {
    Table,
    Id,
    TenantId,
    CompanyId,
    MetalId,
    BalanceGrams,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum MetalTransactions {
    Table,
    Id,
    TenantId,
    TransactionType,
    MetalId,
    CompanyId,
    OrderId,
    QuantityGrams,
    Notes,
    CreatedBy,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Departments
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Departments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Departments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Departments::TenantId).integer().not_null())
                    .col(ColumnDef::new(Departments::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-departments-tenant_id-name-unique")
                    .table(Departments::Table)
                    .col(Departments::TenantId)
                    .col(Departments::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Companies
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Companies::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Companies::TenantId).integer().not_null())
                    .col(ColumnDef::new(Companies::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Metals
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Metals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Metals::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Metals::TenantId).integer().not_null())
                    .col(ColumnDef::new(Metals::Code).string().not_null())
                    .col(ColumnDef::new(Metals::Name).string().not_null())
                    .col(ColumnDef::new(Metals::FinePercentage).double().not_null())
                    .col(ColumnDef::new(Metals::AverageCostPerGram).double())
                    .col(
                        ColumnDef::new(Metals::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Metals::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Metals::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-metals-tenant_id-code-unique")
                    .table(Metals::Table)
                    .col(Metals::TenantId)
                    .col(Metals::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Orders (read-only projection)
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Orders::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Orders::TenantId).integer().not_null())
                    .col(ColumnDef::new(Orders::OrderNumber).string().not_null())
                    .col(ColumnDef::new(Orders::CompanyId).integer().not_null())
                    .col(ColumnDef::new(Orders::MetalId).integer())
                    .col(ColumnDef::new(Orders::Quantity).double())
                    .col(ColumnDef::new(Orders::TargetWeightPerPiece).double())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-orders-company_id")
                            .from(Orders::Table, Orders::CompanyId)
                            .to(Companies::Table, Companies::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-orders-metal_id")
                            .from(Orders::Table, Orders::MetalId)
                            .to(Metals::Table, Metals::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Department ledger entries
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(DepartmentLedgerEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DepartmentLedgerEntries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DepartmentLedgerEntries::TenantId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DepartmentLedgerEntries::Date).date().not_null())
                    .col(
                        ColumnDef::new(DepartmentLedgerEntries::DepartmentId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DepartmentLedgerEntries::OrderId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DepartmentLedgerEntries::MetalId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DepartmentLedgerEntries::Direction)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DepartmentLedgerEntries::Quantity)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DepartmentLedgerEntries::Weight)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DepartmentLedgerEntries::FineWeight)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DepartmentLedgerEntries::Notes).text())
                    .col(
                        ColumnDef::new(DepartmentLedgerEntries::IsArchived)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(DepartmentLedgerEntries::CreatedBy)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DepartmentLedgerEntries::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DepartmentLedgerEntries::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-ledger_entries-department_id")
                            .from(
                                DepartmentLedgerEntries::Table,
                                DepartmentLedgerEntries::DepartmentId,
                            )
                            .to(Departments::Table, Departments::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-ledger_entries-order_id")
                            .from(
                                DepartmentLedgerEntries::Table,
                                DepartmentLedgerEntries::OrderId,
                            )
                            .to(Orders::Table, Orders::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-ledger_entries-metal_id")
                            .from(
                                DepartmentLedgerEntries::Table,
                                DepartmentLedgerEntries::MetalId,
                            )
                            .to(Metals::Table, Metals::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ledger_entries-tenant_id-date")
                    .table(DepartmentLedgerEntries::Table)
                    .col(DepartmentLedgerEntries::TenantId)
                    .col(DepartmentLedgerEntries::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ledger_entries-department_id")
                    .table(DepartmentLedgerEntries::Table)
                    .col(DepartmentLedgerEntries::DepartmentId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Department balances (ledger-scoped)
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(DepartmentBalances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DepartmentBalances::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DepartmentBalances::TenantId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DepartmentBalances::DepartmentId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DepartmentBalances::MetalId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DepartmentBalances::BalanceGrams)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(DepartmentBalances::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DepartmentBalances::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-department_balances-bucket-unique")
                    .table(DepartmentBalances::Table)
                    .col(DepartmentBalances::TenantId)
                    .col(DepartmentBalances::DepartmentId)
                    .col(DepartmentBalances::MetalId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Department stocks (transfer-scoped, legacy buckets)
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(DepartmentStocks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DepartmentStocks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DepartmentStocks::TenantId).integer().not_null())
                    .col(
                        ColumnDef::new(DepartmentStocks::DepartmentName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DepartmentStocks::MetalCode)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DepartmentStocks::BalanceGrams)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(DepartmentStocks::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DepartmentStocks::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-department_stocks-bucket-unique")
                    .table(DepartmentStocks::Table)
                    .col(DepartmentStocks::TenantId)
                    .col(DepartmentStocks::DepartmentName)
                    .col(DepartmentStocks::MetalCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 8. Manufacturing steps
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(ManufacturingSteps::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ManufacturingSteps::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ManufacturingSteps::TenantId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ManufacturingSteps::OrderId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ManufacturingSteps::ParentStepId).integer())
                    .col(ColumnDef::new(ManufacturingSteps::StepType).string())
                    .col(ColumnDef::new(ManufacturingSteps::Description).text())
                    .col(ColumnDef::new(ManufacturingSteps::Status).string().not_null())
                    .col(ColumnDef::new(ManufacturingSteps::Department).string())
                    .col(ColumnDef::new(ManufacturingSteps::WorkerName).string())
                    .col(ColumnDef::new(ManufacturingSteps::StartedAt).timestamp())
                    .col(ColumnDef::new(ManufacturingSteps::CompletedAt).timestamp())
                    .col(ColumnDef::new(ManufacturingSteps::ReceivedAt).timestamp())
                    .col(ColumnDef::new(ManufacturingSteps::TransferredBy).string())
                    .col(ColumnDef::new(ManufacturingSteps::ReceivedBy).string())
                    .col(ColumnDef::new(ManufacturingSteps::QuantityReceived).double())
                    .col(ColumnDef::new(ManufacturingSteps::QuantityReturned).double())
                    .col(ColumnDef::new(ManufacturingSteps::WeightReceived).double())
                    .col(ColumnDef::new(ManufacturingSteps::WeightReturned).double())
                    .col(ColumnDef::new(ManufacturingSteps::Notes).text())
                    .col(
                        ColumnDef::new(ManufacturingSteps::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ManufacturingSteps::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-manufacturing_steps-order_id")
                            .from(ManufacturingSteps::Table, ManufacturingSteps::OrderId)
                            .to(Orders::Table, Orders::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-manufacturing_steps-parent_step_id")
                            .from(ManufacturingSteps::Table, ManufacturingSteps::ParentStepId)
                            .to(ManufacturingSteps::Table, ManufacturingSteps::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-manufacturing_steps-parent_step_id")
                    .table(ManufacturingSteps::Table)
                    .col(ManufacturingSteps::ParentStepId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-manufacturing_steps-tenant_id-order_id")
                    .table(ManufacturingSteps::Table)
                    .col(ManufacturingSteps::TenantId)
                    .col(ManufacturingSteps::OrderId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 9. Safe supplies
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(SafeSupplies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SafeSupplies::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SafeSupplies::TenantId).integer().not_null())
                    .col(ColumnDef::new(SafeSupplies::MetalId).integer())
                    .col(ColumnDef::new(SafeSupplies::SupplyType).string().not_null())
                    .col(
                        ColumnDef::new(SafeSupplies::QuantityGrams)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(SafeSupplies::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(SafeSupplies::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-safe_supplies-metal_id")
                            .from(SafeSupplies::Table, SafeSupplies::MetalId)
                            .to(Metals::Table, Metals::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-safe_supplies-bucket-unique")
                    .table(SafeSupplies::Table)
                    .col(SafeSupplies::TenantId)
                    .col(SafeSupplies::MetalId)
                    .col(SafeSupplies::SupplyType)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 10. Company metal balances
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(CompanyMetalBalances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CompanyMetalBalances::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CompanyMetalBalances::TenantId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompanyMetalBalances::CompanyId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompanyMetalBalances::MetalId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompanyMetalBalances::BalanceGrams)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(CompanyMetalBalances::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompanyMetalBalances::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-company_metal_balances-company_id")
                            .from(
                                CompanyMetalBalances::Table,
                                CompanyMetalBalances::CompanyId,
                            )
                            .to(Companies::Table, Companies::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-company_metal_balances-metal_id")
                            .from(CompanyMetalBalances::Table, CompanyMetalBalances::MetalId)
                            .to(Metals::Table, Metals::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-company_metal_balances-bucket-unique")
                    .table(CompanyMetalBalances::Table)
                    .col(CompanyMetalBalances::TenantId)
                    .col(CompanyMetalBalances::CompanyId)
                    .col(CompanyMetalBalances::MetalId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 11. Metal transactions (audit trail)
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(MetalTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MetalTransactions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MetalTransactions::TenantId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MetalTransactions::TransactionType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MetalTransactions::MetalId).integer())
                    .col(ColumnDef::new(MetalTransactions::CompanyId).integer())
                    .col(ColumnDef::new(MetalTransactions::OrderId).integer())
                    .col(
                        ColumnDef::new(MetalTransactions::QuantityGrams)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MetalTransactions::Notes).text())
                    .col(
                        ColumnDef::new(MetalTransactions::CreatedBy)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MetalTransactions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-metal_transactions-tenant_id-created_at")
                    .table(MetalTransactions::Table)
                    .col(MetalTransactions::TenantId)
                    .col(MetalTransactions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MetalTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CompanyMetalBalances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SafeSupplies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ManufacturingSteps::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DepartmentStocks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DepartmentBalances::Table).to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(DepartmentLedgerEntries::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Metals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Companies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Departments::Table).to_owned())
            .await?;
        Ok(())
    }
}
