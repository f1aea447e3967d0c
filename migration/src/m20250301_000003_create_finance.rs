use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建收费收据表
        manager
            .create_table(
                Table::create()
                    .table(FeesReceipts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FeesReceipts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FeesReceipts::ReceiptNo)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(FeesReceipts::PublicId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(FeesReceipts::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FeesReceipts::CourseId).big_integer().null())
                    .col(ColumnDef::new(FeesReceipts::BatchId).big_integer().null())
                    .col(ColumnDef::new(FeesReceipts::Amount).double().not_null())
                    .col(ColumnDef::new(FeesReceipts::Mode).string().not_null())
                    .col(ColumnDef::new(FeesReceipts::TxnId).string().not_null())
                    .col(ColumnDef::new(FeesReceipts::Date).string().not_null())
                    .col(ColumnDef::new(FeesReceipts::PostedBy).big_integer().null())
                    .col(ColumnDef::new(FeesReceipts::Locked).boolean().not_null())
                    .col(ColumnDef::new(FeesReceipts::PdfPath).string().null())
                    .col(
                        ColumnDef::new(FeesReceipts::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(FeesReceipts::Table, FeesReceipts::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(FeesReceipts::Table, FeesReceipts::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(FeesReceipts::Table, FeesReceipts::BatchId)
                            .to(Batches::Table, Batches::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(FeesReceipts::Table, FeesReceipts::PostedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建支出表
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::Date).string().not_null())
                    .col(ColumnDef::new(Expenses::Description).string().not_null())
                    .col(ColumnDef::new(Expenses::Category).string().not_null())
                    .col(ColumnDef::new(Expenses::Amount).double().not_null())
                    .col(ColumnDef::new(Expenses::AddedBy).big_integer().null())
                    .col(ColumnDef::new(Expenses::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Expenses::Table, Expenses::AddedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建工资发放表
        manager
            .create_table(
                Table::create()
                    .table(Payrolls::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payrolls::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Payrolls::TrainerId).big_integer().not_null())
                    .col(ColumnDef::new(Payrolls::Month).string().not_null())
                    .col(ColumnDef::new(Payrolls::Amount).double().not_null())
                    .col(ColumnDef::new(Payrolls::PaidOn).string().null())
                    .col(ColumnDef::new(Payrolls::Remarks).text().not_null())
                    .col(ColumnDef::new(Payrolls::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Payrolls::Table, Payrolls::TrainerId)
                            .to(Trainers::Table, Trainers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_fees_receipts_date")
                    .table(FeesReceipts::Table)
                    .col(FeesReceipts::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_fees_receipts_student")
                    .table(FeesReceipts::Table)
                    .col(FeesReceipts::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_expenses_category")
                    .table(Expenses::Table)
                    .col(Expenses::Category)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_payrolls_trainer_month")
                    .table(Payrolls::Table)
                    .col(Payrolls::TrainerId)
                    .col(Payrolls::Month)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payrolls::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FeesReceipts::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Students {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Courses {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Batches {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Trainers {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum FeesReceipts {
    Table,
    Id,
    ReceiptNo,
    PublicId,
    StudentId,
    CourseId,
    BatchId,
    Amount,
    Mode,
    TxnId,
    Date,
    PostedBy,
    Locked,
    PdfPath,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Expenses {
    Table,
    Id,
    Date,
    Description,
    Category,
    Amount,
    AddedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Payrolls {
    Table,
    Id,
    TrainerId,
    Month,
    Amount,
    PaidOn,
    Remarks,
    CreatedAt,
}
