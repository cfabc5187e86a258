use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().null())
                    .col(ColumnDef::new(Users::FullName).string().not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string()
                            .not_null()
                            .default("user"),
                    )
                    .col(
                        ColumnDef::new(Users::ExternalId)
                            .string()
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::MatricNumber).string().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 作业提交表（matric_number 与 users 之间不建外键）
        manager
            .create_table(
                Table::create()
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assignments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Assignments::StudentName).string().not_null())
                    .col(
                        ColumnDef::new(Assignments::MatricNumber)
                            .string()
                            .not_null(),
                    )
                    // 检索列：写入时按 Unicode 规则折叠为小写
                    .col(
                        ColumnDef::new(Assignments::StudentNameSearch)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::MatricNumberSearch)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Assignments::Level).string().not_null())
                    .col(ColumnDef::new(Assignments::CourseCode).string().not_null())
                    .col(ColumnDef::new(Assignments::FileUrl).text().not_null())
                    .col(ColumnDef::new(Assignments::FileKey).string().not_null())
                    .col(
                        ColumnDef::new(Assignments::UploadedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_assignments_uploaded_at")
                    .table(Assignments::Table)
                    .col(Assignments::UploadedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_assignments_matric_number_search")
                    .table(Assignments::Table)
                    .col(Assignments::MatricNumberSearch)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Assignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Email,
    PasswordHash,
    FullName,
    Role,
    ExternalId,
    MatricNumber,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Assignments {
    #[sea_orm(iden = "assignments")]
    Table,
    Id,
    StudentName,
    MatricNumber,
    StudentNameSearch,
    MatricNumberSearch,
    Level,
    CourseCode,
    FileUrl,
    FileKey,
    UploadedAt,
}
