//! 收费收据存储操作

use super::{SeaOrmStorage, map_write_err};
use crate::entity::batches::Entity as Batches;
use crate::entity::fees_receipts::{
    ActiveModel, Column, Entity as FeesReceipts, Model as ReceiptModel, Relation,
};
use crate::entity::format_date;
use crate::entity::students::{Column as StudentColumn, Relation as StudentRelation};
use crate::entity::users::Column as UserColumn;
use crate::errors::{InstituteError, Result};
use crate::models::{
    PaginationInfo,
    common::normalize_page,
    finance::{
        entities::{FeesReceipt, RECEIPT_LOCKED, ReceiptDetail},
        requests::{CreateReceiptRequest, ReceiptListQuery, UpdateReceiptRequest},
        responses::ReceiptListResponse,
    },
};
use crate::storage::today;
use crate::utils::escape_like_pattern;
use crate::utils::numbering::{format_receipt_no, next_sequence};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 锁定最新一张收据，取其序号加一生成收据编号
    pub async fn create_receipt_impl(
        &self,
        posted_by: i64,
        req: CreateReceiptRequest,
    ) -> Result<FeesReceipt> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InstituteError::database_operation(format!("开启事务失败: {e}")))?;

        Self::ensure_batch_matches_course(&txn, req.batch_id, req.course_id).await?;

        let latest = FeesReceipts::find()
            .order_by_desc(Column::Id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询最新收据失败: {e}")))?;

        let sequence = next_sequence(latest.as_ref().map(|r| r.receipt_no.as_str()));

        let model = ActiveModel {
            receipt_no: Set(format_receipt_no(sequence)),
            public_id: Set(uuid::Uuid::new_v4().to_string()),
            student_id: Set(req.student_id),
            course_id: Set(req.course_id),
            batch_id: Set(req.batch_id),
            amount: Set(req.amount),
            mode: Set(req.mode.to_string()),
            txn_id: Set(req.txn_id.trim().to_string()),
            date: Set(format_date(req.date.unwrap_or_else(today))),
            posted_by: Set(Some(posted_by)),
            locked: Set(false),
            pdf_path: Set(None),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| map_write_err(e, "创建收据失败", "Receipt number already in use."))?;

        txn.commit()
            .await
            .map_err(|e| InstituteError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.into_receipt())
    }

    pub async fn get_receipt_by_id_impl(&self, id: i64) -> Result<Option<ReceiptDetail>> {
        let result = FeesReceipts::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询收据失败: {e}")))?;

        match result {
            Some(model) => Ok(self.build_receipt_details(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn get_receipt_by_public_id_impl(
        &self,
        public_id: &str,
    ) -> Result<Option<ReceiptDetail>> {
        let result = FeesReceipts::find()
            .filter(Column::PublicId.eq(public_id))
            .one(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询收据失败: {e}")))?;

        match result {
            Some(model) => Ok(self.build_receipt_details(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn list_receipts_with_pagination_impl(
        &self,
        query: ReceiptListQuery,
    ) -> Result<ReceiptListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = FeesReceipts::find();

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(course_id) = query.course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }
        if let Some(mode) = query.mode {
            select = select.filter(Column::Mode.eq(mode.to_string()));
        }
        // 日期以 YYYY-MM-DD 存储，字符串比较即日期比较
        if let Some(from) = query.date_from {
            select = select.filter(Column::Date.gte(format_date(from)));
        }
        if let Some(to) = query.date_to {
            select = select.filter(Column::Date.lte(format_date(to)));
        }
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select
                .join(JoinType::InnerJoin, Relation::Student.def())
                .join(JoinType::InnerJoin, StudentRelation::User.def())
                .filter(
                    Condition::any()
                        .add(Column::ReceiptNo.contains(&escaped))
                        .add(Column::TxnId.contains(&escaped))
                        .add(StudentColumn::RegNo.contains(&escaped))
                        .add(UserColumn::FirstName.contains(&escaped))
                        .add(UserColumn::LastName.contains(&escaped)),
                );
        }

        select = select
            .order_by_desc(Column::Date)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            InstituteError::database_operation(format!("查询收据总数失败: {e}"))
        })?;
        let pages = paginator.num_pages().await.map_err(|e| {
            InstituteError::database_operation(format!("查询收据页数失败: {e}"))
        })?;
        let receipts = paginator.fetch_page(page - 1).await.map_err(|e| {
            InstituteError::database_operation(format!("查询收据列表失败: {e}"))
        })?;

        Ok(ReceiptListResponse {
            items: self.build_receipt_details(receipts).await?,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新收据；已锁定的收据不可修改
    pub async fn update_receipt_impl(
        &self,
        id: i64,
        update: UpdateReceiptRequest,
    ) -> Result<Option<FeesReceipt>> {
        let Some(existing) = FeesReceipts::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询收据失败: {e}")))?
        else {
            return Ok(None);
        };

        if existing.locked {
            return Err(InstituteError::validation(RECEIPT_LOCKED));
        }

        let course_id = update.course_id.or(existing.course_id);
        let batch_id = update.batch_id.or(existing.batch_id);
        Self::ensure_batch_matches_course(&self.db, batch_id, course_id).await?;

        let mut model = ActiveModel {
            id: Set(id),
            // 修改内容后旧的 PDF 作废，下载时重新生成
            pdf_path: Set(None),
            ..Default::default()
        };
        if update.course_id.is_some() {
            model.course_id = Set(update.course_id);
        }
        if update.batch_id.is_some() {
            model.batch_id = Set(update.batch_id);
        }
        if let Some(amount) = update.amount {
            model.amount = Set(amount);
        }
        if let Some(mode) = update.mode {
            model.mode = Set(mode.to_string());
        }
        if let Some(txn_id) = update.txn_id {
            model.txn_id = Set(txn_id.trim().to_string());
        }
        if let Some(date) = update.date {
            model.date = Set(format_date(date));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("更新收据失败: {e}")))?;

        Ok(Some(updated.into_receipt()))
    }

    pub async fn lock_receipt_impl(&self, id: i64) -> Result<Option<FeesReceipt>> {
        let result = FeesReceipts::update_many()
            .col_expr(Column::Locked, sea_orm::sea_query::Expr::value(true))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("锁定收据失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        let receipt = FeesReceipts::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询收据失败: {e}")))?;

        Ok(receipt.map(|m| m.into_receipt()))
    }

    pub async fn set_receipt_pdf_path_impl(&self, id: i64, path: &str) -> Result<bool> {
        let result = FeesReceipts::update_many()
            .col_expr(Column::PdfPath, sea_orm::sea_query::Expr::value(path))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("更新收据文件失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn delete_receipt_impl(&self, id: i64) -> Result<bool> {
        let result = FeesReceipts::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("删除收据失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 批次必须属于所选课程
    async fn ensure_batch_matches_course<C: ConnectionTrait>(
        conn: &C,
        batch_id: Option<i64>,
        course_id: Option<i64>,
    ) -> Result<()> {
        let Some(batch_id) = batch_id else {
            return Ok(());
        };

        let batch = Batches::find_by_id(batch_id)
            .one(conn)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询批次失败: {e}")))?
            .ok_or_else(|| InstituteError::validation("Selected batch does not exist."))?;

        if Some(batch.course_id) != course_id {
            return Err(InstituteError::validation(
                "Selected batch does not belong to the selected course.",
            ));
        }
        Ok(())
    }

    async fn build_receipt_details(
        &self,
        receipts: Vec<ReceiptModel>,
    ) -> Result<Vec<ReceiptDetail>> {
        let students = self
            .load_student_briefs(receipts.iter().map(|r| r.student_id).collect())
            .await?;
        let courses = self
            .load_courses_map(receipts.iter().filter_map(|r| r.course_id).collect())
            .await?;
        let batches = self
            .load_batch_codes(receipts.iter().filter_map(|r| r.batch_id).collect())
            .await?;
        let posters = self
            .load_users_map(receipts.iter().filter_map(|r| r.posted_by).collect())
            .await?;

        Ok(receipts
            .into_iter()
            .map(|r| {
                let student = students.get(&r.student_id);
                ReceiptDetail {
                    student_name: student.map(|s| s.name.clone()).unwrap_or_default(),
                    reg_no: student.and_then(|s| s.reg_no.clone()),
                    course_title: r
                        .course_id
                        .and_then(|id| courses.get(&id))
                        .map(|c| c.title.clone()),
                    batch_code: r.batch_id.and_then(|id| batches.get(&id).cloned()),
                    posted_by_name: r
                        .posted_by
                        .and_then(|id| posters.get(&id))
                        .map(|u| u.full_name()),
                    receipt: r.into_receipt(),
                }
            })
            .collect())
    }
}
