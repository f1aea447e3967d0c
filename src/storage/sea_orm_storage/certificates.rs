//! 证书存储操作

use super::{SeaOrmStorage, map_write_err};
use crate::entity::certificates::{
    ActiveModel, Column, Entity as Certificates, Model as CertificateModel, Relation,
};
use crate::entity::courses::Column as CourseColumn;
use crate::entity::format_date;
use crate::entity::students::{Column as StudentColumn, Relation as StudentRelation};
use crate::entity::users::Column as UserColumn;
use crate::errors::{InstituteError, Result};
use crate::models::{
    PaginationInfo,
    certificates::{
        entities::{CERTIFICATE_ALREADY_ISSUED, Certificate, CertificateDetail},
        requests::{CertificateListQuery, CreateCertificateRequest, UpdateCertificateRequest},
        responses::CertificateListResponse,
    },
    common::normalize_page,
};
use crate::storage::today;
use crate::utils::escape_like_pattern;
use crate::utils::numbering::{format_certificate_no, next_sequence};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 锁定最新一张证书，取其序号加一生成证书编号
    pub async fn create_certificate_impl(
        &self,
        req: CreateCertificateRequest,
    ) -> Result<Certificate> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InstituteError::database_operation(format!("开启事务失败: {e}")))?;

        let latest = Certificates::find()
            .order_by_desc(Column::Id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询最新证书失败: {e}")))?;

        if Self::active_certificate_exists(&txn, req.student_id, req.course_id, None).await? {
            return Err(InstituteError::validation(CERTIFICATE_ALREADY_ISSUED));
        }

        let issue_date = req.issue_date.unwrap_or_else(today);
        let sequence = next_sequence(latest.as_ref().map(|c| c.certificate_no.as_str()));

        let model = ActiveModel {
            certificate_no: Set(format_certificate_no(issue_date, sequence)),
            student_id: Set(req.student_id),
            course_id: Set(req.course_id),
            issue_date: Set(format_date(issue_date)),
            qr_hash: Set(uuid::Uuid::new_v4().to_string()),
            remarks: Set(req.remarks),
            revoked: Set(false),
            pdf_path: Set(None),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| map_write_err(e, "创建证书失败", "Certificate number already in use."))?;

        txn.commit()
            .await
            .map_err(|e| InstituteError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.into_certificate())
    }

    pub async fn get_certificate_by_id_impl(&self, id: i64) -> Result<Option<CertificateDetail>> {
        let result = Certificates::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询证书失败: {e}")))?;

        match result {
            Some(model) => Ok(self.build_certificate_details(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn get_certificate_by_qr_hash_impl(
        &self,
        qr_hash: &str,
    ) -> Result<Option<CertificateDetail>> {
        let result = Certificates::find()
            .filter(Column::QrHash.eq(qr_hash))
            .one(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询证书失败: {e}")))?;

        match result {
            Some(model) => Ok(self.build_certificate_details(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    /// 学员某课程未吊销的证书
    pub async fn find_active_certificate_impl(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Certificate>> {
        let result = Certificates::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::Revoked.eq(false))
            .one(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询证书失败: {e}")))?;

        Ok(result.map(|m| m.into_certificate()))
    }

    pub async fn list_certificates_with_pagination_impl(
        &self,
        query: CertificateListQuery,
    ) -> Result<CertificateListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Certificates::find();

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(course_id) = query.course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }
        if let Some(revoked) = query.revoked {
            select = select.filter(Column::Revoked.eq(revoked));
        }
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select
                .join(JoinType::InnerJoin, Relation::Student.def())
                .join(JoinType::InnerJoin, StudentRelation::User.def())
                .join(JoinType::InnerJoin, Relation::Course.def())
                .filter(
                    Condition::any()
                        .add(Column::CertificateNo.contains(&escaped))
                        .add(StudentColumn::RegNo.contains(&escaped))
                        .add(UserColumn::FirstName.contains(&escaped))
                        .add(UserColumn::LastName.contains(&escaped))
                        .add(CourseColumn::Title.contains(&escaped)),
                );
        }

        select = select.order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            InstituteError::database_operation(format!("查询证书总数失败: {e}"))
        })?;
        let pages = paginator.num_pages().await.map_err(|e| {
            InstituteError::database_operation(format!("查询证书页数失败: {e}"))
        })?;
        let certificates = paginator.fetch_page(page - 1).await.map_err(|e| {
            InstituteError::database_operation(format!("查询证书列表失败: {e}"))
        })?;

        Ok(CertificateListResponse {
            items: self.build_certificate_details(certificates).await?,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_certificate_impl(
        &self,
        id: i64,
        update: UpdateCertificateRequest,
    ) -> Result<Option<Certificate>> {
        let mut model = ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(remarks) = update.remarks {
            model.remarks = Set(remarks);
        }
        if let Some(issue_date) = update.issue_date {
            model.issue_date = Set(format_date(issue_date));
        }

        self.apply_certificate_update(id, model).await
    }

    /// 恢复证书时，同一学员与课程不能已有另一张有效证书
    pub async fn set_certificate_revoked_impl(
        &self,
        id: i64,
        revoked: bool,
    ) -> Result<Option<Certificate>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InstituteError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = Certificates::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询证书失败: {e}")))?
        else {
            return Ok(None);
        };

        if existing.revoked == revoked {
            return Ok(Some(existing.into_certificate()));
        }

        if !revoked
            && Self::active_certificate_exists(
                &txn,
                existing.student_id,
                existing.course_id,
                Some(id),
            )
            .await?
        {
            return Err(InstituteError::validation(CERTIFICATE_ALREADY_ISSUED));
        }

        let updated = ActiveModel {
            id: Set(id),
            revoked: Set(revoked),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(|e| InstituteError::database_operation(format!("更新证书失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| InstituteError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(updated.into_certificate()))
    }

    async fn active_certificate_exists<C: ConnectionTrait>(
        conn: &C,
        student_id: i64,
        course_id: i64,
        exclude_id: Option<i64>,
    ) -> Result<bool> {
        let mut select = Certificates::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::Revoked.eq(false));
        if let Some(id) = exclude_id {
            select = select.filter(Column::Id.ne(id));
        }

        let count = select
            .count(conn)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询证书失败: {e}")))?;

        Ok(count > 0)
    }

    pub async fn set_certificate_pdf_path_impl(&self, id: i64, path: &str) -> Result<bool> {
        let result = Certificates::update_many()
            .col_expr(Column::PdfPath, sea_orm::sea_query::Expr::value(path))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("更新证书文件失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn delete_certificate_impl(&self, id: i64) -> Result<bool> {
        let result = Certificates::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("删除证书失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    async fn apply_certificate_update(
        &self,
        id: i64,
        model: ActiveModel,
    ) -> Result<Option<Certificate>> {
        let Some(existing) = Certificates::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询证书失败: {e}")))?
        else {
            return Ok(None);
        };

        let updated = if model.is_changed() {
            model
                .update(&self.db)
                .await
                .map_err(|e| InstituteError::database_operation(format!("更新证书失败: {e}")))?
        } else {
            existing
        };

        Ok(Some(updated.into_certificate()))
    }

    async fn build_certificate_details(
        &self,
        certificates: Vec<CertificateModel>,
    ) -> Result<Vec<CertificateDetail>> {
        let students = self
            .load_student_briefs(certificates.iter().map(|c| c.student_id).collect())
            .await?;
        let courses = self
            .load_courses_map(certificates.iter().map(|c| c.course_id).collect())
            .await?;

        Ok(certificates
            .into_iter()
            .map(|c| {
                let student = students.get(&c.student_id);
                let course = courses.get(&c.course_id);
                let certificate = c.into_certificate();
                CertificateDetail {
                    student_name: student.map(|s| s.name.clone()).unwrap_or_default(),
                    reg_no: student.and_then(|s| s.reg_no.clone()),
                    course_code: course.map(|c| c.code.clone()).unwrap_or_default(),
                    course_title: course.map(|c| c.title.clone()).unwrap_or_default(),
                    duration_weeks: course.map(|c| c.duration_weeks).unwrap_or(0),
                    has_pdf: certificate.has_pdf(),
                    certificate,
                }
            })
            .collect())
    }
}
