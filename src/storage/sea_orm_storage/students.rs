//! 学员档案存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::format_date;
use crate::entity::students::{ActiveModel, Column, Entity as Students, Relation};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{InstituteError, Result};
use crate::models::{
    PaginationInfo,
    common::normalize_page,
    students::{
        entities::{Student, StudentDetail, format_reg_no},
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
    users::requests::CreateUserRequest,
};
use crate::storage::today;
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};

/// 列表展示用的学员简要信息
#[derive(Debug, Clone)]
pub(crate) struct StudentBrief {
    pub name: String,
    pub reg_no: Option<String>,
}

impl SeaOrmStorage {
    /// 在同一事务中创建登录账号与学员档案
    pub async fn create_student_impl(
        &self,
        user: CreateUserRequest,
        req: CreateStudentRequest,
    ) -> Result<StudentDetail> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InstituteError::database_operation(format!("开启事务失败: {e}")))?;

        let user = Self::insert_user(&txn, user).await?;

        let now = chrono::Utc::now().timestamp();
        let admission_date = req.admission_date.unwrap_or_else(today);

        let model = ActiveModel {
            user_id: Set(user.id),
            reg_no: Set(None),
            guardian_name: Set(req.guardian_name),
            guardian_phone: Set(req.guardian_phone),
            admission_date: Set(format_date(admission_date)),
            address: Set(req.address),
            photo: Set(None),
            active: Set(req.active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let inserted = model
            .insert(&txn)
            .await
            .map_err(|e| InstituteError::database_operation(format!("创建学员档案失败: {e}")))?;

        // 学号依赖自增 id，插入后再写入
        let student_id = inserted.id;
        let mut stamped: ActiveModel = inserted.into();
        stamped.reg_no = Set(Some(format_reg_no(admission_date, student_id)));
        let student = stamped
            .update(&txn)
            .await
            .map_err(|e| InstituteError::database_operation(format!("生成学号失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| InstituteError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(StudentDetail {
            student: student.into_student(),
            user,
        })
    }

    /// 通过 ID 获取学员档案及账号
    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<StudentDetail>> {
        let result = Students::find_by_id(id)
            .find_also_related(Users)
            .one(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询学员失败: {e}")))?;

        Ok(result.and_then(|(student, user)| {
            user.map(|u| StudentDetail {
                student: student.into_student(),
                user: u.into_user(),
            })
        }))
    }

    /// 通过登录账号获取学员档案
    pub async fn get_student_by_user_id_impl(&self, user_id: i64) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询学员失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 分页列出学员
    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Students::find().join(JoinType::InnerJoin, Relation::User.def());

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::RegNo.contains(&escaped))
                    .add(Column::GuardianName.contains(&escaped))
                    .add(UserColumn::Username.contains(&escaped))
                    .add(UserColumn::FirstName.contains(&escaped))
                    .add(UserColumn::LastName.contains(&escaped))
                    .add(UserColumn::Email.contains(&escaped)),
            );
        }

        if let Some(active) = query.active {
            select = select.filter(Column::Active.eq(active));
        }

        if let Some(date) = query.admission_date {
            select = select.filter(Column::AdmissionDate.eq(format_date(date)));
        }

        if let Some(user_id) = query.user_id {
            select = select.filter(Column::UserId.eq(user_id));
        }

        select = select.order_by_desc(Column::CreatedAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            InstituteError::database_operation(format!("查询学员总数失败: {e}"))
        })?;
        let pages = paginator.num_pages().await.map_err(|e| {
            InstituteError::database_operation(format!("查询学员页数失败: {e}"))
        })?;
        let students = paginator.fetch_page(page - 1).await.map_err(|e| {
            InstituteError::database_operation(format!("查询学员列表失败: {e}"))
        })?;

        let user_ids = students.iter().map(|s| s.user_id).collect();
        let mut users = self.load_users_map(user_ids).await?;

        let items = students
            .into_iter()
            .filter_map(|s| {
                let user = users.remove(&s.user_id)?;
                Some(StudentDetail {
                    student: s.into_student(),
                    user,
                })
            })
            .collect();

        Ok(StudentListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新学员档案
    pub async fn update_student_impl(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<StudentDetail>> {
        if Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询学员失败: {e}")))?
            .is_none()
        {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(guardian_name) = update.guardian_name {
            model.guardian_name = Set(guardian_name);
        }
        if let Some(guardian_phone) = update.guardian_phone {
            model.guardian_phone = Set(guardian_phone);
        }
        if let Some(admission_date) = update.admission_date {
            model.admission_date = Set(format_date(admission_date));
        }
        if let Some(address) = update.address {
            model.address = Set(address);
        }
        if let Some(active) = update.active {
            model.active = Set(active);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("更新学员失败: {e}")))?;

        self.get_student_by_id_impl(id).await
    }

    /// 更新学员照片路径
    pub async fn update_student_photo_impl(&self, id: i64, photo: &str) -> Result<Option<Student>> {
        let result = Students::update_many()
            .col_expr(Column::Photo, sea_orm::sea_query::Expr::value(photo))
            .col_expr(
                Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("更新学员照片失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        let student = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询学员失败: {e}")))?;

        Ok(student.map(|m| m.into_student()))
    }

    /// 删除学员档案及登录账号
    pub async fn delete_student_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InstituteError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(student) = Students::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询学员失败: {e}")))?
        else {
            return Ok(false);
        };

        Students::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| InstituteError::database_operation(format!("删除学员失败: {e}")))?;

        Users::delete_by_id(student.user_id)
            .exec(&txn)
            .await
            .map_err(|e| InstituteError::database_operation(format!("删除学员账号失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| InstituteError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(true)
    }

    /// 批量加载学员简要信息，返回 student_id -> StudentBrief
    pub(crate) async fn load_student_briefs(
        &self,
        ids: Vec<i64>,
    ) -> Result<HashMap<i64, StudentBrief>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = Students::find()
            .filter(Column::Id.is_in(ids))
            .find_also_related(Users)
            .all(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("批量查询学员失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(student, user)| {
                let name = user
                    .map(|u| u.into_user().full_name())
                    .unwrap_or_default();
                (
                    student.id,
                    StudentBrief {
                        name,
                        reg_no: student.reg_no,
                    },
                )
            })
            .collect())
    }
}
