//! 预导入模块，方便使用

pub use super::attendance_entries::{
    ActiveModel as AttendanceEntryActiveModel, Entity as AttendanceEntries,
    Model as AttendanceEntryModel,
};
pub use super::attendance_records::{
    ActiveModel as AttendanceRecordActiveModel, Entity as AttendanceRecords,
    Model as AttendanceRecordModel,
};
pub use super::batches::{ActiveModel as BatchActiveModel, Entity as Batches, Model as BatchModel};
pub use super::certificates::{
    ActiveModel as CertificateActiveModel, Entity as Certificates, Model as CertificateModel,
};
pub use super::conversations::{
    ActiveModel as ConversationActiveModel, Entity as Conversations, Model as ConversationModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::enrollments::{
    ActiveModel as EnrollmentActiveModel, Entity as Enrollments, Model as EnrollmentModel,
};
pub use super::events::{ActiveModel as EventActiveModel, Entity as Events, Model as EventModel};
pub use super::expenses::{
    ActiveModel as ExpenseActiveModel, Entity as Expenses, Model as ExpenseModel,
};
pub use super::fees_receipts::{
    ActiveModel as FeesReceiptActiveModel, Entity as FeesReceipts, Model as FeesReceiptModel,
};
pub use super::messages::{
    ActiveModel as MessageActiveModel, Entity as Messages, Model as MessageModel,
};
pub use super::notifications::{
    ActiveModel as NotificationActiveModel, Entity as Notifications, Model as NotificationModel,
};
pub use super::payrolls::{
    ActiveModel as PayrollActiveModel, Entity as Payrolls, Model as PayrollModel,
};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::trainers::{
    ActiveModel as TrainerActiveModel, Entity as Trainers, Model as TrainerModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
