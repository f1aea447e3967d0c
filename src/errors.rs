//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_institute_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum InstituteError {
            $($variant(String),)*
        }

        impl InstituteError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(InstituteError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(InstituteError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(InstituteError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl InstituteError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        InstituteError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_institute_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    DateParse("E010", "Date Parse Error"),
    Authentication("E011", "Authentication Error"),
    Authorization("E012", "Authorization Error"),
    Conflict("E013", "Conflict"),
    DocumentRender("E014", "Document Render Error"),
    MailDelivery("E015", "Mail Delivery Error"),
}

impl InstituteError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for InstituteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for InstituteError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for InstituteError {
    fn from(err: sea_orm::DbErr) -> Self {
        InstituteError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for InstituteError {
    fn from(err: std::io::Error) -> Self {
        InstituteError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for InstituteError {
    fn from(err: serde_json::Error) -> Self {
        InstituteError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for InstituteError {
    fn from(err: chrono::ParseError) -> Self {
        InstituteError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, InstituteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(InstituteError::cache_connection("test").code(), "E001");
        assert_eq!(InstituteError::database_config("test").code(), "E003");
        assert_eq!(InstituteError::validation("test").code(), "E007");
        assert_eq!(InstituteError::conflict("test").code(), "E013");
        assert_eq!(InstituteError::mail_delivery("test").code(), "E015");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            InstituteError::document_render("test").error_type(),
            "Document Render Error"
        );
        assert_eq!(
            InstituteError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = InstituteError::validation("Batch capacity reached.");
        assert_eq!(err.message(), "Batch capacity reached.");
    }

    #[test]
    fn test_format_simple() {
        let err = InstituteError::not_found("Course 3");
        let formatted = err.format_simple();
        assert!(formatted.contains("Resource Not Found"));
        assert!(formatted.contains("Course 3"));
    }

    #[test]
    fn test_from_chrono_parse_error() {
        let parse_err = chrono::NaiveDate::parse_from_str("2025-13-40", "%Y-%m-%d").unwrap_err();
        let err: InstituteError = parse_err.into();
        assert_eq!(err.code(), "E010");
    }
}
