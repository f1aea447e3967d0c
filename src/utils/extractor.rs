//! 路径参数提取器
//!
//! 在进入处理函数前校验路径参数，非法值直接返回统一格式的 400 响应。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn bad_path_param(message: String) -> actix_web::Error {
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(message, response).into()
}

/// 解析正整数 ID
pub fn parse_positive_id(raw: Option<&str>, name: &str) -> Result<i64, String> {
    let raw = raw.ok_or_else(|| format!("Missing path parameter: {name}"))?;
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(format!("Invalid {name}: {raw}")),
    }
}

/// 解析 UUID 形式的公开令牌，统一为小写
pub fn parse_uuid_token(raw: Option<&str>, name: &str) -> Result<String, String> {
    let raw = raw.ok_or_else(|| format!("Missing path parameter: {name}"))?;
    uuid::Uuid::parse_str(raw)
        .map(|u| u.hyphenated().to_string())
        .map_err(|_| format!("Invalid {name}: {raw}"))
}

macro_rules! define_id_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(
                    parse_positive_id(req.match_info().get($param), $param)
                        .map($name)
                        .map_err(bad_path_param),
                )
            }
        }
    };
}

macro_rules! define_token_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub String);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(
                    parse_uuid_token(req.match_info().get($param), $param)
                        .map($name)
                        .map_err(bad_path_param),
                )
            }
        }
    };
}

define_id_extractor!(SafeIDI64, "id");
define_id_extractor!(SafeStudentIdI64, "student_id");
define_id_extractor!(SafeCourseIdI64, "course_id");
define_token_extractor!(SafePublicId, "public_id");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_id() {
        assert_eq!(parse_positive_id(Some("42"), "id"), Ok(42));
        assert!(parse_positive_id(Some("0"), "id").is_err());
        assert!(parse_positive_id(Some("-3"), "id").is_err());
        assert!(parse_positive_id(Some("abc"), "id").is_err());
        assert!(parse_positive_id(None, "id").is_err());
    }

    #[test]
    fn test_parse_uuid_token() {
        let token = "6F9619FF-8B86-D011-B42D-00CF4FC964FF";
        assert_eq!(
            parse_uuid_token(Some(token), "qr_hash").unwrap(),
            "6f9619ff-8b86-d011-b42d-00cf4fc964ff"
        );
        assert!(parse_uuid_token(Some("not-a-uuid"), "qr_hash").is_err());
    }
}
