//! 查询参数的宽松反序列化
//!
//! `web::Query` 与 `#[serde(flatten)]` 组合时所有值都以字符串到达，
//! 这里的函数同时接受原生类型和字符串形式。

use serde::de::{Deserializer, Error, Unexpected, Visitor};
use std::fmt;

struct OptionalI64Visitor;

impl<'de> Visitor<'de> for OptionalI64Visitor {
    type Value = Option<i64>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an integer, a string containing an integer, or nothing")
    }

    fn visit_none<E: Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        d.deserialize_any(self)
    }

    fn visit_i64<E: Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(Some(value))
    }

    fn visit_u64<E: Error>(self, value: u64) -> Result<Self::Value, E> {
        i64::try_from(value)
            .map(Some)
            .map_err(|_| Error::invalid_value(Unexpected::Unsigned(value), &self))
    }

    fn visit_str<E: Error>(self, value: &str) -> Result<Self::Value, E> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(None);
        }
        value
            .parse()
            .map(Some)
            .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
    }
}

struct OptionalBoolVisitor;

impl<'de> Visitor<'de> for OptionalBoolVisitor {
    type Value = Option<bool>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a boolean, \"true\"/\"false\", \"1\"/\"0\", or nothing")
    }

    fn visit_none<E: Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        d.deserialize_any(self)
    }

    fn visit_bool<E: Error>(self, value: bool) -> Result<Self::Value, E> {
        Ok(Some(value))
    }

    fn visit_str<E: Error>(self, value: &str) -> Result<Self::Value, E> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" => Ok(None),
            "true" | "1" | "yes" => Ok(Some(true)),
            "false" | "0" | "no" => Ok(Some(false)),
            _ => Err(Error::invalid_value(Unexpected::Str(value), &self)),
        }
    }
}

pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(OptionalI64Visitor)
}

pub fn deserialize_optional_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(OptionalBoolVisitor)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Filter {
        #[serde(default, deserialize_with = "super::deserialize_optional_i64")]
        course_id: Option<i64>,
        #[serde(default, deserialize_with = "super::deserialize_optional_bool")]
        active: Option<bool>,
    }

    #[test]
    fn test_string_values() {
        let f: Filter = serde_json::from_str(r#"{"course_id":"12","active":"true"}"#).unwrap();
        assert_eq!(f.course_id, Some(12));
        assert_eq!(f.active, Some(true));
    }

    #[test]
    fn test_native_and_missing_values() {
        let f: Filter = serde_json::from_str(r#"{"course_id":7,"active":false}"#).unwrap();
        assert_eq!(f.course_id, Some(7));
        assert_eq!(f.active, Some(false));

        let f: Filter = serde_json::from_str("{}").unwrap();
        assert_eq!(f.course_id, None);
        assert_eq!(f.active, None);
    }

    #[test]
    fn test_invalid_bool() {
        assert!(serde_json::from_str::<Filter>(r#"{"active":"maybe"}"#).is_err());
    }
}
