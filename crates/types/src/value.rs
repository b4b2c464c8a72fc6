//! Closed set of values a snapshot field can hold

use serde::{Deserialize, Serialize};

use crate::field::FieldType;
use crate::machine::{MachineInfo, ParameterRecord, ParameterValue, RawStatus};

/// Composite record values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    MachineInfo(MachineInfo),
    RawStatus(RawStatus),
    Parameter(ParameterRecord),
}

/// A single field value.
///
/// Equality is structural: sequences compare element-wise over their full
/// length, so a length change is always a difference.
///
/// Serialized with the variant name alongside the content
/// (`{"type": "integer_list", "value": [100, 200]}`), so empty lists keep
/// their element type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Integer(i64),
    Text(String),
    TextList(Vec<String>),
    IntegerList(Vec<i64>),
    Record(Record),
}

impl FieldValue {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Integer(_) => FieldType::Integer,
            FieldValue::Text(_) => FieldType::Text,
            FieldValue::TextList(_) => FieldType::TextList,
            FieldValue::IntegerList(_) => FieldType::IntegerList,
            FieldValue::Record(_) => FieldType::Record,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_text_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::TextList(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_integer_list(&self) -> Option<&[i64]> {
        match self {
            FieldValue::IntegerList(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_raw_status(&self) -> Option<&RawStatus> {
        match self {
            FieldValue::Record(Record::RawStatus(status)) => Some(status),
            _ => None,
        }
    }

    pub fn as_machine_info(&self) -> Option<&MachineInfo> {
        match self {
            FieldValue::Record(Record::MachineInfo(info)) => Some(info),
            _ => None,
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(v: Vec<String>) -> Self {
        FieldValue::TextList(v)
    }
}

impl From<Vec<i64>> for FieldValue {
    fn from(v: Vec<i64>) -> Self {
        FieldValue::IntegerList(v)
    }
}

impl From<RawStatus> for FieldValue {
    fn from(v: RawStatus) -> Self {
        FieldValue::Record(Record::RawStatus(v))
    }
}

impl From<MachineInfo> for FieldValue {
    fn from(v: MachineInfo) -> Self {
        FieldValue::Record(Record::MachineInfo(v))
    }
}

impl From<ParameterValue> for FieldValue {
    fn from(v: ParameterValue) -> Self {
        match v {
            ParameterValue::Integer(n) => FieldValue::Integer(n),
            ParameterValue::Record(record) => FieldValue::Record(Record::Parameter(record)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_equality_is_length_sensitive() {
        let short = FieldValue::from(vec![0i64, 0]);
        let long = FieldValue::from(vec![0i64, 0, 0]);
        assert_ne!(short, long);
        assert_eq!(short, FieldValue::from(vec![0i64, 0]));
        assert_ne!(short, FieldValue::from(vec![0i64, 1]));
    }

    #[test]
    fn test_accessors() {
        let status = FieldValue::from(RawStatus {
            run: 3,
            ..Default::default()
        });
        assert_eq!(status.field_type(), FieldType::Record);
        assert_eq!(status.as_raw_status().map(|s| s.run), Some(3));
        assert!(status.as_machine_info().is_none());
        assert_eq!(FieldValue::from("x").as_text(), Some("x"));
        assert_eq!(FieldValue::from(7).as_integer(), Some(7));
    }

    #[test]
    fn test_tagged_serialization() {
        let names = FieldValue::from(vec!["X".to_string(), "Y".to_string()]);
        assert_eq!(
            serde_json::to_string(&names).unwrap(),
            r#"{"type":"text_list","value":["X","Y"]}"#
        );
        assert_eq!(
            serde_json::to_string(&FieldValue::from(42)).unwrap(),
            r#"{"type":"integer","value":42}"#
        );
    }

    #[test]
    fn test_empty_lists_keep_their_type() {
        for value in [FieldValue::IntegerList(vec![]), FieldValue::TextList(vec![])] {
            let json = serde_json::to_string(&value).unwrap();
            let back: FieldValue = serde_json::from_str(&json).unwrap();
            assert_eq!(back, value);
        }
    }

    #[test]
    fn test_records_parse_back() {
        let status = FieldValue::from(RawStatus {
            run: 3,
            aut: 1,
            ..Default::default()
        });
        let info = FieldValue::from(MachineInfo::default());
        for value in [status, info] {
            let json = serde_json::to_string(&value).unwrap();
            let back: FieldValue = serde_json::from_str(&json).unwrap();
            assert_eq!(back, value);
        }
    }

    #[test]
    fn test_parameter_conversion() {
        let scalar = FieldValue::from(ParameterValue::Integer(12));
        assert_eq!(scalar, FieldValue::Integer(12));

        let record = ParameterRecord {
            number: 1320,
            data_type: 2,
            values: vec![100, 200],
        };
        let value = FieldValue::from(ParameterValue::Record(record.clone()));
        assert_eq!(value, FieldValue::Record(Record::Parameter(record)));
    }
}
