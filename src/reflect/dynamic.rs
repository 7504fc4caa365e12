//! [`ReflectMessage`] for `prost_reflect::DynamicMessage`.

use super::{Field, FieldValue, MapValue, ReflectMessage, Scalar};
use prost_reflect::{DynamicMessage, FieldDescriptor, Kind, MapKey, ReflectMessage as _, Value};
use std::borrow::Cow;

impl ReflectMessage for DynamicMessage {
    fn full_name(&self) -> Cow<'_, str> {
        Cow::Owned(self.descriptor().full_name().to_string())
    }

    fn fields(&self) -> Box<dyn Iterator<Item = Field<'_>> + '_> {
        // `MessageDescriptor::fields` iterates by number, the raw proto keeps declaration order.
        let declared: Vec<u32> = self
            .descriptor()
            .descriptor_proto()
            .field
            .iter()
            .filter_map(|f| u32::try_from(f.number()).ok())
            .collect();
        let mut populated: Vec<(usize, Field<'_>)> = DynamicMessage::fields(self)
            .map(|(desc, value)| {
                let position = declared
                    .iter()
                    .position(|&n| n == desc.number())
                    .unwrap_or(usize::MAX);
                (position, project_field(&desc, value))
            })
            .collect();
        populated.sort_by_key(|(position, _)| *position);
        Box::new(populated.into_iter().map(|(_, field)| field))
    }
}

fn project_field<'a>(desc: &FieldDescriptor, value: &'a Value) -> Field<'a> {
    let unsupported = || FieldValue::Unsupported(format!("{:?}", desc.kind()));
    let projected = match value {
        Value::Message(message) => FieldValue::Message(message),
        Value::List(items) if matches!(desc.kind(), Kind::Message(_)) => items
            .iter()
            .map(|item| match item {
                Value::Message(message) => Some(message as &dyn ReflectMessage),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map_or_else(unsupported, FieldValue::RepeatedMessage),
        Value::List(items) => items
            .iter()
            .map(scalar)
            .collect::<Option<Vec<_>>>()
            .map_or_else(unsupported, FieldValue::RepeatedScalar),
        Value::Map(entries) => entries
            .iter()
            .map(|(key, value)| Some((map_key(key), map_value(value)?)))
            .collect::<Option<Vec<_>>>()
            .map_or_else(unsupported, FieldValue::Map),
        other => scalar(other).map_or_else(unsupported, FieldValue::Scalar),
    };
    Field::new(desc.name().to_string(), projected)
}

fn scalar(value: &Value) -> Option<Scalar<'_>> {
    let scalar = match value {
        Value::Bool(v) => Scalar::Bool(*v),
        Value::I32(v) => Scalar::I32(*v),
        Value::I64(v) => Scalar::I64(*v),
        Value::U32(v) => Scalar::U32(*v),
        Value::U64(v) => Scalar::U64(*v),
        Value::F32(v) => Scalar::F32(*v),
        Value::F64(v) => Scalar::F64(*v),
        Value::String(s) => Scalar::String(Cow::Borrowed(s.as_str())),
        Value::Bytes(b) => Scalar::Bytes(Cow::Borrowed(&b[..])),
        Value::EnumNumber(n) => Scalar::Enum(*n),
        Value::Message(_) | Value::List(_) | Value::Map(_) => return None,
    };
    Some(scalar)
}

fn map_key(key: &MapKey) -> Scalar<'_> {
    match key {
        MapKey::Bool(v) => Scalar::Bool(*v),
        MapKey::I32(v) => Scalar::I32(*v),
        MapKey::I64(v) => Scalar::I64(*v),
        MapKey::U32(v) => Scalar::U32(*v),
        MapKey::U64(v) => Scalar::U64(*v),
        MapKey::String(s) => Scalar::String(Cow::Borrowed(s.as_str())),
    }
}

fn map_value(value: &Value) -> Option<MapValue<'_>> {
    match value {
        Value::Message(message) => Some(MapValue::Message(message)),
        other => scalar(other).map(MapValue::Scalar),
    }
}
