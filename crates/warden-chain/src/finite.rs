//! Walks a value's serialization and rejects NaN and infinities.
//!
//! `serde_json` writes non-finite floats as `null`, which would give
//! `{"x": NaN}` and `{"x": null}` the same digest.

use serde::ser::{
    self, Serialize, SerializeMap, SerializeSeq, SerializeStruct, SerializeStructVariant,
    SerializeTuple, SerializeTupleStruct, SerializeTupleVariant, Serializer,
};

use crate::error::ChainError;

/// Fails on the first non-finite `f32`/`f64` anywhere inside `value`.
pub(crate) fn ensure_finite<T: Serialize + ?Sized>(value: &T) -> Result<(), ChainError> {
    value.serialize(FiniteCheck)
}

impl ser::Error for ChainError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        ChainError::Serialization(msg.to_string())
    }
}

#[derive(Clone, Copy)]
struct FiniteCheck;

type Check = Result<(), ChainError>;

fn float(v: f64) -> Check {
    if v.is_finite() {
        Ok(())
    } else {
        Err(ChainError::Serialization(format!(
            "non-finite number {v} cannot be hashed"
        )))
    }
}

impl Serializer for FiniteCheck {
    type Ok = ();
    type Error = ChainError;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, _: bool) -> Check {
        Ok(())
    }
    fn serialize_i8(self, _: i8) -> Check {
        Ok(())
    }
    fn serialize_i16(self, _: i16) -> Check {
        Ok(())
    }
    fn serialize_i32(self, _: i32) -> Check {
        Ok(())
    }
    fn serialize_i64(self, _: i64) -> Check {
        Ok(())
    }
    fn serialize_u8(self, _: u8) -> Check {
        Ok(())
    }
    fn serialize_u16(self, _: u16) -> Check {
        Ok(())
    }
    fn serialize_u32(self, _: u32) -> Check {
        Ok(())
    }
    fn serialize_u64(self, _: u64) -> Check {
        Ok(())
    }
    fn serialize_f32(self, v: f32) -> Check {
        float(f64::from(v))
    }
    fn serialize_f64(self, v: f64) -> Check {
        float(v)
    }
    fn serialize_char(self, _: char) -> Check {
        Ok(())
    }
    fn serialize_str(self, _: &str) -> Check {
        Ok(())
    }
    fn serialize_bytes(self, _: &[u8]) -> Check {
        Ok(())
    }
    fn serialize_none(self) -> Check {
        Ok(())
    }
    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Check {
        value.serialize(self)
    }
    fn serialize_unit(self) -> Check {
        Ok(())
    }
    fn serialize_unit_struct(self, _: &'static str) -> Check {
        Ok(())
    }
    fn serialize_unit_variant(self, _: &'static str, _: u32, _: &'static str) -> Check {
        Ok(())
    }
    fn serialize_newtype_struct<T: Serialize + ?Sized>(self, _: &'static str, value: &T) -> Check {
        value.serialize(self)
    }
    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        value: &T,
    ) -> Check {
        value.serialize(self)
    }
    fn serialize_seq(self, _: Option<usize>) -> Result<Self, ChainError> {
        Ok(self)
    }
    fn serialize_tuple(self, _: usize) -> Result<Self, ChainError> {
        Ok(self)
    }
    fn serialize_tuple_struct(self, _: &'static str, _: usize) -> Result<Self, ChainError> {
        Ok(self)
    }
    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self, ChainError> {
        Ok(self)
    }
    fn serialize_map(self, _: Option<usize>) -> Result<Self, ChainError> {
        Ok(self)
    }
    fn serialize_struct(self, _: &'static str, _: usize) -> Result<Self, ChainError> {
        Ok(self)
    }
    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self, ChainError> {
        Ok(self)
    }
}

impl SerializeSeq for FiniteCheck {
    type Ok = ();
    type Error = ChainError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Check {
        value.serialize(*self)
    }
    fn end(self) -> Check {
        Ok(())
    }
}

impl SerializeTuple for FiniteCheck {
    type Ok = ();
    type Error = ChainError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Check {
        value.serialize(*self)
    }
    fn end(self) -> Check {
        Ok(())
    }
}

impl SerializeTupleStruct for FiniteCheck {
    type Ok = ();
    type Error = ChainError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Check {
        value.serialize(*self)
    }
    fn end(self) -> Check {
        Ok(())
    }
}

impl SerializeTupleVariant for FiniteCheck {
    type Ok = ();
    type Error = ChainError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Check {
        value.serialize(*self)
    }
    fn end(self) -> Check {
        Ok(())
    }
}

impl SerializeMap for FiniteCheck {
    type Ok = ();
    type Error = ChainError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Check {
        key.serialize(*self)
    }
    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Check {
        value.serialize(*self)
    }
    fn end(self) -> Check {
        Ok(())
    }
}

impl SerializeStruct for FiniteCheck {
    type Ok = ();
    type Error = ChainError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, _: &'static str, value: &T) -> Check {
        value.serialize(*self)
    }
    fn end(self) -> Check {
        Ok(())
    }
}

impl SerializeStructVariant for FiniteCheck {
    type Ok = ();
    type Error = ChainError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, _: &'static str, value: &T) -> Check {
        value.serialize(*self)
    }
    fn end(self) -> Check {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Reading {
        label: &'static str,
        samples: Vec<Option<f32>>,
    }

    #[derive(Serialize)]
    enum Shape {
        Point { x: f64, y: f64 },
    }

    #[test]
    fn finite_values_pass() {
        let reading = Reading {
            label: "ok",
            samples: vec![Some(1.5), None, Some(-0.0)],
        };
        assert!(ensure_finite(&reading).is_ok());
        assert!(ensure_finite(&serde_json::json!({"a": [1, 2.5, null]})).is_ok());
    }

    #[test]
    fn nested_non_finite_floats_are_found() {
        let reading = Reading {
            label: "bad",
            samples: vec![Some(1.0), Some(f32::NAN)],
        };
        assert!(matches!(
            ensure_finite(&reading),
            Err(ChainError::Serialization(_))
        ));

        let shape = Shape::Point {
            x: 0.0,
            y: f64::NEG_INFINITY,
        };
        assert!(ensure_finite(&shape).is_err());

        let mut map = BTreeMap::new();
        map.insert("k", vec![(1u8, f64::INFINITY)]);
        assert!(ensure_finite(&map).is_err());
    }
}
