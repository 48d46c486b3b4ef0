//! Response outlines built straight from `Serialize`, without materialising
//! the body. Only the first element of a top-level sequence is walked; the
//! rest are counted and never serialized.

use std::fmt::Display;

use serde::{
	Serialize,
	ser::{self, SerializeMap, SerializeSeq, SerializeStruct},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
	Null,
	Bool,
	Number,
	String { len: usize },
	Sequence { len: usize },
	Record { fields: usize },
}

impl Display for ValueKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ValueKind::Null => write!(f, "null"),
			ValueKind::Bool => write!(f, "bool"),
			ValueKind::Number => write!(f, "number"),
			ValueKind::String { len } => write!(f, "string({len})"),
			ValueKind::Sequence { len } => write!(f, "sequence({len})"),
			ValueKind::Record { fields } => write!(f, "record({fields})"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldShape {
	pub name: String,
	pub kind: ValueKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementShape {
	Record(Vec<FieldShape>),
	Value(ValueKind),
}

impl ElementShape {
	pub fn field(&self, name: &str) -> Option<ValueKind> {
		match self {
			ElementShape::Record(fields) => fields.iter().find(|f| f.name == name).map(|f| f.kind),
			ElementShape::Value(_) => None,
		}
	}
}

/// Outline of a response body: for sequences, the length and the shape of
/// the first element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyShape {
	Sequence {
		len: usize,
		first: Option<ElementShape>,
	},
	Record(Vec<FieldShape>),
	Value(ValueKind),
	Unavailable,
}

impl BodyShape {
	/// Never fails; a body whose `Serialize` impl errors is `Unavailable`.
	pub fn of<T: Serialize + ?Sized>(data: &T) -> Self {
		match data.serialize(Shaper(Depth::Body)) {
			Ok(Shape::Sequence { len, first }) => BodyShape::Sequence { len, first },
			Ok(Shape::Record(fields)) => BodyShape::Record(fields),
			Ok(Shape::Kind(kind)) => BodyShape::Value(kind),
			Err(_) => BodyShape::Unavailable,
		}
	}
}

fn write_fields(f: &mut std::fmt::Formatter<'_>, fields: &[FieldShape]) -> std::fmt::Result {
	write!(f, "{{")?;
	for (i, field) in fields.iter().enumerate() {
		if i > 0 {
			write!(f, ", ")?;
		}
		write!(f, "{}: {}", field.name, field.kind)?;
	}
	write!(f, "}}")
}

impl Display for BodyShape {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			BodyShape::Sequence { len, first: None } => write!(f, "sequence of {len}"),
			BodyShape::Sequence {
				len,
				first: Some(ElementShape::Record(fields)),
			} => {
				write!(f, "sequence of {len}, first ")?;
				write_fields(f, fields)
			}
			BodyShape::Sequence {
				len,
				first: Some(ElementShape::Value(kind)),
			} => write!(f, "sequence of {len}, first {kind}"),
			BodyShape::Record(fields) => {
				write!(f, "record ")?;
				write_fields(f, fields)
			}
			BodyShape::Value(kind) => write!(f, "{kind}"),
			BodyShape::Unavailable => write!(f, "unavailable"),
		}
	}
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct ShapeError(String);

impl ser::Error for ShapeError {
	fn custom<T: Display>(msg: T) -> Self {
		ShapeError(msg.to_string())
	}
}

/// How much detail the current value gets: the body itself, the first
/// element of a sequence body, or a field of either (kind only).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Depth {
	Body,
	Element,
	Field,
}

enum Shape {
	Kind(ValueKind),
	Record(Vec<FieldShape>),
	Sequence {
		len: usize,
		first: Option<ElementShape>,
	},
}

impl Shape {
	fn into_kind(self) -> ValueKind {
		match self {
			Shape::Kind(kind) => kind,
			Shape::Record(fields) => ValueKind::Record {
				fields: fields.len(),
			},
			Shape::Sequence { len, .. } => ValueKind::Sequence { len },
		}
	}
}

fn kind_of<T: Serialize + ?Sized>(value: &T) -> Result<ValueKind, ShapeError> {
	Ok(value.serialize(Shaper(Depth::Field))?.into_kind())
}

fn element_of<T: Serialize + ?Sized>(value: &T) -> Result<ElementShape, ShapeError> {
	Ok(match value.serialize(Shaper(Depth::Element))? {
		Shape::Record(fields) => ElementShape::Record(fields),
		other => ElementShape::Value(other.into_kind()),
	})
}

// map keys are rendered the way they appear in JSON
fn key_name<T: Serialize + ?Sized>(key: &T) -> Result<String, ShapeError> {
	match serde_json::to_value(key) {
		Ok(serde_json::Value::String(name)) => Ok(name),
		Ok(other) => Ok(other.to_string()),
		Err(e) => Err(ShapeError(e.to_string())),
	}
}

// externally tagged, like serde_json: `{"Variant": ...}`
fn variant_shape(depth: Depth, variant: &'static str, kind: ValueKind) -> Shape {
	match depth {
		Depth::Field => Shape::Kind(ValueKind::Record { fields: 1 }),
		_ => Shape::Record(vec![FieldShape {
			name: variant.to_owned(),
			kind,
		}]),
	}
}

struct Shaper(Depth);

macro_rules! number {
	($($method:ident: $ty:ty),* $(,)?) => {
		$(
			fn $method(self, _v: $ty) -> Result<Shape, ShapeError> {
				Ok(Shape::Kind(ValueKind::Number))
			}
		)*
	};
}

impl ser::Serializer for Shaper {
	type Ok = Shape;
	type Error = ShapeError;
	type SerializeSeq = SequenceShaper;
	type SerializeTuple = SequenceShaper;
	type SerializeTupleStruct = SequenceShaper;
	type SerializeTupleVariant = VariantShaper<SequenceShaper>;
	type SerializeMap = RecordShaper;
	type SerializeStruct = RecordShaper;
	type SerializeStructVariant = VariantShaper<RecordShaper>;

	number! {
		serialize_i8: i8,
		serialize_i16: i16,
		serialize_i32: i32,
		serialize_i64: i64,
		serialize_i128: i128,
		serialize_u8: u8,
		serialize_u16: u16,
		serialize_u32: u32,
		serialize_u64: u64,
		serialize_u128: u128,
	}

	fn serialize_bool(self, _v: bool) -> Result<Shape, ShapeError> {
		Ok(Shape::Kind(ValueKind::Bool))
	}

	fn serialize_f32(self, v: f32) -> Result<Shape, ShapeError> {
		ser::Serializer::serialize_f64(self, f64::from(v))
	}

	// serde_json writes non-finite floats as null
	fn serialize_f64(self, v: f64) -> Result<Shape, ShapeError> {
		Ok(Shape::Kind(if v.is_finite() {
			ValueKind::Number
		} else {
			ValueKind::Null
		}))
	}

	fn serialize_char(self, v: char) -> Result<Shape, ShapeError> {
		Ok(Shape::Kind(ValueKind::String { len: v.len_utf8() }))
	}

	fn serialize_str(self, v: &str) -> Result<Shape, ShapeError> {
		Ok(Shape::Kind(ValueKind::String { len: v.len() }))
	}

	fn serialize_bytes(self, v: &[u8]) -> Result<Shape, ShapeError> {
		Ok(match self.0 {
			Depth::Body => Shape::Sequence {
				len: v.len(),
				first: v.first().map(|_| ElementShape::Value(ValueKind::Number)),
			},
			_ => Shape::Kind(ValueKind::Sequence { len: v.len() }),
		})
	}

	fn serialize_none(self) -> Result<Shape, ShapeError> {
		Ok(Shape::Kind(ValueKind::Null))
	}

	fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Shape, ShapeError> {
		value.serialize(self)
	}

	fn serialize_unit(self) -> Result<Shape, ShapeError> {
		Ok(Shape::Kind(ValueKind::Null))
	}

	fn serialize_unit_struct(self, _name: &'static str) -> Result<Shape, ShapeError> {
		Ok(Shape::Kind(ValueKind::Null))
	}

	fn serialize_unit_variant(
		self,
		_name: &'static str,
		_variant_index: u32,
		variant: &'static str,
	) -> Result<Shape, ShapeError> {
		Ok(Shape::Kind(ValueKind::String { len: variant.len() }))
	}

	fn serialize_newtype_struct<T: Serialize + ?Sized>(
		self,
		_name: &'static str,
		value: &T,
	) -> Result<Shape, ShapeError> {
		value.serialize(self)
	}

	fn serialize_newtype_variant<T: Serialize + ?Sized>(
		self,
		_name: &'static str,
		_variant_index: u32,
		variant: &'static str,
		value: &T,
	) -> Result<Shape, ShapeError> {
		let kind = match self.0 {
			Depth::Field => ValueKind::Null,
			_ => kind_of(value)?,
		};
		Ok(variant_shape(self.0, variant, kind))
	}

	fn serialize_seq(self, _len: Option<usize>) -> Result<SequenceShaper, ShapeError> {
		Ok(SequenceShaper::new(self.0))
	}

	fn serialize_tuple(self, _len: usize) -> Result<SequenceShaper, ShapeError> {
		Ok(SequenceShaper::new(self.0))
	}

	fn serialize_tuple_struct(
		self,
		_name: &'static str,
		_len: usize,
	) -> Result<SequenceShaper, ShapeError> {
		Ok(SequenceShaper::new(self.0))
	}

	fn serialize_tuple_variant(
		self,
		_name: &'static str,
		_variant_index: u32,
		variant: &'static str,
		_len: usize,
	) -> Result<VariantShaper<SequenceShaper>, ShapeError> {
		Ok(VariantShaper {
			depth: self.0,
			variant,
			inner: SequenceShaper::new(Depth::Field),
		})
	}

	fn serialize_map(self, _len: Option<usize>) -> Result<RecordShaper, ShapeError> {
		Ok(RecordShaper::new(self.0))
	}

	fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<RecordShaper, ShapeError> {
		Ok(RecordShaper::new(self.0))
	}

	fn serialize_struct_variant(
		self,
		_name: &'static str,
		_variant_index: u32,
		variant: &'static str,
		_len: usize,
	) -> Result<VariantShaper<RecordShaper>, ShapeError> {
		Ok(VariantShaper {
			depth: self.0,
			variant,
			inner: RecordShaper::new(Depth::Field),
		})
	}
}

struct SequenceShaper {
	depth: Depth,
	len: usize,
	first: Option<ElementShape>,
}

impl SequenceShaper {
	fn new(depth: Depth) -> Self {
		Self {
			depth,
			len: 0,
			first: None,
		}
	}
}

impl SerializeSeq for SequenceShaper {
	type Ok = Shape;
	type Error = ShapeError;

	fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ShapeError> {
		if self.depth == Depth::Body && self.len == 0 {
			self.first = Some(element_of(value)?);
		}
		self.len += 1;
		Ok(())
	}

	fn end(self) -> Result<Shape, ShapeError> {
		Ok(match self.depth {
			Depth::Body => Shape::Sequence {
				len: self.len,
				first: self.first,
			},
			_ => Shape::Kind(ValueKind::Sequence { len: self.len }),
		})
	}
}

impl ser::SerializeTuple for SequenceShaper {
	type Ok = Shape;
	type Error = ShapeError;

	fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ShapeError> {
		SerializeSeq::serialize_element(self, value)
	}

	fn end(self) -> Result<Shape, ShapeError> {
		SerializeSeq::end(self)
	}
}

impl ser::SerializeTupleStruct for SequenceShaper {
	type Ok = Shape;
	type Error = ShapeError;

	fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ShapeError> {
		SerializeSeq::serialize_element(self, value)
	}

	fn end(self) -> Result<Shape, ShapeError> {
		SerializeSeq::end(self)
	}
}

struct RecordShaper {
	depth: Depth,
	count: usize,
	fields: Vec<FieldShape>,
	pending_key: Option<String>,
}

impl RecordShaper {
	fn new(depth: Depth) -> Self {
		Self {
			depth,
			count: 0,
			fields: Vec::new(),
			pending_key: None,
		}
	}

	fn push<T: Serialize + ?Sized>(&mut self, name: String, value: &T) -> Result<(), ShapeError> {
		self.fields.push(FieldShape {
			name,
			kind: kind_of(value)?,
		});
		Ok(())
	}

	fn finish(self) -> Shape {
		match self.depth {
			Depth::Field => Shape::Kind(ValueKind::Record { fields: self.count }),
			_ => Shape::Record(self.fields),
		}
	}
}

impl SerializeMap for RecordShaper {
	type Ok = Shape;
	type Error = ShapeError;

	fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), ShapeError> {
		self.count += 1;
		if self.depth != Depth::Field {
			self.pending_key = Some(key_name(key)?);
		}
		Ok(())
	}

	fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ShapeError> {
		match self.pending_key.take() {
			Some(name) => self.push(name, value),
			None => Ok(()),
		}
	}

	fn end(self) -> Result<Shape, ShapeError> {
		Ok(self.finish())
	}
}

impl SerializeStruct for RecordShaper {
	type Ok = Shape;
	type Error = ShapeError;

	fn serialize_field<T: Serialize + ?Sized>(
		&mut self,
		key: &'static str,
		value: &T,
	) -> Result<(), ShapeError> {
		self.count += 1;
		if self.depth == Depth::Field {
			return Ok(());
		}
		self.push(key.to_owned(), value)
	}

	fn end(self) -> Result<Shape, ShapeError> {
		Ok(self.finish())
	}
}

struct VariantShaper<S> {
	depth: Depth,
	variant: &'static str,
	inner: S,
}

impl ser::SerializeTupleVariant for VariantShaper<SequenceShaper> {
	type Ok = Shape;
	type Error = ShapeError;

	fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ShapeError> {
		SerializeSeq::serialize_element(&mut self.inner, value)
	}

	fn end(self) -> Result<Shape, ShapeError> {
		let kind = SerializeSeq::end(self.inner)?.into_kind();
		Ok(variant_shape(self.depth, self.variant, kind))
	}
}

impl ser::SerializeStructVariant for VariantShaper<RecordShaper> {
	type Ok = Shape;
	type Error = ShapeError;

	fn serialize_field<T: Serialize + ?Sized>(
		&mut self,
		key: &'static str,
		value: &T,
	) -> Result<(), ShapeError> {
		SerializeStruct::serialize_field(&mut self.inner, key, value)
	}

	fn end(self) -> Result<Shape, ShapeError> {
		let kind = self.inner.finish().into_kind();
		Ok(variant_shape(self.depth, self.variant, kind))
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn test_sequence_shape_describes_first_element() {
		let shape = BodyShape::of(&json!([
			{"ic50": 5, "disease_name": "X", "molecule_image": "abc"},
			{"ic50": 6}
		]));
		let BodyShape::Sequence {
			len,
			first: Some(first),
		} = &shape
		else {
			panic!("expected a sequence, got {shape:?}");
		};
		assert_eq!(*len, 2);
		assert_eq!(first.field("ic50"), Some(ValueKind::Number));
		assert_eq!(
			first.field("disease_name"),
			Some(ValueKind::String { len: 1 })
		);
		assert_eq!(
			first.field("molecule_image"),
			Some(ValueKind::String { len: 3 })
		);
		assert_eq!(
			shape.to_string(),
			"sequence of 2, first {disease_name: string(1), ic50: number, molecule_image: string(3)}"
		);
	}

	#[test]
	fn test_empty_sequence() {
		let shape = BodyShape::of(&Vec::<u32>::new());
		assert_eq!(shape, BodyShape::Sequence { len: 0, first: None });
		assert_eq!(shape.to_string(), "sequence of 0");
	}

	#[test]
	fn test_non_sequence_bodies() {
		assert_eq!(
			BodyShape::of(&json!("plain text")),
			BodyShape::Value(ValueKind::String { len: 10 })
		);
		assert_eq!(
			BodyShape::of(&json!({"status": "healthy"})),
			BodyShape::Record(vec![FieldShape {
				name: "status".to_string(),
				kind: ValueKind::String { len: 7 },
			}])
		);
		assert_eq!(
			BodyShape::of(&json!([1, 2])),
			BodyShape::Sequence {
				len: 2,
				first: Some(ElementShape::Value(ValueKind::Number)),
			}
		);
	}

	#[test]
	fn test_unserializable_body_is_unavailable() {
		struct Broken;
		impl Serialize for Broken {
			fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
				Err(serde::ser::Error::custom("cannot serialize"))
			}
		}
		assert_eq!(BodyShape::of(&Broken), BodyShape::Unavailable);
	}

	#[test]
	fn test_struct_fields_in_declaration_order() {
		use aushadhi_types::api::chembl::Hit;

		let hits = vec![Hit {
			ic50: Some(5.0),
			disease_name: Some("X".to_string()),
			molecule_image: Some("abc".to_string()),
			..Default::default()
		}];
		assert_eq!(
			BodyShape::of(&hits).to_string(),
			"sequence of 1, first {ic50: number, disease_name: string(1), molecule_image: string(3)}"
		);
	}

	#[test]
	fn test_only_first_element_is_serialized() {
		// a later element that cannot serialize must not be visited
		struct Element(bool);
		impl Serialize for Element {
			fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
				if self.0 {
					return Err(serde::ser::Error::custom("visited"));
				}
				serializer.serialize_str("ok")
			}
		}
		assert_eq!(
			BodyShape::of(&[Element(false), Element(true), Element(true)]),
			BodyShape::Sequence {
				len: 3,
				first: Some(ElementShape::Value(ValueKind::String { len: 2 })),
			}
		);
	}

	#[test]
	fn test_nested_values_are_counted() {
		let shape = BodyShape::of(&json!([{"pathways": ["a", "b", "c"], "meta": {"k": 1}, "x": null}]));
		let BodyShape::Sequence {
			first: Some(first), ..
		} = shape
		else {
			panic!("expected a sequence");
		};
		assert_eq!(first.field("pathways"), Some(ValueKind::Sequence { len: 3 }));
		assert_eq!(first.field("meta"), Some(ValueKind::Record { fields: 1 }));
		assert_eq!(first.field("x"), Some(ValueKind::Null));
	}
}

