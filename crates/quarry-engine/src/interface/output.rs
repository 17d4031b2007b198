// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use quarry_core::{
	Schema, TupleVector, Value,
	value::elements,
};
use quarry_type::{Decimal, Result, internal_err};
use serde_json::{Map, Number, Value as Json};

/// A result sink. The writer owns the serialization format; the engine only
/// issues structural and typed write calls.
pub trait OutputWriter {
	fn init_result(&mut self, columns: &[String]) -> Result<()>;

	fn end_result(&mut self) -> Result<()> {
		Ok(())
	}

	fn start_row(&mut self) -> Result<()>;

	fn end_row(&mut self) -> Result<()>;

	fn start_object(&mut self) -> Result<()>;

	fn end_object(&mut self) -> Result<()>;

	fn start_array(&mut self) -> Result<()>;

	fn end_array(&mut self) -> Result<()>;

	fn write_field_name(&mut self, name: &str) -> Result<()>;

	fn write_null(&mut self) -> Result<()>;

	fn write_boolean(&mut self, value: bool) -> Result<()>;

	fn write_int(&mut self, value: i32) -> Result<()>;

	fn write_long(&mut self, value: i64) -> Result<()>;

	fn write_float(&mut self, value: f32) -> Result<()>;

	fn write_double(&mut self, value: f64) -> Result<()>;

	fn write_decimal(&mut self, value: &Decimal) -> Result<()>;

	fn write_string(&mut self, value: &str) -> Result<()>;

	fn write_datetime(&mut self, value: NaiveDateTime) -> Result<()>;

	fn write_datetime_offset(&mut self, value: DateTime<FixedOffset>) -> Result<()>;
}

pub(crate) fn visible_columns(schema: &Schema) -> Vec<String> {
	schema.iter().filter(|column| !column.is_internal()).map(|column| column.output_name().to_string()).collect()
}

/// Writes a complete result for one batch.
pub fn emit(writer: &mut dyn OutputWriter, tuple: &dyn TupleVector) -> Result<usize> {
	writer.init_result(&visible_columns(tuple.schema()))?;
	let rows = emit_rows(writer, tuple)?;
	writer.end_result()?;
	Ok(rows)
}

/// Writes the rows of `tuple` as field/value pairs, skipping internal columns.
pub fn emit_rows(writer: &mut dyn OutputWriter, tuple: &dyn TupleVector) -> Result<usize> {
	let columns: Vec<_> = tuple
		.schema()
		.iter()
		.enumerate()
		.filter(|(_, column)| !column.is_internal())
		.map(|(index, column)| (column.output_name(), tuple.column(index)))
		.collect();
	for row in 0..tuple.row_count() {
		writer.start_row()?;
		for (name, vector) in &columns {
			writer.write_field_name(name)?;
			let value = vector.as_ref().map(|vector| vector.get_any(row)).unwrap_or(Value::Null);
			write_value(writer, &value)?;
		}
		writer.end_row()?;
	}
	Ok(tuple.row_count())
}

/// Writes one value. Tables become arrays of objects, sequences and arrays
/// become arrays.
pub fn write_value(writer: &mut dyn OutputWriter, value: &Value) -> Result<()> {
	match value {
		Value::Null => writer.write_null(),
		Value::Boolean(v) => writer.write_boolean(*v),
		Value::Int(v) => writer.write_int(*v),
		Value::Long(v) => writer.write_long(*v),
		Value::Float(v) => writer.write_float(*v),
		Value::Double(v) => writer.write_double(*v),
		Value::Decimal(v) => writer.write_decimal(v),
		Value::String(v) => writer.write_string(v),
		Value::DateTime(v) => writer.write_datetime(*v),
		Value::DateTimeOffset(v) => writer.write_datetime_offset(*v),
		Value::Table(table) => {
			writer.start_array()?;
			for row in 0..table.row_count() {
				writer.start_object()?;
				for (index, column) in table.schema().iter().enumerate() {
					if column.is_internal() {
						continue;
					}
					writer.write_field_name(column.output_name())?;
					let value = table.column(index).map(|vector| vector.get_any(row)).unwrap_or(Value::Null);
					write_value(writer, &value)?;
				}
				writer.end_object()?;
			}
			writer.end_array()
		}
		Value::Object(object) => {
			writer.start_object()?;
			for (name, value) in object.iter() {
				writer.write_field_name(name)?;
				write_value(writer, value)?;
			}
			writer.end_object()
		}
		Value::Array(_) | Value::List(_) | Value::Sequence(_) => {
			writer.start_array()?;
			if let Some(items) = elements(value) {
				for item in items {
					write_value(writer, &item?)?;
				}
			}
			writer.end_array()
		}
	}
}

#[derive(Debug)]
enum Frame {
	Object(Map<String, Json>, Option<String>),
	Array(Vec<Json>),
}

/// Collects rows as JSON objects.
#[derive(Debug, Default)]
pub struct JsonOutputWriter {
	columns: Vec<String>,
	rows: Vec<Json>,
	stack: Vec<Frame>,
}

impl JsonOutputWriter {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn columns(&self) -> &[String] {
		&self.columns
	}

	pub fn rows(&self) -> &[Json] {
		&self.rows
	}

	pub fn into_json(self) -> Json {
		Json::Array(self.rows)
	}

	fn write(&mut self, value: Json) -> Result<()> {
		match self.stack.last_mut() {
			Some(Frame::Array(items)) => {
				items.push(value);
				Ok(())
			}
			Some(Frame::Object(fields, pending)) => match pending.take() {
				Some(name) => {
					fields.insert(name, value);
					Ok(())
				}
				None => internal_err!("value written into an object without a field name"),
			},
			None => internal_err!("value written outside of a row"),
		}
	}

	fn close(&mut self) -> Result<Json> {
		match self.stack.pop() {
			Some(Frame::Object(fields, None)) => Ok(Json::Object(fields)),
			Some(Frame::Array(items)) => Ok(Json::Array(items)),
			Some(Frame::Object(_, Some(name))) => internal_err!("field '{}' has no value", name),
			None => internal_err!("no open object or array"),
		}
	}

	fn close_nested(&mut self) -> Result<()> {
		let value = self.close()?;
		self.write(value)
	}
}

fn number(value: f64) -> Json {
	Number::from_f64(value).map(Json::Number).unwrap_or(Json::Null)
}

impl OutputWriter for JsonOutputWriter {
	fn init_result(&mut self, columns: &[String]) -> Result<()> {
		self.columns = columns.to_vec();
		Ok(())
	}

	fn end_result(&mut self) -> Result<()> {
		if !self.stack.is_empty() {
			return internal_err!("result ended with {} open containers", self.stack.len());
		}
		Ok(())
	}

	fn start_row(&mut self) -> Result<()> {
		if !self.stack.is_empty() {
			return internal_err!("row started inside another row");
		}
		self.stack.push(Frame::Object(Map::new(), None));
		Ok(())
	}

	fn end_row(&mut self) -> Result<()> {
		let row = self.close()?;
		self.rows.push(row);
		Ok(())
	}

	fn start_object(&mut self) -> Result<()> {
		self.stack.push(Frame::Object(Map::new(), None));
		Ok(())
	}

	fn end_object(&mut self) -> Result<()> {
		self.close_nested()
	}

	fn start_array(&mut self) -> Result<()> {
		self.stack.push(Frame::Array(Vec::new()));
		Ok(())
	}

	fn end_array(&mut self) -> Result<()> {
		self.close_nested()
	}

	fn write_field_name(&mut self, name: &str) -> Result<()> {
		match self.stack.last_mut() {
			Some(Frame::Object(_, pending)) => {
				*pending = Some(name.to_string());
				Ok(())
			}
			_ => internal_err!("field name '{}' written outside of an object", name),
		}
	}

	fn write_null(&mut self) -> Result<()> {
		self.write(Json::Null)
	}

	fn write_boolean(&mut self, value: bool) -> Result<()> {
		self.write(Json::Bool(value))
	}

	fn write_int(&mut self, value: i32) -> Result<()> {
		self.write(Json::from(value))
	}

	fn write_long(&mut self, value: i64) -> Result<()> {
		self.write(Json::from(value))
	}

	fn write_float(&mut self, value: f32) -> Result<()> {
		self.write(number(value as f64))
	}

	fn write_double(&mut self, value: f64) -> Result<()> {
		self.write(number(value))
	}

	fn write_decimal(&mut self, value: &Decimal) -> Result<()> {
		self.write(Json::String(value.to_string()))
	}

	fn write_string(&mut self, value: &str) -> Result<()> {
		self.write(Json::String(value.to_string()))
	}

	fn write_datetime(&mut self, value: NaiveDateTime) -> Result<()> {
		self.write(Json::String(value.format("%Y-%m-%dT%H:%M:%S%.f").to_string()))
	}

	fn write_datetime_offset(&mut self, value: DateTime<FixedOffset>) -> Result<()> {
		self.write(Json::String(value.to_rfc3339()))
	}
}
