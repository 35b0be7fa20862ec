//! Property value codec.
//!
//! Each [`ValueShape`] has one codec that writes a [`PropertyValue`] into
//! its value table(s) and reads it back. Values are keyed by the id of
//! their `material_property_value` header row.
//!
//! | Shape      | Tables |
//! |------------|--------|
//! | `Scalar`   | `material_property_string_value` |
//! | `LongText` | `material_property_long_string_value` |
//! | `List`     | `material_property_string_value`, one row per item |
//! | `LongList` | `material_property_long_string_value`, one row per item |
//! | `Array2D`  | `material_property_array_description` + `material_property_array_value` |
//! | `Array3D`  | as `Array2D`, plus one depth label per slice in `material_property_string_value` |

use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::SqliteConnection;
use tracing::debug;

use matdb_core::{
    Array2D, Array3D, ArrayError, MaterialDbError, MaterialValue, PropertyType, PropertyValue,
    ValueShape,
};

use super::error::{StoreError, StoreResult, to_db, to_index};
use super::row_mappers::{SELECT_VALUE_HEADERS, ValueHeaderRow};

/// Encode/decode pair for one storage shape.
#[async_trait]
pub(crate) trait ValueCodec: Send + Sync {
    fn shape(&self) -> ValueShape;

    async fn encode(
        &self,
        conn: &mut SqliteConnection,
        value_id: i64,
        value: &PropertyValue,
    ) -> StoreResult<()>;

    async fn decode(&self, conn: &mut SqliteConnection, value_id: i64)
    -> StoreResult<PropertyValue>;

    fn mismatch(&self, value: &PropertyValue) -> StoreError {
        StoreError::storage(format!(
            "{:?} codec given a {:?} value",
            self.shape(),
            value.shape()
        ))
    }
}

/// Codec table.
pub(crate) fn codec_for(shape: ValueShape) -> &'static dyn ValueCodec {
    match shape {
        ValueShape::Scalar => &ScalarCodec,
        ValueShape::LongText => &LongTextCodec,
        ValueShape::List => &ListCodec,
        ValueShape::LongList => &LongListCodec,
        ValueShape::Array2D => &Array2DCodec,
        ValueShape::Array3D => &Array3DCodec,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Text tables
// ─────────────────────────────────────────────────────────────────────────────

/// Short strings and long payloads live in separate tables of the same shape.
#[derive(Clone, Copy)]
enum TextTable {
    Short,
    Long,
}

impl TextTable {
    const fn insert_sql(self) -> &'static str {
        match self {
            Self::Short => {
                "INSERT INTO material_property_string_value \
                 (material_property_value_id, material_property_value) VALUES (?, ?)"
            }
            Self::Long => {
                "INSERT INTO material_property_long_string_value \
                 (material_property_value_id, material_property_value) VALUES (?, ?)"
            }
        }
    }

    const fn select_sql(self) -> &'static str {
        match self {
            Self::Short => {
                "SELECT material_property_value FROM material_property_string_value \
                 WHERE material_property_value_id = ? ORDER BY material_property_string_value_id"
            }
            Self::Long => {
                "SELECT material_property_value FROM material_property_long_string_value \
                 WHERE material_property_value_id = ? ORDER BY material_property_long_string_value_id"
            }
        }
    }

    async fn write(
        self,
        conn: &mut SqliteConnection,
        value_id: i64,
        items: &[String],
    ) -> StoreResult<()> {
        for item in items {
            sqlx::query(self.insert_sql())
                .bind(value_id)
                .bind(item)
                .execute(&mut *conn)
                .await?;
        }
        Ok(())
    }

    async fn read(self, conn: &mut SqliteConnection, value_id: i64) -> StoreResult<Vec<String>> {
        let items = sqlx::query_scalar(self.select_sql())
            .bind(value_id)
            .fetch_all(&mut *conn)
            .await?;
        Ok(items)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scalars and lists
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) struct ScalarCodec;
pub(crate) struct LongTextCodec;
pub(crate) struct ListCodec;
pub(crate) struct LongListCodec;

#[async_trait]
impl ValueCodec for ScalarCodec {
    fn shape(&self) -> ValueShape {
        ValueShape::Scalar
    }

    async fn encode(
        &self,
        conn: &mut SqliteConnection,
        value_id: i64,
        value: &PropertyValue,
    ) -> StoreResult<()> {
        let PropertyValue::Scalar(text) = value else {
            return Err(self.mismatch(value));
        };
        TextTable::Short
            .write(conn, value_id, std::slice::from_ref(text))
            .await
    }

    async fn decode(
        &self,
        conn: &mut SqliteConnection,
        value_id: i64,
    ) -> StoreResult<PropertyValue> {
        let items = TextTable::Short.read(conn, value_id).await?;
        Ok(PropertyValue::Scalar(
            items.into_iter().next().unwrap_or_default(),
        ))
    }
}

#[async_trait]
impl ValueCodec for LongTextCodec {
    fn shape(&self) -> ValueShape {
        ValueShape::LongText
    }

    async fn encode(
        &self,
        conn: &mut SqliteConnection,
        value_id: i64,
        value: &PropertyValue,
    ) -> StoreResult<()> {
        let PropertyValue::LongText(text) = value else {
            return Err(self.mismatch(value));
        };
        TextTable::Long
            .write(conn, value_id, std::slice::from_ref(text))
            .await
    }

    async fn decode(
        &self,
        conn: &mut SqliteConnection,
        value_id: i64,
    ) -> StoreResult<PropertyValue> {
        let items = TextTable::Long.read(conn, value_id).await?;
        Ok(PropertyValue::LongText(
            items.into_iter().next().unwrap_or_default(),
        ))
    }
}

#[async_trait]
impl ValueCodec for ListCodec {
    fn shape(&self) -> ValueShape {
        ValueShape::List
    }

    async fn encode(
        &self,
        conn: &mut SqliteConnection,
        value_id: i64,
        value: &PropertyValue,
    ) -> StoreResult<()> {
        let PropertyValue::List(items) = value else {
            return Err(self.mismatch(value));
        };
        TextTable::Short.write(conn, value_id, items).await
    }

    async fn decode(
        &self,
        conn: &mut SqliteConnection,
        value_id: i64,
    ) -> StoreResult<PropertyValue> {
        Ok(PropertyValue::List(
            TextTable::Short.read(conn, value_id).await?,
        ))
    }
}

#[async_trait]
impl ValueCodec for LongListCodec {
    fn shape(&self) -> ValueShape {
        ValueShape::LongList
    }

    async fn encode(
        &self,
        conn: &mut SqliteConnection,
        value_id: i64,
        value: &PropertyValue,
    ) -> StoreResult<()> {
        let PropertyValue::LongList(items) = value else {
            return Err(self.mismatch(value));
        };
        TextTable::Long.write(conn, value_id, items).await
    }

    async fn decode(
        &self,
        conn: &mut SqliteConnection,
        value_id: i64,
    ) -> StoreResult<PropertyValue> {
        Ok(PropertyValue::LongList(
            TextTable::Long.read(conn, value_id).await?,
        ))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Arrays
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) struct Array2DCodec;
pub(crate) struct Array3DCodec;

#[derive(sqlx::FromRow)]
struct ArrayDescription {
    material_property_rows: i64,
    material_property_columns: i64,
    material_property_depth: i64,
}

#[derive(sqlx::FromRow)]
struct ArrayCell {
    material_property_depth: i64,
    material_property_depth_rows: i64,
    material_property_row: i64,
    material_property_column: i64,
    material_property_value: String,
}

fn array_error(e: ArrayError) -> StoreError {
    StoreError::storage(format!("stored array is inconsistent: {e}"))
}

async fn write_description(
    conn: &mut SqliteConnection,
    value_id: i64,
    rows: usize,
    columns: usize,
    depth: usize,
) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO material_property_array_description \
         (material_property_value_id, material_property_rows, material_property_columns, \
          material_property_depth) VALUES (?, ?, ?, ?)",
    )
    .bind(value_id)
    .bind(to_db(rows)?)
    .bind(to_db(columns)?)
    .bind(to_db(depth)?)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn write_cells(
    conn: &mut SqliteConnection,
    value_id: i64,
    depth: usize,
    rows: &[Vec<String>],
) -> StoreResult<()> {
    let depth_rows = to_db(rows.len())?;
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            sqlx::query(
                "INSERT INTO material_property_array_value \
                 (material_property_value_id, material_property_depth, \
                  material_property_depth_rows, material_property_row, \
                  material_property_column, material_property_value) \
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(value_id)
            .bind(to_db(depth)?)
            .bind(depth_rows)
            .bind(to_db(r)?)
            .bind(to_db(c)?)
            .bind(cell)
            .execute(&mut *conn)
            .await?;
        }
    }
    Ok(())
}

async fn read_description(
    conn: &mut SqliteConnection,
    value_id: i64,
) -> StoreResult<ArrayDescription> {
    sqlx::query_as::<_, ArrayDescription>(
        "SELECT material_property_rows, material_property_columns, material_property_depth \
         FROM material_property_array_description WHERE material_property_value_id = ?",
    )
    .bind(value_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| StoreError::storage(format!("array value {value_id} has no description")))
}

async fn read_cells(conn: &mut SqliteConnection, value_id: i64) -> StoreResult<Vec<ArrayCell>> {
    let cells = sqlx::query_as::<_, ArrayCell>(
        "SELECT material_property_depth, material_property_depth_rows, material_property_row, \
                material_property_column, material_property_value \
         FROM material_property_array_value WHERE material_property_value_id = ? \
         ORDER BY material_property_array_value_id",
    )
    .bind(value_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(cells)
}

#[async_trait]
impl ValueCodec for Array2DCodec {
    fn shape(&self) -> ValueShape {
        ValueShape::Array2D
    }

    async fn encode(
        &self,
        conn: &mut SqliteConnection,
        value_id: i64,
        value: &PropertyValue,
    ) -> StoreResult<()> {
        let PropertyValue::Array2D(array) = value else {
            return Err(self.mismatch(value));
        };
        write_description(conn, value_id, array.row_count(), array.columns(), 0).await?;
        write_cells(conn, value_id, 0, array.rows()).await
    }

    async fn decode(
        &self,
        conn: &mut SqliteConnection,
        value_id: i64,
    ) -> StoreResult<PropertyValue> {
        let description = read_description(conn, value_id).await?;
        let cells = read_cells(conn, value_id).await?;

        // Columns first: rows are sized from them.
        let mut array = Array2D::with_columns(to_index(description.material_property_columns)?);
        array.set_rows(to_index(description.material_property_rows)?);
        for cell in cells {
            array
                .set_value(
                    to_index(cell.material_property_row)?,
                    to_index(cell.material_property_column)?,
                    cell.material_property_value,
                )
                .map_err(array_error)?;
        }
        Ok(PropertyValue::Array2D(array))
    }
}

#[async_trait]
impl ValueCodec for Array3DCodec {
    fn shape(&self) -> ValueShape {
        ValueShape::Array3D
    }

    async fn encode(
        &self,
        conn: &mut SqliteConnection,
        value_id: i64,
        value: &PropertyValue,
    ) -> StoreResult<()> {
        let PropertyValue::Array3D(array) = value else {
            return Err(self.mismatch(value));
        };
        write_description(
            conn,
            value_id,
            array.max_rows(),
            array.columns(),
            array.depth(),
        )
        .await?;

        let labels: Vec<String> = array
            .slices()
            .iter()
            .map(|s| s.depth_value.clone())
            .collect();
        TextTable::Short.write(conn, value_id, &labels).await?;

        for (depth, slice) in array.slices().iter().enumerate() {
            write_cells(conn, value_id, depth, &slice.rows).await?;
        }
        Ok(())
    }

    async fn decode(
        &self,
        conn: &mut SqliteConnection,
        value_id: i64,
    ) -> StoreResult<PropertyValue> {
        let description = read_description(conn, value_id).await?;
        let labels = TextTable::Short.read(conn, value_id).await?;
        let cells = read_cells(conn, value_id).await?;

        let mut array = Array3D::with_columns(to_index(description.material_property_columns)?);
        array.set_depth(to_index(description.material_property_depth)?);
        for (depth, label) in labels.into_iter().enumerate() {
            array.set_depth_value(depth, label).map_err(array_error)?;
        }

        for cell in cells {
            let depth = to_index(cell.material_property_depth)?;
            let rows = to_index(cell.material_property_depth_rows)?;
            // Each slice carries its own row count; size it before filling.
            if array.row_count(depth).is_some_and(|n| n < rows) {
                array.set_rows(depth, rows).map_err(array_error)?;
            }
            array
                .set_value(
                    depth,
                    to_index(cell.material_property_row)?,
                    to_index(cell.material_property_column)?,
                    cell.material_property_value,
                )
                .map_err(array_error)?;
        }
        Ok(PropertyValue::Array3D(array))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Value headers
// ─────────────────────────────────────────────────────────────────────────────

/// Persist one material property value.
///
/// Empty quantities are not stored at all.
pub(crate) async fn write_value(
    conn: &mut SqliteConnection,
    material_uuid: &str,
    name: &str,
    value: &MaterialValue,
) -> StoreResult<()> {
    if !value.is_consistent() {
        return Err(MaterialDbError::InvalidValue {
            property: name.to_string(),
            reason: format!(
                "{:?} value does not fit declared type {}",
                value.value.shape(),
                value.property_type
            ),
        }
        .into());
    }
    if let Err(e) = value.value.validate() {
        return Err(MaterialDbError::InvalidValue {
            property: name.to_string(),
            reason: e.to_string(),
        }
        .into());
    }
    if value.property_type == PropertyType::Quantity && value.value.is_empty() {
        debug!(material = material_uuid, property = name, "Skipping empty quantity");
        return Ok(());
    }

    let value_id = sqlx::query(
        "INSERT INTO material_property_value \
         (material_id, material_property_name, material_property_type) VALUES (?, ?, ?)",
    )
    .bind(material_uuid)
    .bind(name)
    .bind(value.property_type.as_str())
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    codec_for(value.value.shape())
        .encode(conn, value_id, &value.value)
        .await
}

/// Every stored value of a material, decoded per its stored type.
pub(crate) async fn read_values(
    conn: &mut SqliteConnection,
    material_uuid: &str,
) -> StoreResult<BTreeMap<String, MaterialValue>> {
    let headers = sqlx::query_as::<_, ValueHeaderRow>(SELECT_VALUE_HEADERS)
        .bind(material_uuid)
        .fetch_all(&mut *conn)
        .await?;

    let mut values = BTreeMap::new();
    for header in headers {
        let property_type = PropertyType::parse(&header.material_property_type);
        let value = codec_for(property_type.shape())
            .decode(conn, header.material_property_value_id)
            .await?;
        values.insert(
            header.material_property_name,
            MaterialValue::new(property_type, value),
        );
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Database;
    use crate::setup::setup_test_database;
    use matdb_core::Quantity;

    const MATERIAL: &str = "0a0a0a0a-0000-4000-8000-000000000001";

    async fn with_material() -> Database {
        let db = setup_test_database().await.unwrap();
        let mut conn = db.acquire().await.unwrap();
        sqlx::query("INSERT INTO library (library_name) VALUES ('User')")
            .execute(&mut *conn)
            .await
            .unwrap();
        sqlx::query("INSERT INTO material (material_id, library_id, material_name) VALUES (?, 1, 'Steel')")
            .bind(MATERIAL)
            .execute(&mut *conn)
            .await
            .unwrap();
        drop(conn);
        db
    }

    async fn round_trip(value: MaterialValue) -> MaterialValue {
        let db = with_material().await;
        let mut conn = db.acquire().await.unwrap();
        write_value(&mut conn, MATERIAL, "P", &value).await.unwrap();
        let mut values = read_values(&mut conn, MATERIAL).await.unwrap();
        values.remove("P").unwrap()
    }

    #[tokio::test]
    async fn test_list_preserves_order() {
        let items = vec!["c".to_string(), "a".to_string(), "b".to_string()];
        let value = MaterialValue::new(PropertyType::FileList, PropertyValue::List(items.clone()));
        assert_eq!(round_trip(value).await.value, PropertyValue::List(items));
    }

    #[tokio::test]
    async fn test_image_list_uses_long_table() {
        let db = with_material().await;
        let mut conn = db.acquire().await.unwrap();
        let value = MaterialValue::new(
            PropertyType::ImageList,
            PropertyValue::LongList(vec!["<svg/>".into(), "<svg></svg>".into()]),
        );
        write_value(&mut conn, MATERIAL, "Images", &value).await.unwrap();

        let long: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM material_property_long_string_value")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        let short: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM material_property_string_value")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        assert_eq!((long, short), (2, 0));
    }

    #[tokio::test]
    async fn test_array2d_round_trip() {
        let mut array = Array2D::with_columns(2);
        array.push_row(&[Quantity::new(20.0, "C"), Quantity::new(7.85, "g/cm^3")]).unwrap();
        array.push_row(&["100 C", "7.8 g/cm^3"]).unwrap();
        let value = MaterialValue::new(PropertyType::Array2D, PropertyValue::Array2D(array.clone()));
        assert_eq!(round_trip(value).await.value, PropertyValue::Array2D(array));
    }

    #[tokio::test]
    async fn test_ragged_array3d_round_trip() {
        let mut array = Array3D::with_columns(2);
        let first = array.push_slice("10 K");
        array.push_row(first, &["1", "2"]).unwrap();
        array.push_row(first, &["3", "4"]).unwrap();
        let second = array.push_slice("20 K");
        for row in [["5", "6"], ["7", "8"], ["9", "10"]] {
            array.push_row(second, &row).unwrap();
        }

        let value = MaterialValue::new(PropertyType::Array3D, PropertyValue::Array3D(array.clone()));
        let PropertyValue::Array3D(read) = round_trip(value).await.value else {
            panic!("expected a 3D array");
        };
        assert_eq!(read.row_count(0), Some(2));
        assert_eq!(read.row_count(1), Some(3));
        assert_eq!(read.depth_value(1), Some("20 K"));
        assert_eq!(read.value(1, 2, 1), Some("10"));
        assert_eq!(read, array);
    }

    #[tokio::test]
    async fn test_empty_quantity_is_skipped() {
        let db = with_material().await;
        let mut conn = db.acquire().await.unwrap();
        let value = MaterialValue::new(PropertyType::Quantity, PropertyValue::Scalar(String::new()));
        write_value(&mut conn, MATERIAL, "Density", &value).await.unwrap();
        assert!(read_values(&mut conn, MATERIAL).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mismatched_shape_is_rejected() {
        let db = with_material().await;
        let mut conn = db.acquire().await.unwrap();
        let value = MaterialValue::new(PropertyType::Svg, PropertyValue::List(vec![]));
        let err = write_value(&mut conn, MATERIAL, "Drawing", &value)
            .await
            .unwrap_err()
            .wrap(MaterialDbError::MaterialCreation);
        assert!(matches!(err, MaterialDbError::InvalidValue { property, .. } if property == "Drawing"));
    }

    #[tokio::test]
    async fn test_unknown_type_is_a_scalar() {
        let value = MaterialValue::new(
            PropertyType::parse("Vector"),
            PropertyValue::scalar("1 2 3"),
        );
        let read = round_trip(value.clone()).await;
        assert_eq!(read, value);
    }
}
