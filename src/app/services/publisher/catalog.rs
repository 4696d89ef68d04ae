//! Relational catalog store backed by SQLite.
//!
//! The catalog holds one row per product per supplier for the search
//! surface. Publication uses replace-all-for-supplier semantics: delete
//! plus bulk insert inside a single transaction, so readers never observe
//! a half-replaced supplier. Three derived `*_norm` columns carry the
//! alphanumeric upper-case forms used for prefix search.
//!
//! Uses parameterized queries exclusively; all writes are transactional.

use crate::app::models::NormalizedRecord;
use crate::app::services::record_processor::enrichment::strip_non_alnum_upper;
use crate::Result;
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::info;

/// Catalog row as returned by search queries.
#[derive(Debug, Clone)]
pub struct CatalogRow {
    pub supplier_id: i64,
    pub code: String,
    pub unicode: String,
    pub brand: String,
    pub name: String,
    pub stock: i64,
    pub price: f64,
}

/// Handle to the product catalog database.
pub struct Catalog {
    conn: Connection,
}

impl Catalog {
    /// Open (and if necessary initialize) a catalog database file
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// In-memory catalog for tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS product_catalog (
                supplier_id INTEGER NOT NULL,
                code TEXT NOT NULL,
                unicode TEXT NOT NULL,
                brand TEXT NOT NULL,
                name TEXT NOT NULL,
                stock INTEGER NOT NULL,
                price REAL NOT NULL,
                code_norm TEXT NOT NULL,
                unicode_norm TEXT NOT NULL,
                brand_norm TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_catalog_supplier ON product_catalog(supplier_id);
            CREATE INDEX IF NOT EXISTS idx_catalog_code_norm ON product_catalog(code_norm);
            CREATE INDEX IF NOT EXISTS idx_catalog_unicode_norm ON product_catalog(unicode_norm);
            CREATE INDEX IF NOT EXISTS idx_catalog_brand_norm ON product_catalog(brand_norm);
            ",
        )
    }

    /// Atomically replace every catalog row for a supplier with the given
    /// priced records.
    ///
    /// Embedded NUL bytes from legacy feeds are stripped before insert;
    /// they corrupt text columns otherwise.
    pub fn replace_supplier_rows(
        &mut self,
        supplier_id: i64,
        records: &[NormalizedRecord],
    ) -> Result<usize> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM product_catalog WHERE supplier_id = ?1",
            params![supplier_id],
        )?;

        let mut inserted = 0usize;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO product_catalog
                 (supplier_id, code, unicode, brand, name, stock, price,
                  code_norm, unicode_norm, brand_norm)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;

            for record in records {
                let code = sanitize(&record.code);
                let unicode = sanitize(&record.lookup_code);
                let brand = sanitize(&record.brand);
                let name = sanitize(&record.name);
                stmt.execute(params![
                    supplier_id,
                    code,
                    unicode,
                    brand,
                    name,
                    record.stock,
                    if record.price.is_nan() { 0.0 } else { record.price },
                    strip_non_alnum_upper(&code),
                    strip_non_alnum_upper(&unicode),
                    strip_non_alnum_upper(&brand),
                ])?;
                inserted += 1;
            }
        }
        tx.commit()?;

        info!(supplier_id, rows = inserted, "replaced catalog rows");
        Ok(inserted)
    }

    /// Number of catalog rows for a supplier
    pub fn count_for_supplier(&self, supplier_id: i64) -> Result<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM product_catalog WHERE supplier_id = ?1",
            params![supplier_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Prefix search over the normalized code, lookup code and brand
    /// columns. The query is canonicalized the same way the columns were,
    /// so `"of-935"`, `"OF 935"` and `"of935"` all find the same rows.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<CatalogRow>> {
        let pattern = format!("{}%", strip_non_alnum_upper(query));
        let mut stmt = self.conn.prepare_cached(
            "SELECT supplier_id, code, unicode, brand, name, stock, price
             FROM product_catalog
             WHERE code_norm LIKE ?1 OR unicode_norm LIKE ?1 OR brand_norm LIKE ?1
             ORDER BY supplier_id, code
             LIMIT ?2",
        )?;

        let rows = stmt
            .query_map(params![pattern, limit as i64], |row| {
                Ok(CatalogRow {
                    supplier_id: row.get(0)?,
                    code: row.get(1)?,
                    unicode: row.get(2)?,
                    brand: row.get(3)?,
                    name: row.get(4)?,
                    stock: row.get(5)?,
                    price: row.get(6)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

fn sanitize(value: &str) -> String {
    if value.contains('\u{0}') {
        value.replace('\u{0}', "")
    } else {
        value.to_string()
    }
}
