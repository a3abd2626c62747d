//! Product repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the stable CRUD API over the canonical `products` table.
//! - Keep SQL and transaction details inside the persistence boundary.
//! - Model the persistence lifecycle: a save turns a transient record
//!   persistent by assigning identity, a delete reverts it to transient,
//!   and an update reattaches a detached record.
//!
//! # Invariants
//! - Write paths call `Product::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Each mutating operation is one unit of work: begin, execute, commit.
//!   On error the transaction guard drops and rolls back.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::product::{EntityState, Product, ProductId, ProductValidationError};
use once_cell::unsync::OnceCell;
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const PRODUCT_SELECT_SQL: &str = "SELECT
    id,
    code,
    name,
    quantity_per_unit,
    unit,
    sell_price,
    buy_price,
    remark
FROM products";

const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "code",
    "name",
    "quantity_per_unit",
    "unit",
    "sell_price",
    "buy_price",
    "remark",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for product persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ProductValidationError),
    Db(DbError),
    NotFound(ProductId),
    /// Update or delete called on a record that has no storage identity.
    TransientEntity { operation: &'static str },
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "product not found: {id}"),
            Self::TransientEntity { operation } => {
                write!(f, "cannot {operation} a transient product without identity")
            }
            Self::InvalidData(message) => {
                write!(f, "invalid persisted product data: {message}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open the store through db::open_db"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "connection is missing required table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "table `{table}` is missing required column `{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ProductValidationError> for RepoError {
    fn from(value: ProductValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for product CRUD operations.
///
/// Each method is a self-contained unit of work; nothing is kept tracked
/// between calls, so records returned from reads are detached values.
pub trait ProductRepository {
    /// Persists a record and writes the assigned identity back into it.
    ///
    /// A record carrying an id keeps it (assigned identity); otherwise the
    /// store picks the next one.
    fn save(&mut self, product: &mut Product) -> RepoResult<ProductId>;

    /// Eagerly fetches one record by identity.
    fn get(&self, id: ProductId) -> RepoResult<Option<Product>>;

    /// Returns a lazy handle to one record; no SQL runs until first access.
    fn load(&self, id: ProductId) -> LazyProduct<'_>;

    /// Fetches every record, ordered by identity.
    fn load_all(&self) -> RepoResult<Vec<Product>>;

    /// Reattaches a detached record by pushing its fields to storage.
    fn update(&mut self, product: &Product) -> RepoResult<()>;

    /// Removes the row and clears the record's identity, reverting it to
    /// the transient state.
    fn delete(&mut self, product: &mut Product) -> RepoResult<()>;
}

/// SQLite-backed product repository owning its connection.
pub struct SqliteProductRepository {
    conn: Connection,
}

impl SqliteProductRepository {
    /// Wraps a connection after verifying it was bootstrapped.
    ///
    /// Rejects connections whose schema version or `products` table shape
    /// does not match what this binary expects, so misconfigured callers
    /// fail fast instead of at the first query.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let table_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'products';",
            [],
            |row| row.get(0),
        )?;
        if table_count == 0 {
            return Err(RepoError::MissingRequiredTable("products"));
        }

        let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('products');")?;
        let mut rows = stmt.query([])?;
        let mut columns = Vec::new();
        while let Some(row) = rows.next()? {
            columns.push(row.get::<_, String>(0)?);
        }
        for required in REQUIRED_COLUMNS.iter().copied() {
            if !columns.iter().any(|column| column == required) {
                return Err(RepoError::MissingRequiredColumn {
                    table: "products",
                    column: required,
                });
            }
        }
        drop(rows);
        drop(stmt);

        Ok(Self { conn })
    }

    /// Releases the underlying connection.
    pub fn into_connection(self) -> Connection {
        self.conn
    }
}

impl ProductRepository for SqliteProductRepository {
    fn save(&mut self, product: &mut Product) -> RepoResult<ProductId> {
        product.validate()?;

        let tx = self.conn.transaction()?;
        let id = match product.id {
            Some(id) => {
                tx.execute(
                    "INSERT INTO products (
                        id,
                        code,
                        name,
                        quantity_per_unit,
                        unit,
                        sell_price,
                        buy_price,
                        remark
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
                    params![
                        id,
                        product.code.as_str(),
                        product.name.as_str(),
                        product.quantity_per_unit.as_str(),
                        product.unit.as_str(),
                        product.sell_price.to_string(),
                        product.buy_price.to_string(),
                        product.remark.as_str(),
                    ],
                )?;
                id
            }
            None => {
                tx.execute(
                    "INSERT INTO products (
                        code,
                        name,
                        quantity_per_unit,
                        unit,
                        sell_price,
                        buy_price,
                        remark
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
                    params![
                        product.code.as_str(),
                        product.name.as_str(),
                        product.quantity_per_unit.as_str(),
                        product.unit.as_str(),
                        product.sell_price.to_string(),
                        product.buy_price.to_string(),
                        product.remark.as_str(),
                    ],
                )?;
                tx.last_insert_rowid()
            }
        };
        tx.commit()?;

        product.id = Some(id);
        Ok(id)
    }

    fn get(&self, id: ProductId) -> RepoResult<Option<Product>> {
        fetch_product(&self.conn, id)
    }

    fn load(&self, id: ProductId) -> LazyProduct<'_> {
        LazyProduct::new(&self.conn, id)
    }

    fn load_all(&self) -> RepoResult<Vec<Product>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut products = Vec::new();

        while let Some(row) = rows.next()? {
            products.push(parse_product_row(row)?);
        }

        Ok(products)
    }

    fn update(&mut self, product: &Product) -> RepoResult<()> {
        product.validate()?;
        let Some(id) = product.id else {
            return Err(RepoError::TransientEntity {
                operation: "update",
            });
        };

        let tx = self.conn.transaction()?;
        let changed = tx.execute(
            "UPDATE products
             SET
                code = ?1,
                name = ?2,
                quantity_per_unit = ?3,
                unit = ?4,
                sell_price = ?5,
                buy_price = ?6,
                remark = ?7,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?8;",
            params![
                product.code.as_str(),
                product.name.as_str(),
                product.quantity_per_unit.as_str(),
                product.unit.as_str(),
                product.sell_price.to_string(),
                product.buy_price.to_string(),
                product.remark.as_str(),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        tx.commit()?;

        Ok(())
    }

    fn delete(&mut self, product: &mut Product) -> RepoResult<()> {
        let Some(id) = product.id else {
            return Err(RepoError::TransientEntity {
                operation: "delete",
            });
        };

        let tx = self.conn.transaction()?;
        let changed = tx.execute("DELETE FROM products WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        tx.commit()?;

        product.id = None;
        Ok(())
    }
}

/// Lazy-loading handle to one product row.
///
/// The handle borrows the open connection, so it stays attached to a live
/// unit of work for its whole lifetime; that is the one place the
/// `Persistent` state is observable from the outside. No SQL runs until
/// the first [`get`](Self::get), and a missing row surfaces as `NotFound`
/// at that point rather than at construction.
pub struct LazyProduct<'conn> {
    conn: &'conn Connection,
    id: ProductId,
    cell: OnceCell<Product>,
}

impl<'conn> LazyProduct<'conn> {
    fn new(conn: &'conn Connection, id: ProductId) -> Self {
        Self {
            conn,
            id,
            cell: OnceCell::new(),
        }
    }

    /// Identity the handle will resolve; available without touching SQL.
    pub fn id(&self) -> ProductId {
        self.id
    }

    /// Returns whether the row has been fetched yet.
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Lifecycle state of the handle. Always `Persistent`: the handle
    /// cannot outlive its unit of work.
    pub fn state(&self) -> EntityState {
        EntityState::Persistent
    }

    /// Resolves the row, issuing the SELECT on first call.
    ///
    /// # Errors
    /// - `NotFound` when the row does not exist.
    /// - Transport or data errors from the fetch.
    pub fn get(&self) -> RepoResult<&Product> {
        self.cell.get_or_try_init(|| {
            fetch_product(self.conn, self.id)?.ok_or(RepoError::NotFound(self.id))
        })
    }

    /// Resolves the row and detaches it from the unit of work.
    pub fn into_detached(self) -> RepoResult<Product> {
        self.get()?;
        match self.cell.into_inner() {
            Some(product) => Ok(product),
            None => Err(RepoError::NotFound(self.id)),
        }
    }
}

fn fetch_product(conn: &Connection, id: ProductId) -> RepoResult<Option<Product>> {
    let mut stmt = conn.prepare(&format!("{PRODUCT_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_product_row(row)?));
    }

    Ok(None)
}

fn parse_product_row(row: &Row<'_>) -> RepoResult<Product> {
    let product = Product {
        id: Some(row.get("id")?),
        code: row.get("code")?,
        name: row.get("name")?,
        quantity_per_unit: row.get("quantity_per_unit")?,
        unit: row.get("unit")?,
        sell_price: parse_price(row, "sell_price")?,
        buy_price: parse_price(row, "buy_price")?,
        remark: row.get("remark")?,
    };
    product.validate()?;
    Ok(product)
}

fn parse_price(row: &Row<'_>, column: &str) -> RepoResult<Decimal> {
    let text: String = row.get(column)?;
    Decimal::from_str(&text).map_err(|_| {
        RepoError::InvalidData(format!("invalid decimal value `{text}` in products.{column}"))
    })
}
