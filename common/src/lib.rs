//! Certificate Verify Common Library
//!
//! 参照表の型・CSV読み込み・照合ロジック（I/Oを持たない部分）

pub mod error;
pub mod record;
pub mod table;
pub mod verify;

pub use error::{Error, Result};
pub use record::{CellValue, CertificateRecord, ID_COLUMN, NAME_COLUMN};
pub use table::{IssueKind, ReferenceTable, TableIssue, REQUIRED_COLUMNS};
pub use verify::{verify_certificate, VerificationResult};
