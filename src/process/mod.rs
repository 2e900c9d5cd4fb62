// src/process/mod.rs
pub mod convert;
pub mod date_parser;
pub mod dedup;
pub mod load;
pub mod normalize;
pub mod resolve;
pub mod utils;

pub use convert::{coerce_types, CoercionReport};
pub use dedup::{dedup_rows, DedupStats};
pub use load::load_table;
pub use normalize::{canonical_name, normalize_columns};
pub use resolve::{detect_identity_column, flag_column_name, resolve_missing, ResolutionReport};
