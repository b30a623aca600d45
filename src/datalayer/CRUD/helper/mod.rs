pub mod row_json;

pub use row_json::{
    ColumnKind, column_kind, format_time, parse_datetime, render_utc, row_to_json, widen_float,
};
