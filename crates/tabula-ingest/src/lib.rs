pub mod csv_table;
pub mod infer;
pub mod normalize;
pub mod parse;

pub use csv_table::{parse_csv_data, read_csv_data};
pub use infer::{infer_type, resolve_column};
pub use normalize::{
    NormalizedData, convert_to_markup, normalize, normalize_data, normalize_heading,
    normalize_rows,
};
pub use parse::{
    DateFormat, parse_bool, parse_date, parse_date_permissive, parse_number, translate_dayjs,
};
