pub mod primitives;
pub mod scale;
pub mod types;

pub use primitives::{date_to_unix_seconds, parse_iso_date, parse_numeric_token};
pub use scale::{BandScale, LinearScale, PointScale};
pub use types::{ChartType, DataPoint, Viewport, XValue};
