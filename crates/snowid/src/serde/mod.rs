mod snow_id;

pub use snow_id::*;
