pub mod normalize;

pub use normalize::{Mode, normalize, normalize_query, normalize_with, strip_stop_words};
