pub mod model;
pub mod parser;

pub use model::{Feature, Keyword, Scenario, Step};
pub use parser::{load_features, parse_feature};
