pub mod duplicates;
pub mod reader;

pub use duplicates::find_duplicates;
pub use reader::{
    normalized_tokens, parse_target_names, raw_tokens, read_manifest, read_target_names, TargetSet, MANIFEST_DELIMITER,
};
