//! Rule-map driven automapping for `tilemap_core` maps.
//!
//! A *rule map* is an ordinary map whose layer names describe rules:
//! `regions` marks where each rule is, `input_<layer>` and `inputnot_<layer>`
//! say what the target layer must (not) contain there, and `output_<layer>`
//! says what to write when it does.
//!
//! The primary entry point is [`AutomappingManager`], which resolves and caches
//! rule files and applies them to a target map as a single [`AutomapEdit`].
//! The pieces it drives are usable on their own:
//! [`build_rule_set`] → [`find_matches`] → [`apply_matches`], with
//! [`apply_rule_set`] running one whole rule set.
//!
//! Randomness (weighted output variants) always comes from a caller-supplied
//! [`rand::Rng`].

mod apply;
mod builder;
mod cache;
mod edit;
mod engine;
mod issue;
mod manager;
mod matcher;
mod reader;
pub mod rules_file;
mod settings;
mod types;

pub use apply::{apply_matches, select_candidate};
pub use builder::{build_rule_set, RuleMapError};
pub use cache::{FileSignature, RuleMapCache};
pub use edit::{AutomapEdit, CellChanges, CreatedLayer, LayerChanges, AUTOMAP_EDIT_DESCRIPTION};
pub use engine::apply_rule_set;
pub use issue::{Issue, Issues, Severity};
pub use manager::{AutomapOutcome, AutomappingManager, RunState, SearchArea};
pub use matcher::{candidate_origins, find_matches, Match, MatchError};
pub use reader::{load_map_from_str, JsonMapReader, MapReadError, MapReader};
pub use settings::{AutomapSettings, SettingsError};
pub use types::{
    classify_layer_name, InputPattern, LayerRole, OutputCandidate, OutputCell, OutputPattern,
    Rule, RuleOptions, RuleSet, SELF_LAYER_ALIAS,
};
