//! Drives automapping runs: resolves rule files, loads and caches rule maps,
//! and applies them to a target map as one edit.

use std::path::{Path, PathBuf};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tilemap_core::{Map, Rect};

use crate::rules_file::{expand_rule_sources, DEFAULT_RULES_FILE_NAME};
use crate::{
    apply_rule_set, build_rule_set, AutomapEdit, AutomapSettings, Issue, Issues, JsonMapReader,
    MapReader, RuleMapCache, RuleSet,
};

/// Part of the target map to automap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchArea {
    /// The map rectangle, or for infinite maps the area covered by tile layers
    #[default]
    WholeMap,
    Region(Rect),
}

impl SearchArea {
    pub fn resolve(&self, map: &Map) -> Rect {
        match self {
            SearchArea::WholeMap => map.bounds(),
            SearchArea::Region(rect) => *rect,
        }
    }
}

/// Phase of an automapping run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunState {
    #[default]
    Idle,
    /// Resolving rule files and building rule sets
    Loading,
    /// Matching rule sets against the target and writing their outputs
    Matching,
    /// Finalizing the edit
    Applying,
    /// At least one rule source was usable
    Done,
    /// No rule source was usable
    Failed,
}

/// Result of one run.
#[derive(Debug)]
pub struct AutomapOutcome {
    pub state: RunState,
    /// Every change the run made, already applied to the map
    pub edit: AutomapEdit,
    pub issues: Vec<Issue>,
}

impl AutomapOutcome {
    pub fn succeeded(&self) -> bool {
        self.state == RunState::Done
    }
}

/// A rule set ready to run, with the file it came from.
struct LoadedRules {
    source: Option<PathBuf>,
    rule_set: RuleSet,
}

/// Applies the configured rule maps to target maps.
///
/// Rule maps are read through `R` and kept in a [`RuleMapCache`] until their
/// files change or the resolved rule files differ from the previous run.
pub struct AutomappingManager<R: MapReader = JsonMapReader> {
    settings: AutomapSettings,
    reader: R,
    cache: RuleMapCache,
    rule_files: Vec<PathBuf>,
    state: RunState,
}

impl AutomappingManager<JsonMapReader> {
    pub fn new(settings: AutomapSettings) -> Self {
        Self::with_reader(settings, JsonMapReader)
    }
}

impl<R: MapReader> AutomappingManager<R> {
    pub fn with_reader(settings: AutomapSettings, reader: R) -> Self {
        Self {
            settings,
            reader,
            cache: RuleMapCache::new(),
            rule_files: Vec::new(),
            state: RunState::Idle,
        }
    }

    pub fn settings(&self) -> &AutomapSettings {
        &self.settings
    }

    /// Replace the settings. Cached rule maps are dropped.
    pub fn set_settings(&mut self, settings: AutomapSettings) {
        self.settings = settings;
        self.rule_files.clear();
        self.cache.clear();
    }

    /// State reached by the last run
    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn cache(&self) -> &RuleMapCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut RuleMapCache {
        &mut self.cache
    }

    /// Rule files for a map stored at `map_path`.
    ///
    /// The override list wins, then `rules.txt` beside the map, then the
    /// project rules file. An empty result means the map is its own rule map.
    pub fn resolve_rule_files(&self, map_path: Option<&Path>) -> Vec<PathBuf> {
        if !self.settings.rules_file_override.is_empty() {
            return self.settings.rules_file_override.clone();
        }

        let beside_map = map_path
            .and_then(Path::parent)
            .map(|dir| dir.join(DEFAULT_RULES_FILE_NAME))
            .filter(|path| path.exists());

        beside_map
            .or_else(|| self.settings.project_rules_file.clone())
            .into_iter()
            .collect()
    }

    /// Apply every configured rule map to `map` within `area`.
    pub fn auto_map(
        &mut self,
        map: &mut Map,
        map_path: Option<&Path>,
        area: SearchArea,
        rng: &mut impl Rng,
    ) -> AutomapOutcome {
        let search_area = area.resolve(map);
        self.run(map, map_path, search_area, None, rng)
    }

    /// Automap after an edit of `region` on `touched_layer`.
    ///
    /// Does nothing unless `while_drawing` is enabled. Only rule sets reading
    /// `touched_layer` run, and `self` targets refer to it.
    pub fn on_region_edited(
        &mut self,
        map: &mut Map,
        map_path: Option<&Path>,
        region: Rect,
        touched_layer: &str,
        rng: &mut impl Rng,
    ) -> Option<AutomapOutcome> {
        if !self.settings.while_drawing || region.is_empty() {
            return None;
        }
        Some(self.run(map, map_path, region, Some(touched_layer), rng))
    }

    fn run(
        &mut self,
        map: &mut Map,
        map_path: Option<&Path>,
        search_area: Rect,
        touched_layer: Option<&str>,
        rng: &mut impl Rng,
    ) -> AutomapOutcome {
        let mut issues = Issues::new();
        let mut edit = AutomapEdit::new();

        self.transition(RunState::Loading);
        let (loaded, usable) = self.load_rules(map, map_path, &mut issues);

        self.transition(RunState::Matching);
        let mut area = search_area;
        for LoadedRules {
            source,
            mut rule_set,
        } in loaded
        {
            if let Some(layer) = touched_layer {
                if !rule_set.reads_layer(layer) {
                    tracing::trace!(
                        rule_set = %rule_set.name,
                        layer,
                        "rule set does not read edited layer"
                    );
                    continue;
                }
            }

            let self_target = touched_layer
                .map(str::to_string)
                .or_else(|| map.tile_layer_names().first().map(|name| name.to_string()));
            if let Some(target) = self_target {
                rule_set.resolve_self_alias(&target);
            }

            issues.set_rule_file(source.as_deref());
            apply_rule_set(&rule_set, map, area, &mut edit, &mut issues, rng);
            // Later rule files see what earlier ones changed
            area = area.union(&edit.changed_bounds());
        }
        issues.set_rule_file(None);

        self.transition(RunState::Applying);
        tracing::info!(
            changed_cells = edit.changed_cells(),
            created_layers = edit.created_layers().len(),
            issues = issues.len(),
            has_errors = issues.has_errors(),
            "{}",
            edit.description()
        );

        let state = if usable > 0 {
            RunState::Done
        } else {
            RunState::Failed
        };
        self.transition(state);

        AutomapOutcome {
            state,
            edit,
            issues: issues.into_vec(),
        }
    }

    /// Build the rule sets of every configured source, in order.
    ///
    /// Returns them with the number of usable sources. Unusable sources are
    /// reported to `issues` and skipped.
    fn load_rules(
        &mut self,
        map: &Map,
        map_path: Option<&Path>,
        issues: &mut Issues,
    ) -> (Vec<LoadedRules>, usize) {
        let rule_files = self.resolve_rule_files(map_path);
        if rule_files != self.rule_files {
            self.cache.clear();
            self.rule_files.clone_from(&rule_files);
        }

        if rule_files.is_empty() {
            tracing::debug!(map = %map.name, "no rule files, using the map's own layers");
            return match build_rule_set(map, issues) {
                Ok(rule_set) => (
                    vec![LoadedRules {
                        source: None,
                        rule_set,
                    }],
                    1,
                ),
                Err(err) => {
                    issues.error(err.to_string());
                    (Vec::new(), 0)
                }
            };
        }

        let mut sources = Vec::new();
        for file in &rule_files {
            issues.set_rule_file(Some(file));
            sources.extend(expand_rule_sources(file, issues));
        }

        let mut loaded = Vec::new();
        for source in sources {
            issues.set_rule_file(Some(&source));
            let rule_map = match self.cache.load(&source, &self.reader) {
                Ok(rule_map) => rule_map,
                Err(err) => {
                    issues.error(format!("Opening rules map failed: {err}"));
                    continue;
                }
            };
            match build_rule_set(rule_map, issues) {
                Ok(rule_set) => loaded.push(LoadedRules {
                    source: Some(source),
                    rule_set,
                }),
                Err(err) => issues.error(err.to_string()),
            }
        }
        issues.set_rule_file(None);

        let usable = loaded.len();
        (loaded, usable)
    }

    fn transition(&mut self, next: RunState) {
        tracing::debug!(from = ?self.state, to = ?next, "automap state");
        self.state = next;
    }
}
