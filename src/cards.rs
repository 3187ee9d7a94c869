//! Card-plan resolution: which simulated accelerators serve a model.

use std::fmt;

/// Prefixes served on wormhole cards when no override is configured.
pub const DEFAULT_WORMHOLE_MODELS: &[&str] = &[
    "meta-llama/llama-3.1-8b-instruct",
    "meta-llama/llama-3.1-70b-instruct",
    "mistralai/mixtral-8x7b-instruct-v0.1",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Card {
    Wormhole,
    Blackhole,
}

impl Card {
    pub fn as_str(self) -> &'static str {
        match self {
            Card::Wormhole => "wormhole",
            Card::Blackhole => "blackhole",
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered, never-empty list of cards. Always ends with [`Card::Blackhole`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPlan(Vec<Card>);

impl CardPlan {
    pub fn wormhole() -> Self {
        Self(vec![Card::Wormhole, Card::Blackhole])
    }

    pub fn blackhole_only() -> Self {
        Self(vec![Card::Blackhole])
    }

    pub fn cards(&self) -> &[Card] {
        &self.0
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.0.iter().map(|card| card.as_str()).collect()
    }
}

/// Renders as `wormhole + blackhole`.
impl fmt::Display for CardPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().join(" + "))
    }
}

/// Lower-cased model-name prefixes that run on wormhole cards.
///
/// Loaded once at startup and shared read-only with every handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WormholeModels {
    prefixes: Vec<String>,
}

impl Default for WormholeModels {
    fn default() -> Self {
        Self {
            prefixes: DEFAULT_WORMHOLE_MODELS
                .iter()
                .map(|prefix| (*prefix).to_owned())
                .collect(),
        }
    }
}

impl WormholeModels {
    /// Parses a comma-separated override, falling back to the built-in list
    /// when the value is absent or blank.
    pub fn load(configured: Option<&str>) -> Self {
        let Some(configured) = configured.filter(|value| !value.trim().is_empty()) else {
            return Self::default();
        };

        let prefixes = configured
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_lowercase)
            .collect();
        Self { prefixes }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn resolve(&self, model: Option<&str>) -> CardPlan {
        resolve_card_plan(model, &self.prefixes)
    }
}

impl fmt::Display for WormholeModels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.prefixes.join(", "))
    }
}

/// Trims and lower-cases a requested model name; `None` becomes empty.
pub fn normalize_model(model: Option<&str>) -> String {
    model.map(|m| m.trim().to_lowercase()).unwrap_or_default()
}

/// Picks wormhole + blackhole when the normalized model starts with any
/// supported prefix, otherwise blackhole alone.
pub fn resolve_card_plan(model: Option<&str>, prefixes: &[String]) -> CardPlan {
    let normalized = normalize_model(model);
    if prefixes
        .iter()
        .any(|prefix| normalized.starts_with(prefix.as_str()))
    {
        CardPlan::wormhole()
    } else {
        CardPlan::blackhole_only()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_suffix_matches_prefix() {
        let models = WormholeModels::default();
        let plan = models.resolve(Some("meta-llama/llama-3.1-8b-instruct-q4"));
        assert_eq!(plan.names(), vec!["wormhole", "blackhole"]);
    }

    #[test]
    fn exact_name_matches_after_normalization() {
        let models = WormholeModels::default();
        let plan = models.resolve(Some("  Meta-Llama/Llama-3.1-70B-Instruct \n"));
        assert_eq!(plan, CardPlan::wormhole());
    }

    #[test]
    fn unknown_model_uses_blackhole() {
        let models = WormholeModels::default();
        assert_eq!(
            models.resolve(Some("unknown-model")).names(),
            vec!["blackhole"]
        );
    }

    #[test]
    fn missing_model_uses_blackhole() {
        let models = WormholeModels::default();
        assert_eq!(models.resolve(None).names(), vec!["blackhole"]);
        assert_eq!(normalize_model(None), "");
    }

    #[test]
    fn prefix_is_not_substring() {
        let prefixes = vec!["llama".to_owned()];
        assert_eq!(
            resolve_card_plan(Some("meta-llama"), &prefixes),
            CardPlan::blackhole_only()
        );
    }

    #[test]
    fn plan_always_contains_blackhole() {
        for plan in [CardPlan::wormhole(), CardPlan::blackhole_only()] {
            assert_eq!(plan.cards().last(), Some(&Card::Blackhole));
        }
    }

    #[test]
    fn plan_display_joins_with_plus() {
        assert_eq!(CardPlan::wormhole().to_string(), "wormhole + blackhole");
        assert_eq!(CardPlan::blackhole_only().to_string(), "blackhole");
    }

    #[test]
    fn load_defaults_when_absent_or_blank() {
        assert_eq!(WormholeModels::load(None), WormholeModels::default());
        assert_eq!(WormholeModels::load(Some("   ")), WormholeModels::default());
        assert_eq!(WormholeModels::default().prefixes().len(), 3);
    }

    #[test]
    fn load_splits_trims_and_lowercases() {
        let models = WormholeModels::load(Some(" Qwen/Qwen2-7B , ,tiny-Model,"));
        assert_eq!(
            models.prefixes(),
            &["qwen/qwen2-7b".to_owned(), "tiny-model".to_owned()]
        );
        assert_eq!(
            models.resolve(Some("QWEN/qwen2-7b-instruct")),
            CardPlan::wormhole()
        );
        assert_eq!(
            models.resolve(Some("meta-llama/llama-3.1-8b-instruct")),
            CardPlan::blackhole_only()
        );
    }

    #[test]
    fn only_separators_yield_empty_set() {
        let models = WormholeModels::load(Some(",,"));
        assert!(models.prefixes().is_empty());
        assert_eq!(models.resolve(Some("anything")), CardPlan::blackhole_only());
    }
}
