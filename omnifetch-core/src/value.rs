/// Open value type carried by parameter bags and metadata maps.
///
/// Providers stash raw payload fragments here; the dispatch layer never
/// inspects values beyond the generic keys it owns.
pub type Value = serde_json::Value;
