//! Field-limit and asset-spec lookup over the reference tables.

use crate::models::limits::{AssetSpec, ChannelLimitSet};

/// Finds the limit set for `(channel, subtype)`.
///
/// Matching order: exact `(channel, subtype)`, then `(channel, no subtype)`.
/// Comparison is case-sensitive against the configured keys.
pub fn resolve_limit_set<'a>(
    sets: &'a [ChannelLimitSet],
    channel: &str,
    subtype: Option<&str>,
) -> Option<&'a ChannelLimitSet> {
    sets.iter()
        .find(|s| s.channel == channel && s.subtype.as_deref() == subtype)
        .or_else(|| {
            sets.iter()
                .find(|s| s.channel == channel && s.subtype.is_none())
        })
}

/// Asset specs for a channel, matched case-insensitively.
pub fn specs_for_channel(specs: &[AssetSpec], channel: &str) -> Vec<AssetSpec> {
    let channel_lower = channel.to_lowercase();
    specs
        .iter()
        .filter(|s| s.channel.to_lowercase() == channel_lower)
        .cloned()
        .collect()
}
