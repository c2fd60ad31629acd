//! Reward text classification and parsing.
//!
//! Reward lines arrive as free text ("5,200 EXP", "2 × Salewa",
//! "Unlocks purchase of MP5 at Peacekeeper LL2"). Classification runs an
//! ordered list of (pattern, category) classifiers, first match wins, so the
//! bucket assignment is deterministic and testable in isolation.

use std::fmt;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

static UNLOCK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^Unlocks\b").expect("valid regex"));
static XP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bexp\b").expect("valid regex"));
static REP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bRep\b").expect("valid regex"));
static REP_FALLBACK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z\s-]+\s*[+-]\d").expect("valid regex"));
static MONEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(Roubles|Rubles|Dollars|Euros)\b").expect("valid regex"));
static ITEM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\d+\s*[x×]\s*").expect("valid regex"));
static ITEM_COUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d[\d,]*\s+\S+").expect("valid regex"));

static XP_VALUE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([0-9][0-9,]*)\s*EXP").expect("valid regex"));
static ITEM_REWARD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)\s*×\s*(.+)").expect("valid regex"));
static UNLOCK_REWARD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^Unlocks\s+(purchase|barter|craft)\s+(?:for\s+|of\s+)?(.+?)(?:\s+at\s+(.+))?$")
        .expect("valid regex")
});

/// Reward line category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardCategory {
    Unlock,
    Experience,
    Reputation,
    Money,
    Item,
    Other,
}

impl RewardCategory {
    /// Human-readable group label for display collaborators.
    pub fn label(&self) -> &'static str {
        match self {
            RewardCategory::Experience => "XP reward",
            RewardCategory::Reputation => "Trader rep",
            RewardCategory::Money => "Money reward",
            RewardCategory::Item => "Item rewards",
            RewardCategory::Unlock => "Item unlocks",
            RewardCategory::Other => "Other rewards",
        }
    }

    /// Display order for reward groups.
    pub const DISPLAY_ORDER: [RewardCategory; 6] = [
        RewardCategory::Experience,
        RewardCategory::Reputation,
        RewardCategory::Money,
        RewardCategory::Item,
        RewardCategory::Unlock,
        RewardCategory::Other,
    ];
}

/// Ordered first-match-wins classifier table.
///
/// Unlocks are checked first: an unlock line may also mention an item count,
/// and the unlock reading must win.
fn classifiers() -> &'static [(&'static Lazy<Regex>, RewardCategory)] {
    static CLASSIFIERS: [(&Lazy<Regex>, RewardCategory); 7] = [
        (&UNLOCK_RE, RewardCategory::Unlock),
        (&XP_RE, RewardCategory::Experience),
        (&REP_RE, RewardCategory::Reputation),
        (&REP_FALLBACK_RE, RewardCategory::Reputation),
        (&MONEY_RE, RewardCategory::Money),
        (&ITEM_RE, RewardCategory::Item),
        (&ITEM_COUNT_RE, RewardCategory::Item),
    ];
    &CLASSIFIERS
}

/// Classifies one reward line.
pub fn classify(reward: &str) -> RewardCategory {
    let trimmed = reward.trim();
    for (pattern, category) in classifiers() {
        if pattern.is_match(trimmed) {
            return *category;
        }
    }
    RewardCategory::Other
}

/// A group of reward lines sharing a category, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardBucket {
    pub category: RewardCategory,
    pub lines: Vec<String>,
}

/// Groups reward lines into labeled buckets, dropping blank lines.
///
/// Buckets come back in [`RewardCategory::DISPLAY_ORDER`]; empty buckets are
/// omitted entirely.
pub fn bucketize(rewards: &[String]) -> Vec<RewardBucket> {
    let mut buckets: Vec<RewardBucket> = RewardCategory::DISPLAY_ORDER
        .iter()
        .map(|category| RewardBucket {
            category: *category,
            lines: Vec::new(),
        })
        .collect();

    for raw in rewards {
        let reward = raw.trim();
        if reward.is_empty() {
            continue;
        }
        let category = classify(reward);
        if let Some(bucket) = buckets.iter_mut().find(|b| b.category == category) {
            bucket.lines.push(reward.to_string());
        }
    }

    buckets.retain(|bucket| !bucket.lines.is_empty());
    buckets
}

/// Extracts the first XP quantity from a reward list ("5,200 EXP" -> 5200).
pub fn parse_xp(rewards: &[String]) -> Option<u32> {
    for reward in rewards {
        if let Some(caps) = XP_VALUE_RE.captures(reward) {
            if let Some(m) = caps.get(1) {
                if let Ok(value) = m.as_str().replace(',', "").parse() {
                    return Some(value);
                }
            }
        }
    }
    None
}

/// Parses an "N × Item" reward line into (item name, count).
///
/// Lines without the multiplication sign are not item hits.
pub fn parse_item_reward(line: &str) -> Option<(String, u32)> {
    if !line.contains('×') {
        return None;
    }
    let caps = ITEM_REWARD_RE.captures(line)?;
    let count = caps.get(1)?.as_str().parse().ok()?;
    let item = caps.get(2)?.as_str().trim().to_string();
    Some((item, count))
}

/// Controlled vocabulary of unlock-reward kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnlockKind {
    Purchase,
    Barter,
    Craft,
}

impl UnlockKind {
    pub const ALL: [UnlockKind; 3] = [UnlockKind::Purchase, UnlockKind::Barter, UnlockKind::Craft];

    fn from_match(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "purchase" => Some(UnlockKind::Purchase),
            "barter" => Some(UnlockKind::Barter),
            "craft" => Some(UnlockKind::Craft),
            _ => None,
        }
    }
}

impl fmt::Display for UnlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnlockKind::Purchase => "purchase",
            UnlockKind::Barter => "barter",
            UnlockKind::Craft => "craft",
        };
        write!(f, "{name}")
    }
}

/// A parsed "Unlocks <kind> ... [at <place>]" reward line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockReward {
    pub kind: UnlockKind,
    pub item: String,
    pub place: Option<String>,
}

/// Parses an unlock reward line; returns `None` for any other line.
pub fn parse_unlock(line: &str) -> Option<UnlockReward> {
    let caps = UNLOCK_REWARD_RE.captures(line)?;
    let kind = UnlockKind::from_match(caps.get(1)?.as_str())?;
    let item = caps.get(2)?.as_str().trim().to_string();
    if item.is_empty() {
        return None;
    }
    let place = caps
        .get(3)
        .map(|m| m.as_str().trim().to_string())
        .filter(|p| !p.is_empty());
    Some(UnlockReward { kind, item, place })
}

/// The unlock kinds present in a reward list.
pub fn unlock_kinds(rewards: &[String]) -> Vec<UnlockKind> {
    let mut kinds = Vec::new();
    for reward in rewards {
        if let Some(unlock) = parse_unlock(reward) {
            if !kinds.contains(&unlock.kind) {
                kinds.push(unlock.kind);
            }
        }
    }
    kinds
}

/// Whether any reward line is an unlock grant.
pub fn has_unlocks(rewards: &[String]) -> bool {
    rewards.iter().any(|r| UNLOCK_RE.is_match(r))
}
