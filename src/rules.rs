use crate::apriori::FrequentItemset;
use crate::item::Item;
use fnv::FnvHashMap;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Supports of already-mined itemsets, keyed by canonical item order. Rule
/// metrics are computed from these stored values only; the incidence table
/// is never re-scanned.
pub type SupportMap = FnvHashMap<Vec<Item>, f64>;

/// The metric a caller can threshold or rank on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Metric {
    Support,
    Confidence,
    Lift,
}

impl Metric {
    pub fn of(&self, rule: &Rule) -> f64 {
        match self {
            Metric::Support => rule.support,
            Metric::Confidence => rule.confidence,
            Metric::Lift => rule.lift,
        }
    }
}

impl FromStr for Metric {
    type Err = String;
    fn from_str(s: &str) -> Result<Metric, String> {
        match s {
            "support" => Ok(Metric::Support),
            "confidence" => Ok(Metric::Confidence),
            "lift" => Ok(Metric::Lift),
            other => Err(format!(
                "unknown metric '{}', expected support, confidence or lift",
                other
            )),
        }
    }
}

/// A directional rule antecedent => consequent. Antecedent and consequent
/// are disjoint, non-empty, sorted item vectors whose union is the frequent
/// itemset the rule was split from. Conviction is `f64::INFINITY` when
/// confidence is exactly 1.
#[derive(Clone, Debug)]
pub struct Rule {
    pub antecedent: Vec<Item>,
    pub consequent: Vec<Item>,
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
    pub leverage: f64,
    pub conviction: f64,
}

impl PartialEq for Rule {
    fn eq(&self, other: &Rule) -> bool {
        self.antecedent == other.antecedent && self.consequent == other.consequent
    }
}

// Can't derive Eq as f64 doesn't satisfy Eq; identity is the item sets.
impl Eq for Rule {}

impl Hash for Rule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.antecedent.hash(state);
        self.consequent.hash(state);
    }
}

impl Rule {
    // Creates the Rule for one (antecedent, consequent) partition, scoring
    // it from stored supports. Returns None if a subset's support is
    // missing, which cannot happen for itemsets produced by the miner
    // (every subset of a frequent itemset is frequent).
    fn make(
        antecedent: Vec<Item>,
        consequent: Vec<Item>,
        union_support: f64,
        supports: &SupportMap,
    ) -> Option<Rule> {
        if antecedent.is_empty() || consequent.is_empty() {
            return None;
        }
        let a_sup = *supports.get(&antecedent)?;
        let c_sup = *supports.get(&consequent)?;

        let confidence = union_support / a_sup;
        let lift = confidence / c_sup;
        let leverage = union_support - a_sup * c_sup;
        let conviction = if (1.0 - confidence).abs() < f64::EPSILON {
            f64::INFINITY
        } else {
            (1.0 - c_sup) / (1.0 - confidence)
        };

        Some(Rule {
            antecedent,
            consequent,
            support: union_support,
            confidence,
            lift,
            leverage,
            conviction,
        })
    }
}

/// Generate every non-trivial (antecedent, consequent) partition of every
/// frequent itemset of size >= 2, keeping rules whose chosen metric meets
/// `min_threshold`. Output order is deterministic: itemsets in mined order,
/// partitions in ascending bitmask order.
pub fn generate_rules(
    itemsets: &[FrequentItemset],
    metric: Metric,
    min_threshold: f64,
) -> Vec<Rule> {
    let supports: SupportMap = itemsets
        .iter()
        .map(|f| (f.items.clone(), f.support))
        .collect();

    let mut rules: Vec<Rule> = vec![];
    for itemset in itemsets.iter().filter(|f| f.items.len() > 1) {
        let n = itemset.items.len();
        // Each mask picks a proper non-empty subset as the antecedent; the
        // complement is the consequent.
        for mask in 1u64..((1u64 << n) - 1) {
            let mut antecedent: Vec<Item> = Vec::with_capacity(n - 1);
            let mut consequent: Vec<Item> = Vec::with_capacity(n - 1);
            for (bit, &item) in itemset.items.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    antecedent.push(item);
                } else {
                    consequent.push(item);
                }
            }
            if let Some(rule) = Rule::make(antecedent, consequent, itemset.support, &supports) {
                if metric.of(&rule) >= min_threshold {
                    rules.push(rule);
                }
            }
        }
    }
    rules
}
