//! Sides: the factions detected within a battle.

use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};

/// Insertion-ordered, duplicate-free set of entity IDs.
///
/// Serialized as a plain JSON array so persisted battles stay readable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<i64>", into = "Vec<i64>")]
pub struct IdSet {
    order: Vec<i64>,
    index: HashSet<i64>,
}

impl IdSet {
    /// Inserts an ID, returning `true` if it was not present yet.
    pub fn insert(&mut self, id: i64) -> bool {
        if self.index.insert(id) {
            self.order.push(id);
            true
        } else {
            false
        }
    }

    /// O(1) membership test.
    pub fn contains(&self, id: i64) -> bool {
        self.index.contains(&id)
    }

    /// Number of distinct IDs.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the set has no IDs.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// IDs in insertion order.
    pub fn as_slice(&self) -> &[i64] {
        &self.order
    }

    /// Iterates IDs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.order.iter().copied()
    }
}

impl Extend<i64> for IdSet {
    fn extend<T: IntoIterator<Item = i64>>(&mut self, ids: T) {
        for id in ids {
            self.insert(id);
        }
    }
}

impl From<Vec<i64>> for IdSet {
    fn from(ids: Vec<i64>) -> Self {
        let mut set = Self::default();
        set.extend(ids);
        set
    }
}

impl From<IdSet> for Vec<i64> {
    fn from(set: IdSet) -> Self {
        set.order
    }
}

impl fmt::Display for IdSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.order.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", id)?;
        }
        Ok(())
    }
}

/// Per-kind overlap ratios returned by [`Side::percent_overlap_with`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Overlap {
    /// Fraction of queried character IDs present in the side.
    pub members: f64,
    /// Fraction of queried corporation IDs present in the side.
    pub corporations: f64,
    /// Fraction of queried alliance IDs present in the side.
    pub alliances: f64,
}

impl Overlap {
    /// Decision value: the strongest of the three ratios.
    pub fn max(&self) -> f64 {
        self.members.max(self.corporations).max(self.alliances)
    }
}

/// A group of characters, corporations and alliances believed to fight together.
///
/// Sides only grow. IDs are stored as given, so a victim's no-alliance sentinel ends up
/// on its side and later matches other unaffiliated victims.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Side {
    members: IdSet,
    corporations: IdSet,
    alliances: IdSet,
}

impl Side {
    /// Creates an empty side.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds character IDs.
    pub fn add_character_ids(&mut self, ids: impl IntoIterator<Item = i64>) {
        self.members.extend(ids);
    }

    /// Adds corporation IDs.
    pub fn add_corporation_ids(&mut self, ids: impl IntoIterator<Item = i64>) {
        self.corporations.extend(ids);
    }

    /// Adds alliance IDs.
    pub fn add_alliance_ids(&mut self, ids: impl IntoIterator<Item = i64>) {
        self.alliances.extend(ids);
    }

    /// Whether the character is a member of this side.
    pub fn has_character_id(&self, id: i64) -> bool {
        self.members.contains(id)
    }

    /// Whether the corporation belongs to this side.
    pub fn has_corporation_id(&self, id: i64) -> bool {
        self.corporations.contains(id)
    }

    /// Whether the alliance belongs to this side.
    pub fn has_alliance_id(&self, id: i64) -> bool {
        self.alliances.contains(id)
    }

    /// Character IDs in insertion order.
    pub fn members(&self) -> &IdSet {
        &self.members
    }

    /// Corporation IDs in insertion order.
    pub fn corporations(&self) -> &IdSet {
        &self.corporations
    }

    /// Alliance IDs in insertion order.
    pub fn alliances(&self) -> &IdSet {
        &self.alliances
    }

    /// Unions every ID of `other` into this side.
    pub fn merge(&mut self, other: &Side) {
        self.add_character_ids(other.members.iter());
        self.add_corporation_ids(other.corporations.iter());
        self.add_alliance_ids(other.alliances.iter());
    }

    /// Overlap of another side's IDs with this side.
    ///
    /// Asymmetric: the ratios are relative to the size of `other`'s sets.
    pub fn percent_overlap(&self, other: &Side) -> Overlap {
        self.percent_overlap_with(
            other.members.as_slice(),
            other.corporations.as_slice(),
            other.alliances.as_slice(),
        )
    }

    /// For each kind, the fraction of queried IDs already present in this side.
    ///
    /// An empty query set yields `0.0` for that kind.
    pub fn percent_overlap_with(
        &self,
        members: &[i64],
        corporations: &[i64],
        alliances: &[i64],
    ) -> Overlap {
        Overlap {
            members: ratio(&self.members, members),
            corporations: ratio(&self.corporations, corporations),
            alliances: ratio(&self.alliances, alliances),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Side M[{}] C[{}] A[{}]",
            self.members, self.corporations, self.alliances
        )
    }
}

fn ratio(set: &IdSet, query: &[i64]) -> f64 {
    if query.is_empty() {
        return 0.0;
    }

    let found = query.iter().filter(|id| set.contains(**id)).count();
    found as f64 / query.len() as f64
}
