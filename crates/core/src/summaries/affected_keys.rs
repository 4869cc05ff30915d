use super::summaries_model::AffectedKey;
use crate::transactions::Transaction;

/// Returns the distinct summary keys touched by a transaction change.
///
/// `old` is the state before the change (absent on create), `new` the state
/// after it (absent on delete). When both map to the same key, as with an
/// amount-only edit, a single key is returned.
pub fn affected_keys(old: Option<&Transaction>, new: Option<&Transaction>) -> Vec<AffectedKey> {
    let mut keys: Vec<AffectedKey> = Vec::with_capacity(2);
    for key in [old, new]
        .into_iter()
        .flatten()
        .map(AffectedKey::from_transaction)
    {
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

/// The owner of a change: the new state's user when present, else the old
/// state's. Blank ids count as absent.
pub fn owning_user_id<'a>(
    old: Option<&'a Transaction>,
    new: Option<&'a Transaction>,
) -> Option<&'a str> {
    new.or(old)
        .map(|t| t.user_id.as_str())
        .filter(|id| !id.trim().is_empty())
}
