//! Greedy UTXO selection.
//!
//! Outputs are visited in ascending value order. The first output that covers
//! the target on its own replaces whatever was accumulated so far and ends the
//! scan; until then smaller outputs are accumulated while the running total is
//! still short. The result may still be short of the target, so callers must
//! check [`Selection::covers`] before spending it.

use crate::types::UnspentOutput;

/// Outputs chosen to fund a spend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub outputs: Vec<UnspentOutput>,
}

impl Selection {
    /// Sum of the selected output values in satoshis.
    pub fn total(&self) -> u64 {
        self.outputs.iter().map(|u| u.satoshis).sum()
    }

    /// Whether the selection reaches `target` satoshis.
    pub fn covers(&self, target: u64) -> bool {
        self.total() >= target
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }
}

/// Select outputs for `target` satoshis.
pub fn select_for_amount(utxos: &[UnspentOutput], target: u64) -> Selection {
    let mut sorted: Vec<&UnspentOutput> = utxos.iter().collect();
    sorted.sort_by_key(|u| u.satoshis);

    let mut selected: Vec<UnspentOutput> = Vec::new();
    let mut total: u64 = 0;

    for utxo in sorted {
        if utxo.satoshis >= target {
            selected.clear();
            selected.push(utxo.clone());
            break;
        }
        if total < target {
            total = total.saturating_add(utxo.satoshis);
            selected.push(utxo.clone());
        }
    }

    Selection { outputs: selected }
}
