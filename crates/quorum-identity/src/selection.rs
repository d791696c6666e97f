//! Checkbox selection over a list of addresses.

use quorum_core::Address;

/// Per-address selection, in list order. Starts with everything selected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    entries: Vec<(Address, bool)>,
}

impl Selection {
    /// Select every address. Duplicates collapse onto their first position.
    pub fn new(addresses: impl IntoIterator<Item = Address>) -> Self {
        let mut entries: Vec<(Address, bool)> = Vec::new();
        for address in addresses {
            if !entries.iter().any(|(a, _)| *a == address) {
                entries.push((address, true));
            }
        }
        Self { entries }
    }

    /// Number of addresses
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no addresses
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every address is selected (false when empty).
    pub fn all_selected(&self) -> bool {
        !self.entries.is_empty() && self.entries.iter().all(|(_, on)| *on)
    }

    /// At least one address is selected.
    pub fn some_selected(&self) -> bool {
        self.entries.iter().any(|(_, on)| *on)
    }

    /// Some but not all: the header checkbox's indeterminate state.
    pub fn indeterminate(&self) -> bool {
        self.some_selected() && !self.all_selected()
    }

    /// Whether `address` is selected. Unknown addresses are not.
    pub fn is_selected(&self, address: &Address) -> bool {
        self.entries
            .iter()
            .any(|(a, on)| a == address && *on)
    }

    /// Flip one address. Returns false if the address is not listed.
    pub fn toggle(&mut self, address: &Address) -> bool {
        match self.entries.iter_mut().find(|(a, _)| a == address) {
            Some((_, on)) => {
                *on = !*on;
                true
            }
            None => false,
        }
    }

    /// Header checkbox: sets every entry to `!(all_selected || some_selected)`.
    ///
    /// Any selection clears everything; an empty selection selects everything.
    pub fn toggle_all(&mut self) {
        let value = !(self.all_selected() || self.some_selected());
        for (_, on) in &mut self.entries {
            *on = value;
        }
    }

    /// Selected addresses, in list order.
    pub fn selected(&self) -> Vec<Address> {
        self.entries
            .iter()
            .filter(|(_, on)| *on)
            .map(|(a, _)| *a)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(seed: u8) -> Address {
        Address::from_bytes([seed; 20])
    }

    #[test]
    fn test_starts_all_selected() {
        let selection = Selection::new([addr(1), addr(2), addr(1)]);
        assert_eq!(selection.len(), 2);
        assert!(selection.all_selected());
        assert!(!selection.indeterminate());
        assert_eq!(selection.selected(), vec![addr(1), addr(2)]);
    }

    #[test]
    fn test_toggle_all_from_partial_clears() {
        let mut selection = Selection::new([addr(1), addr(2), addr(3)]);
        assert!(selection.toggle(&addr(2)));
        assert!(selection.indeterminate());

        selection.toggle_all();
        assert!(!selection.some_selected());

        selection.toggle_all();
        assert!(selection.all_selected());
    }

    #[test]
    fn test_toggle_unknown_address() {
        let mut selection = Selection::new([addr(1)]);
        assert!(!selection.toggle(&addr(9)));
        assert!(!selection.is_selected(&addr(9)));
    }

    #[test]
    fn test_empty_selection() {
        let mut selection = Selection::default();
        assert!(!selection.all_selected());
        assert!(!selection.some_selected());
        selection.toggle_all();
        assert!(selection.selected().is_empty());
    }
}
