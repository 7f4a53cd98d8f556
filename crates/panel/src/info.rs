use serde::Serialize;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InfoTab {
    #[default]
    Guide,
    Acknowledgements,
}

impl InfoTab {
    pub const ALL: [InfoTab; 2] = [InfoTab::Guide, InfoTab::Acknowledgements];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        match self {
            InfoTab::Guide => 0,
            InfoTab::Acknowledgements => 1,
        }
    }
}

/// Modal with the visitor guide and acknowledgements. The chosen tab survives closing.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InfoDialog {
    pub open: bool,
    pub tab: InfoTab,
}

impl InfoDialog {
    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Returns `false` for an index with no tab; the current tab stays.
    pub fn select_tab(&mut self, index: usize) -> bool {
        match InfoTab::from_index(index) {
            Some(tab) => {
                self.tab = tab;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabs_select_by_index_and_ignore_out_of_range() {
        let mut d = InfoDialog::default();
        d.open();
        assert!(d.select_tab(1));
        assert_eq!(d.tab, InfoTab::Acknowledgements);
        assert!(!d.select_tab(2));
        assert_eq!(d.tab.index(), 1);

        d.close();
        d.open();
        assert_eq!(d.tab, InfoTab::Acknowledgements);
    }
}
