//! Per-server view state for the finance flow page
//!
//! Selected rows, the active aging filter, the basis toggle, the splitter
//! position and the open wizard all live here, so every HTMX request renders
//! from one place.

use finflow_config::Config;
use finflow_core::{
    AgingRange, DocumentKind, FinanceBasis, FinanceDraft, PositionStore, SelectionState,
    SplitterState,
};

/// Filter and selection for one table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelState {
    pub bucket: Option<AgingRange>,
    pub selection: SelectionState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub payables: PanelState,
    pub receivables: PanelState,
    pub basis: FinanceBasis,
    pub splitter: SplitterState,
    pub draft: Option<FinanceDraft>,
}

impl ViewState {
    /// Initial state; the splitter adopts a stored position when it is in range
    pub fn new(config: &Config, store: &PositionStore) -> Self {
        let splitter = SplitterState::from_config(&config.layout)
            .restore(store.get(&config.layout.storage_key));
        Self {
            payables: PanelState::default(),
            receivables: PanelState::default(),
            basis: config.finance.default_basis,
            splitter,
            draft: None,
        }
    }

    pub fn panel(&self, kind: DocumentKind) -> &PanelState {
        match kind {
            DocumentKind::Payable => &self.payables,
            DocumentKind::Receivable => &self.receivables,
        }
    }

    pub fn panel_mut(&mut self, kind: DocumentKind) -> &mut PanelState {
        match kind {
            DocumentKind::Payable => &mut self.payables,
            DocumentKind::Receivable => &mut self.receivables,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_restores_stored_splitter() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        let mut store = PositionStore::load(&dir.path().join("layout.json")).await.unwrap();
        store.set(&config.layout.storage_key, "62.5".to_string()).await.unwrap();

        let view = ViewState::new(&config, &store);
        assert_eq!(view.splitter.position, 62.5);
        assert_eq!(view.basis, FinanceBasis::Accrual);
        assert!(view.draft.is_none());
    }

    #[tokio::test]
    async fn test_out_of_range_stored_splitter_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        let mut store = PositionStore::load(&dir.path().join("layout.json")).await.unwrap();
        store.set(&config.layout.storage_key, "95".to_string()).await.unwrap();

        let view = ViewState::new(&config, &store);
        assert_eq!(view.splitter.position, 50.0);
    }

    #[tokio::test]
    async fn test_panels_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let store = PositionStore::load(&dir.path().join("layout.json")).await.unwrap();
        let mut view = ViewState::new(&Config::default(), &store);
        view.panel_mut(DocumentKind::Payable).bucket = Some(AgingRange::Current);
        assert_eq!(view.panel(DocumentKind::Payable).bucket, Some(AgingRange::Current));
        assert_eq!(view.panel(DocumentKind::Receivable).bucket, None);
    }
}
