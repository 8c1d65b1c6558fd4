//! # Provenance and Exposure Integration
//!
//! The canonical two-block scenario: a coinbase output of 5000 reaching
//! address `A`, then a transaction splitting it into 4900 for `B` and 90 for
//! `C`. Exposure, transaction-level funding and the summary report are all
//! checked against those hand-computed values.

#[cfg(test)]
mod tests {
    use crate::support::{init_tracing, open_ingested, two_block_rows};
    use cg_chain::{EmptyReason, ExposureOutcome, Traversal};
    use graph_types::{spend_id, tx_id};
    use tempfile::TempDir;

    #[test]
    fn test_exposure_follows_the_split() {
        init_tracing();
        let dir = TempDir::new().unwrap();
        let session = open_ingested(&dir, two_block_rows(), 100, 101).unwrap();

        let t1 = tx_id(101, 1).unwrap();
        assert_eq!(
            session.address_exposure("A", "B").unwrap(),
            ExposureOutcome::Found(vec![(spend_id(t1, 0).unwrap(), 4900)])
        );
        assert_eq!(
            session.address_exposure("A", "C").unwrap(),
            ExposureOutcome::Found(vec![(spend_id(t1, 1).unwrap(), 90)])
        );
    }

    #[test]
    fn test_exposure_cannot_flow_backwards() {
        init_tracing();
        let dir = TempDir::new().unwrap();
        let session = open_ingested(&dir, two_block_rows(), 100, 101).unwrap();

        assert_eq!(
            session.address_exposure("B", "A").unwrap(),
            ExposureOutcome::Empty(EmptyReason::TargetsPrecedeSources)
        );
        assert_eq!(
            session.address_exposure("A", "unseen").unwrap(),
            ExposureOutcome::Empty(EmptyReason::NoTargetOccurrences)
        );
    }

    #[test]
    fn test_tt_holds_one_funding_edge() {
        init_tracing();
        let dir = TempDir::new().unwrap();
        let session = open_ingested(&dir, two_block_rows(), 100, 101).unwrap();

        let tt = session.tt().unwrap();
        assert_eq!(tt.nvals(), 1);
        assert_eq!(
            tt.get(tx_id(100, 1).unwrap(), tx_id(101, 1).unwrap()),
            Some(4990)
        );
    }

    #[test]
    fn test_parents_reconstruct_the_spend_path() {
        init_tracing();
        let dir = TempDir::new().unwrap();
        let session = open_ingested(&dir, two_block_rows(), 100, 101).unwrap();

        let o1 = spend_id(tx_id(100, 1).unwrap(), 0).unwrap();
        let o2 = spend_id(tx_id(101, 1).unwrap(), 0).unwrap();
        let io = session.io().unwrap();
        let parents = Traversal::new(io).parents(&[o1]);
        assert_eq!(Traversal::path_to(&parents, o2), Some(vec![o1, o2]));
    }

    #[test]
    fn test_views_walk_the_ingested_graph() {
        init_tracing();
        let dir = TempDir::new().unwrap();
        let session = open_ingested(&dir, two_block_rows(), 100, 101).unwrap();

        let t1 = session.tx("t1").unwrap().unwrap();
        let inputs = t1.inputs().unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].addresses().unwrap(), vec!["A".to_string()]);
        assert_eq!(
            inputs[0].producing_tx().hash().unwrap().as_deref(),
            Some("t0")
        );

        let b = session.address("B").unwrap().unwrap();
        let received = b.received().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].value, 4900);
    }

    #[test]
    fn test_summary_totals_match_the_scenario() {
        init_tracing();
        let dir = TempDir::new().unwrap();
        let session = open_ingested(&dir, two_block_rows(), 100, 101).unwrap();

        let summary = session.summary().unwrap();
        assert_eq!(summary.blocks, 2);
        assert_eq!(summary.block_first, Some(100));
        assert_eq!(summary.block_last, Some(101));
        // the coinbase input counts 0, t1's input counts 5000
        assert_eq!(summary.value_in, 5000);
        assert_eq!(summary.value_out, 5000 + 4900 + 90);
        let earliest = summary.earliest_tx.as_ref().unwrap();
        let latest = summary.latest_tx.as_ref().unwrap();
        assert_eq!(earliest.hash.as_deref(), Some("t0"));
        assert_eq!(latest.hash.as_deref(), Some("t1"));

        let json = summary.to_json().unwrap();
        assert!(json.contains("\"relation\": \"IO\""));
    }
}
