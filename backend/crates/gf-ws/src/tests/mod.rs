mod broadcast_loop;

use crate::{BroadcastMessage, Hub, HubConfig, Metrics};

use gf_core::{
    Analysis, BoundaryCatalog, ContainmentPredicate, GeographicBoundary, Report, ReportBatch,
    ReportWithAnalysis, to_containment_predicate,
};

use serde_json::Value;

pub(crate) const STREAM_ID: &str = "montenegro";
pub(crate) const BOUNDARY_ID: &str = "-53296";
pub(crate) const INSIDE: (f64, f64) = (42.5, 19.5);
pub(crate) const OUTSIDE: (f64, f64) = (45.0, 15.0);

pub(crate) fn catalog() -> BoundaryCatalog {
    BoundaryCatalog::from_boundaries([GeographicBoundary::polygon(
        BOUNDARY_ID,
        "Montenegro",
        vec![vec![(19.0, 42.0), (20.0, 42.0), (20.0, 43.0), (19.0, 43.0)]],
    )])
}

pub(crate) fn predicate() -> ContainmentPredicate {
    to_containment_predicate(catalog().get(BOUNDARY_ID).unwrap()).unwrap()
}

pub(crate) fn hub(max_subscribers: usize) -> Hub {
    Hub::new(HubConfig::new(STREAM_ID, max_subscribers), Metrics::new())
}

pub(crate) fn batch(seqs: &[i64]) -> ReportBatch {
    ReportBatch::new(
        seqs.iter()
            .map(|&seq| ReportWithAnalysis {
                report: Report::new(seq, "reporter", INSIDE.0, INSIDE.1),
                analysis: vec![Analysis::new(seq, "model", "en")],
            })
            .collect(),
    )
}

/// Sequences carried by a delivered frame, in order.
pub(crate) fn delivered_seqs(message: &BroadcastMessage) -> Vec<i64> {
    let envelope: Value = serde_json::from_str(message.payload.as_str()).unwrap();

    envelope["data"]["reports"]
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| pair["report"]["seq"].as_i64().unwrap())
        .collect()
}
